//! PDF lexer (tokenizer).
//!
//! This module turns a pushback-capable byte stream into PDF lexical tokens,
//! one per call to [`Lexer::next_token`].
//!
//! # PDF Syntax Overview
//!
//! PDF uses a PostScript-like syntax with the following token shapes:
//! - Literal strings: `(Hello)`, with nested parens and backslash escapes
//! - Hex strings: `<48656C6C6F>`
//! - Names: `/Type`, with `#xx` escapes
//! - Delimiters: `[`, `]`, `<<`, `>>`
//! - Regular tokens: numbers, keywords and operators (`42`, `true`, `obj`, `R`)
//!
//! Whitespace (NUL, TAB, LF, FF, CR, SPACE) and comments (`%` up to and
//! including the next LF) are skipped.
//!
//! # Leniency
//!
//! Real-world files are often truncated or damaged. When the stream ends in
//! the middle of a token the lexer closes the token with a synthesized
//! terminator and returns it as if it were well formed. Only a stream that is
//! exhausted before the first significant byte yields an error. Escapes that
//! fail to decode are kept as their raw bytes.

use crate::error::Result;
use crate::source::{ByteSource, PushbackReader, SliceSource};
use bytes::Bytes;
use nom::{
    IResult,
    character::complete::{char, digit1, one_of},
    combinator::opt,
    sequence::preceded,
};
use std::fmt;
use std::io::Read;

const fn byte_set(members: &[u8]) -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < members.len() {
        table[members[i] as usize] = true;
        i += 1;
    }
    table
}

/// PDF whitespace: NUL, TAB, LF, FF, CR, SPACE.
static WHITESPACE: [bool; 256] = byte_set(b"\x00\t\n\x0c\r ");

/// Bytes that end a regular token without being part of it.
static DELIMITERS: [bool; 256] = byte_set(b"()<>[]/%");

/// Returns true for PDF whitespace bytes.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    WHITESPACE[b as usize]
}

/// Returns true for PDF delimiter bytes.
#[inline]
pub fn is_delimiter(b: u8) -> bool {
    DELIMITERS[b as usize]
}

#[inline]
fn is_special(b: u8) -> bool {
    is_whitespace(b) || is_delimiter(b)
}

/// Which scanning rule produced a token.
///
/// The lexeme alone is ambiguous (the hex string `<3C>` lexes to `<<>`), so the
/// kind is recorded by the branch that built the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `<<`
    DictStart,
    /// `>` or `>>`
    DictEnd,
    /// `( ... )`, escapes decoded
    LiteralString,
    /// `< ... >`, hex pairs decoded
    HexString,
    /// `/Name`, `#xx` escapes decoded
    Name,
    /// Numbers, keywords and operators
    Regular,
}

/// Reserved words of the PDF object syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `R`, closes an indirect reference
    R,
    /// `obj`
    Obj,
    /// `endobj`
    EndObj,
    /// `stream`
    Stream,
    /// `endstream`
    EndStream,
    /// `xref`
    Xref,
    /// `trailer`
    Trailer,
    /// `startxref`
    StartXref,
}

/// Numeric value of a regular token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer number (e.g., 42, -123)
    Integer(i64),
    /// Real (floating-point) number (e.g., 3.14, -2.5, .5)
    Real(f64),
}

/// One lexical unit of PDF object syntax.
///
/// Holds the lexeme bytes (escapes already decoded, delimiters kept) and
/// whether every byte is an ASCII digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    bytes: Vec<u8>,
    is_number: bool,
}

impl Token {
    fn new(kind: TokenKind, first: u8) -> Self {
        Self {
            kind,
            bytes: vec![first],
            is_number: kind == TokenKind::Regular && first.is_ascii_digit(),
        }
    }

    #[inline]
    fn push(&mut self, b: u8) {
        self.is_number = self.is_number && b.is_ascii_digit();
        self.bytes.push(b);
    }

    fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    /// Close the token with a synthesized suffix.
    fn terminate(mut self, suffix: &[u8]) -> Self {
        self.extend(suffix);
        self
    }

    /// The rule that produced this token.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The full lexeme, including the leading byte and any terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the token, returning the lexeme bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// True iff the token is non-empty and consists only of ASCII digits.
    pub fn is_number(&self) -> bool {
        self.is_number
    }

    /// Length of the lexeme in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the lexeme has no bytes. Scanned tokens always hold their
    /// leading byte, so this is false for anything the lexer returns.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The decoded payload: string bodies without their brackets and names
    /// without the leading `/`. Other tokens return the whole lexeme.
    pub fn content(&self) -> &[u8] {
        match self.kind {
            TokenKind::LiteralString | TokenKind::HexString => self
                .bytes
                .get(1..self.bytes.len().saturating_sub(1))
                .unwrap_or_default(),
            TokenKind::Name => &self.bytes[1..],
            _ => &self.bytes,
        }
    }

    /// Classify a regular token as a reserved word.
    pub fn keyword(&self) -> Option<Keyword> {
        if self.kind != TokenKind::Regular {
            return None;
        }
        let keyword = match self.bytes.as_slice() {
            b"true" => Keyword::True,
            b"false" => Keyword::False,
            b"null" => Keyword::Null,
            b"R" => Keyword::R,
            b"obj" => Keyword::Obj,
            b"endobj" => Keyword::EndObj,
            b"stream" => Keyword::Stream,
            b"endstream" => Keyword::EndStream,
            b"xref" => Keyword::Xref,
            b"trailer" => Keyword::Trailer,
            b"startxref" => Keyword::StartXref,
            _ => return None,
        };
        Some(keyword)
    }

    /// Interpret a regular token as a PDF number.
    ///
    /// Accepts an optional sign, digits and an optional fractional part
    /// (`.5` and `5.` are both valid). Returns `None` for anything else,
    /// including integers that overflow `i64`.
    pub fn number(&self) -> Option<Number> {
        if self.kind != TokenKind::Regular {
            return None;
        }
        match parse_number(&self.bytes) {
            Ok((rest, number)) if rest.is_empty() => Some(number),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

fn number_error(input: &[u8]) -> nom::Err<nom::error::Error<&[u8]>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
}

/// Parse an integer or real number.
///
/// PDF numbers can be:
/// - Integers: 42, -123, +17
/// - Reals: 3.14, -2.5, .5, 0., -.002
fn parse_number(input: &[u8]) -> IResult<&[u8], Number> {
    let (input, sign) = opt(one_of("+-"))(input)?;
    let (input, int_part) = opt(digit1)(input)?;
    let (input, frac_part) = opt(preceded(char('.'), opt(digit1)))(input)?;

    // At least one digit on either side of the point
    let frac_digits = frac_part.flatten();
    if int_part.is_none() && frac_digits.is_none() {
        return Err(number_error(input));
    }

    let digits = |part: Option<&[u8]>| -> std::result::Result<String, _> {
        match part {
            Some(d) => std::str::from_utf8(d)
                .map(str::to_string)
                .map_err(|_| number_error(input)),
            None => Ok(String::new()),
        }
    };
    let sign = if sign == Some('-') { "-" } else { "" };
    let int_str = digits(int_part)?;

    if frac_part.is_some() {
        // .5 becomes 0.5, 5. becomes 5.0
        let frac_str = digits(frac_digits)?;
        let text = format!(
            "{}{}.{}",
            sign,
            if int_str.is_empty() { "0" } else { &int_str },
            if frac_str.is_empty() { "0" } else { &frac_str }
        );
        let real: f64 = text.parse().map_err(|_| number_error(input))?;
        Ok((input, Number::Real(real)))
    } else {
        let int: i64 = format!("{}{}", sign, int_str)
            .parse()
            .map_err(|_| number_error(input))?;
        Ok((input, Number::Integer(int)))
    }
}

/// Outcome of pulling one byte while a token is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// A byte is available.
    Continue(u8),
    /// The source ran dry; close the token with this suffix.
    Terminate(&'static [u8]),
}

/// Pull the next byte for `$token`, or return it closed with `$suffix`.
macro_rules! next_or_finish {
    ($step:expr, $token:ident) => {
        match $step {
            Step::Continue(b) => b,
            Step::Terminate(suffix) => return Ok($token.terminate(suffix)),
        }
    };
}

/// Decode two ASCII hex digits into a byte.
fn decode_hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Pull-based PDF tokenizer over a [`ByteSource`].
#[derive(Debug)]
pub struct Lexer<S> {
    source: S,
    finished: bool,
}

impl Lexer<SliceSource> {
    /// Tokenize an in-memory buffer.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::new(SliceSource::new(data))
    }
}

impl<R: Read> Lexer<PushbackReader<R>> {
    /// Tokenize anything implementing [`Read`].
    pub fn from_reader(reader: R) -> Self {
        Self::new(PushbackReader::new(reader))
    }
}

impl<S: ByteSource> Lexer<S> {
    /// Create a lexer reading from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            finished: false,
        }
    }

    /// Bytes consumed from the source so far.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Give back the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Scan the next token.
    ///
    /// # Errors
    ///
    /// Fails only when the source is exhausted (or fails) before the first
    /// significant byte of a token. Truncation after that point is absorbed:
    /// the token is closed with a synthesized terminator.
    pub fn next_token(&mut self) -> Result<Token> {
        let b = self.skip_insignificant()?;

        match b {
            b'[' => Ok(Token::new(TokenKind::ArrayStart, b)),
            b']' => Ok(Token::new(TokenKind::ArrayEnd, b)),
            b'(' => self.scan_literal_string(Token::new(TokenKind::LiteralString, b)),
            b'/' => self.scan_name(Token::new(TokenKind::Name, b)),
            b'<' => self.scan_angle(Token::new(TokenKind::HexString, b)),
            b'>' => Ok(self.scan_dict_end(Token::new(TokenKind::DictEnd, b))),
            _ => self.scan_regular(Token::new(TokenKind::Regular, b)),
        }
    }

    /// Skip whitespace and comments, returning the first significant byte.
    fn skip_insignificant(&mut self) -> Result<u8> {
        loop {
            let b = self.source.read_byte()?;
            if is_whitespace(b) {
                continue;
            }
            if b == b'%' {
                while self.source.read_byte()? != b'\n' {}
                continue;
            }
            return Ok(b);
        }
    }

    /// Map a read outcome onto a scan step.
    ///
    /// This is the single place where running out of input in the middle of a
    /// token becomes "close the token with `suffix`".
    fn truncation_step(&self, read: Result<u8>, suffix: &'static [u8]) -> Step {
        match read {
            Ok(b) => Step::Continue(b),
            Err(e) => {
                log::trace!(
                    "Token truncated at byte {} ({}), closing with {:?}",
                    self.source.position(),
                    e,
                    String::from_utf8_lossy(suffix)
                );
                Step::Terminate(suffix)
            },
        }
    }

    fn advance(&mut self, suffix: &'static [u8]) -> Step {
        let read = self.source.read_byte();
        self.truncation_step(read, suffix)
    }

    fn advance_significant(&mut self, suffix: &'static [u8]) -> Step {
        let read = self.skip_insignificant();
        self.truncation_step(read, suffix)
    }

    /// Literal string: balanced parens, backslash escapes.
    fn scan_literal_string(&mut self, mut token: Token) -> Result<Token> {
        let mut depth = 1usize;

        while depth > 0 {
            let b = next_or_finish!(self.advance(b")"), token);
            match b {
                b'\\' => {
                    let escaped = next_or_finish!(self.advance(b")"), token);
                    match escaped {
                        // Line continuation
                        b'\n' => {},
                        b'\r' => {
                            let next = next_or_finish!(self.advance(b")"), token);
                            if next != b'\n' {
                                self.source.unread_byte();
                            }
                        },
                        b'n' => token.push(b'\n'),
                        b'r' => token.push(b'\r'),
                        b't' => token.push(b'\t'),
                        b'b' => token.push(0x08),
                        b'f' => token.push(0x0C),
                        b'0'..=b'7' => self.scan_octal_escape(escaped, &mut token),
                        other => token.push(other),
                    }
                },
                b'(' => {
                    depth += 1;
                    token.push(b);
                },
                b')' => {
                    depth -= 1;
                    token.push(b);
                },
                _ => token.push(b),
            }
        }

        Ok(token)
    }

    /// Up to three octal digits; values above 0o377 are kept as raw digits.
    fn scan_octal_escape(&mut self, first: u8, token: &mut Token) {
        let mut digits = [first, 0, 0];
        let mut len = 1;

        while len < digits.len() {
            match self.source.read_byte() {
                Ok(b @ b'0'..=b'7') => {
                    digits[len] = b;
                    len += 1;
                },
                Ok(_) => {
                    self.source.unread_byte();
                    break;
                },
                Err(_) => break,
            }
        }

        let code = digits[..len]
            .iter()
            .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
        match u8::try_from(code) {
            Ok(byte) => token.push(byte),
            Err(_) => {
                log::debug!(
                    "Octal escape \\{} out of byte range, keeping raw digits",
                    String::from_utf8_lossy(&digits[..len])
                );
                token.extend(&digits[..len]);
            },
        }
    }

    /// Name: runs to whitespace or a delimiter, `#xx` decoded.
    fn scan_name(&mut self, mut token: Token) -> Result<Token> {
        loop {
            let b = next_or_finish!(self.advance(b""), token);

            if is_special(b) {
                self.source.unread_byte();
                return Ok(token);
            }

            if b == b'#' {
                // Exactly two bytes follow, padded with '0' at end of input
                let hi = self.source.read_byte().unwrap_or(b'0');
                let lo = self.source.read_byte().unwrap_or(b'0');
                match decode_hex_pair(hi, lo) {
                    Some(byte) => token.push(byte),
                    None => {
                        log::debug!(
                            "Invalid name escape #{}{}, keeping raw bytes",
                            hi as char,
                            lo as char
                        );
                        token.extend(&[b'#', hi, lo]);
                    },
                }
                continue;
            }

            token.push(b);
        }
    }

    /// `<<`, or a hex string.
    fn scan_angle(&mut self, mut token: Token) -> Result<Token> {
        let mut b = next_or_finish!(self.advance_significant(b">"), token);

        if b == b'<' {
            token.kind = TokenKind::DictStart;
            token.push(b);
            return Ok(token);
        }

        loop {
            if b == b'>' {
                token.push(b'>');
                return Ok(token);
            }

            // A missing second nibble counts as '0'
            let lo = match self.advance_significant(b">") {
                Step::Continue(b'>') | Step::Terminate(_) => {
                    Self::push_hex_pair(&mut token, b, b'0');
                    token.push(b'>');
                    return Ok(token);
                },
                Step::Continue(lo) => lo,
            };
            Self::push_hex_pair(&mut token, b, lo);

            b = next_or_finish!(self.advance_significant(b">"), token);
        }
    }

    fn push_hex_pair(token: &mut Token, hi: u8, lo: u8) {
        match decode_hex_pair(hi, lo) {
            Some(byte) => token.push(byte),
            None => {
                log::debug!(
                    "Invalid hex string pair {}{}, keeping raw bytes",
                    hi as char,
                    lo as char
                );
                token.extend(&[hi, lo]);
            },
        }
    }

    /// `>` optionally followed by a second `>`.
    fn scan_dict_end(&mut self, mut token: Token) -> Token {
        match self.source.read_byte() {
            Ok(b'>') => token.push(b'>'),
            Ok(_) => self.source.unread_byte(),
            Err(_) => {},
        }
        token
    }

    /// Numbers, keywords, operators: runs to whitespace or a delimiter.
    fn scan_regular(&mut self, mut token: Token) -> Result<Token> {
        loop {
            let b = next_or_finish!(self.advance(b""), token);
            if is_special(b) {
                self.source.unread_byte();
                return Ok(token);
            }
            token.push(b);
        }
    }
}

impl<S: ByteSource> Iterator for Lexer<S> {
    type Item = Result<Token>;

    /// Yields tokens until the source is exhausted. A non-EOF failure is
    /// yielded once, after which the iterator is finished.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.finished = true;
                if e.is_eof() {
                    None
                } else {
                    Some(Err(e))
                }
            },
        }
    }
}

/// Tokenize an entire buffer.
pub fn tokens(input: &[u8]) -> Result<Vec<Token>> {
    Lexer::new(SliceSource::from_slice(input)).collect()
}
