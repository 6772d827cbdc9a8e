//! # pdf_lex
//!
//! The lexical layer of a PDF object-syntax reader.
//!
//! ## Core Features
//!
//! - **Lenient tokenizer**: [`Lexer`] turns a byte stream into [`Token`]s one
//!   call at a time. Literal strings (nested parens, C-style and octal
//!   escapes), hex strings, names with `#xx` escapes, delimiters and regular
//!   tokens are all decoded in a single pass. Truncated input yields a best
//!   effort token with a synthesized terminator instead of an error.
//! - **Pushback sources**: any [`std::io::Read`] via [`PushbackReader`], or an
//!   in-memory buffer via [`SliceSource`].
//! - **Dictionaries**: [`Dictionary`] typed accessors resolve indirect
//!   references through an explicit [`Resolver`] before checking types.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_lex::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::from_bytes(&b"<< /Title (Hello\\041) >>"[..]);
//! assert_eq!(lexer.next_token()?.kind(), TokenKind::DictStart);
//! assert_eq!(lexer.next_token()?.content(), b"Title");
//! assert_eq!(lexer.next_token()?.content(), b"Hello!");
//! # Ok::<(), pdf_lex::Error>(())
//! ```
//!
//! ```
//! use pdf_lex::{Dictionary, Object, ObjectRef, ObjectTable};
//!
//! let mut table = ObjectTable::new();
//! table.insert(ObjectRef::new(7, 0), Object::Integer(42));
//!
//! let mut dict = Dictionary::new();
//! dict.insert("Count", Object::Reference(ObjectRef::new(7, 0)));
//! assert_eq!(dict.get_int("Count", &table)?, 42);
//! # Ok::<(), pdf_lex::Error>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Tokenizing
pub mod lexer;
pub mod source;

// Object model boundary
pub mod dictionary;
pub mod object;
pub mod resolve;

// Configuration
pub mod config;

// Re-exports
pub use config::ResolveOptions;
pub use dictionary::Dictionary;
pub use error::{Error, MismatchCause, Result};
pub use lexer::{tokens, Keyword, Lexer, Number, Token, TokenKind};
pub use object::{Object, ObjectRef};
pub use resolve::{resolve, ObjectTable, Resolver};
pub use source::{ByteSource, PushbackReader, SliceSource};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
