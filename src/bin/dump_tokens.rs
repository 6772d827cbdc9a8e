//! Dump the token stream of a file.
//!
//! Prints one line per token: byte offset after the token, kind, the
//! number flag and the lexeme with control bytes escaped.
//!
//! Usage:
//!   cargo run --bin dump_tokens -- path/to/file.pdf
//!   cargo run --bin dump_tokens -- --limit 200 path/to/file.pdf

use pdf_lex::{Lexer, Token};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

struct DumpConfig {
    path: PathBuf,
    limit: Option<usize>,
}

impl DumpConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut path = None;
        let mut limit = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--limit" | "-n" => {
                    i += 1;
                    limit = args.get(i).and_then(|n| n.parse().ok());
                },
                other => path = Some(PathBuf::from(other)),
            }
            i += 1;
        }

        Some(Self { path: path?, limit })
    }
}

fn escape_lexeme(token: &Token) -> String {
    token
        .as_bytes()
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(config) = DumpConfig::from_args() else {
        eprintln!("Usage: dump_tokens [--limit N] <file>");
        return ExitCode::FAILURE;
    };

    let file = match File::open(&config.path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open {}: {}", config.path.display(), e);
            return ExitCode::FAILURE;
        },
    };

    let mut lexer = Lexer::from_reader(file);
    let mut count = 0usize;

    while config.limit.map_or(true, |limit| count < limit) {
        match lexer.next_token() {
            Ok(token) => {
                println!(
                    "{:>10}  {:<13}  {}  {}",
                    lexer.position(),
                    format!("{:?}", token.kind()),
                    if token.is_number() { "#" } else { " " },
                    escape_lexeme(&token)
                );
                count += 1;
            },
            Err(e) if e.is_eof() => break,
            Err(e) => {
                eprintln!("Read failed after {} tokens: {}", count, e);
                return ExitCode::FAILURE;
            },
        }
    }

    log::info!("{} tokens from {}", count, config.path.display());
    ExitCode::SUCCESS
}
