//! Test driver playing the parser's role.
//!
//! The driver owns a position in the document. Tests alternate between
//! lexing literal tokens (as the grammar's own lexer would) and asking the
//! scanner for a structural token from an explicit valid set. Every byte
//! that passes through the driver is logged, so a finished run can be
//! checked to cover the input exactly.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Once;

use verse_lexer_core::SourceBuffer;
use verse_scanner::{ScanToken, Scanner, TokenKind, ValidSymbols};

pub const OPEN: ValidSymbols = ValidSymbols::new()
    .with(TokenKind::OpenBracedBlock)
    .with(TokenKind::OpenIndentBlock);
pub const OPEN_COLON: ValidSymbols = ValidSymbols::single(TokenKind::OpenIndentBlockColon);
pub const INDENT_OR_CLOSE: ValidSymbols = ValidSymbols::new()
    .with(TokenKind::Indent)
    .with(TokenKind::CloseIndentBlock);
pub const DEDENT: ValidSymbols = ValidSymbols::single(TokenKind::Dedent);
/// After a complete expression: attributes may follow, or the statement ends.
pub const AFTER_EXPR: ValidSymbols = ValidSymbols::new()
    .with(TokenKind::AutoTerminator)
    .with(TokenKind::BestGuessAttrStart);
pub const TERMINATOR: ValidSymbols = ValidSymbols::single(TokenKind::AutoTerminator);
pub const STRING_END: ValidSymbols = ValidSymbols::single(TokenKind::IncompleteString);

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=verse_scanner=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_test_writer().with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// One logged piece of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Piece {
    /// Whitespace the grammar skips as extras.
    Extra(String),
    Literal(String),
    Token { kind: TokenKind, skipped: String, text: String },
}

pub struct Driver {
    pub source: SourceBuffer,
    pub scanner: Scanner,
    pub pos: u32,
    pub log: Vec<Piece>,
}

impl Driver {
    pub fn new(text: &str) -> Self {
        init_tracing();
        Self {
            source: SourceBuffer::new(text),
            scanner: Scanner::new(),
            pos: 0,
            log: Vec::new(),
        }
    }

    fn slice(&self, start: u32, end: u32) -> String {
        String::from_utf8_lossy(&self.source.as_bytes()[start as usize..end as usize]).into_owned()
    }

    /// Skip extras, then lex `text` as a literal token.
    pub fn literal(&mut self, text: &str) {
        let bytes = self.source.as_bytes();
        let start = self.pos;
        let mut pos = start as usize;
        while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\r' | b'\n') {
            pos += 1;
        }
        let pos = u32::try_from(pos).unwrap();
        if pos > start {
            self.log.push(Piece::Extra(self.slice(start, pos)));
        }
        let end = pos + u32::try_from(text.len()).unwrap();
        assert!(
            end <= self.source.len() && self.slice(pos, end) == text,
            "expected literal {text:?} at {pos}, found {:?}",
            self.slice(pos, self.source.len().min(end))
        );
        self.log.push(Piece::Literal(text.to_string()));
        self.pos = end;
    }

    /// Ask the scanner for a token; log and consume it if one comes back.
    pub fn scan(&mut self, valid: ValidSymbols) -> Option<ScanToken> {
        let token = self.scanner.next(valid, &self.source, self.pos)?;
        assert!(valid.contains(token.kind), "{} outside {valid:?}", token.kind);
        let text_start = self.pos + token.skipped;
        let end = self.pos + token.consumed();
        self.log.push(Piece::Token {
            kind: token.kind,
            skipped: self.slice(self.pos, text_start),
            text: self.slice(text_start, end),
        });
        self.pos = end;
        Some(token)
    }

    /// Scan and require a token of `kind`.
    pub fn expect(&mut self, valid: ValidSymbols, kind: TokenKind) -> ScanToken {
        match self.scan(valid) {
            Some(token) if token.kind == kind => token,
            other => panic!(
                "expected {kind} at {} from {valid:?}, got {other:?}",
                self.pos
            ),
        }
    }

    /// Scan and require no token.
    pub fn expect_none(&mut self, valid: ValidSymbols) {
        let before = self.pos;
        if let Some(token) = self.scan(valid) {
            panic!("expected no token at {before} from {valid:?}, got {token:?}");
        }
    }

    /// Structural token kinds emitted so far, in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.log
            .iter()
            .filter_map(|p| match p {
                Piece::Token { kind, .. } => Some(*kind),
                Piece::Extra(_) | Piece::Literal(_) => None,
            })
            .collect()
    }

    /// Concatenation of every logged piece.
    pub fn reconstruct(&self) -> String {
        self.log
            .iter()
            .map(|p| match p {
                Piece::Extra(text) | Piece::Literal(text) => text.clone(),
                Piece::Token { skipped, text, .. } => format!("{skipped}{text}"),
            })
            .collect()
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.source.len()
    }
}
