//! Structural token vocabulary shared with the grammar.
//!
//! The discriminants follow the order of the grammar's `externals` list,
//! so a host can index its valid-symbol array with `kind as usize`.

/// A structural token the scanner can produce.
///
/// None of these are expressible as fixed literals: each one depends on
/// layout or on lookahead the grammar's own lexer cannot perform.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// Synthesized statement boundary inferred from layout.
    AutoTerminator = 0,
    /// `{` opening a braced block.
    OpenBracedBlock = 1,
    /// Start of an indentation block for a declaration body (after `=`/`:=`).
    OpenIndentBlock = 2,
    /// Start of an indentation block for a macro body (consumes the `:`).
    OpenIndentBlockColon = 3,
    /// End of an indentation block.
    CloseIndentBlock = 4,
    /// Start of one statement inside an indentation block.
    Indent = 5,
    /// End of one statement inside an indentation block.
    Dedent = 6,
    /// Remainder of a string literal that never reaches its closing quote.
    IncompleteString = 7,
    /// Zero-width marker placed before a `<` that opens an attribute.
    BestGuessAttrStart = 8,
    /// Zero-width marker emitted while the parser recovers from an error.
    ErrorSentinel = 9,
}

impl TokenKind {
    /// Number of structural token kinds.
    pub const COUNT: usize = 10;

    /// All kinds, in discriminant order.
    pub const ALL: [TokenKind; Self::COUNT] = [
        TokenKind::AutoTerminator,
        TokenKind::OpenBracedBlock,
        TokenKind::OpenIndentBlock,
        TokenKind::OpenIndentBlockColon,
        TokenKind::CloseIndentBlock,
        TokenKind::Indent,
        TokenKind::Dedent,
        TokenKind::IncompleteString,
        TokenKind::BestGuessAttrStart,
        TokenKind::ErrorSentinel,
    ];

    /// The grammar-side symbol name (as written in `externals`).
    pub const fn symbol_name(self) -> &'static str {
        match self {
            TokenKind::AutoTerminator => "_auto_terminator",
            TokenKind::OpenBracedBlock => "_open_braced_block",
            TokenKind::OpenIndentBlock => "_open_indent_block",
            TokenKind::OpenIndentBlockColon => "_open_indent_block_colon",
            TokenKind::CloseIndentBlock => "_close_indent_block",
            TokenKind::Indent => "_indent",
            TokenKind::Dedent => "_dedent",
            TokenKind::IncompleteString => "_incomplete_string",
            TokenKind::BestGuessAttrStart => "_best_guess_attr_start",
            TokenKind::ErrorSentinel => "_error_sentinel",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol_name())
    }
}

/// One scanner decision: a token kind plus the bytes it consumed.
///
/// `skipped` counts leading whitespace consumed before the token proper;
/// `len` is the token's own width. Zero-width tokens (`len == 0`) are common:
/// terminators before a closer, dedents, closes, and attribute starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanToken {
    pub kind: TokenKind,
    pub skipped: u32,
    pub len: u32,
}

impl ScanToken {
    pub(crate) fn new(kind: TokenKind, skipped: u32, len: u32) -> Self {
        Self { kind, skipped, len }
    }

    /// Total bytes consumed by this decision.
    #[inline]
    pub fn consumed(&self) -> u32 {
        self.skipped + self.len
    }
}
