//! Scanner diagnostics and state (de)serialization errors.
//!
//! Nothing here aborts scanning. A [`ScanIssue`] records a condition the
//! scanner resolved by falling back (no token, or a recovery token); the
//! parser's own error nodes carry the user-facing story. [`StateError`] is
//! the only `Err` type in the crate, returned when a host hands back a
//! state buffer that does not decode.

use thiserror::Error;

/// Byte range a [`ScanIssue`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IssueSpan {
    pub start: u32,
    pub end: u32,
}

impl IssueSpan {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} exceeds end {end}");
        Self { start, end }
    }
}

/// A non-fatal condition observed while scanning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScanIssue {
    pub span: IssueSpan,
    pub kind: ScanIssueKind,
}

/// Why the attribute trial scan gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrialFailure {
    /// Input ended before the angle bracket closed.
    EndOfInput,
    /// A closing bracket with no matching opener inside the trial.
    UnmatchedClose,
    /// A line break or `;` where a statement terminator would be mandatory.
    StatementBoundary,
    /// The step bound ran out.
    StepLimit,
}

impl std::fmt::Display for TrialFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TrialFailure::EndOfInput => "end of input",
            TrialFailure::UnmatchedClose => "unmatched closing bracket",
            TrialFailure::StatementBoundary => "statement boundary",
            TrialFailure::StepLimit => "step limit",
        })
    }
}

/// What went wrong.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum ScanIssueKind {
    /// The `<` could not be confirmed as an attribute; parsed as comparison.
    #[error("`<` left as a comparison: attribute trial stopped at {reason}")]
    LexicalAmbiguityUnresolved { reason: TrialFailure },
    /// A line's indentation matches no open block level.
    #[error("indentation at column {column} matches no open block (innermost block at column {block})")]
    MismatchedIndentation { column: u32, block: u32 },
    /// A string literal reached the end of its line without a closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// Bytes the scanner cannot assign to any token, seen during recovery.
    #[error("unrecoverable byte sequence during error recovery")]
    UnrecoverableByteSequence,
}

/// Failure to serialize or restore a [`ScannerState`](crate::ScannerState).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("state buffer truncated: needed {needed} bytes, found {found}")]
    Truncated { needed: usize, found: usize },
    #[error("state buffer has {extra} trailing bytes")]
    TrailingBytes { extra: usize },
    #[error("unknown scan mode tag {0}")]
    UnknownMode(u8),
    #[error("unknown state flags {0:#04x}")]
    UnknownFlags(u8),
    #[error("unknown frame kind tag {0}")]
    UnknownFrameKind(u8),
    #[error("{count} frames exceed the limit of {max}")]
    TooManyFrames { count: usize, max: usize },
    #[error("indentation column {column} does not exceed enclosing column {enclosing}")]
    NonIncreasingIndent { column: u16, enclosing: u16 },
    #[error("output buffer too small: needed {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}
