//! Speculative scanning.
//!
//! Every layout component runs inside a [`Trial`]: a private copy of the
//! scanner state plus a cursor. The component moves the cursor and edits
//! the copy freely; the scanner adopts the copy only when the component
//! produces a token. A component that returns `None` therefore leaves the
//! real state untouched, however far it looked ahead.
//!
//! Issues recorded during a trial are kept either way. They describe the
//! input, not the trial's outcome.

use verse_lexer_core::{Cursor, SourceBuffer};

use crate::config::ScanConfig;
use crate::issue::{IssueSpan, ScanIssue, ScanIssueKind};
use crate::state::ScannerState;
use crate::token::{ScanToken, TokenKind};

/// Snapshot of state and position for one speculative attempt.
pub(crate) struct Trial<'a> {
    pub(crate) state: ScannerState,
    pub(crate) cursor: Cursor<'a>,
    pub(crate) source: &'a SourceBuffer,
    pub(crate) config: ScanConfig,
    /// Position the scan call started at.
    pub(crate) start: u32,
    pub(crate) issues: Vec<ScanIssue>,
}

impl<'a> Trial<'a> {
    pub(crate) fn begin(
        state: &ScannerState,
        source: &'a SourceBuffer,
        pos: u32,
        config: ScanConfig,
    ) -> Self {
        let cursor = source.cursor_at(pos);
        Self {
            state: state.clone(),
            cursor,
            source,
            config,
            start: cursor.pos(),
            issues: Vec::new(),
        }
    }

    /// Skip inline whitespace, returning the number of bytes skipped.
    pub(crate) fn skip_inline(&mut self) -> u32 {
        let before = self.cursor.pos();
        self.cursor.eat_whitespace();
        self.cursor.pos() - before
    }

    /// Build a token ending at the cursor, the first `skipped` bytes of
    /// which are leading whitespace.
    pub(crate) fn token(&self, kind: TokenKind, skipped: u32) -> ScanToken {
        let consumed = self.cursor.pos() - self.start;
        debug_assert!(skipped <= consumed, "skipped {skipped} exceeds consumed {consumed}");
        ScanToken::new(kind, skipped, consumed - skipped)
    }

    /// A zero-width token at `at`, which must lie between the start and
    /// the cursor.
    pub(crate) fn zero_width_at(&mut self, kind: TokenKind, at: u32) -> ScanToken {
        self.cursor = self.source.cursor_at(at);
        ScanToken::new(kind, at - self.start, 0)
    }

    pub(crate) fn record(&mut self, start: u32, end: u32, kind: ScanIssueKind) {
        self.issues.push(ScanIssue {
            span: IssueSpan::new(start, end),
            kind,
        });
    }
}
