//! The scanner entry point.

use tracing::{debug, trace};
use verse_lexer_core::SourceBuffer;

use crate::config::ScanConfig;
use crate::issue::{ScanIssue, StateError};
use crate::state::{ScanMode, ScannerState};
use crate::token::{ScanToken, TokenKind};
use crate::trial::Trial;
use crate::valid::ValidSymbols;
use crate::{attr, block, indent, sentinel, string, terminator};

type Component = fn(&mut Trial<'_>, ValidSymbols) -> Option<ScanToken>;

/// Layout components in priority order, each gated on the kinds it emits.
///
/// Openers come before terminators so a line break after `:=` opens a
/// block; the attribute trial comes before terminators so `x <a>` is not
/// cut short; terminators come before indentation so a statement ends
/// before its block does.
const LAYOUT: [(ValidSymbols, Component); 6] = [
    (ValidSymbols::single(TokenKind::OpenBracedBlock), block::braced),
    (ValidSymbols::single(TokenKind::OpenIndentBlockColon), block::indent_colon),
    (ValidSymbols::single(TokenKind::OpenIndentBlock), block::indent),
    (ValidSymbols::single(TokenKind::BestGuessAttrStart), attr::scan),
    (ValidSymbols::single(TokenKind::AutoTerminator), terminator::scan),
    (indent::KINDS, indent::scan),
];

/// Components that may resynchronize a parse in error recovery, tried
/// before falling back to the sentinel.
const RESYNC: [(ValidSymbols, Component); 2] = [
    (ValidSymbols::single(TokenKind::OpenBracedBlock), block::braced),
    (ValidSymbols::single(TokenKind::AutoTerminator), terminator::scan),
];

/// Context-sensitive scanner for Verse layout tokens.
///
/// A `Scanner` is a value: clone it to fork a parse branch, serialize it to
/// checkpoint one. Each [`next`](Self::next) call either returns a single
/// token from the offered set or returns `None` and consumes nothing.
///
/// # Example
/// ```
/// use verse_lexer_core::SourceBuffer;
/// use verse_scanner::{Scanner, TokenKind, ValidSymbols};
///
/// let source = SourceBuffer::new("x := 1\ny := 2\n");
/// let mut scanner = Scanner::new();
///
/// // The grammar lexed `x := 1`; a terminator is acceptable next.
/// let token = scanner.next(ValidSymbols::single(TokenKind::AutoTerminator), &source, 6);
/// assert_eq!(token.map(|t| (t.kind, t.len)), Some((TokenKind::AutoTerminator, 1)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Scanner {
    state: ScannerState,
    config: ScanConfig,
    issues: Vec<ScanIssue>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Replace the state, e.g. with one restored from a checkpoint.
    pub fn restore(&mut self, state: ScannerState) {
        self.state = state;
    }

    /// Serialize the state into `buf`.
    ///
    /// [`SERIALIZATION_BUFFER_SIZE`](crate::SERIALIZATION_BUFFER_SIZE) bytes
    /// always suffice.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, StateError> {
        self.state.serialize(buf)
    }

    /// Restore the state from a buffer written by [`serialize`](Self::serialize).
    ///
    /// An empty buffer restores the initial state. On error the current
    /// state is kept.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), StateError> {
        self.state = ScannerState::deserialize(bytes)?;
        Ok(())
    }

    /// Distinct issues recorded so far, in the order first seen.
    ///
    /// Long-lived scanners should drain them with
    /// [`take_issues`](Self::take_issues) once per parse.
    pub fn issues(&self) -> &[ScanIssue] {
        &self.issues
    }

    pub fn take_issues(&mut self) -> Vec<ScanIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Scan for one structural token at byte offset `pos`.
    ///
    /// `pos` is where the parser's lexer stands: the literal tokens between
    /// the previous call and `pos` are replayed first. The returned token,
    /// if any, is drawn from `valid` and starts at `pos`.
    pub fn next(
        &mut self,
        valid: ValidSymbols,
        source: &SourceBuffer,
        pos: u32,
    ) -> Option<ScanToken> {
        let pos = pos.min(source.len());
        let repeated_sentinel = self.state.sentinel_emitted && self.state.resume == pos;
        crate::tracker::catch_up(&mut self.state, source, pos);

        let token = if valid.contains(TokenKind::ErrorSentinel) {
            self.recover(valid, source, pos, repeated_sentinel)
        } else {
            if self.state.mode == ScanMode::ErrorRecovery || self.state.sentinel_emitted {
                trace!(pos, "error recovery finished");
                self.state.mode = ScanMode::Normal;
                self.state.sentinel_emitted = false;
            }
            match self.state.mode {
                ScanMode::StringBody if valid.contains(TokenKind::IncompleteString) => {
                    self.speculate(source, pos, |trial| string::scan(trial, valid))
                }
                ScanMode::StringBody => None,
                ScanMode::Normal | ScanMode::ErrorRecovery => self.scan_layout(valid, source, pos),
            }
        };

        match token {
            Some(token) => {
                self.state.resume = pos + token.consumed();
                debug!(
                    pos,
                    kind = %token.kind,
                    skipped = token.skipped,
                    len = token.len,
                    frames = self.state.frames.len(),
                    depth = self.state.bracket_depth,
                    "token"
                );
            }
            None => trace!(pos, ?valid, "no token"),
        }
        token
    }

    fn scan_layout(
        &mut self,
        valid: ValidSymbols,
        source: &SourceBuffer,
        pos: u32,
    ) -> Option<ScanToken> {
        LAYOUT
            .iter()
            .filter(|(gate, _)| valid.intersects(*gate))
            .find_map(|&(_, component)| self.speculate(source, pos, |trial| component(trial, valid)))
    }

    /// Error recovery: resynchronize on a braced block or a line break when
    /// possible, keeping the layout; otherwise emit the sentinel and reset.
    ///
    /// A resync token must consume input, or recovery could stall on a
    /// zero-width boundary.
    fn recover(
        &mut self,
        valid: ValidSymbols,
        source: &SourceBuffer,
        pos: u32,
        repeated_sentinel: bool,
    ) -> Option<ScanToken> {
        if self.state.mode != ScanMode::StringBody {
            let resync = RESYNC
                .iter()
                .filter(|(gate, _)| valid.intersects(*gate))
                .find_map(|&(_, component)| {
                    self.speculate(source, pos, |trial| {
                        let token = component(trial, valid).filter(|t| t.consumed() > 0)?;
                        trial.state.mode = ScanMode::ErrorRecovery;
                        trial.state.sentinel_emitted = false;
                        Some(token)
                    })
                });
            if let Some(token) = resync {
                debug!(pos, kind = %token.kind, "error recovery resynchronized");
                return Some(token);
            }
        }
        self.speculate(source, pos, |trial| sentinel::scan(trial, valid, repeated_sentinel))
    }

    /// Run `component` against a copy of the state, adopting the copy only
    /// if it produced a token.
    fn speculate(
        &mut self,
        source: &SourceBuffer,
        pos: u32,
        component: impl FnOnce(&mut Trial<'_>) -> Option<ScanToken>,
    ) -> Option<ScanToken> {
        let mut trial = Trial::begin(&self.state, source, pos, self.config);
        let token = component(&mut trial);
        let Trial { state, issues, .. } = trial;
        for issue in issues {
            self.record(issue);
        }
        if token.is_some() {
            self.state = state;
        }
        token
    }

    /// Record an issue unless it is already recorded. Parse branches
    /// revisit positions, possibly interleaved with other branches.
    fn record(&mut self, issue: ScanIssue) {
        if !self.issues.contains(&issue) {
            debug!(start = issue.span.start, end = issue.span.end, issue = %issue.kind, "scan issue");
            self.issues.push(issue);
        }
    }
}

#[cfg(test)]
mod tests;
