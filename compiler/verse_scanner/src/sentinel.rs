//! Participation in the parser's error recovery.
//!
//! The parser offers the sentinel only while it is recovering from a
//! syntax error. The scanner first tries to resynchronize on a braced
//! block or a line break (see [`Scanner::next`](crate::Scanner::next)).
//! Failing that, the layout state describes a parse that no longer exists,
//! so the scanner drops it and starts over from the baseline: no frames,
//! depth zero, `Normal` mode.

use tracing::debug;

use crate::issue::ScanIssueKind;
use crate::state::ScanMode;
use crate::token::{ScanToken, TokenKind};
use crate::trial::Trial;
use crate::valid::ValidSymbols;

/// Emit a zero-width sentinel and reset the layout state.
///
/// `repeated` reports that the previous call already emitted a sentinel at
/// this offset; a second one would only stall the parser.
pub(crate) fn scan(trial: &mut Trial<'_>, valid: ValidSymbols, repeated: bool) -> Option<ScanToken> {
    if repeated {
        return None;
    }

    if let Some(issue) = trial.source.encoding_issue_at(trial.start) {
        let (start, end) = (issue.pos, issue.pos + issue.len);
        trial.record(start, end, ScanIssueKind::UnrecoverableByteSequence);
    }

    debug!(
        pos = trial.start,
        frames = trial.state.frames.len(),
        depth = trial.state.bracket_depth,
        "error recovery, layout state reset"
    );
    trial.state.clear_layout();
    trial.state.mode = ScanMode::Normal;
    trial.state.sentinel_emitted = true;

    let kind = if trial.config.sentinel_as_terminator && valid.contains(TokenKind::AutoTerminator) {
        TokenKind::AutoTerminator
    } else {
        TokenKind::ErrorSentinel
    };
    Some(trial.token(kind, 0))
}
