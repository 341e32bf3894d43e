//! Automatic statement terminators.

use tracing::trace;

use crate::state::FrameKind;
use crate::token::{ScanToken, TokenKind};
use crate::trial::Trial;
use crate::valid::ValidSymbols;

/// Infer a statement boundary from layout.
///
/// Only at bracket depth zero, and never directly inside a string splice,
/// which holds a single expression. After inline whitespace:
/// - a line break is consumed as the terminator;
/// - end of input or a closing `)`, `]`, `}` yields a zero-width terminator;
/// - a position already at the start of a line (its break consumed by an
///   earlier block transition) yields a zero-width terminator.
pub(crate) fn scan(trial: &mut Trial<'_>, _valid: ValidSymbols) -> Option<ScanToken> {
    if trial.state.bracket_depth > 0 {
        trace!(depth = trial.state.bracket_depth, "terminator suppressed inside brackets");
        return None;
    }
    if trial.state.top_frame().is_some_and(|f| f.kind == FrameKind::Splice) {
        return None;
    }
    let skipped = trial.skip_inline();
    let cursor = &mut trial.cursor;

    // `eat_line_break` only runs when no zero-width boundary applies.
    let at_boundary = cursor.is_eof()
        || matches!(cursor.current(), b')' | b']' | b'}')
        || cursor.eat_line_break()
        || (cursor.line_start() > 0 && cursor.line_prefix_is_blank());
    if !at_boundary {
        return None;
    }
    Some(trial.token(TokenKind::AutoTerminator, skipped))
}
