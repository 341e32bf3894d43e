//! Block delimiter resolver.
//!
//! Decides how a block body starts. A `{` (possibly on a later line) opens
//! a braced block; a line break followed by deeper indentation opens an
//! indentation block, optionally introduced by a `:` for macro bodies.

use tracing::debug;
use verse_lexer_core::Cursor;

use crate::state::FrameKind;
use crate::token::{ScanToken, TokenKind};
use crate::trial::Trial;
use crate::valid::ValidSymbols;

/// `{` after any whitespace, blank lines included.
pub(crate) fn braced(trial: &mut Trial<'_>, _valid: ValidSymbols) -> Option<ScanToken> {
    let mut cursor = trial.cursor;
    loop {
        cursor.eat_whitespace();
        if !cursor.eat_line_break() {
            break;
        }
    }
    if cursor.is_eof() || cursor.current() != b'{' {
        return None;
    }
    let skipped = cursor.pos() - trial.start;
    cursor.advance();

    if !trial.state.push_frame(FrameKind::Braced) {
        debug!(pos = skipped + trial.start, "frame limit reached, `{{` left to the grammar");
        return None;
    }
    trial.cursor = cursor;
    debug!(frames = trial.state.frames.len(), "braced block opened");
    Some(trial.token(TokenKind::OpenBracedBlock, skipped))
}

/// `:` followed by a line break and a deeper line. `:=` never qualifies.
pub(crate) fn indent_colon(trial: &mut Trial<'_>, _valid: ValidSymbols) -> Option<ScanToken> {
    let skipped = trial.skip_inline();
    let mut cursor = trial.cursor;
    if cursor.current() != b':' || cursor.peek() == b'=' {
        return None;
    }
    cursor.advance();
    cursor.eat_whitespace();
    open_indent(trial, cursor, skipped, TokenKind::OpenIndentBlockColon)
}

/// A line break followed by a deeper line.
pub(crate) fn indent(trial: &mut Trial<'_>, _valid: ValidSymbols) -> Option<ScanToken> {
    let skipped = trial.skip_inline();
    let cursor = trial.cursor;
    open_indent(trial, cursor, skipped, TokenKind::OpenIndentBlock)
}

/// Open an indentation block at the line after `cursor`.
///
/// The new column must exceed both the innermost open block and the
/// indentation of the line holding the opener. The token spans the line
/// break and any blank lines, stopping at the start of the content line.
fn open_indent<'a>(
    trial: &mut Trial<'a>,
    mut cursor: Cursor<'a>,
    skipped: u32,
    kind: TokenKind,
) -> Option<ScanToken> {
    let tab_width = trial.config.tab_width;
    let opener_indent = cursor.line_indent(tab_width);
    if !cursor.eat_line_break() {
        return None;
    }
    cursor.eat_blank_lines();
    if cursor.is_eof() {
        return None;
    }

    let column = cursor.line_indent(tab_width);
    let floor = trial
        .state
        .innermost_indent()
        .map_or(opener_indent, |top| opener_indent.max(u32::from(top)));
    if column <= floor {
        return None;
    }
    let column = u16::try_from(column).ok()?;
    if !trial.state.push_frame(FrameKind::Indent(column)) {
        debug!(column, "frame limit reached, indentation block not opened");
        return None;
    }

    trial.cursor = cursor;
    debug!(%kind, column, floor, "indentation block opened");
    Some(trial.token(kind, skipped))
}
