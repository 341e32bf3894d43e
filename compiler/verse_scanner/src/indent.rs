//! Indentation tracker: statement and block boundaries inside
//! indentation blocks.
//!
//! An indentation block is laid out as
//!
//! ```text
//! OPEN (INDENT statement DEDENT)* CLOSE
//! ```
//!
//! `OPEN` is emitted by the block resolver and pushes the block's column.
//! This module decides the other three:
//!
//! | Next content                 | Decision                                    |
//! |------------------------------|---------------------------------------------|
//! | line at the block column     | `DEDENT` ends the statement, then `INDENT`  |
//! | line left of the block       | `DEDENT`, then one `CLOSE` per block left   |
//! | same line (after `;`)        | zero-width `DEDENT` / `INDENT`              |
//! | closer on the same line      | `DEDENT`, then `CLOSE`                      |
//! | end of input                 | `DEDENT`, then `CLOSE`, for every block     |
//!
//! A line left of the block but right of the enclosing block matches no
//! level. Nothing is emitted for it and a
//! [`MismatchedIndentation`](crate::ScanIssueKind::MismatchedIndentation)
//! issue is recorded.

use tracing::{debug, trace};
use verse_lexer_core::Cursor;

use crate::issue::ScanIssueKind;
use crate::state::FrameKind;
use crate::token::{ScanToken, TokenKind};
use crate::trial::Trial;
use crate::valid::ValidSymbols;

/// The token kinds this module decides.
pub(crate) const KINDS: ValidSymbols = ValidSymbols::new()
    .with(TokenKind::Indent)
    .with(TokenKind::Dedent)
    .with(TokenKind::CloseIndentBlock);

/// Where the next significant byte sits relative to the cursor.
enum NextContent<'a> {
    EndOfInput,
    /// On the cursor's line, after other content.
    SameLine(u8),
    /// First byte of a later line (or of the cursor's line, if only
    /// indentation precedes the cursor), at the given column.
    Line { column: u32, at: Cursor<'a> },
}

fn next_content<'a>(mut cursor: Cursor<'a>, tab_width: u8) -> NextContent<'a> {
    cursor.eat_whitespace();
    if cursor.is_eof() {
        return NextContent::EndOfInput;
    }
    if !cursor.at_line_break() && !cursor.line_prefix_is_blank() {
        return NextContent::SameLine(cursor.current());
    }
    cursor.eat_line_break();
    cursor.eat_blank_lines();
    if cursor.is_eof() {
        return NextContent::EndOfInput;
    }
    let column = cursor.line_indent(tab_width);
    cursor.eat_whitespace();
    NextContent::Line { column, at: cursor }
}

pub(crate) fn scan(trial: &mut Trial<'_>, valid: ValidSymbols) -> Option<ScanToken> {
    let next = next_content(trial.cursor, trial.config.tab_width);
    if matches!(next, NextContent::EndOfInput) {
        return at_end_of_input(trial, valid);
    }

    let Some(FrameKind::Indent(block)) = trial.state.top_frame().map(|f| f.kind) else {
        return None;
    };
    if trial.state.bracket_depth > 0 {
        trace!(depth = trial.state.bracket_depth, "indentation ignored inside brackets");
        return None;
    }

    match next {
        NextContent::EndOfInput => None,
        NextContent::SameLine(byte) => same_line(trial, valid, byte),
        NextContent::Line { column, at } => next_line(trial, valid, u32::from(block), column, at),
    }
}

/// End the statement, then close every remaining block, one per call.
fn at_end_of_input(trial: &mut Trial<'_>, valid: ValidSymbols) -> Option<ScanToken> {
    let index = trial
        .state
        .frames
        .iter()
        .rposition(|f| matches!(f.kind, FrameKind::Indent(_)))?;
    if valid.contains(TokenKind::Dedent) {
        return Some(trial.token(TokenKind::Dedent, 0));
    }
    if !valid.contains(TokenKind::CloseIndentBlock) {
        return None;
    }
    trial.state.frames.truncate(index + 1);
    let frame = trial.state.pop_frame()?;
    debug!(kind = ?frame.kind, remaining = trial.state.frames.len(), "block closed at end of input");
    Some(trial.token(TokenKind::CloseIndentBlock, 0))
}

fn same_line(trial: &mut Trial<'_>, valid: ValidSymbols, byte: u8) -> Option<ScanToken> {
    if valid.contains(TokenKind::Dedent) {
        return Some(trial.token(TokenKind::Dedent, 0));
    }
    if valid.contains(TokenKind::CloseIndentBlock) && matches!(byte, b')' | b']' | b'}') {
        return close(trial);
    }
    if valid.contains(TokenKind::Indent) {
        let skipped = trial.skip_inline();
        return Some(trial.token(TokenKind::Indent, skipped));
    }
    None
}

fn next_line<'a>(
    trial: &mut Trial<'a>,
    valid: ValidSymbols,
    block: u32,
    column: u32,
    at: Cursor<'a>,
) -> Option<ScanToken> {
    if valid.contains(TokenKind::Dedent) {
        if column <= block {
            return Some(trial.token(TokenKind::Dedent, 0));
        }
        mismatch(trial, column, block, at);
        return None;
    }

    if column == block {
        if !valid.contains(TokenKind::Indent) {
            return None;
        }
        trial.cursor = at;
        return Some(trial.token(TokenKind::Indent, 0));
    }

    if column > block {
        if valid.contains(TokenKind::Indent) {
            mismatch(trial, column, block, at);
        }
        return None;
    }

    if !valid.contains(TokenKind::CloseIndentBlock) {
        return None;
    }
    if let Some(enclosing) = trial.state.indent_below_top() {
        if column > u32::from(enclosing) {
            mismatch(trial, column, block, at);
            return None;
        }
    }
    close(trial)
}

/// Pop the top block. Zero-width.
fn close(trial: &mut Trial<'_>) -> Option<ScanToken> {
    let frame = trial.state.pop_frame()?;
    debug!(kind = ?frame.kind, remaining = trial.state.frames.len(), "indentation block closed");
    Some(trial.token(TokenKind::CloseIndentBlock, 0))
}

fn mismatch(trial: &mut Trial<'_>, column: u32, block: u32, at: Cursor<'_>) {
    debug!(column, block, "indentation matches no open block");
    let line_start = at.line_start();
    trial.record(
        line_start,
        at.pos(),
        ScanIssueKind::MismatchedIndentation { column, block },
    );
}
