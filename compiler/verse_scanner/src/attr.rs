//! Attribute/comparison disambiguation.
//!
//! `x<public>` attaches an attribute; `a < b` compares. Both start with
//! `<` after an expression, and a chained comparison like `0 < 1 > 0` is
//! a valid attribute application (`0<1>` followed by a stray `0`). The
//! grammar cannot tell them apart with bounded lookahead, so the scanner
//! runs a side-effect-free trial scan for a `>` that closes the `<`.
//!
//! The trial tracks a small local stack seeded with the `<`. Nested `<`
//! and opening brackets push; `>` pops a `<`; a closing bracket pops back
//! to its opener, dropping any unmatched `<` on the way (those were
//! comparisons). The compound operators `<=`, `<>`, `>=` and `=>` never
//! count as brackets. String and char literals are skipped whole.

use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};
use verse_lexer_core::Cursor;

use crate::issue::{ScanIssueKind, TrialFailure};
use crate::token::{ScanToken, TokenKind};
use crate::trial::Trial;
use crate::valid::ValidSymbols;

/// Emit a zero-width attribute start before a `<` that the trial scan
/// confirms is closed by a matching `>`.
pub(crate) fn scan(trial: &mut Trial<'_>, _valid: ValidSymbols) -> Option<ScanToken> {
    let skipped = trial.skip_inline();
    let open = trial.cursor;
    if open.current() != b'<' || matches!(open.peek(), b'=' | b'>') {
        return None;
    }

    let nested = trial.state.bracket_depth > 0;
    match find_close(open, trial.config.trial_step_limit, nested) {
        Ok(close) => {
            debug!(open = open.pos(), close, "attribute confirmed");
            let token = trial.zero_width_at(TokenKind::BestGuessAttrStart, open.pos());
            debug_assert_eq!(token.skipped, skipped);
            Some(token)
        }
        Err(reason) => {
            trace!(open = open.pos(), %reason, "`<` left as comparison");
            if reason == TrialFailure::StepLimit {
                let end = open.pos().saturating_add(trial.config.trial_step_limit);
                trial.record(
                    open.pos(),
                    end.min(trial.source.len()),
                    ScanIssueKind::LexicalAmbiguityUnresolved { reason },
                );
            }
            None
        }
    }
}

/// Scan forward from the `<` under `open` for its closing `>`.
///
/// Returns the offset of the closing `>`. Examines at most `limit` bytes
/// (and never more than the remaining input). `nested` means the `<` sits
/// inside brackets the grammar already opened, where a line break or `;`
/// cannot end the statement.
pub(crate) fn find_close(open: Cursor<'_>, limit: u32, nested: bool) -> Result<u32, TrialFailure> {
    debug_assert_eq!(open.current(), b'<');
    let origin = open.pos();
    let budget = limit.min(open.remaining());
    let mut cursor = open;
    let mut stack: SmallVec<[u8; 16]> = smallvec![b'<'];
    cursor.advance();

    loop {
        if cursor.is_eof() {
            return Err(TrialFailure::EndOfInput);
        }
        if cursor.pos() - origin >= budget {
            return Err(TrialFailure::StepLimit);
        }

        match (cursor.current(), cursor.peek()) {
            (b'<', b'=' | b'>') | (b'>', b'=') | (b'=', b'>') => cursor.advance_n(2),
            (opener @ (b'<' | b'(' | b'[' | b'{'), _) => {
                stack.push(opener);
                cursor.advance();
            }
            (b'>', _) => {
                if stack.last() == Some(&b'<') {
                    stack.pop();
                    if stack.is_empty() {
                        return Ok(cursor.pos());
                    }
                }
                cursor.advance();
            }
            (closer @ (b')' | b']' | b'}'), _) => {
                pop_to_opener(&mut stack, closer)?;
                cursor.advance();
            }
            (b';', _) | (b'\n', _) | (b'\r', b'\n') if !nested && !inside_brackets(&stack) => {
                return Err(TrialFailure::StatementBoundary);
            }
            (b'"', _) => skip_string(&mut cursor),
            (b'\'', _) => {
                cursor.advance();
                cursor.eat_while(|b| b != b'\'');
                cursor.advance();
            }
            _ => cursor.advance(),
        }
    }
}

/// Only `<`s on the stack: a line break would end the statement.
fn inside_brackets(stack: &[u8]) -> bool {
    stack.iter().any(|&b| b != b'<')
}

fn pop_to_opener(stack: &mut SmallVec<[u8; 16]>, closer: u8) -> Result<(), TrialFailure> {
    let opener = match closer {
        b')' => b'(',
        b']' => b'[',
        _ => b'{',
    };
    loop {
        match stack.last() {
            Some(&top) if top == opener => {
                stack.pop();
                return Ok(());
            }
            // Never drop the seed: a closer reaching it belongs outside the
            // attribute.
            Some(&b'<') if stack.len() > 1 => {
                stack.pop();
            }
            _ => return Err(TrialFailure::UnmatchedClose),
        }
    }
}

/// Skip a string literal, stopping after the closing quote or before the
/// end of its line.
fn skip_string(cursor: &mut Cursor<'_>) {
    cursor.advance();
    loop {
        match cursor.skip_to_string_delim() {
            b'"' => {
                cursor.advance();
                return;
            }
            b'\\' => cursor.eat_string_escape(),
            b'{' => cursor.advance(),
            _ => return,
        }
    }
}
