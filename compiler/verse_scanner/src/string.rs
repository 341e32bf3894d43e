//! Recovery for string literals that never close.
//!
//! A string body normally ends at its closing quote, and a `{` opens an
//! interpolation splice; the grammar lexes both. When the line (or the
//! input) ends first, the rest of the fragment becomes a single
//! `IncompleteString` token so the parser can finish the string node and
//! carry on with the next line.

use tracing::debug;

use crate::issue::ScanIssueKind;
use crate::state::ScanMode;
use crate::token::{ScanToken, TokenKind};
use crate::trial::Trial;
use crate::valid::ValidSymbols;

pub(crate) fn scan(trial: &mut Trial<'_>, _valid: ValidSymbols) -> Option<ScanToken> {
    debug_assert_eq!(trial.state.mode, ScanMode::StringBody);
    let cursor = &mut trial.cursor;
    loop {
        match cursor.skip_to_string_delim() {
            b'"' | b'{' => return None,
            b'\\' => cursor.eat_string_escape(),
            // Line end, or 0 at end of input.
            _ => break,
        }
    }

    let end = cursor.pos();
    trial.state.mode = ScanMode::Normal;
    debug!(start = trial.start, end, "string left unterminated");
    trial.record(trial.start, end, ScanIssueKind::UnterminatedString);
    Some(trial.token(TokenKind::IncompleteString, 0))
}
