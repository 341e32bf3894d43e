//! Literal tracker.
//!
//! Between two scan calls the grammar's own lexer consumes literal tokens
//! (identifiers, operators, brackets, string fragments). The scanner never
//! sees them, yet its bracket depth and string mode depend on them. Before
//! deciding anything, [`catch_up`] replays the bytes from the state's resume
//! offset to the current position and applies their effect.
//!
//! | Mode         | Byte            | Effect                                      |
//! |--------------|-----------------|---------------------------------------------|
//! | `Normal`     | `(` `[` `{`     | depth + 1                                   |
//! | `Normal`     | `)` `]`         | depth - 1 (saturating)                      |
//! | `Normal`     | `}`             | depth - 1, or close the innermost braced    |
//! |              |                 | block / string splice at depth 0            |
//! | `Normal`     | `"`             | enter `StringBody`                          |
//! | `Normal`     | `'`             | skip the char literal                       |
//! | `StringBody` | `\`             | skip the escaped byte, unless a line break  |
//! | `StringBody` | `"` or newline  | back to `Normal`                            |
//! | `StringBody` | `{`             | open a splice frame, back to `Normal`       |

use tracing::trace;
use verse_lexer_core::SourceBuffer;

use crate::state::{FrameKind, ScanMode, ScannerState};

/// Replay `[state.resume, pos)` and move the resume offset to `pos`.
///
/// A position before the resume offset means the host rewound without
/// restoring an older state; the tracker cannot un-replay bytes, so it only
/// moves the offset back.
pub(crate) fn catch_up(state: &mut ScannerState, source: &SourceBuffer, pos: u32) {
    let pos = pos.min(source.len());
    if pos <= state.resume {
        state.resume = pos;
        return;
    }
    let bytes = &source.as_bytes()[state.resume as usize..pos as usize];
    trace!(from = state.resume, to = pos, "replaying literal bytes");
    replay(state, bytes);
    state.resume = pos;
}

fn replay(state: &mut ScannerState, bytes: &[u8]) {
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        i += 1;
        match state.mode {
            ScanMode::StringBody => match byte {
                // An escape never reaches past the end of the line.
                b'\\' if !matches!(bytes.get(i), Some(b'\n' | b'\r')) => i += 1,
                b'"' | b'\n' => state.mode = ScanMode::Normal,
                b'{' => {
                    if state.push_frame(FrameKind::Splice) {
                        trace!(depth = state.frames.len(), "string splice opened");
                    }
                    state.mode = ScanMode::Normal;
                }
                _ => {}
            },
            ScanMode::Normal | ScanMode::ErrorRecovery => match byte {
                b'(' | b'[' | b'{' => state.bracket_depth = state.bracket_depth.saturating_add(1),
                b')' | b']' => state.bracket_depth = state.bracket_depth.saturating_sub(1),
                b'}' => close_brace(state),
                b'"' => state.mode = ScanMode::StringBody,
                b'\'' => {
                    i = bytes[i..]
                        .iter()
                        .position(|&b| b == b'\'')
                        .map_or(bytes.len(), |off| i + off + 1);
                }
                _ => {}
            },
        }
    }
}

/// A `}` at depth zero belongs to the innermost braced block or splice.
///
/// Indentation blocks still open inside it are closed with it; the grammar
/// would normally have closed them before the brace.
fn close_brace(state: &mut ScannerState) {
    if state.bracket_depth > 0 {
        state.bracket_depth -= 1;
        return;
    }
    let Some(index) = state
        .frames
        .iter()
        .rposition(|f| matches!(f.kind, FrameKind::Braced | FrameKind::Splice))
    else {
        return;
    };
    state.frames.truncate(index + 1);
    if let Some(frame) = state.pop_frame() {
        trace!(kind = ?frame.kind, depth = state.bracket_depth, "frame closed by `}}`");
        if frame.kind == FrameKind::Splice {
            state.mode = ScanMode::StringBody;
        }
    }
}

#[cfg(test)]
mod tests;
