//! Layout-sensitive external scanner for the Verse grammar.
//!
//! Verse mixes braced and indentation-delimited blocks, infers statement
//! terminators from line breaks, and overloads `<...>` between attribute
//! lists and chained comparisons. None of that fits a context-free lexer,
//! so the grammar declares a handful of structural tokens as external and
//! asks this scanner for them.
//!
//! # Contract
//!
//! The host parser drives the scanner. At each position it passes the set
//! of structural tokens it would accept ([`ValidSymbols`]) and the byte
//! offset its lexer has reached; [`Scanner::next`] returns at most one
//! token from that set, or `None` having consumed nothing.
//!
//! # Architecture
//!
//! - `state`: frame stack, bracket depth, scan mode; fixed-layout
//!   serialization
//! - `tracker`: replays literal tokens the grammar consumed between calls
//! - `trial`: speculative copies of the state; committed only on success
//! - `block`: braced vs. indentation block openers
//! - `indent`: `INDENT` / `DEDENT` / `CLOSE` inside indentation blocks
//! - `terminator`: automatic statement terminators
//! - `attr`: bounded attribute/comparison trial scan
//! - `string`: recovery token for unterminated strings
//! - `sentinel`: error-recovery reset

mod attr;
mod block;
mod config;
mod indent;
mod issue;
mod scanner;
mod sentinel;
mod state;
mod string;
mod terminator;
mod token;
mod tracker;
mod trial;
mod valid;

pub use config::{ScanConfig, DEFAULT_TRIAL_STEP_LIMIT};
pub use issue::{IssueSpan, ScanIssue, ScanIssueKind, StateError, TrialFailure};
pub use scanner::Scanner;
pub use state::{Frame, FrameKind, ScanMode, ScannerState, MAX_FRAMES, SERIALIZATION_BUFFER_SIZE};
pub use token::{ScanToken, TokenKind};
pub use valid::ValidSymbols;
