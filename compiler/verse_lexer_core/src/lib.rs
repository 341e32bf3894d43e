//! Low-level source access for the Verse layout scanner.
//!
//! This crate owns the document bytes and a cheap, `Copy` cursor over them.
//! It knows nothing about tokens or parser state: the scanner crate builds
//! its layout decisions on top of the primitives exposed here.
//!
//! - [`SourceBuffer`]: sentinel-terminated copy of the document, with
//!   encoding issues (BOMs, NUL and control bytes) detected up front.
//! - [`Cursor`]: byte cursor with line/column queries and
//!   memchr-accelerated delimiter search.

mod cursor;
mod source_buffer;

pub use cursor::Cursor;
pub use source_buffer::{EncodingIssue, EncodingIssueKind, SourceBuffer};
