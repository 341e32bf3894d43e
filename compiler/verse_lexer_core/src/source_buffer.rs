//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! allowing the scanner to detect EOF without explicit bounds checking.
//! The total buffer size is rounded up to the next 64-byte boundary, which
//! also provides safe padding for `peek()` near the end.
//!
//! # Encoding Detection
//!
//! During construction, the buffer scans for bytes the layout scanner can
//! never make sense of:
//! - UTF-8 BOM and UTF-16 BOMs at the start of the document
//! - Interior null bytes
//! - ASCII control characters other than `\t`, `\n`, `\r`
//!
//! Issues are recorded as [`EncodingIssue`] values, sorted by position. The
//! scanner consults them when the parser is already recovering from a
//! syntax error at that position.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
    /// Encoding issues detected during construction, ascending by `pos`.
    encoding_issues: Vec<EncodingIssue>,
}

/// Encoding issue detected during source buffer construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingIssue {
    /// What kind of encoding issue was detected.
    pub kind: EncodingIssueKind,
    /// Byte position in the source where the issue was found.
    pub pos: u32,
    /// Byte length of the problematic sequence.
    pub len: u32,
}

impl EncodingIssue {
    /// Returns `true` if `pos` falls inside this issue's byte range.
    pub fn covers(&self, pos: u32) -> bool {
        pos >= self.pos && pos < self.pos + self.len
    }
}

/// Kind of encoding issue detected in source buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingIssueKind {
    /// UTF-8 BOM (`0xEF 0xBB 0xBF`) at start.
    Utf8Bom,
    /// UTF-16 Little-Endian BOM (`0xFF 0xFE`) at start.
    Utf16LeBom,
    /// UTF-16 Big-Endian BOM (`0xFE 0xFF`) at start.
    Utf16BeBom,
    /// Null byte (U+0000) in source content.
    InteriorNull,
    /// ASCII control character other than tab, line feed, carriage return.
    ControlByte,
}

impl SourceBuffer {
    /// Create a new sentinel-terminated buffer from source code.
    ///
    /// Source files larger than `u32::MAX` bytes are accepted but the
    /// `source_len` field saturates at `u32::MAX`.
    pub fn new(source: &str) -> Self {
        let source_bytes = source.as_bytes();
        let source_len = source_bytes.len();

        // Round up to next 64-byte boundary (minimum: source + 1 sentinel byte).
        let padded_len = (source_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        // The sentinel (buf[source_len]) and padding are already 0x00.
        let mut buf = vec![0u8; padded_len];
        buf[..source_len].copy_from_slice(source_bytes);

        let mut encoding_issues = Vec::new();
        detect_bom(source_bytes, &mut encoding_issues);
        detect_forbidden_bytes(source_bytes, &mut encoding_issues);

        let source_len_u32 = u32::try_from(source_len).unwrap_or(u32::MAX);

        Self {
            buf,
            source_len: source_len_u32,
            encoding_issues,
        }
    }

    /// Returns the source bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len, 0)
    }

    /// Create a [`Cursor`] positioned at `pos`.
    ///
    /// Positions past the end of the source are clamped to the sentinel.
    pub fn cursor_at(&self, pos: u32) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len, pos.min(self.source_len))
    }

    /// Length of the source content in bytes (excludes sentinel and padding).
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source content is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Encoding issues detected during construction.
    pub fn encoding_issues(&self) -> &[EncodingIssue] {
        &self.encoding_issues
    }

    /// The encoding issue covering byte `pos`, if any.
    pub fn encoding_issue_at(&self, pos: u32) -> Option<&EncodingIssue> {
        let idx = self.encoding_issues.partition_point(|i| i.pos + i.len <= pos);
        self.encoding_issues.get(idx).filter(|i| i.covers(pos))
    }
}

/// Detect byte order marks at the start of the source.
fn detect_bom(source: &[u8], issues: &mut Vec<EncodingIssue>) {
    let (kind, len) = match source {
        [0xEF, 0xBB, 0xBF, ..] => (EncodingIssueKind::Utf8Bom, 3),
        [0xFF, 0xFE, ..] => (EncodingIssueKind::Utf16LeBom, 2),
        [0xFE, 0xFF, ..] => (EncodingIssueKind::Utf16BeBom, 2),
        _ => return,
    };
    issues.push(EncodingIssue { kind, pos: 0, len });
}

/// Detect NUL and control bytes within the source content.
///
/// Uses `memchr` for the NUL search; control bytes are rare enough that
/// a single classification pass over the source is acceptable.
fn detect_forbidden_bytes(source: &[u8], issues: &mut Vec<EncodingIssue>) {
    if memchr::memchr(0, source).is_none() && !source.iter().copied().any(is_control_byte) {
        return;
    }
    for (offset, &byte) in source.iter().enumerate() {
        let kind = if byte == 0 {
            EncodingIssueKind::InteriorNull
        } else if is_control_byte(byte) {
            EncodingIssueKind::ControlByte
        } else {
            continue;
        };
        if let Ok(pos) = u32::try_from(offset) {
            issues.push(EncodingIssue { kind, pos, len: 1 });
        }
    }
}

fn is_control_byte(byte: u8) -> bool {
    matches!(byte, 1..=8 | 11..=12 | 14..=31 | 127)
}
