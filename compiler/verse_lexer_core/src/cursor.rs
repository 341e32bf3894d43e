//! Cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte-by-byte. EOF is detected
//! when the current byte equals the sentinel (`0x00`) and the position
//! has reached the source length. Interior null bytes (`pos < source_len`)
//! are ordinary content as far as the cursor is concerned.
//!
//! Besides forward movement the cursor answers line-oriented questions the
//! layout scanner needs: where the current line starts, which column a
//! line is indented by, and whether only indentation precedes it.

/// Returns the earliest (minimum) of two optional positions.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor) or
/// [`SourceBuffer::cursor_at()`](crate::SourceBuffer::cursor_at).
/// The cursor is [`Copy`], so a lookahead is just a copy that gets dropped.
///
/// # Invariant
///
/// `buf[source_len] == 0x00`, and all bytes after `source_len` are `0x00`.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Length of actual source content (excludes sentinel and padding).
    source_len: u32,
}

const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32, pos: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        debug_assert!(pos <= source_len, "cursor starts past the sentinel");
        Self {
            buf,
            pos,
            source_len,
        }
    }

    /// Returns the byte at the current position (`0x00` at EOF).
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Returns the byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    #[inline]
    fn byte_at(&self, pos: u32) -> u8 {
        self.buf.get(pos as usize).copied().unwrap_or(0)
    }

    /// Advance the cursor by one byte. Never moves past the sentinel.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.source_len {
            self.pos += 1;
        }
    }

    /// Advance the cursor by `n` bytes, stopping at the sentinel.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos = self.pos.saturating_add(n).min(self.source_len);
    }

    /// Returns `true` if the cursor has reached EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Bytes left between the cursor and EOF.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.source_len - self.pos
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false`, or the loop stops at the sentinel anyway.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance past horizontal whitespace: spaces, tabs, and a carriage
    /// return that does not start a `\r\n` pair.
    #[inline]
    pub fn eat_whitespace(&mut self) {
        loop {
            match self.current() {
                b' ' | b'\t' => self.pos += 1,
                b'\r' if self.peek() != b'\n' && !self.is_eof() => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Returns `true` if the cursor sits on `\n` or `\r\n`.
    #[inline]
    pub fn at_line_break(&self) -> bool {
        match self.current() {
            b'\n' => true,
            b'\r' => self.peek() == b'\n',
            _ => false,
        }
    }

    /// Consume one `\n` or `\r\n`. Returns `false` if not at a line break.
    pub fn eat_line_break(&mut self) -> bool {
        match self.current() {
            b'\n' => {
                self.pos += 1;
                true
            }
            b'\r' if self.peek() == b'\n' => {
                self.pos += 2;
                true
            }
            _ => false,
        }
    }

    /// Skip whitespace-only lines.
    ///
    /// The cursor must be at the start of a line. Stops at the start of the
    /// first line holding content, or at EOF. A trailing whitespace-only line
    /// without a line break is consumed up to EOF.
    pub fn eat_blank_lines(&mut self) {
        loop {
            let line_start = *self;
            self.eat_whitespace();
            if self.is_eof() {
                return;
            }
            if !self.eat_line_break() {
                *self = line_start;
                return;
            }
        }
    }

    /// Advance past ordinary string fragment content to the next
    /// interesting byte. Returns the byte found, or 0 for EOF.
    ///
    /// Fragment delimiters: `"`, `{`, `\`, `\n`, `\r`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets are bounded by source_len which fits in u32"
    )]
    pub fn skip_to_string_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        let primary = memchr::memchr3(b'"', b'{', b'\\', remaining);
        let line_end = memchr::memchr2(b'\n', b'\r', remaining);

        if let Some(off) = earliest_of(primary, line_end) {
            self.pos += off as u32;
            self.buf[self.pos as usize]
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Consume a `\` and the byte it escapes.
    ///
    /// A line break is never escaped: the cursor stops on it, so a string
    /// cannot continue onto the next line.
    pub fn eat_string_escape(&mut self) {
        debug_assert_eq!(self.current(), b'\\');
        self.advance();
        if !matches!(self.current(), b'\n' | b'\r') {
            self.advance();
        }
    }

    /// Byte offset of the first byte of the line containing the cursor.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets are bounded by source_len which fits in u32"
    )]
    pub fn line_start(&self) -> u32 {
        memchr::memrchr(b'\n', &self.buf[..self.pos as usize]).map_or(0, |nl| nl as u32 + 1)
    }

    /// Returns `true` if only horizontal whitespace precedes the cursor on
    /// its line.
    pub fn line_prefix_is_blank(&self) -> bool {
        self.buf[self.line_start() as usize..self.pos as usize]
            .iter()
            .all(|&b| matches!(b, b' ' | b'\t' | b'\r'))
    }

    /// Indentation width of the line containing the cursor.
    ///
    /// Tabs advance to the next multiple of `tab_width`.
    pub fn line_indent(&self, tab_width: u8) -> u32 {
        let start = self.line_start() as usize;
        let line = &self.buf[start..self.source_len as usize];
        let indent = line
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count();
        columns_of(&line[..indent], tab_width)
    }
}

fn columns_of(bytes: &[u8], tab_width: u8) -> u32 {
    let tab = u32::from(tab_width.max(1));
    bytes.iter().fold(0, |col, &b| match b {
        b'\t' => col + tab - (col % tab),
        _ => col + 1,
    })
}
