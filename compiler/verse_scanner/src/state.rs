//! Scanner state: the only data that survives between scan calls.
//!
//! Everything the scanner knows about the document beyond the current
//! position lives in [`ScannerState`]: the frame stack (open braced blocks,
//! indentation blocks, and string splices), the bracket depth inside the
//! innermost frame, the scan mode, and how far the literal tracker has
//! replayed the document.
//!
//! The state is a plain value. GLR branches and trial scans clone it; hosts
//! persist it with [`ScannerState::serialize`] and restore it with
//! [`ScannerState::deserialize`] for incremental re-lexing.
//!
//! # Serialized Layout
//!
//! ```text
//! 0      mode (0 Normal, 1 StringBody, 2 ErrorRecovery)
//! 1..3   bracket depth, u16 LE
//! 3..7   resume offset, u32 LE
//! 7      flags (bit 0: error sentinel emitted at the resume offset)
//! 8      frame count n (<= MAX_FRAMES)
//! 9..    n x [kind u8 (0 Braced, 1 Indent, 2 Splice), column u16 LE, outer depth u16 LE]
//! ```

use smallvec::SmallVec;

use crate::issue::StateError;

/// Size of the buffer hosts must provide to [`ScannerState::serialize`].
pub const SERIALIZATION_BUFFER_SIZE: usize = 1024;

/// Maximum number of simultaneously open frames.
pub const MAX_FRAMES: usize = 128;

const HEADER_LEN: usize = 9;
const FLAG_SENTINEL: u8 = 0b1;
const FRAME_LEN: usize = 5;

const _: () = assert!(
    HEADER_LEN + MAX_FRAMES * FRAME_LEN <= SERIALIZATION_BUFFER_SIZE,
    "a full frame stack must fit the serialization buffer"
);

/// Which sub-scanner is authoritative for the bytes at the cursor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanMode {
    /// Ordinary code.
    #[default]
    Normal = 0,
    /// Inside a string literal, between its quote and its end.
    StringBody = 1,
    /// The parser is recovering from a syntax error and the scanner
    /// resynchronized on a statement boundary or braced block, keeping its
    /// layout.
    ErrorRecovery = 2,
}

impl ScanMode {
    fn from_tag(tag: u8) -> Result<Self, StateError> {
        match tag {
            0 => Ok(ScanMode::Normal),
            1 => Ok(ScanMode::StringBody),
            2 => Ok(ScanMode::ErrorRecovery),
            other => Err(StateError::UnknownMode(other)),
        }
    }
}

/// What a frame encloses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// A braced block whose `{` the scanner emitted.
    Braced,
    /// An indentation block whose statements sit at this column.
    Indent(u16),
    /// A `{...}` interpolation inside a string body.
    Splice,
}

/// One open enclosure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Frame {
    pub kind: FrameKind,
    /// Bracket depth of the enclosing context, restored when this frame closes.
    pub outer_depth: u16,
}

/// Complete, serializable scanner state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScannerState {
    pub(crate) frames: SmallVec<[Frame; 8]>,
    pub(crate) bracket_depth: u16,
    pub(crate) mode: ScanMode,
    /// Offset up to which the document has been replayed.
    pub(crate) resume: u32,
    /// The last token was an error sentinel, emitted at `resume`.
    pub(crate) sentinel_emitted: bool,
}

impl ScannerState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    #[inline]
    pub fn bracket_depth(&self) -> u16 {
        self.bracket_depth
    }

    #[inline]
    pub fn resume_offset(&self) -> u32 {
        self.resume
    }

    #[inline]
    pub fn sentinel_emitted(&self) -> bool {
        self.sentinel_emitted
    }

    /// Open frames, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Columns of the open indentation blocks, outermost first.
    pub fn indent_stack(&self) -> Vec<u16> {
        self.frames
            .iter()
            .filter_map(|f| match f.kind {
                FrameKind::Indent(column) => Some(column),
                FrameKind::Braced | FrameKind::Splice => None,
            })
            .collect()
    }

    /// Column of the innermost indentation block, if any.
    pub fn innermost_indent(&self) -> Option<u16> {
        self.frames.iter().rev().find_map(|f| match f.kind {
            FrameKind::Indent(column) => Some(column),
            FrameKind::Braced | FrameKind::Splice => None,
        })
    }

    /// The innermost frame.
    pub fn top_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Column of the indentation block directly enclosing the top frame,
    /// when the top frame is itself an indentation block.
    pub(crate) fn indent_below_top(&self) -> Option<u16> {
        let (_, below) = self.frames.split_last()?;
        match below.last()?.kind {
            FrameKind::Indent(column) => Some(column),
            FrameKind::Braced | FrameKind::Splice => None,
        }
    }

    /// Open a frame, saving the current bracket depth and starting the new
    /// frame at depth zero.
    ///
    /// Returns `false` (and changes nothing) when the frame limit is reached
    /// or an indentation column would not exceed the enclosing block's.
    pub(crate) fn push_frame(&mut self, kind: FrameKind) -> bool {
        if self.frames.len() >= MAX_FRAMES {
            return false;
        }
        if let (FrameKind::Indent(column), Some(enclosing)) = (kind, self.innermost_indent()) {
            if column <= enclosing {
                return false;
            }
        }
        self.frames.push(Frame {
            kind,
            outer_depth: self.bracket_depth,
        });
        self.bracket_depth = 0;
        true
    }

    /// Close the innermost frame, restoring the enclosing bracket depth.
    pub(crate) fn pop_frame(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.bracket_depth = frame.outer_depth;
        Some(frame)
    }

    /// Drop every frame and open bracket.
    ///
    /// The mode and resume offset are left to the caller.
    pub(crate) fn clear_layout(&mut self) {
        self.frames.clear();
        self.bracket_depth = 0;
    }

    /// Number of bytes [`serialize`](Self::serialize) will write.
    pub fn serialized_len(&self) -> usize {
        HEADER_LEN + self.frames.len() * FRAME_LEN
    }

    /// Write the state into `buf`, returning the number of bytes written.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, StateError> {
        let needed = self.serialized_len();
        if buf.len() < needed {
            return Err(StateError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        let count = u8::try_from(self.frames.len()).map_err(|_| StateError::TooManyFrames {
            count: self.frames.len(),
            max: MAX_FRAMES,
        })?;

        buf[0] = self.mode as u8;
        buf[1..3].copy_from_slice(&self.bracket_depth.to_le_bytes());
        buf[3..7].copy_from_slice(&self.resume.to_le_bytes());
        buf[7] = if self.sentinel_emitted { FLAG_SENTINEL } else { 0 };
        buf[8] = count;

        for (frame, out) in self
            .frames
            .iter()
            .zip(buf[HEADER_LEN..needed].chunks_exact_mut(FRAME_LEN))
        {
            let (tag, column) = match frame.kind {
                FrameKind::Braced => (0, 0),
                FrameKind::Indent(column) => (1, column),
                FrameKind::Splice => (2, 0),
            };
            out[0] = tag;
            out[1..3].copy_from_slice(&column.to_le_bytes());
            out[3..5].copy_from_slice(&frame.outer_depth.to_le_bytes());
        }
        Ok(needed)
    }

    /// Convenience wrapper returning the serialized bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0; self.serialized_len()];
        match self.serialize(&mut buf) {
            Ok(written) => buf.truncate(written),
            // Only reachable if the frame limit was bypassed.
            Err(_) => buf.clear(),
        }
        buf
    }

    /// Restore a state from bytes written by [`serialize`](Self::serialize).
    ///
    /// An empty buffer decodes to the initial state, since hosts restore
    /// from an empty buffer at the start of a document.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, StateError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        if bytes.len() < HEADER_LEN {
            return Err(StateError::Truncated {
                needed: HEADER_LEN,
                found: bytes.len(),
            });
        }

        let mode = ScanMode::from_tag(bytes[0])?;
        let bracket_depth = u16::from_le_bytes([bytes[1], bytes[2]]);
        let resume = u32::from_le_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]);
        if bytes[7] & !FLAG_SENTINEL != 0 {
            return Err(StateError::UnknownFlags(bytes[7]));
        }
        let sentinel_emitted = bytes[7] & FLAG_SENTINEL != 0;
        let count = usize::from(bytes[8]);
        if count > MAX_FRAMES {
            return Err(StateError::TooManyFrames {
                count,
                max: MAX_FRAMES,
            });
        }

        let needed = HEADER_LEN + count * FRAME_LEN;
        if bytes.len() < needed {
            return Err(StateError::Truncated {
                needed,
                found: bytes.len(),
            });
        }
        if bytes.len() > needed {
            return Err(StateError::TrailingBytes {
                extra: bytes.len() - needed,
            });
        }

        let mut frames = SmallVec::with_capacity(count);
        let mut enclosing: Option<u16> = None;
        for chunk in bytes[HEADER_LEN..needed].chunks_exact(FRAME_LEN) {
            let column = u16::from_le_bytes([chunk[1], chunk[2]]);
            let kind = match chunk[0] {
                0 => FrameKind::Braced,
                1 => {
                    if let Some(outer) = enclosing.filter(|&outer| column <= outer) {
                        return Err(StateError::NonIncreasingIndent {
                            column,
                            enclosing: outer,
                        });
                    }
                    enclosing = Some(column);
                    FrameKind::Indent(column)
                }
                2 => FrameKind::Splice,
                other => return Err(StateError::UnknownFrameKind(other)),
            };
            frames.push(Frame {
                kind,
                outer_depth: u16::from_le_bytes([chunk[3], chunk[4]]),
            });
        }

        Ok(Self {
            frames,
            bracket_depth,
            mode,
            resume,
            sentinel_emitted,
        })
    }
}
