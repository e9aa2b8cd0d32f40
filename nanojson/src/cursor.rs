// SPDX-License-Identifier: Apache-2.0

/// Position in the input stream.
///
/// `offset` counts bytes from the start of the document, `line` and `column`
/// are 1-based. Only meaningful while buffers are fed with the tail-preserving
/// resumption protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Bytes from the start of the document.
    pub offset: usize,
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl Location {
    pub const START: Location = Location {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Location after reading `bytes` from here.
    pub(crate) fn advanced(mut self, bytes: &[u8]) -> Self {
        for &byte in bytes {
            self.offset += 1;
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::START
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Read position over the currently installed input slice.
#[derive(Debug)]
pub(crate) struct Cursor<'b> {
    data: &'b [u8],
    pos: usize,
}

impl<'b> Cursor<'b> {
    pub fn new(data: &'b [u8], pos: usize) -> Self {
        Self {
            data,
            pos: pos.min(data.len()),
        }
    }

    /// Next unread byte, or `None` when the slice is exhausted.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Steps back over the byte returned by the last successful [`Cursor::next_byte`].
    pub fn unget(&mut self) {
        debug_assert!(self.pos > 0, "unget at the start of the buffer");
        self.pos = self.pos.saturating_sub(1);
    }

    /// Returns to an earlier position of the same slice.
    pub fn rewind_to(&mut self, mark: usize) {
        debug_assert!(mark <= self.pos, "rewind forward: {} > {}", mark, self.pos);
        self.pos = mark.min(self.pos);
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes between `start` and `end`, empty if the range is out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> &'b [u8] {
        self.data.get(start..end).unwrap_or_default()
    }
}
