// SPDX-License-Identifier: Apache-2.0

//! Byte sources for [`StreamFeeder`](crate::StreamFeeder).
//!
//! [`ChunkReader`] serves an in-memory slice, optionally a few bytes at a time
//! to simulate packets arriving over a link. Real inputs (UART, sockets, files)
//! implement [`Reader`] directly.

/// A source of input bytes.
pub trait Reader {
    type Error;

    /// Reads into `buf`, returning how many bytes were written.
    ///
    /// `Ok(0)` means end of stream and must not be followed by more data.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A [`Reader`] over a byte slice.
///
/// ```rust
/// use nanojson::{ChunkReader, Reader};
///
/// let mut reader = ChunkReader::new(b"[1, 2]", 4);
/// let mut buf = [0u8; 16];
/// assert_eq!(reader.read(&mut buf), Ok(4));
/// assert_eq!(&buf[..4], b"[1, ");
/// assert_eq!(reader.read(&mut buf), Ok(2));
/// assert_eq!(reader.read(&mut buf), Ok(0));
/// ```
#[derive(Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Serves at most `chunk_size` bytes per read (at least 1).
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Serves as much as each read can take.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self::new(data, usize::MAX)
    }

    /// Bytes not handed out yet.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl Reader for ChunkReader<'_> {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let count = self.remaining().min(buf.len()).min(self.chunk_size);
        let source = self.data.get(self.pos..self.pos + count).unwrap_or_default();
        if let Some(target) = buf.get_mut(..source.len()) {
            target.copy_from_slice(source);
        }
        self.pos += source.len();
        Ok(source.len())
    }
}
