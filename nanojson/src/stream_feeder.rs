// SPDX-License-Identifier: Apache-2.0

//! Drives a [`Handler`] from a [`Reader`] through a fixed scratch buffer.
//!
//! After every parse call the unconsumed tail is moved to the front of the
//! scratch buffer and the reader appends behind it, so a token split across
//! reads is always rescanned whole. The largest token (plus surrounding
//! whitespace) must fit in the scratch buffer.

use crate::bitstack::BitStackConfig;
use crate::chunk_reader::Reader;
use crate::event::EventSink;
use crate::parse_error::{ErrorKind, ParseError};
use crate::parser::Handler;

use log::{debug, trace};

/// Failure of [`StreamFeeder::feed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError<E> {
    /// The document is malformed, or ended early.
    Parse(ParseError),
    /// The reader failed.
    Reader(E),
    /// A single token does not fit in the scratch buffer.
    TokenTooLarge {
        /// Scratch buffer size.
        capacity: usize,
        /// Document offset where the token starts.
        offset: usize,
    },
}

impl<E> From<ParseError> for FeedError<E> {
    fn from(e: ParseError) -> Self {
        FeedError::Parse(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for FeedError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FeedError::Parse(e) => write!(f, "{}", e),
            FeedError::Reader(e) => write!(f, "read failed: {:?}", e),
            FeedError::TokenTooLarge { capacity, offset } => write!(
                f,
                "token at offset {} does not fit in {} byte buffer",
                offset, capacity
            ),
        }
    }
}

/// Feeds a whole document from `R` into a handler.
///
/// ```rust
/// use nanojson::{ChunkReader, Handler, StreamFeeder};
///
/// let mut scratch = [0u8; 16];
/// let mut feeder = StreamFeeder::new(ChunkReader::new(br#"{"list": [10, 20, 30]}"#, 3), &mut scratch);
/// let mut handler = Handler::<()>::new();
/// feeder.feed(&mut handler).unwrap();
/// assert!(handler.is_complete());
/// ```
pub struct StreamFeeder<'s, R> {
    reader: R,
    scratch: &'s mut [u8],
    /// Bytes of `scratch` holding unparsed input.
    filled: usize,
    /// Document offset of `scratch[0]`.
    offset: usize,
    end_of_stream: bool,
}

impl<'s, R: Reader> StreamFeeder<'s, R> {
    pub fn new(reader: R, scratch: &'s mut [u8]) -> Self {
        Self {
            reader,
            scratch,
            filled: 0,
            offset: 0,
            end_of_stream: false,
        }
    }

    /// Reads until end of stream, parsing as data arrives.
    ///
    /// The handler should be freshly created or initialized. Returns `Ok` once
    /// the stream ended after a complete document.
    pub fn feed<C, S>(&mut self, handler: &mut Handler<C, S>) -> Result<(), FeedError<R::Error>>
    where
        C: EventSink,
        S: BitStackConfig,
    {
        loop {
            self.fill()?;

            let data = self.scratch.get(..self.filled).unwrap_or_default();
            let result = if self.end_of_stream {
                handler.finish_buffer(data)
            } else {
                handler.parse_buffer(data)
            };
            match result {
                Ok(()) if self.end_of_stream => {
                    debug!("stream parsed, {} bytes", self.offset + handler.consumed());
                    return Ok(());
                }
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NeedMoreInput && !self.end_of_stream => {}
                Err(e) => return Err(FeedError::Parse(e)),
            }
            self.compact(handler.consumed());
        }
    }

    /// Appends one read behind the pending tail.
    fn fill(&mut self) -> Result<(), FeedError<R::Error>> {
        if self.end_of_stream {
            return Ok(());
        }
        let capacity = self.scratch.len();
        let free = self.scratch.get_mut(self.filled..);
        let Some(free) = free.filter(|free| !free.is_empty()) else {
            return Err(FeedError::TokenTooLarge {
                capacity,
                offset: self.offset,
            });
        };
        let count = self.reader.read(free).map_err(FeedError::Reader)?;
        if count == 0 {
            debug!("end of stream at offset {}", self.offset + self.filled);
            self.end_of_stream = true;
        }
        self.filled += count.min(capacity - self.filled);
        trace!("read {} bytes, {} buffered", count, self.filled);
        Ok(())
    }

    /// Moves the unconsumed tail to the front of the scratch buffer.
    fn compact(&mut self, consumed: usize) {
        let consumed = consumed.min(self.filled);
        if consumed == 0 {
            return;
        }
        self.scratch.copy_within(consumed..self.filled, 0);
        self.filled -= consumed;
        self.offset += consumed;
        debug!(
            "compacted {} bytes, {} byte tail at offset {}",
            consumed, self.filled, self.offset
        );
    }

    /// Returns the reader, e.g. to inspect what is left of the stream.
    pub fn into_reader(self) -> R {
        self.reader
    }
}
