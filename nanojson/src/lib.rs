// SPDX-License-Identifier: Apache-2.0

//! Incremental, allocation-free JSON event parser.
//!
//! Input arrives in buffers of any size. A [`Handler`] scans each buffer,
//! reports structure and values to an [`EventSink`] as borrowed spans of the
//! input, and stops with [`ErrorKind::NeedMoreInput`] when a buffer ends
//! inside the document. Parsing resumes with a buffer that starts with the
//! unconsumed tail of the previous one; [`StreamFeeder`] automates that over a
//! fixed scratch buffer.
//!
//! ```rust
//! use nanojson::{Context, EventKind, Handler};
//!
//! let mut keys = Vec::new();
//! let doc = br#"{"id": 7, "tags": ["a", "b"]}"#;
//!
//! let mut handler = Handler::new();
//! handler.set_event_callback(|context: &Context<'_>, event: EventKind| {
//!     if event == EventKind::ObjectKey {
//!         keys.push(context.value_str().unwrap_or_default().to_owned());
//!     }
//! });
//! handler.parse_buffer(doc).unwrap();
//! drop(handler);
//! assert_eq!(keys, ["id", "tags"]);
//! ```
//!
//! The nesting limit is chosen at compile time through [`BitStackConfig`];
//! the default allows 4096 levels. Exceeding it fails with
//! [`ErrorKind::TooDeeplyNested`].

#![cfg_attr(not(test), no_std)]

mod bitstack;
pub use bitstack::{
    ArrayBitBucket, ArrayBitStack, BitBucket, BitStackConfig, BitStackStruct, DefaultConfig,
    DepthCounter,
};

mod container_stack;
pub use container_stack::Container;

mod cursor;
pub use cursor::Location;

mod parse_error;
pub use parse_error::{error_description, ErrorKind, ParseError};

mod lexer;

mod event;
pub use event::{Context, EventKind, EventSink};

mod parser;
pub use parser::{Handler, Input};

mod chunk_reader;
pub use chunk_reader::{ChunkReader, Reader};

mod stream_feeder;
pub use stream_feeder::{FeedError, StreamFeeder};
