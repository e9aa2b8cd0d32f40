// SPDX-License-Identifier: Apache-2.0

//! Events delivered to the installed callback.

use crate::container_stack::Container;
use crate::cursor::Location;

/// Structural and value events, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    /// An object member name. The value is the raw key text.
    ObjectKey,
    Null,
    True,
    False,
    /// The value is the raw string content, escapes unresolved.
    String,
    /// The value is the number exactly as written.
    Number,
}

impl EventKind {
    /// Whether this event carries token text in [`Context::value`].
    pub const fn has_value(self) -> bool {
        !matches!(
            self,
            EventKind::ObjectBegin
                | EventKind::ObjectEnd
                | EventKind::ArrayBegin
                | EventKind::ArrayEnd
        )
    }
}

/// What the callback can see of the parser while handling one event.
///
/// Borrows the input buffer, so a context never outlives the callback
/// invocation it was passed to.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    value: &'a [u8],
    depth: usize,
    container: Container,
    location: Location,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        value: &'a [u8],
        depth: usize,
        container: Container,
        location: Location,
    ) -> Self {
        Self {
            value,
            depth,
            container,
            location,
        }
    }

    /// Raw token text; empty for begin/end events.
    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Token text as `str`, `None` if it is not valid UTF-8.
    pub fn value_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.value).ok()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Number of open containers. Begin and end events of a container see the
    /// same depth, one more than its members' parent.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Innermost open container.
    pub fn container(&self) -> Container {
        self.container
    }

    /// Where the token starts (the opening quote for strings and keys).
    pub fn location(&self) -> Location {
        self.location
    }
}

/// Receives parse events.
///
/// Implemented for closures taking `(&Context<'_>, EventKind)` and for `()`,
/// which discards everything (validation only).
///
/// ```rust
/// use nanojson::{Context, EventKind, EventSink};
///
/// struct KeyCounter(usize);
///
/// impl EventSink for KeyCounter {
///     fn handle_event(&mut self, _context: &Context<'_>, event: EventKind) {
///         if event == EventKind::ObjectKey {
///             self.0 += 1;
///         }
///     }
/// }
///
/// let mut handler = nanojson::Handler::new();
/// handler.set_event_callback(KeyCounter(0));
/// handler.finish_buffer(br#"{"a": 1, "b": {"c": null}}"#).unwrap();
/// assert_eq!(handler.event_callback().map(|counter| counter.0), Some(3));
/// ```
pub trait EventSink {
    fn handle_event(&mut self, context: &Context<'_>, event: EventKind);
}

impl<F> EventSink for F
where
    F: FnMut(&Context<'_>, EventKind),
{
    fn handle_event(&mut self, context: &Context<'_>, event: EventKind) {
        self(context, event)
    }
}

impl EventSink for () {
    fn handle_event(&mut self, _context: &Context<'_>, _event: EventKind) {}
}
