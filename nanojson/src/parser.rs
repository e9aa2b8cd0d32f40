// SPDX-License-Identifier: Apache-2.0

//! Grammar automaton and the parse session.

use crate::bitstack::{BitStackConfig, DefaultConfig};
use crate::container_stack::{Container, ContainerStack};
use crate::cursor::Location;
use crate::event::{Context, EventKind, EventSink};
use crate::lexer::{LexError, Lexer, Token, TokenKind};
use crate::parse_error::{ErrorKind, ParseError};

use log::{debug, trace};

/// Object member cycle: key, colon, value, then comma or `}`.
const SLOT_KEY: u8 = 0;
const SLOT_COLON: u8 = 1;
const SLOT_MEMBER_VALUE: u8 = 2;
const SLOT_MEMBER_END: u8 = 3;
/// Array cycle: value, then comma or `]`.
const SLOT_ELEMENT: u8 = 0;
const SLOT_ELEMENT_END: u8 = 1;

/// An incremental, event-driven JSON parse session.
///
/// The handler owns all parse state but no input. Bytes are lent to it one
/// buffer at a time; when a buffer ends inside a token the parse call fails
/// with [`ErrorKind::NeedMoreInput`] and [`Handler::consumed`] tells how much
/// of that buffer was fully processed. The next buffer must start with the
/// unconsumed tail:
///
/// ```rust
/// use nanojson::{Context, ErrorKind, EventKind, Handler};
///
/// let mut numbers = 0;
/// let mut handler = Handler::new();
/// handler.set_event_callback(|_: &Context<'_>, event: EventKind| {
///     if event == EventKind::Number {
///         numbers += 1;
///     }
/// });
///
/// let first = br#"{"a": [1, 2"#;
/// let err = handler.parse_buffer(first).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NeedMoreInput);
///
/// let mut next = first[handler.consumed()..].to_vec();
/// next.extend_from_slice(b"3]}");
/// handler.parse_buffer(&next).unwrap();
/// assert!(handler.is_complete());
///
/// drop(handler);
/// assert_eq!(numbers, 2);
/// ```
///
/// `S` selects the maximum nesting depth, see [`BitStackConfig`].
pub struct Handler<C, S: BitStackConfig = DefaultConfig> {
    callback: Option<C>,
    stack: ContainerStack<S>,
    slot: u8,
    /// A comma was accepted and no member or element has followed it yet.
    after_comma: bool,
    complete: bool,
    /// End of the last fully processed token in the current buffer.
    consumed: usize,
    /// Location of `consumed` within the document.
    location: Location,
    last_error: ErrorKind,
    /// Latched terminal error, replayed until [`Handler::initialize`].
    failure: Option<ParseError>,
}

impl<C> Handler<C, DefaultConfig> {
    /// A handler with the default nesting capacity and no callback.
    pub fn new() -> Self {
        Self::with_config()
    }
}

impl<C> Default for Handler<C, DefaultConfig> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S: BitStackConfig> Handler<C, S> {
    /// A handler with the nesting capacity of `S`.
    pub fn with_config() -> Self {
        Self {
            callback: None,
            stack: ContainerStack::new(),
            slot: 0,
            after_comma: false,
            complete: false,
            consumed: 0,
            location: Location::START,
            last_error: ErrorKind::Ok,
            failure: None,
        }
    }

    /// Resets to the start of a new document. The callback stays installed.
    pub fn initialize(&mut self) {
        self.stack = ContainerStack::new();
        self.slot = 0;
        self.after_comma = false;
        self.complete = false;
        self.consumed = 0;
        self.location = Location::START;
        self.last_error = ErrorKind::Ok;
        self.failure = None;
    }

    pub fn set_event_callback(&mut self, callback: C) {
        self.callback = Some(callback);
    }

    pub fn event_callback(&self) -> Option<&C> {
        self.callback.as_ref()
    }

    pub fn event_callback_mut(&mut self) -> Option<&mut C> {
        self.callback.as_mut()
    }

    /// Removes the callback; later events are dropped until one is set again.
    pub fn take_event_callback(&mut self) -> Option<C> {
        self.callback.take()
    }

    /// Outcome of the most recent parse call, [`ErrorKind::Ok`] after a success.
    pub fn last_error(&self) -> ErrorKind {
        self.last_error
    }

    /// Bytes of the most recently parsed buffer that were fully processed.
    /// The remainder is the tail to resend with the next buffer.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Document location just past the last processed token.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// The top-level value has been closed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Installs `data` as the current buffer, scanning from its first byte.
    pub fn append_buffer<'h, 'b>(&'h mut self, data: &'b [u8]) -> Input<'h, 'b, C, S> {
        self.consumed = 0;
        Input {
            handler: self,
            data,
        }
    }
}

impl<C: EventSink, S: BitStackConfig> Handler<C, S> {
    /// Installs `data` and parses it.
    pub fn parse_buffer(&mut self, data: &[u8]) -> Result<(), ParseError> {
        self.append_buffer(data).parse()
    }

    /// Installs `data` as the last buffer of the document and parses it.
    pub fn finish_buffer(&mut self, data: &[u8]) -> Result<(), ParseError> {
        self.append_buffer(data).finish()
    }

    fn run(&mut self, data: &[u8], at_end_of_input: bool) -> Result<(), ParseError> {
        if let Some(failure) = self.failure {
            trace!("replaying {:?}", failure.kind());
            self.last_error = failure.kind();
            return Err(failure);
        }
        self.last_error = ErrorKind::Ok;

        let result = self.scan(data, at_end_of_input);
        if let Err(error) = result {
            self.last_error = error.kind();
            if !error.kind().is_recoverable() {
                debug!("parse failed: {}", error);
                self.failure = Some(error);
            }
        }
        result
    }

    fn scan(&mut self, data: &[u8], at_end_of_input: bool) -> Result<(), ParseError> {
        let mut lexer = Lexer::new(data, self.consumed, at_end_of_input);
        loop {
            let token = match lexer.next_token() {
                Ok(token) => token,
                Err(LexError::NeedMoreInput) => return self.need_more_input(data),
                Err(LexError::Malformed { .. }) if self.complete => {
                    return Err(self.trailing_token(data));
                }
                Err(LexError::Malformed { kind, position }) => {
                    let location = self.location.advanced(slice(data, self.consumed, position));
                    return Err(ParseError::new(kind, data.get(position).copied(), location));
                }
            };

            let begin = origin(&token);
            let location = self.location.advanced(slice(data, self.consumed, begin));
            if let Err(kind) = self.accept(token, data, location) {
                return Err(ParseError::new(kind, data.get(begin).copied(), location));
            }
            self.location = location.advanced(slice(data, begin, lexer.position()));
            self.consumed = lexer.position();
        }
    }

    /// The buffer ran out. Whitespace up to the partial token is committed so
    /// the tail handed back to the caller starts at the token itself.
    fn need_more_input(&mut self, data: &[u8]) -> Result<(), ParseError> {
        self.commit_whitespace(data);
        if self.complete {
            if data.get(self.consumed).is_some() {
                return Err(self.trailing_token(data));
            }
            debug!("document complete at offset {}", self.location.offset);
            return Ok(());
        }
        let end = self.location.advanced(slice(data, self.consumed, data.len()));
        debug!(
            "need more input: {} of {} bytes consumed, depth {}",
            self.consumed,
            data.len(),
            self.stack.depth()
        );
        Err(ParseError::new(ErrorKind::NeedMoreInput, None, end))
    }

    fn commit_whitespace(&mut self, data: &[u8]) {
        let rest = slice(data, self.consumed, data.len());
        let blank = rest
            .iter()
            .take_while(|byte| matches!(byte, b' ' | b'\n' | b'\r' | b'\t'))
            .count();
        self.location = self.location.advanced(slice(rest, 0, blank));
        self.consumed += blank;
    }

    /// Anything but whitespace after the document, well-formed or not, is an
    /// unexpected token reported at its first byte.
    fn trailing_token(&mut self, data: &[u8]) -> ParseError {
        self.commit_whitespace(data);
        let byte = data.get(self.consumed).copied();
        trace!("{:?} after the end of the document", byte.map(char::from));
        ParseError::new(ErrorKind::UnexpectedToken, byte, self.location)
    }

    fn accept(&mut self, token: Token, data: &[u8], location: Location) -> Result<(), ErrorKind> {
        if self.complete {
            trace!("{:?} after the end of the document", token.kind);
            return Err(ErrorKind::UnexpectedToken);
        }
        let container = self.stack.current();
        trace!(
            "{:?} in {:?} slot {} after_comma {}",
            token.kind,
            self.stack,
            self.slot,
            self.after_comma
        );

        match token.kind {
            TokenKind::ObjectOpen => self.open(Container::Object, location),
            TokenKind::ArrayOpen => self.open(Container::Array, location),
            TokenKind::ObjectClose => self.close(Container::Object, location),
            TokenKind::ArrayClose => self.close(Container::Array, location),
            TokenKind::Colon => {
                if container != Container::Object || self.slot != SLOT_COLON {
                    return Err(ErrorKind::UnexpectedToken);
                }
                self.slot = SLOT_MEMBER_VALUE;
                Ok(())
            }
            TokenKind::Comma => {
                self.slot = match (container, self.slot) {
                    (Container::Object, SLOT_MEMBER_END) => SLOT_KEY,
                    (Container::Array, SLOT_ELEMENT_END) => SLOT_ELEMENT,
                    _ => return Err(ErrorKind::UnexpectedToken),
                };
                self.after_comma = true;
                Ok(())
            }
            TokenKind::String if container == Container::Object && self.slot == SLOT_KEY => {
                self.emit(EventKind::ObjectKey, data, &token, location);
                self.slot = SLOT_COLON;
                self.after_comma = false;
                Ok(())
            }
            TokenKind::Null | TokenKind::True | TokenKind::False | TokenKind::String
            | TokenKind::Number => {
                self.expect_value(container)?;
                self.emit(scalar_event(token.kind), data, &token, location);
                self.value_done(container);
                Ok(())
            }
        }
    }

    fn expect_value(&self, container: Container) -> Result<(), ErrorKind> {
        let ready = match container {
            Container::TopLevel => true,
            Container::Object => self.slot == SLOT_MEMBER_VALUE,
            Container::Array => self.slot == SLOT_ELEMENT,
        };
        if ready {
            Ok(())
        } else {
            Err(ErrorKind::UnexpectedToken)
        }
    }

    /// A complete value was accepted inside `container`.
    fn value_done(&mut self, container: Container) {
        self.after_comma = false;
        match container {
            Container::TopLevel => {
                debug!("top-level value complete");
                self.complete = true;
            }
            Container::Object => self.slot = SLOT_MEMBER_END,
            Container::Array => self.slot = SLOT_ELEMENT_END,
        }
    }

    fn open(&mut self, kind: Container, location: Location) -> Result<(), ErrorKind> {
        self.expect_value(self.stack.current())?;
        self.stack.push(kind).map_err(|_| {
            debug!("nesting capacity {} exhausted", S::capacity());
            ErrorKind::TooDeeplyNested
        })?;
        self.slot = 0;
        self.after_comma = false;
        let event = match kind {
            Container::Object => EventKind::ObjectBegin,
            _ => EventKind::ArrayBegin,
        };
        self.notify(event, &[], location);
        Ok(())
    }

    fn close(&mut self, kind: Container, location: Location) -> Result<(), ErrorKind> {
        let closable = match kind {
            Container::Object => self.slot == SLOT_KEY || self.slot == SLOT_MEMBER_END,
            _ => self.slot == SLOT_ELEMENT || self.slot == SLOT_ELEMENT_END,
        };
        if self.stack.current() != kind || !closable || self.after_comma {
            return Err(ErrorKind::UnexpectedToken);
        }
        let event = match kind {
            Container::Object => EventKind::ObjectEnd,
            _ => EventKind::ArrayEnd,
        };
        self.notify(event, &[], location);
        let enclosing = self.stack.pop().ok_or(ErrorKind::UnexpectedToken)?;
        self.value_done(enclosing);
        Ok(())
    }

    fn emit(&mut self, event: EventKind, data: &[u8], token: &Token, location: Location) {
        self.notify(event, slice(data, token.start, token.end), location);
    }

    fn notify(&mut self, event: EventKind, value: &[u8], location: Location) {
        if let Some(callback) = self.callback.as_mut() {
            let context = Context::new(value, self.stack.depth(), self.stack.current(), location);
            callback.handle_event(&context, event);
        }
    }
}

impl<C, S: BitStackConfig> core::fmt::Debug for Handler<C, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handler")
            .field("stack", &self.stack)
            .field("slot", &self.slot)
            .field("after_comma", &self.after_comma)
            .field("complete", &self.complete)
            .field("consumed", &self.consumed)
            .field("location", &self.location)
            .field("last_error", &self.last_error)
            .finish()
    }
}

/// A buffer installed in a [`Handler`], ready to be parsed.
pub struct Input<'h, 'b, C, S: BitStackConfig = DefaultConfig> {
    handler: &'h mut Handler<C, S>,
    data: &'b [u8],
}

impl<'h, 'b, C: EventSink, S: BitStackConfig> Input<'h, 'b, C, S> {
    /// Parses as far as the buffer allows.
    ///
    /// Returns `Ok` once the top-level value is complete and only whitespace
    /// follows it, [`ErrorKind::NeedMoreInput`] if the buffer ended before
    /// that. Any other error is terminal for the session.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        self.handler.run(self.data, false)
    }

    /// Like [`Input::parse`], but the buffer is the end of the document: a
    /// trailing number or literal is accepted without a delimiter.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        self.handler.run(self.data, true)
    }
}

impl<'h, 'b, C, S: BitStackConfig> Input<'h, 'b, C, S> {
    /// The part of the buffer that was not fully processed yet.
    pub fn unconsumed(&self) -> &'b [u8] {
        slice(self.data, self.handler.consumed, self.data.len())
    }

    pub fn handler(&self) -> &Handler<C, S> {
        self.handler
    }
}

/// First byte of the token as written, the opening quote for strings.
fn origin(token: &Token) -> usize {
    match token.kind {
        TokenKind::String => token.start.saturating_sub(1),
        _ => token.start,
    }
}

fn scalar_event(kind: TokenKind) -> EventKind {
    match kind {
        TokenKind::Null => EventKind::Null,
        TokenKind::True => EventKind::True,
        TokenKind::False => EventKind::False,
        TokenKind::String => EventKind::String,
        _ => EventKind::Number,
    }
}

fn slice(data: &[u8], start: usize, end: usize) -> &[u8] {
    data.get(start..end).unwrap_or_default()
}
