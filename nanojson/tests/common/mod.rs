// SPDX-License-Identifier: Apache-2.0

// Shared helpers for the integration tests
#![allow(dead_code)]

use nanojson::{Context, EventKind, EventSink, Handler, ParseError};

pub const GLOSSARY: &[u8] = include_bytes!("../data/glossary.json");
pub const GLOSSARY_ESC: &[u8] = include_bytes!("../data/glossary-esc.json");
pub const GLOSSARY_ESC_UNICODE: &[u8] = include_bytes!("../data/glossary-esc-unicode.json");
pub const GLOSSARY_LEXICAL_ERROR: &[u8] = include_bytes!("../data/glossary-lexical-error.json");
pub const GLOSSARY_GRAMMAR_ERROR: &[u8] = include_bytes!("../data/glossary-grammar-error.json");
pub const WEB_APP: &[u8] = include_bytes!("../data/web-app.json");

/// One delivered event with an owned copy of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub kind: EventKind,
    pub value: Vec<u8>,
    pub depth: usize,
}

impl Recorded {
    /// `Kind` or `Kind(value)`, for readable assertions.
    pub fn describe(&self) -> String {
        if self.kind.has_value() {
            format!("{:?}({})", self.kind, String::from_utf8_lossy(&self.value))
        } else {
            format!("{:?}", self.kind)
        }
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Recorded>,
}

impl EventSink for Recorder {
    fn handle_event(&mut self, context: &Context<'_>, event: EventKind) {
        self.events.push(Recorded {
            kind: event,
            value: context.value().to_vec(),
            depth: context.depth(),
        });
    }
}

pub fn recording_handler() -> Handler<Recorder> {
    let mut handler = Handler::new();
    handler.set_event_callback(Recorder::default());
    handler
}

pub fn recorded(handler: &Handler<Recorder>) -> Vec<Recorded> {
    handler
        .event_callback()
        .map(|recorder| recorder.events.clone())
        .unwrap_or_default()
}

pub fn describe(events: &[Recorded]) -> Vec<String> {
    events.iter().map(Recorded::describe).collect()
}

/// Parses `doc` in a single final buffer.
pub fn one_shot(doc: &[u8]) -> (Result<(), ParseError>, Vec<Recorded>) {
    let mut handler = recording_handler();
    let result = handler.finish_buffer(doc);
    (result, recorded(&handler))
}

/// Parses `doc` cut at `cuts`, each buffer being the unconsumed tail of the
/// previous one followed by the next fragment. The last buffer is final.
pub fn tail_preserving(doc: &[u8], cuts: &[usize]) -> (Result<(), ParseError>, Vec<Recorded>) {
    let mut handler = recording_handler();
    let mut bounds = cuts.to_vec();
    bounds.push(doc.len());

    let mut tail: Vec<u8> = Vec::new();
    let mut start = 0;
    let mut result = Ok(());
    for (i, &end) in bounds.iter().enumerate() {
        let mut buffer = tail.clone();
        buffer.extend_from_slice(&doc[start..end]);
        start = end;

        result = if i + 1 == bounds.len() {
            handler.finish_buffer(&buffer)
        } else {
            handler.parse_buffer(&buffer)
        };
        match result {
            Err(e) if !e.is_need_more_input() => break,
            _ => tail = buffer[handler.consumed()..].to_vec(),
        }
    }
    (result, recorded(&handler))
}

/// Serializes events back to compact JSON.
pub fn rebuild(events: &[Recorded]) -> Vec<u8> {
    let mut out = Vec::new();
    // Per open level: nothing written yet
    let mut fresh = vec![true];
    for event in events {
        match event.kind {
            EventKind::ObjectEnd | EventKind::ArrayEnd => {
                fresh.pop();
                out.push(if event.kind == EventKind::ObjectEnd { b'}' } else { b']' });
                continue;
            }
            _ => {}
        }
        if out.last() != Some(&b':') {
            if let Some(first) = fresh.last_mut() {
                if !*first {
                    out.push(b',');
                }
                *first = false;
            }
        }
        match event.kind {
            EventKind::ObjectBegin => {
                out.push(b'{');
                fresh.push(true);
            }
            EventKind::ArrayBegin => {
                out.push(b'[');
                fresh.push(true);
            }
            EventKind::ObjectKey => {
                out.push(b'"');
                out.extend_from_slice(&event.value);
                out.extend_from_slice(b"\":");
            }
            EventKind::String => {
                out.push(b'"');
                out.extend_from_slice(&event.value);
                out.push(b'"');
            }
            _ => out.extend_from_slice(&event.value),
        }
    }
    out
}

/// `doc` without whitespace outside of strings.
pub fn compact(doc: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for &byte in doc {
        if in_string {
            out.push(byte);
            match (escaped, byte) {
                (true, _) => escaped = false,
                (false, b'\\') => escaped = true,
                (false, b'"') => in_string = false,
                _ => {}
            }
        } else if !matches!(byte, b' ' | b'\n' | b'\r' | b'\t') {
            in_string = byte == b'"';
            out.push(byte);
        }
    }
    out
}
