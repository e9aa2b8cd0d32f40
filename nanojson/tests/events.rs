// SPDX-License-Identifier: Apache-2.0

// Event stream contents: order, values, depth and locations

mod common;

use common::*;
use nanojson::{Container, Context, ErrorKind, EventKind, Handler};
use test_log::test;

#[test]
fn test_object_with_array_scenario() {
    let (result, events) = one_shot(br#"{"a":1,"b":[true,false,null]}"#);
    assert_eq!(result, Ok(()));
    assert_eq!(
        describe(&events),
        [
            "ObjectBegin",
            "ObjectKey(a)",
            "Number(1)",
            "ObjectKey(b)",
            "ArrayBegin",
            "True(true)",
            "False(false)",
            "Null(null)",
            "ArrayEnd",
            "ObjectEnd",
        ]
    );
}

#[test]
fn test_string_value_is_raw() {
    let (result, events) = one_shot(br#"{"x": "a\nb"}"#);
    assert_eq!(result, Ok(()));
    assert_eq!(events[1].kind, EventKind::ObjectKey);
    assert_eq!(events[1].value, b"x");
    assert_eq!(events[2].kind, EventKind::String);
    // Backslash and `n`, not a newline
    assert_eq!(events[2].value, br"a\nb");
}

#[test]
fn test_trailing_comma_scenario() {
    let (result, events) = one_shot(b"[1,]");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::UnexpectedToken);
    // Events before the error were delivered
    assert_eq!(describe(&events), ["ArrayBegin", "Number(1)"]);
}

#[test]
fn test_missing_value_scenario() {
    let (result, events) = one_shot(br#"{"a":}"#);
    let error = result.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnexpectedToken);
    assert_eq!(error.byte(), Some(b'}'));
    assert_eq!(describe(&events), ["ObjectBegin", "ObjectKey(a)"]);
}

#[test]
fn test_split_number_scenario() {
    let first = br#"{"a":1"#;

    // Tail-preserving: the pending `1` is resent with the new bytes
    let (result, events) = tail_preserving(br#"{"a":12}"#, &[first.len()]);
    assert_eq!(result, Ok(()));
    assert_eq!(events, one_shot(br#"{"a":12}"#).1);

    // Naive: only new bytes are sent, the withheld `1` is lost
    let mut handler = recording_handler();
    assert!(handler.parse_buffer(first).unwrap_err().is_need_more_input());
    handler.parse_buffer(b"2}").unwrap();
    assert_eq!(
        describe(&recorded(&handler)),
        ["ObjectBegin", "ObjectKey(a)", "Number(2)", "ObjectEnd"]
    );
}

#[test]
fn test_events_rebuild_document() {
    for doc in [
        GLOSSARY,
        GLOSSARY_ESC,
        GLOSSARY_ESC_UNICODE,
        WEB_APP,
        br#"[{"n":-0.5e-7,"t":[true,[null,false]],"s":"\"q\""},[],{},"",0]"#.as_slice(),
    ] {
        let (result, events) = one_shot(doc);
        assert_eq!(result, Ok(()));
        assert_eq!(
            String::from_utf8_lossy(&rebuild(&events)),
            String::from_utf8_lossy(&compact(doc))
        );
    }
}

#[test]
fn test_depth_and_container_in_context() {
    let mut seen = Vec::new();
    let mut handler = Handler::new();
    handler.set_event_callback(|context: &Context<'_>, event: EventKind| {
        seen.push((event, context.depth(), context.container()));
    });
    handler.parse_buffer(br#"{"k":[1,{}]}"#).unwrap();
    drop(handler);
    assert_eq!(
        seen,
        [
            (EventKind::ObjectBegin, 1, Container::Object),
            (EventKind::ObjectKey, 1, Container::Object),
            (EventKind::ArrayBegin, 2, Container::Array),
            (EventKind::Number, 2, Container::Array),
            (EventKind::ObjectBegin, 3, Container::Object),
            (EventKind::ObjectEnd, 3, Container::Object),
            (EventKind::ArrayEnd, 2, Container::Array),
            (EventKind::ObjectEnd, 1, Container::Object),
        ]
    );
}

#[test]
fn test_top_level_scalar_context() {
    let mut seen = Vec::new();
    let mut handler = Handler::new();
    handler.set_event_callback(|context: &Context<'_>, event: EventKind| {
        seen.push((event, context.depth(), context.container(), context.len()));
    });
    handler.parse_buffer(br#""hello" "#).unwrap();
    drop(handler);
    assert_eq!(seen, [(EventKind::String, 0, Container::TopLevel, 5)]);
}

#[test]
fn test_value_length_and_text() {
    let mut lengths = Vec::new();
    let mut handler = Handler::new();
    handler.set_event_callback(|context: &Context<'_>, event: EventKind| {
        if event.has_value() {
            lengths.push((context.value_str().map(str::to_owned), context.len()));
        } else {
            assert!(context.is_empty());
        }
    });
    handler
        .parse_buffer(b"[\"\\u00e9\", -1.25, false, \"\xff\"]")
        .unwrap();
    drop(handler);
    assert_eq!(
        lengths,
        [
            (Some(r"\u00e9".to_owned()), 6),
            (Some("-1.25".to_owned()), 5),
            (Some("false".to_owned()), 5),
            (None, 1),
        ]
    );
}

#[test]
fn test_event_locations_span_lines() {
    let mut seen = Vec::new();
    let mut handler = Handler::new();
    handler.set_event_callback(|context: &Context<'_>, event: EventKind| {
        let location = context.location();
        seen.push((event, location.line, location.column));
    });
    handler.parse_buffer(b"{\n  \"a\": [\n    7\n  ]\n}\n").unwrap();
    drop(handler);
    assert_eq!(
        seen,
        [
            (EventKind::ObjectBegin, 1, 1),
            (EventKind::ObjectKey, 2, 3),
            (EventKind::ArrayBegin, 2, 8),
            (EventKind::Number, 3, 5),
            (EventKind::ArrayEnd, 4, 3),
            (EventKind::ObjectEnd, 5, 1),
        ]
    );
}

#[test]
fn test_initialize_behaves_like_fresh_handler() {
    let docs: [&[u8]; 4] = [br#"{"a":[1,2"#, b"[1,]", GLOSSARY, b"tru"];
    for first in docs {
        let mut reused = recording_handler();
        let _ = reused.parse_buffer(first);
        reused.initialize();
        if let Some(recorder) = reused.event_callback_mut() {
            recorder.events.clear();
        }
        let reused_result = reused.parse_buffer(WEB_APP);

        let mut fresh = recording_handler();
        let fresh_result = fresh.parse_buffer(WEB_APP);

        assert_eq!(reused_result, fresh_result);
        assert_eq!(recorded(&reused), recorded(&fresh));
        assert_eq!(reused.location(), fresh.location());
        assert_eq!(reused.consumed(), fresh.consumed());
    }
}

#[test]
fn test_callback_can_be_swapped_between_buffers() {
    let mut handler = recording_handler();
    assert!(handler.parse_buffer(b"[1, ").is_err());
    let first = handler.take_event_callback().unwrap_or_default();
    handler.set_event_callback(Recorder::default());
    handler.parse_buffer(b"2]").unwrap();
    assert_eq!(describe(&first.events), ["ArrayBegin", "Number(1)"]);
    assert_eq!(describe(&recorded(&handler)), ["Number(2)", "ArrayEnd"]);
}
