// SPDX-License-Identifier: Apache-2.0

//! Renders a JSON document as an indented XML outline.
//!
//! Objects and arrays become `<object>`/`<array>` elements, scalars become
//! empty `<string>`/`<number>` elements. Member names are carried in a `name`
//! attribute, scalar text in `value`.

use nanojson::{Context, EventKind, EventSink, Handler, ParseError};

/// Event sink that writes the outline into a `String`.
#[derive(Debug, Default)]
pub struct XmlOutline {
    out: String,
    /// Name of the member whose value comes next.
    name: Option<String>,
}

impl XmlOutline {
    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn open_line(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
    }

    fn name_attribute(&mut self) {
        if let Some(name) = self.name.take() {
            self.out.push_str(" name=\"");
            push_escaped(&mut self.out, &name);
            self.out.push('"');
        }
    }
}

impl EventSink for XmlOutline {
    fn handle_event(&mut self, context: &Context<'_>, event: EventKind) {
        let text = String::from_utf8_lossy(context.value());
        match event {
            EventKind::ObjectKey => self.name = Some(text.into_owned()),
            EventKind::ObjectBegin | EventKind::ArrayBegin => {
                // Begin events already count the new container
                self.open_line(context.depth() - 1);
                self.out.push_str(if event == EventKind::ObjectBegin {
                    "<object"
                } else {
                    "<array"
                });
                self.name_attribute();
                self.out.push_str(">\n");
            }
            EventKind::ObjectEnd | EventKind::ArrayEnd => {
                self.open_line(context.depth() - 1);
                self.out.push_str(if event == EventKind::ObjectEnd {
                    "</object>\n"
                } else {
                    "</array>\n"
                });
            }
            EventKind::Number | EventKind::String | EventKind::True | EventKind::False
            | EventKind::Null => {
                self.open_line(context.depth());
                self.out.push_str(if event == EventKind::Number {
                    "<number"
                } else {
                    "<string"
                });
                self.name_attribute();
                self.out.push_str(" value=\"");
                push_escaped(&mut self.out, &text);
                self.out.push_str("\" />\n");
            }
        }
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Renders a complete document.
pub fn render(doc: &[u8]) -> Result<String, ParseError> {
    let mut handler = Handler::new();
    handler.set_event_callback(XmlOutline::default());
    handler.finish_buffer(doc)?;
    Ok(handler
        .take_event_callback()
        .map(XmlOutline::into_string)
        .unwrap_or_default())
}
