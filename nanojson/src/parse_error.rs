// SPDX-License-Identifier: Apache-2.0

use crate::cursor::Location;

/// Outcome of the most recent parse call.
///
/// Every failed call latches exactly one kind. [`ErrorKind::NeedMoreInput`] is
/// the only recoverable one; all others are terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorKind {
    /// No error.
    #[default]
    Ok,
    /// A byte that cannot begin or continue any token.
    UnknownToken,
    /// Invalid character after `\` inside a string.
    UnknownEscapeSymbol,
    /// Non-hex character inside a `\u` escape.
    UnknownHexSymbol,
    /// `e`/`E` or the exponent sign not followed by a digit.
    ExponentError,
    /// Grammatically invalid token: wrong key/colon/value/comma/closer,
    /// unbalanced closers, content after the document.
    UnexpectedToken,
    /// Input ran out before the document was complete. Resume with more bytes.
    NeedMoreInput,
    /// Nesting exceeded the configured stack capacity.
    TooDeeplyNested,
}

impl ErrorKind {
    /// Human readable description.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorKind::Ok => "Ok",
            ErrorKind::UnknownToken => "Syntax error",
            ErrorKind::UnknownEscapeSymbol => "Syntax error, unknown escape symbol",
            ErrorKind::UnknownHexSymbol => {
                "Syntax error, unknown hex symbol after '\\u' escape symbol"
            }
            ErrorKind::ExponentError => "Syntax error in exponent part",
            ErrorKind::UnexpectedToken => "Unexpected token",
            ErrorKind::NeedMoreInput => "Unexpected end of input",
            ErrorKind::TooDeeplyNested => "Too deeply nested",
        }
    }

    /// Whether parsing can continue once more input is supplied.
    pub const fn is_recoverable(self) -> bool {
        matches!(self, ErrorKind::NeedMoreInput)
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

/// Human readable description of `kind`.
pub const fn error_description(kind: ErrorKind) -> &'static str {
    kind.description()
}

/// A failed parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrorKind,
    byte: Option<u8>,
    location: Location,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, byte: Option<u8>, location: Location) -> Self {
        Self {
            kind,
            byte,
            location,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The offending byte, if the error was caused by one.
    pub fn byte(&self) -> Option<u8> {
        self.byte
    }

    /// Where the offending byte (or the end of input) was found.
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_need_more_input(&self) -> bool {
        self.kind == ErrorKind::NeedMoreInput
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.byte {
            Some(byte) if byte.is_ascii_graphic() => write!(
                f,
                "{} ('{}') at {}",
                self.kind, byte as char, self.location
            ),
            Some(byte) => write!(f, "{} (0x{:02x}) at {}", self.kind, byte, self.location),
            None => write!(f, "{} at {}", self.kind, self.location),
        }
    }
}
