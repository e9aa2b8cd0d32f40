// SPDX-License-Identifier: Apache-2.0

//! Byte-level JSON lexer.
//!
//! [`Lexer::next_token`] runs a character automaton from [`State::Normal`]
//! until one token is complete. The automaton lives on the stack of that call
//! only: when the buffer runs out mid-token the partial state is dropped and
//! the caller re-scans the token from its first byte once more input arrives.

use crate::cursor::Cursor;
use crate::parse_error::ErrorKind;

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Colon,
    Comma,
    Null,
    True,
    False,
    String,
    Number,
}

/// A complete token. `start..end` is its value span: the raw characters of a
/// number or literal, the content between the quotes of a string, the single
/// byte of punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexError {
    /// The buffer ended before the token did.
    NeedMoreInput,
    /// Malformed input at `position`.
    Malformed { kind: ErrorKind, position: usize },
}

#[derive(Debug, Clone, Copy)]
enum State {
    Normal,
    InString,
    InEscape,
    InUnicodeEscape(u8),
    Literal {
        text: &'static [u8],
        matched: usize,
        kind: TokenKind,
    },
    Number(Num),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    /// First byte: `-` or a digit.
    Begin,
    /// After `-`, a digit is required.
    IntFirst,
    /// A single `0`; no more integer digits may follow.
    LeadingZero,
    IntRest,
    /// After `.`, a digit is required.
    Point,
    Fraction,
    /// After `e`/`E`.
    ExpoSign,
    /// After the exponent sign, a digit is required.
    ExpoFirstDigit,
    ExpoRest,
}

pub(crate) struct Lexer<'b> {
    cursor: Cursor<'b>,
    at_end_of_input: bool,
}

impl<'b> Lexer<'b> {
    /// Lexes `data` from `pos`. With `at_end_of_input` the end of `data` is
    /// the end of the document and terminates a pending number or literal.
    pub fn new(data: &'b [u8], pos: usize, at_end_of_input: bool) -> Self {
        Self {
            cursor: Cursor::new(data, pos),
            at_end_of_input,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn slice(&self, start: usize, end: usize) -> &'b [u8] {
        self.cursor.slice(start, end)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let mut state = State::Normal;
        let mut start = self.cursor.position();

        loop {
            let Some(byte) = self.cursor.next_byte() else {
                return self.end_of_buffer(state, start);
            };
            // Position of `byte`
            let pos = self.cursor.position() - 1;

            state = match (state, byte) {
                (State::Normal, b' ' | b'\n' | b'\r' | b'\t') => {
                    start = pos + 1;
                    State::Normal
                }
                (State::Normal, b'{') => return self.punctuation(TokenKind::ObjectOpen, pos),
                (State::Normal, b'}') => return self.punctuation(TokenKind::ObjectClose, pos),
                (State::Normal, b'[') => return self.punctuation(TokenKind::ArrayOpen, pos),
                (State::Normal, b']') => return self.punctuation(TokenKind::ArrayClose, pos),
                (State::Normal, b':') => return self.punctuation(TokenKind::Colon, pos),
                (State::Normal, b',') => return self.punctuation(TokenKind::Comma, pos),
                (State::Normal, b'"') => {
                    start = pos + 1;
                    State::InString
                }
                (State::Normal, b'-' | b'0'..=b'9') => {
                    start = pos;
                    self.cursor.unget();
                    State::Number(Num::Begin)
                }
                (State::Normal, b'n') => {
                    start = pos;
                    State::Literal {
                        text: b"null",
                        matched: 1,
                        kind: TokenKind::Null,
                    }
                }
                (State::Normal, b't') => {
                    start = pos;
                    State::Literal {
                        text: b"true",
                        matched: 1,
                        kind: TokenKind::True,
                    }
                }
                (State::Normal, b'f') => {
                    start = pos;
                    State::Literal {
                        text: b"false",
                        matched: 1,
                        kind: TokenKind::False,
                    }
                }
                (State::Normal, _) => return malformed(ErrorKind::UnknownToken, pos),

                (State::InString, b'"') => return Ok(self.token(TokenKind::String, start, pos)),
                (State::InString, b'\\') => State::InEscape,
                (State::InString, _) => State::InString,

                (State::InEscape, b'u') => State::InUnicodeEscape(0),
                (State::InEscape, b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                    State::InString
                }
                (State::InEscape, _) => return malformed(ErrorKind::UnknownEscapeSymbol, pos),

                (State::InUnicodeEscape(3), b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F') => {
                    State::InString
                }
                (State::InUnicodeEscape(seen), b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F') => {
                    State::InUnicodeEscape(seen + 1)
                }
                (State::InUnicodeEscape(_), _) => {
                    return malformed(ErrorKind::UnknownHexSymbol, pos)
                }

                (
                    State::Literal {
                        text,
                        matched,
                        kind,
                    },
                    _,
                ) => {
                    if matched == text.len() {
                        // The byte past the literal belongs to the next token
                        self.cursor.unget();
                        return Ok(self.token(kind, start, pos));
                    }
                    if text.get(matched) != Some(&byte) {
                        return malformed(ErrorKind::UnknownToken, pos);
                    }
                    State::Literal {
                        text,
                        matched: matched + 1,
                        kind,
                    }
                }

                (State::Number(num), _) => match self.number(num, byte, start, pos)? {
                    Some(next) => State::Number(next),
                    None => return Ok(self.token(TokenKind::Number, start, self.position())),
                },
            };
        }
    }

    /// One step of the number automaton. `Ok(None)` when the number ended
    /// before `byte`; the cursor is then left on the first byte past it.
    fn number(
        &mut self,
        num: Num,
        byte: u8,
        start: usize,
        pos: usize,
    ) -> Result<Option<Num>, LexError> {
        let next = match (num, byte) {
            (Num::Begin, b'-') => Num::IntFirst,
            (Num::Begin | Num::IntFirst, b'0') => Num::LeadingZero,
            (Num::Begin | Num::IntFirst, b'1'..=b'9') => Num::IntRest,
            (Num::Begin | Num::IntFirst, _) => return malformed(ErrorKind::UnknownToken, pos),

            (Num::IntRest, b'0'..=b'9') => Num::IntRest,
            (Num::LeadingZero | Num::IntRest, b'.') => Num::Point,
            (Num::LeadingZero | Num::IntRest | Num::Fraction, b'e' | b'E') => Num::ExpoSign,

            (Num::Point | Num::Fraction, b'0'..=b'9') => Num::Fraction,
            (Num::Point, _) => {
                // A bare `.` is not part of the number: end it before the point
                trace!("number at {} ends before bare '.' at {}", start, pos - 1);
                self.cursor.rewind_to(pos - 1);
                return Ok(None);
            }

            (Num::ExpoSign, b'+' | b'-') => Num::ExpoFirstDigit,
            (Num::ExpoSign | Num::ExpoFirstDigit | Num::ExpoRest, b'0'..=b'9') => Num::ExpoRest,
            (Num::ExpoSign | Num::ExpoFirstDigit, _) => {
                return malformed(ErrorKind::ExponentError, pos)
            }

            (Num::LeadingZero | Num::IntRest | Num::Fraction | Num::ExpoRest, _) => {
                self.cursor.unget();
                return Ok(None);
            }
        };
        Ok(Some(next))
    }

    fn end_of_buffer(&mut self, state: State, start: usize) -> Result<Token, LexError> {
        if self.at_end_of_input {
            let end = self.position();
            match state {
                State::Number(Num::LeadingZero | Num::IntRest | Num::Fraction | Num::ExpoRest) => {
                    return Ok(self.token(TokenKind::Number, start, end));
                }
                State::Number(Num::Point) => {
                    self.cursor.rewind_to(end - 1);
                    return Ok(self.token(TokenKind::Number, start, end - 1));
                }
                State::Literal {
                    text,
                    matched,
                    kind,
                } if matched == text.len() => {
                    return Ok(self.token(kind, start, end));
                }
                // The end of input delimits these like any other byte would
                State::Number(Num::Begin | Num::IntFirst) | State::Literal { .. } => {
                    return malformed(ErrorKind::UnknownToken, end);
                }
                State::Number(Num::ExpoSign | Num::ExpoFirstDigit) => {
                    return malformed(ErrorKind::ExponentError, end);
                }
                _ => {}
            }
        }
        trace!("buffer exhausted in {:?}, token started at {}", state, start);
        Err(LexError::NeedMoreInput)
    }

    fn punctuation(&self, kind: TokenKind, pos: usize) -> Result<Token, LexError> {
        Ok(self.token(kind, pos, pos + 1))
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        trace!(
            "{:?} {:?}",
            kind,
            core::str::from_utf8(self.slice(start, end)).unwrap_or("<non-utf8>")
        );
        Token { kind, start, end }
    }
}

fn malformed<T>(kind: ErrorKind, position: usize) -> Result<T, LexError> {
    Err(LexError::Malformed { kind, position })
}
