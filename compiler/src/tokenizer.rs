use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::ProtoError;

/// Line number carried by the end-of-input token.
pub const EOF_LINE: i64 = -1;

pub const COMMENT_MARKER: &str = "//";

pub const PRIMITIVE_WORDS: [&str; 8] = [
    "double", "float", "int32", "uint32", "int64", "uint64", "bool", "string",
];

/// Reserved words in match priority order. The first prefix match wins.
pub const RESERVED_WORDS: [&str; 16] = [
    "message", "package", "{", "}", ";", "repeated", COMMENT_MARKER, "=",
    "double", "float", "int32", "uint32", "int64", "uint64", "bool", "string",
];

lazy_static! {
    static ref IDENTIFIER_RX: Regex = Regex::new(r"^\p{Alphabetic}[\p{Alphabetic}\p{N}]*").unwrap();
    static ref NUMBER_RX:     Regex = Regex::new(r"^[0-9]+").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Reserved,
    Identifier,
    Number,
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Reserved   => "reserved",
            TokenKind::Identifier => "identifier",
            TokenKind::Number     => "number",
            TokenKind::EndOfInput => "end of input",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub content: String,
    pub kind:    TokenKind,
    pub line:    i64,
}

impl Token {
    pub fn end_of_input() -> Self {
        Token {
            content: String::new(),
            kind:    TokenKind::EndOfInput,
            line:    EOF_LINE,
        }
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.kind == TokenKind::Reserved && self.content == word
    }
}

/// Line breaks: `\n`, a lone `\r`, VT, FF, the FS/GS/RS separators, NEL and U+2028/U+2029.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn line_end(text: &str) -> usize {
    text.find(is_line_break).unwrap_or(text.len())
}

/// Single forward scan over the schema text.
struct Lexer<'a> {
    text:   &'a str,
    pos:    usize,
    line:   i64,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Lexer {
            text,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let mut chars = rest.char_indices().peekable();
        while let Some((offset, c)) = chars.next() {
            if !c.is_whitespace() && !is_line_break(c) {
                self.pos += offset;
                return;
            }
            // `\r\n` is a single break, counted at the `\n`.
            let crlf = c == '\r' && matches!(chars.peek(), Some((_, '\n')));
            if is_line_break(c) && !crlf {
                self.line += 1;
            }
        }
        self.pos = self.text.len();
    }

    /// Moves to the next line break without consuming it.
    fn skip_line(&mut self) {
        self.pos += line_end(self.rest());
    }

    fn push(&mut self, content: &str, kind: TokenKind) {
        self.tokens.push(Token {
            content: content.to_string(),
            kind,
            line: self.line,
        });
        self.pos += content.len();
    }

    fn run(mut self) -> Result<Vec<Token>, ProtoError> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }

            if let Some(word) = RESERVED_WORDS.iter().find(|w| rest.starts_with(**w)) {
                if *word == COMMENT_MARKER {
                    self.skip_line();
                } else {
                    self.push(word, TokenKind::Reserved);
                }
                continue;
            }

            if let Some(m) = IDENTIFIER_RX.find(rest) {
                self.push(m.as_str(), TokenKind::Identifier);
                continue;
            }

            if let Some(m) = NUMBER_RX.find(rest) {
                self.push(m.as_str(), TokenKind::Number);
                continue;
            }

            let remainder = rest[..line_end(rest)].trim_end();
            return Err(ProtoError::Lex {
                remainder: remainder.to_string(),
                line:      self.line,
            });
        }

        self.tokens.push(Token::end_of_input());
        Ok(self.tokens)
    }
}

/// Splits schema text into classified tokens terminated by an end-of-input token.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, ProtoError> {
    let tokens = Lexer::new(text).run()?;
    tracing::debug!(count = tokens.len(), "tokenized schema");
    Ok(tokens)
}
