/// Adapted from the rust compiler lexer
/// rust-lang/rust/compiler/rustc-lexer/src/cursor.rs
use std::str::Chars;

use super::TokenKind;

/// Peekable iterator over a char sequence.
///
/// Next characters can be peeked via `first` method,
/// and position can be shifted forward via `bump` method.
pub struct Cursor<'a> {
    len_remaining: usize,
    /// Iterator over chars. Slightly faster than a &str.
    chars: Chars<'a>,
}

pub(crate) const EOF_CHAR: char = '\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken {
    pub kind: TokenKind,
    /// byte length
    pub len: u32,
}

impl RawToken {
    fn new(kind: TokenKind, len: u32) -> Self {
        Self { kind, len }
    }
}

pub(crate) fn is_white_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

pub(crate) fn delimiter_kind(c: char) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match c {
        '.' => Dot,
        ':' => Colon,
        '#' => Hash,
        '*' => Star,
        '|' => Pipe,
        '(' => OpenParen,
        ')' => CloseParen,
        '[' => OpenBracket,
        ']' => CloseBracket,
        ',' => Comma,
        '>' => GreaterThan,
        '~' => Tilde,
        '+' => Plus,
        '{' => OpenCurly,
        '}' => CloseCurly,
        '&' => Ampersand,
        _ => return None,
    };
    return Some(kind);
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            len_remaining: input.len(),
            chars: input.chars(),
        }
    }

    /// Peeks the next symbol from the input stream without consuming it.
    /// If requested position doesn't exist, `EOF_CHAR` is returned.
    /// However, getting `EOF_CHAR` doesn't always mean actual end of file,
    /// it should be checked with `is_eof` method.
    pub(crate) fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().unwrap_or(EOF_CHAR)
    }

    /// Checks if there is nothing more to consume.
    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// Returns amount of already consumed bytes.
    pub(crate) fn pos_within_token(&self) -> u32 {
        (self.len_remaining - self.chars.as_str().len()) as u32
    }

    /// Resets the number of bytes consumed to 0.
    pub(crate) fn reset_pos_within_token(&mut self) {
        self.len_remaining = self.chars.as_str().len();
    }

    /// Moves to the next character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Eats symbols while predicate returns true or until the end of file is reached.
    pub(crate) fn bump_while_first(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while predicate(self.first()) && !self.is_eof() {
            self.bump();
        }
    }

    /// Parses a token from the input string.
    pub fn consume_token(&mut self) -> RawToken {
        use TokenKind::*;
        if self.is_eof() {
            return RawToken::new(Eof, 0);
        }
        let token_kind = match self.first() {
            '/' if self.second() == '*' => {
                self.bump();
                self.bump();
                self.consume_comment()
            }
            c if is_white_space(c) => {
                self.bump_while_first(is_white_space);
                Space
            }
            quote @ ('"' | '\'') => {
                self.bump();
                self.consume_string(quote)
            }
            c => match delimiter_kind(c) {
                Some(kind) => {
                    self.bump();
                    kind
                }
                None => self.consume_text(),
            },
        };
        let res = RawToken::new(token_kind, self.pos_within_token());
        self.reset_pos_within_token();
        return res;
    }

    // PRECONDITION: `/*` already consumed
    fn consume_comment(&mut self) -> TokenKind {
        loop {
            match self.bump() {
                None => return TokenKind::UnclosedComment,
                Some('*') if self.first() == '/' => {
                    self.bump();
                    return TokenKind::MultiComment;
                }
                Some(_) => {}
            }
        }
    }

    // PRECONDITION: opening quote already consumed
    fn consume_string(&mut self, ending: char) -> TokenKind {
        loop {
            match self.bump() {
                None => return TokenKind::UnclosedString,
                Some('\\') => {
                    self.bump();
                }
                Some(c) if c == ending => return TokenKind::String,
                Some(_) => {}
            }
        }
    }

    fn consume_text(&mut self) -> TokenKind {
        while !self.is_eof() {
            let c = self.first();
            if c == '\\' {
                // escaped char is part of the text, whatever it is
                self.bump();
                self.bump();
                continue;
            }
            if is_white_space(c)
                || c == '"'
                || c == '\''
                || delimiter_kind(c).is_some()
                || (c == '/' && self.second() == '*')
            {
                break;
            }
            self.bump();
        }
        return TokenKind::Text;
    }
}
