/// A selector tokenizer. Unlike a full css-syntax tokenizer it only knows
/// the handful of delimiters selectors are built from:
/// - everything else (identifiers, numbers, attribute operators, escapes) is lumped into `Text`
/// - comments and whitespace are kept as tokens, nothing is ever dropped
/// - concatenating all token values gives back the input

mod cursor;
mod test;

use cursor::Cursor;

pub(crate) use cursor::is_white_space;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Any run of chars that is not whitespace, a delimiter, a quote or a comment start.
    /// A backslash escapes the char following it into the run.
    Text,

    /// A run of whitespace chars
    Space,

    /// A quoted string including both quotes
    String,

    /// A quoted string that hit the end of input before its closing quote
    UnclosedString,

    /// `/* .. */`
    MultiComment,

    /// A comment that hit the end of input before `*/`
    UnclosedComment,

    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `#`
    Hash,
    /// `*`
    Star,
    /// `|`
    Pipe,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `,`
    Comma,
    /// `>`
    GreaterThan,
    /// `~`
    Tilde,
    /// `+`
    Plus,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,
    /// `&`
    Ampersand,

    /// End of input
    Eof,
}

impl TokenKind {
    pub fn is_combinator(&self) -> bool {
        matches!(
            self,
            TokenKind::Space | TokenKind::Plus | TokenKind::GreaterThan | TokenKind::Tilde
        )
    }
}

/// Token with its source text and absolute byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub value: &'s str,
    pub start: usize,
    pub end: usize,
}

impl<'s> Token<'s> {
    pub fn eof(at: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            value: "",
            start: at,
            end: at,
        }
    }
}

/// Splits `input` into tokens, every offset shifted by `offset`.
/// The returned tokens cover the input without gaps.
pub fn tokenize_selector(input: &str, offset: usize) -> Vec<Token<'_>> {
    let mut cursor = Cursor::new(input);
    let mut tokens = Vec::new();
    let mut start = 0;
    loop {
        let raw = cursor.consume_token();
        if raw.kind == TokenKind::Eof {
            break;
        }
        let end = start + raw.len as usize;
        tokens.push(Token {
            kind: raw.kind,
            value: &input[start..end],
            start: start + offset,
            end: end + offset,
        });
        start = end;
    }
    tracing::trace!(count = tokens.len(), "tokenized selector");
    return tokens;
}
