use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::ast::{Comment, Nth, NthNode, NthPart, Spanned};
use super::token_cursor::TokenCursor;
use crate::tokenizer::{Token, TokenKind};

static ODD_EVEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?i:odd|even)$").expect("valid odd/even regex"));
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("valid integer regex"));
static SIGNED_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]\d+$").expect("valid signed integer regex"));
static STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d*[nN]$").expect("valid step regex"));

/// What the next text chunk of an `An+B of S` expression is expected to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NthState {
    Step,
    Dash,
    Offset,
    Of,
    /// the expression is complete, only whitespace and comments are absorbed
    Selector,
}

/// A text token, possibly glued to the `+` before it
struct Chunk {
    value: String,
    start: usize,
    end: usize,
}

/// Consumes the `An+B [of]` prefix of an `:nth-*()` argument.
/// Stops at the first token that can not continue the expression and
/// leaves it for the selector parser.
pub(crate) struct NthParser {
    nth: Nth,
    state: NthState,
    /// a lone `+`/`-` was seen, the offset after it must be unsigned
    standalone_dash: bool,
}

impl NthParser {
    pub fn new(start: usize) -> Self {
        Self {
            nth: Nth {
                start,
                end: start,
                ..Default::default()
            },
            state: NthState::Step,
            standalone_dash: false,
        }
    }

    pub fn parse<'s>(self, source: &'s str, cursor: &mut TokenCursor<'s>) -> Nth {
        let parser = cursor.run(
            |token, parser: &mut NthParser, _, cursor| parser.handle_token(token, cursor),
            self,
            source,
        );
        trace!(nodes = parser.nth.nodes.len(), state = ?parser.state, "parsed nth expression");
        return parser.nth;
    }

    fn handle_token(&mut self, token: Token, cursor: &mut TokenCursor) -> bool {
        match token.kind {
            TokenKind::Space => self.push_space(&token),
            TokenKind::MultiComment => self.push(NthNode::Comment(Comment::from_token(&token))),
            TokenKind::Text | TokenKind::Plus if self.state != NthState::Selector => {
                let chunk = Self::chunk(token, cursor);
                match self.state {
                    NthState::Step => self.step(chunk),
                    NthState::Dash => self.dash(chunk),
                    NthState::Offset => self.offset(chunk),
                    NthState::Of | NthState::Selector => self.of(chunk),
                }
            }
            _ => {
                cursor.back();
                return false;
            }
        }
        true
    }

    fn chunk(token: Token, cursor: &mut TokenCursor) -> Chunk {
        if token.kind == TokenKind::Plus {
            if let Some(text) = cursor.take(TokenKind::Text) {
                return Chunk {
                    value: format!("+{}", text.value),
                    start: token.start,
                    end: text.end,
                };
            }
        }
        Chunk {
            value: token.value.to_owned(),
            start: token.start,
            end: token.end,
        }
    }

    fn push(&mut self, node: NthNode) {
        self.nth.end = node.end();
        self.nth.nodes.push(node);
    }

    fn push_space(&mut self, space: &Token) {
        match self.nth.nodes.last_mut() {
            Some(last) => {
                last.after_mut().push_str(space.value);
                last.set_end(space.end);
            }
            None => self.nth.before.push_str(space.value),
        }
        self.nth.end = space.end;
    }

    fn part(value: &str, start: usize, end: usize, invalid: bool) -> NthPart {
        NthPart {
            start,
            end,
            value: value.into(),
            invalid,
            ..Default::default()
        }
    }

    fn step(&mut self, chunk: Chunk) {
        let value = chunk.value.as_str();
        if ODD_EVEN.is_match(value) {
            let signed = value.starts_with(['+', '-']);
            self.push(NthNode::NthStep(Self::part(value, chunk.start, chunk.end, signed)));
            self.state = NthState::Of;
            return;
        }
        if INTEGER.is_match(value) {
            self.push(NthNode::NthOffset(Self::part(value, chunk.start, chunk.end, false)));
            self.state = NthState::Of;
            return;
        }
        if let Some(n_at) = value.find(['n', 'N']) {
            let (step, rest) = value.split_at(n_at + 1);
            let split = chunk.start + step.len();
            if STEP.is_match(step) {
                if rest.is_empty() {
                    self.push(NthNode::NthStep(Self::part(step, chunk.start, split, false)));
                    self.state = NthState::Dash;
                    return;
                }
                if rest == "-" {
                    self.push(NthNode::NthStep(Self::part(step, chunk.start, split, false)));
                    self.push(NthNode::NthDash(Self::part(rest, split, chunk.end, false)));
                    self.standalone_dash = true;
                    self.state = NthState::Offset;
                    return;
                }
                if SIGNED_INTEGER.is_match(rest) {
                    self.push(NthNode::NthStep(Self::part(step, chunk.start, split, false)));
                    self.push(NthNode::NthOffset(Self::part(rest, split, chunk.end, false)));
                    self.state = NthState::Of;
                    return;
                }
            }
        }
        trace!(value, "invalid nth step");
        self.push(NthNode::NthStep(Self::part(value, chunk.start, chunk.end, true)));
        self.state = NthState::Dash;
    }

    fn dash(&mut self, chunk: Chunk) {
        if chunk.value == "+" || chunk.value == "-" {
            self.push(NthNode::NthDash(Self::part(&chunk.value, chunk.start, chunk.end, false)));
            self.standalone_dash = true;
            self.state = NthState::Offset;
            return;
        }
        self.offset(chunk);
    }

    fn offset(&mut self, chunk: Chunk) {
        if chunk.value == "of" {
            return self.of(chunk);
        }
        let signed = chunk.value.starts_with(['+', '-']);
        let invalid = !INTEGER.is_match(&chunk.value) || (self.standalone_dash && signed);
        self.push(NthNode::NthOffset(Self::part(&chunk.value, chunk.start, chunk.end, invalid)));
        self.state = NthState::Of;
    }

    fn of(&mut self, chunk: Chunk) {
        let invalid = chunk.value != "of";
        self.push(NthNode::NthOf(Self::part(&chunk.value, chunk.start, chunk.end, invalid)));
        self.state = NthState::Selector;
    }
}
