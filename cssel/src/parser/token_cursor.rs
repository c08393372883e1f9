use crate::tokenizer::{Token, TokenKind};

/// Forward/backward cursor over a token arena.
///
/// Reading past the end yields an `Eof` token and still advances, so a
/// `back()` after reading `Eof` always restores the previous position.
pub struct TokenCursor<'s> {
    tokens: Vec<Token<'s>>,
    /// count of advances, the current token is `tokens[index - 1]`
    index: usize,
    eof_at: usize,
}

/// Tokens of a bracketed block, without its opening and closing tokens.
#[derive(Debug)]
pub struct FlatBlock<'s> {
    pub tokens: Vec<Token<'s>>,
    /// `None` when the block ran into the end of input or was cut short
    /// at a premature end marker
    pub closer: Option<Token<'s>>,
}

impl<'s> TokenCursor<'s> {
    /// `eof_at` is the offset reported by the `Eof` token.
    pub fn new(tokens: Vec<Token<'s>>, eof_at: usize) -> Self {
        let eof_at = tokens.last().map_or(eof_at, |token| token.end);
        Self {
            tokens,
            index: 0,
            eof_at,
        }
    }

    fn at(&self, index: usize) -> Token<'s> {
        self.tokens
            .get(index)
            .copied()
            .unwrap_or(Token::eof(self.eof_at))
    }

    /// Advances and returns the new current token.
    pub fn next(&mut self) -> Token<'s> {
        self.index += 1;
        return self.at(self.index - 1);
    }

    /// Steps back one token.
    pub fn back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// `peek(1)` is the token `next()` would return, `peek(0)` the current one.
    pub fn peek(&self, n: usize) -> Token<'s> {
        match (self.index + n).checked_sub(1) {
            Some(index) => self.at(index),
            None => Token::eof(self.tokens.first().map_or(self.eof_at, |t| t.start)),
        }
    }

    /// The most recently consumed token.
    pub fn peek_back(&self) -> Token<'s> {
        return self.peek(0);
    }

    /// Consumes the next token if it has the given kind.
    pub fn take(&mut self, kind: TokenKind) -> Option<Token<'s>> {
        if self.peek(1).kind == kind {
            return Some(self.next());
        }
        None
    }

    /// Consumes a run of tokens of the given kind, returning how many.
    pub fn eat(&mut self, kind: TokenKind) -> usize {
        let mut count = 0;
        while self.take(kind).is_some() {
            count += 1;
        }
        count
    }

    /// Consumes and returns a run of tokens of the given kind.
    pub fn take_many(&mut self, kind: TokenKind) -> Vec<Token<'s>> {
        let mut taken = Vec::new();
        while let Some(token) = self.take(kind) {
            taken.push(token);
        }
        taken
    }

    /// Consumes a balanced `start`..`end` block, the opening token already
    /// consumed. When the block never closes but an interior token satisfied
    /// `is_premature_end`, the cursor is rewound so that token is next.
    pub fn flat_block(
        &mut self,
        start: TokenKind,
        end: TokenKind,
        is_premature_end: impl Fn(&Token) -> bool,
    ) -> FlatBlock<'s> {
        let block_start = self.index;
        let mut level = 1;
        let mut premature = None;
        let mut tokens = Vec::new();
        loop {
            let token = self.next();
            if token.kind == TokenKind::Eof {
                self.back();
                break;
            }
            if token.kind == start {
                level += 1;
            } else if token.kind == end {
                level -= 1;
                if level == 0 {
                    return FlatBlock {
                        tokens,
                        closer: Some(token),
                    };
                }
            } else if premature.is_none() && is_premature_end(&token) {
                premature = Some(tokens.len());
            }
            tokens.push(token);
        }
        if let Some(at) = premature {
            self.index = block_start + at;
            tokens.truncate(at);
        }
        FlatBlock {
            tokens,
            closer: None,
        }
    }

    pub fn done(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Feeds tokens to `handler` until it returns `false` or input runs out.
    /// The token the handler declined stays consumed.
    pub fn run<A>(
        &mut self,
        mut handler: impl FnMut(Token<'s>, &mut A, &'s str, &mut Self) -> bool,
        mut acc: A,
        source: &'s str,
    ) -> A {
        loop {
            let token = self.next();
            if token.kind == TokenKind::Eof {
                self.back();
                break;
            }
            if !handler(token, &mut acc, source, self) {
                break;
            }
        }
        acc
    }
}
