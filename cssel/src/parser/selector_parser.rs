use tracing::{trace, warn};

use super::ast::*;
use super::nth_parser::NthParser;
use super::token_cursor::TokenCursor;
use crate::config::ParseOptions;
use crate::tokenizer::{tokenize_selector, Token, TokenKind};

/// Parenthesized blocks nested deeper than this are kept as a single
/// invalid node instead of being parsed.
pub const MAX_NESTING_DEPTH: usize = 128;

const NTH_PSEUDO_CLASSES: &[&str] = &[
    "nth-child",
    "nth-last-child",
    "nth-of-type",
    "nth-last-of-type",
    "nth-col",
    "nth-last-col",
];

fn is_nth_pseudo_class(name: &str) -> bool {
    NTH_PSEUDO_CLASSES
        .iter()
        .any(|nth| nth.eq_ignore_ascii_case(name))
}

pub fn parse_selector(source: &str) -> SelectorList {
    parse_selector_with(source, &ParseOptions::default())
}

/// Parses a comma separated selector list. Never fails: text that can not
/// be understood ends up in `invalid` nodes.
#[tracing::instrument(skip_all, fields(len = source.len(), offset = options.offset))]
pub fn parse_selector_with(source: &str, options: &ParseOptions) -> SelectorList {
    let tokens = tokenize_selector(source, options.offset);
    let mut cursor = TokenCursor::new(tokens, options.offset);
    let mut builder = SelectorBuilder {
        offset: options.offset,
        depth: 0,
    };
    let mut selectors = cursor.run(
        |token, selectors, source, cursor| builder.handle_token(token, selectors, source, cursor),
        SelectorList::new(),
        source,
    );
    if let Some(last) = selectors.last_mut() {
        last.end = options.offset + source.len();
        trim_combinators(last);
    }
    trace!(selectors = selectors.len(), "parsed selector list");
    return selectors;
}

struct SelectorBuilder {
    offset: usize,
    /// count of enclosing `(`
    depth: usize,
}

impl SelectorBuilder {
    fn invalid(&self, source: &str, start: usize, end: usize) -> SelectorNode {
        let value = source
            .get(start - self.offset..end - self.offset)
            .unwrap_or_default();
        SelectorNode::Invalid(Invalid {
            start,
            end,
            value: value.into(),
        })
    }

    fn handle_token<'s>(
        &mut self,
        token: Token<'s>,
        selectors: &mut SelectorList,
        source: &'s str,
        cursor: &mut TokenCursor<'s>,
    ) -> bool {
        if selectors.is_empty() {
            selectors.push(Selector::new(token.start));
        }
        if token.kind == TokenKind::Comma {
            if let Some(selector) = selectors.last_mut() {
                selector.end = token.start;
                trim_combinators(selector);
            }
            selectors.push(Selector::new(token.end));
            return true;
        }
        let Some(selector) = selectors.last_mut() else {
            return true;
        };

        use TokenKind::*;
        match token.kind {
            Dot => handle_class(token, selector, cursor),
            Colon => handle_pseudo(token, selector, cursor),
            Hash => {
                let name = cursor.take(Text);
                selector.nodes.push(SelectorNode::Id(Id {
                    start: token.start,
                    end: name.map_or(token.end, |name| name.end),
                    value: name.map(|name| name.value.into()).unwrap_or_default(),
                    nodes: None,
                }));
            }
            Text => selector.nodes.push(SelectorNode::Type(Type {
                start: token.start,
                end: token.end,
                value: token.value.into(),
                namespace: None,
            })),
            Star => selector.nodes.push(SelectorNode::Universal(Universal {
                start: token.start,
                end: token.end,
                value: token.value.into(),
                namespace: None,
            })),
            Ampersand => selector.nodes.push(SelectorNode::Nesting(Nesting {
                start: token.start,
                end: token.end,
                value: token.value.into(),
                nodes: None,
            })),
            Pipe => handle_namespace(token, selector, cursor),
            OpenBracket => {
                let block = cursor.flat_block(OpenBracket, CloseBracket, |t| {
                    matches!(t.kind, CloseParen | Comma)
                });
                match block.closer {
                    Some(closer) => selector.nodes.push(SelectorNode::Attribute(Attribute {
                        start: token.start,
                        end: closer.end,
                        value: source
                            .get(token.end - self.offset..closer.start - self.offset)
                            .unwrap_or_default()
                            .into(),
                        nodes: None,
                    })),
                    None => {
                        let end = block.tokens.last().map_or(token.end, |t| t.end);
                        trace!(start = token.start, end, "unclosed attribute");
                        selector.nodes.push(self.invalid(source, token.start, end));
                    }
                }
            }
            OpenParen => self.handle_parens(token, selector, source, cursor),
            Space | Plus | GreaterThan | Tilde => handle_combinator(token, selector, cursor),
            MultiComment => selector
                .nodes
                .push(SelectorNode::Comment(Comment::from_token(&token))),
            _ => {
                trace!(kind = ?token.kind, start = token.start, "unexpected token");
                selector
                    .nodes
                    .push(self.invalid(source, token.start, token.end));
            }
        }
        true
    }

    /// `(` after a functional selector parses into its nested list,
    /// anything else keeps the whole block as an invalid node.
    fn handle_parens<'s>(
        &mut self,
        token: Token<'s>,
        selector: &mut Selector,
        source: &'s str,
        cursor: &mut TokenCursor<'s>,
    ) {
        if self.depth >= MAX_NESTING_DEPTH {
            let block = cursor.flat_block(TokenKind::OpenParen, TokenKind::CloseParen, |_| false);
            let end = block
                .closer
                .or(block.tokens.last().copied())
                .map_or(token.end, |t| t.end);
            warn!(depth = self.depth, start = token.start, end, "selector nested too deep");
            selector.nodes.push(self.invalid(source, token.start, end));
            return;
        }

        let is_nth = matches!(
            selector.nodes.last(),
            Some(SelectorNode::PseudoClass(pseudo)) if is_nth_pseudo_class(&pseudo.value)
        ) && cursor.peek(1).kind != TokenKind::CloseParen;

        let mut nested = SelectorList::new();
        if is_nth {
            let nth = NthParser::new(token.end).parse(source, cursor);
            if !nth.nodes.is_empty() || !nth.before.is_empty() {
                let mut first = Selector::new(token.end);
                first.end = nth.end;
                first.nodes.push(SelectorNode::Nth(nth));
                nested.push(first);
            }
        }

        self.depth += 1;
        let mut closer = None;
        let mut nested = cursor.run(
            |t, list: &mut SelectorList, source, cursor| {
                if t.kind == TokenKind::CloseParen {
                    closer = Some(t);
                    return false;
                }
                self.handle_token(t, list, source, cursor)
            },
            nested,
            source,
        );
        self.depth -= 1;

        let stop = closer.map_or(cursor.peek_back().end, |closer| closer.start);
        if let Some(last) = nested.last_mut() {
            last.end = stop;
            trim_combinators(last);
        }

        if let (Some(closer), Some(prev)) = (closer, selector.nodes.last_mut()) {
            if let Some(slot) = prev.nested_slot_mut() {
                if slot.is_none() {
                    *slot = Some(nested);
                    prev.set_end(closer.end);
                    return;
                }
            }
        }
        let end = closer.map_or(stop, |closer| closer.end);
        trace!(start = token.start, end, "parenthesis without functional selector");
        selector.nodes.push(self.invalid(source, token.start, end));
    }
}

fn take_comments(cursor: &mut TokenCursor) -> Vec<Comment> {
    cursor
        .take_many(TokenKind::MultiComment)
        .iter()
        .map(Comment::from_token)
        .collect()
}

fn handle_class(token: Token, selector: &mut Selector, cursor: &mut TokenCursor) {
    let dot_comments = take_comments(cursor);
    let name = cursor.take(TokenKind::Text);
    let end = name
        .map(|name| name.end)
        .or(dot_comments.last().map(|comment| comment.end))
        .unwrap_or(token.end);
    selector.nodes.push(SelectorNode::Class(Class {
        start: token.start,
        end,
        value: name.map(|name| name.value.into()).unwrap_or_default(),
        dot_comments,
        nodes: None,
    }));
}

fn handle_pseudo(token: Token, selector: &mut Selector, cursor: &mut TokenCursor) {
    let first = take_comments(cursor);
    if let Some(second_colon) = cursor.take(TokenKind::Colon) {
        let second = take_comments(cursor);
        let name = cursor.take(TokenKind::Text);
        let end = name
            .map(|name| name.end)
            .or(second.last().map(|comment| comment.end))
            .unwrap_or(second_colon.end);
        selector
            .nodes
            .push(SelectorNode::PseudoElement(PseudoElement {
                start: token.start,
                end,
                value: name.map(|name| name.value.into()).unwrap_or_default(),
                colon_comments: PseudoElementComments { first, second },
                nodes: None,
            }));
        return;
    }
    let name = cursor.take(TokenKind::Text);
    let end = name
        .map(|name| name.end)
        .or(first.last().map(|comment| comment.end))
        .unwrap_or(token.end);
    selector.nodes.push(SelectorNode::PseudoClass(PseudoClass {
        start: token.start,
        end,
        value: name.map(|name| name.value.into()).unwrap_or_default(),
        colon_comments: first,
        nodes: None,
    }));
}

/// `ns|name`, `*|*`, `|name`: the prefix is the type or universal selector
/// right before the `|`, only non-spacing comments may sit in between.
fn handle_namespace(token: Token, selector: &mut Selector, cursor: &mut TokenCursor) {
    let mut prefix_end = selector.nodes.len();
    while prefix_end > 0
        && matches!(&selector.nodes[prefix_end - 1], SelectorNode::Comment(comment) if !comment.is_spacing())
    {
        prefix_end -= 1;
    }
    let has_prefix = prefix_end > 0
        && matches!(
            &selector.nodes[prefix_end - 1],
            SelectorNode::Type(Type { namespace: None, .. })
                | SelectorNode::Universal(Universal { namespace: None, .. })
        );

    let after_comments = take_comments(cursor);
    let target = cursor
        .take(TokenKind::Text)
        .or_else(|| cursor.take(TokenKind::Star));

    let (value, before_comments, start) = if has_prefix {
        let before_comments: Vec<Comment> = selector
            .nodes
            .drain(prefix_end..)
            .filter_map(|node| match node {
                SelectorNode::Comment(comment) => Some(comment),
                _ => None,
            })
            .collect();
        match selector.nodes.pop() {
            Some(prefix) => (prefix.value().into(), before_comments, prefix.start()),
            None => (Default::default(), before_comments, token.start),
        }
    } else {
        (Default::default(), Vec::new(), token.start)
    };

    let invalid = match (has_prefix, target.is_some()) {
        (true, true) => None,
        (false, true) => Some(NamespaceError::Namespace),
        (true, false) => Some(NamespaceError::Target),
        (false, false) => Some(NamespaceError::NamespaceAndTarget),
    };
    if let Some(invalid) = &invalid {
        trace!(start, %invalid, "invalid namespace");
    }
    let end = target
        .map(|target| target.end)
        .or(after_comments.last().map(|comment| comment.end))
        .unwrap_or(token.end);
    let namespace = Some(Namespace {
        value,
        before_comments,
        after_comments,
        invalid,
    });

    let node = match target {
        Some(target) if target.kind == TokenKind::Star => SelectorNode::Universal(Universal {
            start,
            end,
            value: target.value.into(),
            namespace,
        }),
        target => SelectorNode::Type(Type {
            start,
            end,
            value: target.map(|target| target.value.into()).unwrap_or_default(),
            namespace,
        }),
    };
    selector.nodes.push(node);
}

fn append_space(node: &mut SelectorNode, space: &Token) {
    match node {
        SelectorNode::Combinator(combinator) => combinator.after.push_str(space.value),
        SelectorNode::Comment(comment) => comment.after.push_str(space.value),
        _ => return,
    }
    node.set_end(space.end);
}

/// Consumes a run of whitespace, comments and combinator tokens.
/// Whitespace around a `>`, `+` or `~` is merged into that combinator,
/// a second combinator in the same run is kept but marked invalid.
fn handle_combinator(token: Token, selector: &mut Selector, cursor: &mut TokenCursor) {
    let mut combinator_at = selector.nodes.len();
    selector
        .nodes
        .push(SelectorNode::Combinator(Combinator::from_token(&token)));
    let mut comment_since = false;
    loop {
        let next = cursor.next();
        match next.kind {
            TokenKind::Space => {
                if let Some(last) = selector.nodes.last_mut() {
                    append_space(last, &next);
                }
            }
            TokenKind::MultiComment => {
                selector
                    .nodes
                    .push(SelectorNode::Comment(Comment::from_token(&next)));
                comment_since = true;
            }
            TokenKind::Plus | TokenKind::GreaterThan | TokenKind::Tilde => {
                let tentative_space = matches!(
                    selector.nodes.get(combinator_at),
                    Some(SelectorNode::Combinator(current)) if current.combinator == CombinatorType::Space
                );
                if tentative_space && !comment_since {
                    if let Some(SelectorNode::Combinator(current)) =
                        selector.nodes.get_mut(combinator_at)
                    {
                        current.before = format!("{}{}{}", current.before, current.value, current.after);
                        current.value = next.value.into();
                        current.after.clear();
                        current.combinator = CombinatorType::from_token_value(next.value);
                        current.end = next.end;
                    }
                    continue;
                }
                if tentative_space {
                    fold_space_into_comment(selector, combinator_at);
                }
                let mut combinator = Combinator::from_token(&next);
                combinator.invalid = !tentative_space;
                if combinator.invalid {
                    trace!(start = next.start, "combinator after combinator");
                }
                combinator_at = selector.nodes.len();
                selector.nodes.push(SelectorNode::Combinator(combinator));
                comment_since = false;
            }
            _ => {
                cursor.back();
                break;
            }
        }
    }
}

/// A space combinator followed by a comment and then a real combinator
/// is not a combinator: its whitespace moves to the comment, or to the
/// selector when it was the first node.
fn fold_space_into_comment(selector: &mut Selector, at: usize) {
    let Some(SelectorNode::Combinator(space)) = selector.nodes.get(at) else {
        return;
    };
    let text = format!("{}{}{}", space.before, space.value, space.after);
    let space_start = space.start;
    selector.nodes.remove(at);
    if at == 0 {
        selector.before.push_str(&text);
        return;
    }
    if let Some(SelectorNode::Comment(comment)) = selector.nodes.get_mut(at) {
        comment.before.insert_str(0, &text);
        comment.start = space_start;
    }
}

fn is_space_combinator(node: &SelectorNode) -> bool {
    matches!(node, SelectorNode::Combinator(combinator) if combinator.combinator == CombinatorType::Space)
}

fn combinator_text(node: &SelectorNode) -> String {
    match node {
        SelectorNode::Combinator(c) => format!("{}{}{}", c.before, c.value, c.after),
        _ => String::new(),
    }
}

/// Space combinators at either edge of a selector are not combinators.
/// Their whitespace moves into the selector's `before`/`after`, or into the
/// neighbouring comment when a comment sits between them and the edge.
pub(crate) fn trim_combinators(selector: &mut Selector) {
    let mut index = 0;
    let mut edge_comment: Option<usize> = None;
    while index < selector.nodes.len() {
        let node = &selector.nodes[index];
        if is_space_combinator(node) {
            let text = combinator_text(node);
            let end = node.end();
            selector.nodes.remove(index);
            match edge_comment.and_then(|at| selector.nodes.get_mut(at)) {
                Some(SelectorNode::Comment(comment)) => {
                    comment.after.push_str(&text);
                    comment.end = end;
                }
                _ => selector.before.push_str(&text),
            }
        } else if matches!(node, SelectorNode::Comment(_)) {
            edge_comment = Some(index);
            index += 1;
        } else {
            break;
        }
    }

    let mut index = selector.nodes.len();
    let mut edge_comment: Option<usize> = None;
    while index > 0 {
        let node = &selector.nodes[index - 1];
        if is_space_combinator(node) {
            let text = combinator_text(node);
            let start = node.start();
            selector.nodes.remove(index - 1);
            index -= 1;
            // the removal shifted the comment one to the left
            let comment_at = edge_comment.map(|at| at - 1);
            edge_comment = comment_at;
            match comment_at.and_then(|at| selector.nodes.get_mut(at)) {
                Some(SelectorNode::Comment(comment)) => {
                    comment.before.insert_str(0, &text);
                    comment.start = start;
                }
                _ => selector.after.insert_str(0, &text),
            }
        } else if matches!(node, SelectorNode::Comment(_)) {
            edge_comment = Some(index - 1);
            index -= 1;
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod test_selector_parser {
    use super::*;
    use crate::services::diagnostics::{collect_diagnostics, SelectorDiagnostic};
    use crate::services::stringify::stringify;
    use cssel_macro::{assert_parse_error, assert_parse_node};

    fn assert_node(text: &str, kinds: &[NodeKind]) -> SelectorList {
        let list = parse_selector(text);
        assert_eq!(list.len(), 1, "expected a single selector in `{text}`");
        let received: Vec<NodeKind> = list[0].nodes.iter().map(SelectorNode::kind).collect();
        assert_eq!(received, kinds, "unexpected node kinds for `{text}`");
        assert_eq!(stringify(&list), text, "stringified tree differs from input");
        let diagnostics = collect_diagnostics(&list);
        assert!(
            diagnostics.is_empty(),
            "selector has diagnostics: {}",
            diagnostics
                .iter()
                .map(|d| d.to_string())
                .fold("".to_owned(), |acc, nex| acc + "\n" + &nex)
        );
        return list;
    }

    fn assert_error(text: &str, is_expected: impl Fn(&SelectorDiagnostic) -> bool, expected: &str) {
        let list = parse_selector(text);
        assert_eq!(stringify(&list), text, "stringified tree differs from input");
        let diagnostics = collect_diagnostics(&list);
        assert!(
            !diagnostics.is_empty(),
            "selector has NO diagnostics, when they were expected"
        );
        assert!(
            is_expected(&diagnostics[0]),
            "expected {expected} but got {:?} for `{text}`",
            diagnostics[0]
        );
    }

    #[test]
    fn simple_selectors() {
        assert_parse_node!("div", type);
        assert_parse_node!("*", universal);
        assert_parse_node!(".a", class);
        assert_parse_node!("#a", id);
        assert_parse_node!("[a]", attribute);
        assert_parse_node!(":hover", pseudo_class);
        assert_parse_node!("::before", pseudo_element);
        assert_parse_node!("&", nesting);
        assert_parse_node!("/*c*/", comment);
        assert_parse_node!("div.a#b[c]:d::e", type, class, id, attribute, pseudo_class, pseudo_element);
        assert_parse_node!("&.a", nesting, class);
    }

    #[test]
    fn class_with_comments() {
        let list = assert_parse_node!("./*x*/a", class);
        let SelectorNode::Class(class) = &list[0].nodes[0] else {
            panic!("expected class");
        };
        assert_eq!(class.value, "a");
        assert_eq!(class.dot_comments.len(), 1);
        assert_eq!(class.dot_comments[0].value, "/*x*/");
        assert_eq!((class.start, class.end), (0, 7));
    }

    #[test]
    fn pseudo_element_with_comments() {
        let list = assert_parse_node!(":/*1*/:/*2*/after", pseudo_element);
        let SelectorNode::PseudoElement(pseudo) = &list[0].nodes[0] else {
            panic!("expected pseudo element");
        };
        assert_eq!(pseudo.value, "after");
        assert_eq!(pseudo.colon_comments.first[0].value, "/*1*/");
        assert_eq!(pseudo.colon_comments.second[0].value, "/*2*/");
    }

    #[test]
    fn attribute_value_is_raw() {
        let list = assert_parse_node!("[data-x = 'a b' i]", attribute);
        assert_eq!(list[0].nodes[0].value(), "data-x = 'a b' i");
        assert_eq!(list[0].nodes[0].end(), 18);
    }

    #[test]
    fn combinators() {
        assert_parse_node!("a b", type, combinator, type);
        assert_parse_node!("a>b", type, combinator, type);
        assert_parse_node!("a > b", type, combinator, type);
        assert_parse_node!("a ~ b", type, combinator, type);
        assert_parse_node!("a + b", type, combinator, type);
        let list = assert_parse_node!("a  >  b", type, combinator, type);
        let SelectorNode::Combinator(combinator) = &list[0].nodes[1] else {
            panic!("expected combinator");
        };
        assert_eq!(combinator.combinator, CombinatorType::Child);
        assert_eq!(combinator.before, "  ");
        assert_eq!(combinator.value, ">");
        assert_eq!(combinator.after, "  ");
        assert_eq!((combinator.start, combinator.end), (1, 6));
    }

    #[test]
    fn combinators_with_comments() {
        let list = assert_parse_node!("a /*c*/ b", type, combinator, comment, type);
        let SelectorNode::Comment(comment) = &list[0].nodes[2] else {
            panic!("expected comment");
        };
        assert_eq!(comment.after, " ");

        let list = assert_parse_node!("a /*c*/> b", type, comment, combinator, type);
        let SelectorNode::Comment(comment) = &list[0].nodes[1] else {
            panic!("expected comment");
        };
        assert_eq!(comment.before, " ");
        assert_eq!(comment.start, 1);
        assert_parse_node!("a/*c*/b", type, comment, type);
    }

    #[test]
    fn invalid_combinators() {
        assert_parse_error!("a > + b", invalid_combinator);
        assert_parse_error!("a >/**/~ b", invalid_combinator);
        let list = parse_selector("a>>b");
        let SelectorNode::Combinator(combinator) = &list[0].nodes[2] else {
            panic!("expected combinator");
        };
        assert!(combinator.invalid);
    }

    #[test]
    fn selector_whitespace_is_trimmed() {
        let list = assert_parse_node!("  a  ", type);
        assert_eq!(list[0].before, "  ");
        assert_eq!(list[0].after, "  ");
        assert_eq!((list[0].start, list[0].end), (0, 5));

        let list = assert_parse_node!(" /*x*/ a /*y*/ ", comment, type, comment);
        assert_eq!(list[0].before, " ");
        // whitespace after a comment stays with the comment
        assert_eq!(list[0].after, "");
        let SelectorNode::Comment(x) = &list[0].nodes[0] else {
            panic!("expected comment");
        };
        assert_eq!(x.after, " ");
        let SelectorNode::Comment(y) = &list[0].nodes[2] else {
            panic!("expected comment");
        };
        assert_eq!(y.before, " ");
        assert_eq!(y.after, " ");
        assert_eq!(y.start, 8);
    }

    #[test]
    fn selector_list() {
        let list = parse_selector("a, .b ,c");
        assert_eq!(list.len(), 3);
        assert_eq!((list[0].start, list[0].end), (0, 1));
        assert_eq!((list[1].start, list[1].end), (2, 6));
        assert_eq!(list[1].before, " ");
        assert_eq!(list[1].after, " ");
        assert_eq!((list[2].start, list[2].end), (7, 8));
        assert_eq!(stringify(&list), "a, .b ,c");

        let list = parse_selector("a,,");
        assert_eq!(list.len(), 3);
        assert!(list[1].nodes.is_empty());
        assert_eq!((list[2].start, list[2].end), (3, 3));
        assert!(parse_selector("").is_empty());
    }

    #[test]
    fn namespaces() {
        let list = assert_parse_node!("ns|*", universal);
        let SelectorNode::Universal(universal) = &list[0].nodes[0] else {
            panic!("expected universal");
        };
        let namespace = universal.namespace.as_ref().unwrap();
        assert_eq!(namespace.value, "ns");
        assert_eq!(namespace.invalid, None);
        assert_eq!((universal.start, universal.end), (0, 4));

        let list = assert_parse_node!("*/*a*/|/*b*/div", type);
        let SelectorNode::Type(ty) = &list[0].nodes[0] else {
            panic!("expected type");
        };
        let namespace = ty.namespace.as_ref().unwrap();
        assert_eq!(namespace.value, "*");
        assert_eq!(namespace.before_comments[0].value, "/*a*/");
        assert_eq!(namespace.after_comments[0].value, "/*b*/");
        assert_eq!(ty.value, "div");
    }

    #[test]
    fn invalid_namespaces() {
        assert_parse_error!("|a", invalid_namespace);
        assert_parse_error!("a|", invalid_namespace);
        assert_parse_error!("|", invalid_namespace);
        assert_parse_error!(".x|a", invalid_namespace);

        let list = parse_selector("a|");
        let SelectorNode::Type(ty) = &list[0].nodes[0] else {
            panic!("expected type");
        };
        assert_eq!(ty.value, "");
        assert_eq!(
            ty.namespace.as_ref().and_then(|ns| ns.invalid.clone()),
            Some(NamespaceError::Target)
        );
        let list = parse_selector("|");
        let SelectorNode::Type(ty) = &list[0].nodes[0] else {
            panic!("expected type");
        };
        assert_eq!(
            ty.namespace.as_ref().and_then(|ns| ns.invalid.clone()),
            Some(NamespaceError::NamespaceAndTarget)
        );
    }

    #[test]
    fn nested_selectors() {
        let list = assert_parse_node!(":is(.a, #b)", pseudo_class);
        let nested = list[0].nodes[0].nested().unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].nodes[0].kind(), NodeKind::Class);
        assert_eq!((nested[0].start, nested[0].end), (4, 6));
        assert_eq!(nested[1].before, " ");
        assert_eq!((nested[1].start, nested[1].end), (7, 10));
        assert_eq!(list[0].nodes[0].end(), 11);

        assert_parse_node!(":not()", pseudo_class);
        assert_parse_node!("::slotted(span)", pseudo_element);
        assert_parse_node!(".mixin(a)", class);
        assert_parse_node!(":has(> img)", pseudo_class);
        assert_parse_node!(":is(:not(.a), :where(b c))", pseudo_class);
    }

    #[test]
    fn nested_list_keeps_leading_combinator() {
        let list = parse_selector(":has( > img)");
        let nested = list[0].nodes[0].nested().unwrap();
        assert_eq!(nested[0].nodes[0].kind(), NodeKind::Combinator);
        assert_eq!(nested[0].nodes[0].value(), ">");
        assert_eq!(stringify(&list), ":has( > img)");
    }

    #[test]
    fn invalid_parenthesis() {
        assert_parse_error!("a(b)", invalid_node);
        assert_parse_error!(":is(a)(b)", invalid_node);
        assert_parse_error!(":is(a", invalid_node);
        assert_parse_error!("a)", invalid_node);

        let list = parse_selector(":is(a");
        assert_eq!(list[0].nodes.len(), 2);
        assert_eq!(list[0].nodes[1].value(), "(a");
    }

    #[test]
    fn nth_selectors() {
        let list = assert_parse_node!(":nth-child(2n + 1)", pseudo_class);
        let nested = list[0].nodes[0].nested().unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].nodes.len(), 1);
        let SelectorNode::Nth(nth) = &nested[0].nodes[0] else {
            panic!("expected nth");
        };
        let kinds: Vec<NodeKind> = nth.nodes.iter().map(NthNode::kind).collect();
        assert_eq!(kinds, vec![NodeKind::NthStep, NodeKind::NthDash, NodeKind::NthOffset]);

        let list = assert_parse_node!(":nth-last-of-type(5n-4 of .a, #b)", pseudo_class);
        let nested = list[0].nodes[0].nested().unwrap();
        assert_eq!(nested.len(), 2);
        let kinds: Vec<NodeKind> = nested[0].nodes.iter().map(SelectorNode::kind).collect();
        assert_eq!(kinds, vec![NodeKind::Nth, NodeKind::Class]);

        assert_parse_node!(":nth-child(odd)", pseudo_class);
        assert_parse_node!(":NTH-CHILD( even )", pseudo_class);
        assert_parse_node!(":nth-child()", pseudo_class);
    }

    #[test]
    fn nth_only_for_nth_pseudo_classes() {
        let list = parse_selector(":is(2n)");
        let nested = list[0].nodes[0].nested().unwrap();
        assert_eq!(nested[0].nodes[0].kind(), NodeKind::Type);
    }

    #[test]
    fn invalid_nth() {
        assert_parse_error!(":nth-child(xn)", invalid_nth);
        assert_parse_error!(":nth-child(2n - -1)", invalid_nth);
        assert_parse_error!(":nth-child(-odd)", invalid_nth);
        assert_parse_error!(":nth-child(1 if a)", invalid_nth);
    }

    #[test]
    fn unclosed_and_stray_tokens() {
        assert_parse_error!("a/*bad", invalid_node);
        assert_parse_error!("[a", invalid_node);
        assert_parse_error!("a{}", invalid_node);
        assert_parse_error!("a 'str'", invalid_node);

        let list = parse_selector("a/*bad");
        assert_eq!(list[0].nodes.len(), 2);
        let SelectorNode::Invalid(invalid) = &list[0].nodes[1] else {
            panic!("expected invalid");
        };
        assert_eq!(invalid.value, "/*bad");
        assert_eq!((invalid.start, invalid.end), (1, 6));
    }

    #[test]
    fn unclosed_attribute_resyncs() {
        let list = parse_selector(":is([a), b");
        assert_eq!(list.len(), 2);
        let nested = list[0].nodes[0].nested().unwrap();
        assert_eq!(nested[0].nodes[0].kind(), NodeKind::Invalid);
        assert_eq!(nested[0].nodes[0].value(), "[a");
        assert_eq!(stringify(&list), ":is([a), b");

        let list = parse_selector("[a, b");
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].nodes[0].value(), "b");
    }

    #[test]
    fn offset_shifts_spans() {
        let list = parse_selector_with(".a > b", &ParseOptions { offset: 10 });
        assert_eq!((list[0].start, list[0].end), (10, 16));
        assert_eq!(list[0].nodes[0].span(), 10..12);
        assert_eq!(list[0].nodes[2].span(), 15..16);
        let list = parse_selector_with("[a", &ParseOptions { offset: 3 });
        assert_eq!(list[0].nodes[0].value(), "[a");
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let depth = MAX_NESTING_DEPTH + 5;
        let source = format!("{}a{}", ":is(".repeat(depth), ")".repeat(depth));
        let list = parse_selector(&source);
        assert_eq!(stringify(&list), source);
        let mut level = 0;
        let mut selector = &list[0];
        while let Some(nested) = selector.nodes[0].nested() {
            level += 1;
            selector = &nested[0];
        }
        assert_eq!(level, MAX_NESTING_DEPTH);
        assert_eq!(selector.nodes[1].kind(), NodeKind::Invalid);
    }
}
