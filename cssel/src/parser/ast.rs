//! Selector syntax tree.
//!
//! Every node keeps the exact source text it was built from, so printing a
//! tree gives back the parsed input character for character. Spans are byte
//! offsets into the parsed string, shifted by `ParseOptions::offset`.

use cssel_macro::Spanned;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::tokenizer::Token;

pub type SelectorList = Vec<Selector>;

pub trait Spanned {
    fn start(&self) -> usize;
    fn end(&self) -> usize;
    fn set_start(&mut self, start: usize);
    fn set_end(&mut self, end: usize);

    fn span(&self) -> std::ops::Range<usize> {
        self.start()..self.end()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Selector,
    Type,
    Universal,
    Class,
    Id,
    Attribute,
    PseudoClass,
    PseudoElement,
    Nesting,
    Combinator,
    Comment,
    Invalid,
    Nth,
    NthStep,
    NthDash,
    NthOffset,
    NthOf,
    CompoundSelector,
}

/// One comma-separated entry of a selector list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
#[serde(tag = "type", rename = "selector")]
pub struct Selector {
    pub start: usize,
    pub end: usize,
    /// whitespace trimmed from the start of the selector
    pub before: String,
    /// whitespace trimmed from the end of the selector
    pub after: String,
    pub nodes: Vec<SelectorNode>,
}

impl Selector {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            end: start,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum NamespaceError {
    #[serde(rename = "namespace")]
    #[strum(serialize = "namespace")]
    Namespace,
    #[serde(rename = "target")]
    #[strum(serialize = "target")]
    Target,
    #[serde(rename = "namespace,target")]
    #[strum(serialize = "namespace,target")]
    NamespaceAndTarget,
}

/// `ns/*before*/|/*after*/` prefix of a type or universal selector
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub value: SmolStr,
    #[serde(default)]
    pub before_comments: Vec<Comment>,
    #[serde(default)]
    pub after_comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid: Option<NamespaceError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Type {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Namespace>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Universal {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Namespace>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    /// comments between `.` and the name
    #[serde(default)]
    pub dot_comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<SelectorList>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Id {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<SelectorList>,
}

/// `[..]`, the value is the raw text between the brackets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Attribute {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<SelectorList>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
#[serde(rename_all = "camelCase")]
pub struct PseudoClass {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    /// comments between `:` and the name
    #[serde(default)]
    pub colon_comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<SelectorList>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PseudoElementComments {
    /// comments between the two colons
    pub first: Vec<Comment>,
    /// comments between the second colon and the name
    pub second: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
#[serde(rename_all = "camelCase")]
pub struct PseudoElement {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default)]
    pub colon_comments: PseudoElementComments,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<SelectorList>,
}

/// `&`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Nesting {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<SelectorList>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum CombinatorType {
    #[default]
    #[serde(rename = "space")]
    #[strum(serialize = "space")]
    Space,
    #[serde(rename = "+")]
    #[strum(serialize = "+")]
    NextSibling,
    #[serde(rename = ">")]
    #[strum(serialize = ">")]
    Child,
    #[serde(rename = "~")]
    #[strum(serialize = "~")]
    SubsequentSibling,
}

impl CombinatorType {
    pub fn from_token_value(value: &str) -> Self {
        match value {
            "+" => Self::NextSibling,
            ">" => Self::Child,
            "~" => Self::SubsequentSibling,
            _ => Self::Space,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Combinator {
    pub start: usize,
    pub end: usize,
    pub combinator: CombinatorType,
    pub value: SmolStr,
    pub before: String,
    pub after: String,
    #[serde(default)]
    pub invalid: bool,
}

impl Combinator {
    pub fn from_token(token: &Token) -> Self {
        Self {
            start: token.start,
            end: token.end,
            combinator: CombinatorType::from_token_value(token.value),
            value: token.value.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Comment {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
}

impl Comment {
    pub fn from_token(token: &Token) -> Self {
        Self {
            start: token.start,
            end: token.end,
            value: token.value.into(),
            ..Default::default()
        }
    }

    /// A comment that absorbed surrounding whitespace separates selectors
    /// like a descendant combinator would.
    pub fn is_spacing(&self) -> bool {
        !self.before.is_empty() || !self.after.is_empty()
    }
}

/// Source text that could not be understood, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Invalid {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
}

/// The `An+B [of S]` part of an `:nth-*()` argument
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct Nth {
    pub start: usize,
    pub end: usize,
    pub before: String,
    pub after: String,
    pub nodes: Vec<NthNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct NthPart {
    pub start: usize,
    pub end: usize,
    pub value: SmolStr,
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NthNode {
    NthStep(NthPart),
    NthDash(NthPart),
    NthOffset(NthPart),
    NthOf(NthPart),
    Comment(Comment),
}

impl NthNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            NthNode::NthStep(_) => NodeKind::NthStep,
            NthNode::NthDash(_) => NodeKind::NthDash,
            NthNode::NthOffset(_) => NodeKind::NthOffset,
            NthNode::NthOf(_) => NodeKind::NthOf,
            NthNode::Comment(_) => NodeKind::Comment,
        }
    }

    pub fn part(&self) -> Option<&NthPart> {
        match self {
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => Some(part),
            NthNode::Comment(_) => None,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => &part.value,
            NthNode::Comment(comment) => &comment.value,
        }
    }

    /// whitespace following the node
    pub(crate) fn after_mut(&mut self) -> &mut String {
        match self {
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => &mut part.after,
            NthNode::Comment(comment) => &mut comment.after,
        }
    }
}

impl Spanned for NthNode {
    fn start(&self) -> usize {
        match self {
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => part.start,
            NthNode::Comment(comment) => comment.start,
        }
    }
    fn end(&self) -> usize {
        match self {
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => part.end,
            NthNode::Comment(comment) => comment.end,
        }
    }
    fn set_start(&mut self, start: usize) {
        match self {
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => part.start = start,
            NthNode::Comment(comment) => comment.start = start,
        }
    }
    fn set_end(&mut self, end: usize) {
        match self {
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => part.end = end,
            NthNode::Comment(comment) => comment.end = end,
        }
    }
}

/// Sequence of simple selectors with no combinator between them.
/// Only produced by grouping a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Spanned)]
pub struct CompoundSelector {
    pub start: usize,
    pub end: usize,
    pub nodes: Vec<SelectorNode>,
    /// a type or universal selector that is not the first member
    #[serde(default)]
    pub invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectorNode {
    Type(Type),
    Universal(Universal),
    Class(Class),
    Id(Id),
    Attribute(Attribute),
    PseudoClass(PseudoClass),
    PseudoElement(PseudoElement),
    Nesting(Nesting),
    Combinator(Combinator),
    Comment(Comment),
    Invalid(Invalid),
    Nth(Nth),
    CompoundSelector(CompoundSelector),
}

/// Runs `$body` with `$node` bound to the inner struct of any variant
macro_rules! each_node {
    ($target:expr, $node:ident => $body:expr) => {
        match $target {
            SelectorNode::Type($node) => $body,
            SelectorNode::Universal($node) => $body,
            SelectorNode::Class($node) => $body,
            SelectorNode::Id($node) => $body,
            SelectorNode::Attribute($node) => $body,
            SelectorNode::PseudoClass($node) => $body,
            SelectorNode::PseudoElement($node) => $body,
            SelectorNode::Nesting($node) => $body,
            SelectorNode::Combinator($node) => $body,
            SelectorNode::Comment($node) => $body,
            SelectorNode::Invalid($node) => $body,
            SelectorNode::Nth($node) => $body,
            SelectorNode::CompoundSelector($node) => $body,
        }
    };
}

impl Spanned for SelectorNode {
    fn start(&self) -> usize {
        each_node!(self, node => node.start)
    }
    fn end(&self) -> usize {
        each_node!(self, node => node.end)
    }
    fn set_start(&mut self, start: usize) {
        each_node!(self, node => node.start = start)
    }
    fn set_end(&mut self, end: usize) {
        each_node!(self, node => node.end = end)
    }
}

impl SelectorNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            SelectorNode::Type(_) => NodeKind::Type,
            SelectorNode::Universal(_) => NodeKind::Universal,
            SelectorNode::Class(_) => NodeKind::Class,
            SelectorNode::Id(_) => NodeKind::Id,
            SelectorNode::Attribute(_) => NodeKind::Attribute,
            SelectorNode::PseudoClass(_) => NodeKind::PseudoClass,
            SelectorNode::PseudoElement(_) => NodeKind::PseudoElement,
            SelectorNode::Nesting(_) => NodeKind::Nesting,
            SelectorNode::Combinator(_) => NodeKind::Combinator,
            SelectorNode::Comment(_) => NodeKind::Comment,
            SelectorNode::Invalid(_) => NodeKind::Invalid,
            SelectorNode::Nth(_) => NodeKind::Nth,
            SelectorNode::CompoundSelector(_) => NodeKind::CompoundSelector,
        }
    }

    /// Simple selectors are the members of a compound selector.
    pub fn is_simple_selector(&self) -> bool {
        matches!(
            self,
            SelectorNode::Type(_)
                | SelectorNode::Universal(_)
                | SelectorNode::Class(_)
                | SelectorNode::Id(_)
                | SelectorNode::Attribute(_)
                | SelectorNode::PseudoClass(_)
                | SelectorNode::PseudoElement(_)
                | SelectorNode::Nesting(_)
        )
    }

    /// Name text of the node, empty for structural nodes.
    pub fn value(&self) -> &str {
        match self {
            SelectorNode::Type(node) => &node.value,
            SelectorNode::Universal(node) => &node.value,
            SelectorNode::Class(node) => &node.value,
            SelectorNode::Id(node) => &node.value,
            SelectorNode::Attribute(node) => &node.value,
            SelectorNode::PseudoClass(node) => &node.value,
            SelectorNode::PseudoElement(node) => &node.value,
            SelectorNode::Nesting(node) => &node.value,
            SelectorNode::Combinator(node) => &node.value,
            SelectorNode::Comment(node) => &node.value,
            SelectorNode::Invalid(node) => &node.value,
            SelectorNode::Nth(_) | SelectorNode::CompoundSelector(_) => "",
        }
    }

    /// Nested selector list, for the kinds that may own one.
    pub fn nested(&self) -> Option<&SelectorList> {
        match self {
            SelectorNode::Class(node) => node.nodes.as_ref(),
            SelectorNode::Id(node) => node.nodes.as_ref(),
            SelectorNode::Attribute(node) => node.nodes.as_ref(),
            SelectorNode::PseudoClass(node) => node.nodes.as_ref(),
            SelectorNode::PseudoElement(node) => node.nodes.as_ref(),
            SelectorNode::Nesting(node) => node.nodes.as_ref(),
            _ => None,
        }
    }

    pub fn nested_mut(&mut self) -> Option<&mut SelectorList> {
        self.nested_slot_mut().and_then(Option::as_mut)
    }

    /// `None` for kinds that can never own a nested selector list.
    pub(crate) fn nested_slot_mut(&mut self) -> Option<&mut Option<SelectorList>> {
        match self {
            SelectorNode::Class(node) => Some(&mut node.nodes),
            SelectorNode::Id(node) => Some(&mut node.nodes),
            SelectorNode::Attribute(node) => Some(&mut node.nodes),
            SelectorNode::PseudoClass(node) => Some(&mut node.nodes),
            SelectorNode::PseudoElement(node) => Some(&mut node.nodes),
            SelectorNode::Nesting(node) => Some(&mut node.nodes),
            _ => None,
        }
    }
}

/// Borrowed view over any node of a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Selector(&'a Selector),
    Node(&'a SelectorNode),
    Nth(&'a NthNode),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Selector(_) => NodeKind::Selector,
            NodeRef::Node(node) => node.kind(),
            NodeRef::Nth(node) => node.kind(),
        }
    }

    pub fn start(&self) -> usize {
        match self {
            NodeRef::Selector(selector) => selector.start,
            NodeRef::Node(node) => node.start(),
            NodeRef::Nth(node) => node.start(),
        }
    }

    pub fn end(&self) -> usize {
        match self {
            NodeRef::Selector(selector) => selector.end,
            NodeRef::Node(node) => node.end(),
            NodeRef::Nth(node) => node.end(),
        }
    }

    pub fn value(&self) -> &'a str {
        match *self {
            NodeRef::Selector(_) => "",
            NodeRef::Node(node) => node.value(),
            NodeRef::Nth(node) => node.value(),
        }
    }

    pub fn children(&self) -> Siblings<'a> {
        match *self {
            NodeRef::Selector(selector) => Siblings::Nodes(&selector.nodes),
            NodeRef::Node(SelectorNode::Nth(nth)) => Siblings::Nth(&nth.nodes),
            NodeRef::Node(SelectorNode::CompoundSelector(compound)) => {
                Siblings::Nodes(&compound.nodes)
            }
            NodeRef::Node(node) => match node.nested() {
                Some(list) => Siblings::Selectors(list),
                None => Siblings::Nodes(&[]),
            },
            NodeRef::Nth(_) => Siblings::Nth(&[]),
        }
    }
}

impl<'a> From<&'a Selector> for NodeRef<'a> {
    fn from(selector: &'a Selector) -> Self {
        NodeRef::Selector(selector)
    }
}

impl<'a> From<&'a SelectorNode> for NodeRef<'a> {
    fn from(node: &'a SelectorNode) -> Self {
        NodeRef::Node(node)
    }
}

impl<'a> From<&'a NthNode> for NodeRef<'a> {
    fn from(node: &'a NthNode) -> Self {
        NodeRef::Nth(node)
    }
}

/// The list a visited node lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Siblings<'a> {
    Selectors(&'a [Selector]),
    Nodes(&'a [SelectorNode]),
    Nth(&'a [NthNode]),
    /// a lone root node that is not part of any list
    Single(NodeRef<'a>),
}

impl<'a> Siblings<'a> {
    pub fn len(&self) -> usize {
        match self {
            Siblings::Selectors(list) => list.len(),
            Siblings::Nodes(list) => list.len(),
            Siblings::Nth(list) => list.len(),
            Siblings::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<NodeRef<'a>> {
        match *self {
            Siblings::Selectors(list) => list.get(index).map(NodeRef::Selector),
            Siblings::Nodes(list) => list.get(index).map(NodeRef::Node),
            Siblings::Nth(list) => list.get(index).map(NodeRef::Nth),
            Siblings::Single(node) => (index == 0).then_some(node),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let siblings = *self;
        (0..siblings.len()).filter_map(move |index| siblings.get(index))
    }
}
