use std::fmt::{self, Display, Write};

use itertools::Itertools;

use super::walk::WalkRoot;
use crate::parser::ast::*;

/// Prints a tree back to source text. For any parsed input the output
/// is identical to the input.
pub fn stringify<'a>(root: impl Into<WalkRoot<'a>>) -> String {
    let WalkRoot(siblings) = root.into();
    let mut out = String::new();
    // writing into a String can not fail
    let _ = write_siblings(&mut out, siblings);
    out
}

fn write_siblings(f: &mut impl Write, siblings: Siblings) -> fmt::Result {
    match siblings {
        Siblings::Selectors(list) => write!(f, "{}", list.iter().format(",")),
        Siblings::Nodes(nodes) => nodes.iter().try_for_each(|node| write!(f, "{node}")),
        Siblings::Nth(nodes) => nodes.iter().try_for_each(|node| write!(f, "{node}")),
        Siblings::Single(NodeRef::Selector(selector)) => write!(f, "{selector}"),
        Siblings::Single(NodeRef::Node(node)) => write!(f, "{node}"),
        Siblings::Single(NodeRef::Nth(node)) => write!(f, "{node}"),
    }
}

fn write_comments(f: &mut fmt::Formatter<'_>, comments: &[Comment]) -> fmt::Result {
    comments.iter().try_for_each(|comment| write!(f, "{comment}"))
}

fn write_nested(f: &mut fmt::Formatter<'_>, nodes: &Option<SelectorList>) -> fmt::Result {
    match nodes {
        Some(list) => write!(f, "({})", list.iter().format(",")),
        None => Ok(()),
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.before)?;
        self.nodes.iter().try_for_each(|node| write!(f, "{node}"))?;
        f.write_str(&self.after)
    }
}

impl Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.before, self.value, self.after)
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)?;
        write_comments(f, &self.before_comments)?;
        f.write_char('|')?;
        write_comments(f, &self.after_comments)
    }
}

impl Display for NthNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NthNode::Comment(comment) => write!(f, "{comment}"),
            NthNode::NthStep(part)
            | NthNode::NthDash(part)
            | NthNode::NthOffset(part)
            | NthNode::NthOf(part) => write!(f, "{}{}{}", part.before, part.value, part.after),
        }
    }
}

impl Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorNode::Type(Type {
                value, namespace, ..
            })
            | SelectorNode::Universal(Universal {
                value, namespace, ..
            }) => {
                if let Some(namespace) = namespace {
                    write!(f, "{namespace}")?;
                }
                f.write_str(value)
            }
            SelectorNode::Class(class) => {
                f.write_char('.')?;
                write_comments(f, &class.dot_comments)?;
                f.write_str(&class.value)?;
                write_nested(f, &class.nodes)
            }
            SelectorNode::Id(id) => {
                write!(f, "#{}", id.value)?;
                write_nested(f, &id.nodes)
            }
            SelectorNode::Attribute(attribute) => {
                write!(f, "[{}]", attribute.value)?;
                write_nested(f, &attribute.nodes)
            }
            SelectorNode::PseudoClass(pseudo) => {
                f.write_char(':')?;
                write_comments(f, &pseudo.colon_comments)?;
                f.write_str(&pseudo.value)?;
                write_nested(f, &pseudo.nodes)
            }
            SelectorNode::PseudoElement(pseudo) => {
                f.write_char(':')?;
                write_comments(f, &pseudo.colon_comments.first)?;
                f.write_char(':')?;
                write_comments(f, &pseudo.colon_comments.second)?;
                f.write_str(&pseudo.value)?;
                write_nested(f, &pseudo.nodes)
            }
            SelectorNode::Nesting(nesting) => {
                f.write_str(&nesting.value)?;
                write_nested(f, &nesting.nodes)
            }
            SelectorNode::Combinator(combinator) => write!(
                f,
                "{}{}{}",
                combinator.before, combinator.value, combinator.after
            ),
            SelectorNode::Comment(comment) => write!(f, "{comment}"),
            SelectorNode::Invalid(invalid) => f.write_str(&invalid.value),
            SelectorNode::Nth(nth) => {
                f.write_str(&nth.before)?;
                nth.nodes.iter().try_for_each(|node| write!(f, "{node}"))?;
                f.write_str(&nth.after)
            }
            SelectorNode::CompoundSelector(compound) => compound
                .nodes
                .iter()
                .try_for_each(|node| write!(f, "{node}")),
        }
    }
}
