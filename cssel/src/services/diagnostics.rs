use itertools::Itertools;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use super::walk::{walk, WalkControl, WalkRoot};
use crate::config::WalkOptions;
use crate::parser::ast::{NamespaceError, NodeKind, NodeRef, SelectorNode, Spanned, Type, Universal};

/// Problems found in a parsed tree. The tree itself always keeps the
/// offending text, these only point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SelectorDiagnostic {
    #[error("unexpected `{value}` in selector")]
    #[diagnostic(code(cssel::invalid_node))]
    InvalidNode {
        value: String,
        #[label("not part of any selector")]
        span: SourceSpan,
    },
    #[error("combinator `{value}` follows another combinator")]
    #[diagnostic(code(cssel::invalid_combinator))]
    InvalidCombinator {
        value: String,
        #[label("extra combinator")]
        span: SourceSpan,
    },
    #[error("invalid namespace, missing {missing}")]
    #[diagnostic(
        code(cssel::invalid_namespace),
        help("use `ns|name`, `*|name` or `ns|*`")
    )]
    InvalidNamespace {
        missing: NamespaceError,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("invalid {kind} `{value}` in nth expression")]
    #[diagnostic(code(cssel::invalid_nth), help("expected `An+B [of S]`, `odd` or `even`"))]
    InvalidNth {
        kind: NodeKind,
        value: String,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("type or universal selector must come first in a compound selector")]
    #[diagnostic(code(cssel::invalid_compound))]
    InvalidCompound {
        #[label("in this compound selector")]
        span: SourceSpan,
    },
}

impl SelectorDiagnostic {
    pub fn span(&self) -> SourceSpan {
        match self {
            SelectorDiagnostic::InvalidNode { span, .. }
            | SelectorDiagnostic::InvalidCombinator { span, .. }
            | SelectorDiagnostic::InvalidNamespace { span, .. }
            | SelectorDiagnostic::InvalidNth { span, .. }
            | SelectorDiagnostic::InvalidCompound { span } => *span,
        }
    }

    pub fn offset(&self) -> usize {
        self.span().offset()
    }
}

fn span_of(node: &impl Spanned) -> SourceSpan {
    (node.start()..node.end()).into()
}

/// Collects every problem marked in the tree, ordered by source offset.
#[tracing::instrument(skip_all)]
pub fn collect_diagnostics<'a>(root: impl Into<WalkRoot<'a>>) -> Vec<SelectorDiagnostic> {
    let mut diagnostics = Vec::new();
    walk(
        root,
        |node, _, _, _| {
            match node {
                NodeRef::Node(SelectorNode::Invalid(invalid)) => {
                    diagnostics.push(SelectorDiagnostic::InvalidNode {
                        value: invalid.value.to_string(),
                        span: span_of(invalid),
                    })
                }
                NodeRef::Node(SelectorNode::Combinator(combinator)) if combinator.invalid => {
                    diagnostics.push(SelectorDiagnostic::InvalidCombinator {
                        value: combinator.value.to_string(),
                        span: span_of(combinator),
                    })
                }
                NodeRef::Node(SelectorNode::Type(Type {
                    namespace: Some(namespace),
                    start,
                    end,
                    ..
                }))
                | NodeRef::Node(SelectorNode::Universal(Universal {
                    namespace: Some(namespace),
                    start,
                    end,
                    ..
                })) => {
                    if let Some(missing) = &namespace.invalid {
                        diagnostics.push(SelectorDiagnostic::InvalidNamespace {
                            missing: missing.clone(),
                            span: (*start..*end).into(),
                        })
                    }
                }
                NodeRef::Node(SelectorNode::CompoundSelector(compound)) if compound.invalid => {
                    diagnostics.push(SelectorDiagnostic::InvalidCompound {
                        span: span_of(compound),
                    })
                }
                NodeRef::Nth(nth) => {
                    if let Some(part) = nth.part().filter(|part| part.invalid) {
                        diagnostics.push(SelectorDiagnostic::InvalidNth {
                            kind: nth.kind(),
                            value: part.value.to_string(),
                            span: span_of(part),
                        })
                    }
                }
                _ => {}
            }
            WalkControl::Continue
        },
        &WalkOptions::default(),
    );
    tracing::debug!(count = diagnostics.len(), "collected selector diagnostics");
    return diagnostics
        .into_iter()
        .sorted_by_key(SelectorDiagnostic::offset)
        .collect();
}
