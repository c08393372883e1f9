use crate::config::WalkOptions;
use crate::parser::ast::{NodeRef, NthNode, Selector, SelectorList, SelectorNode, Siblings};

/// What the walker does after a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkControl {
    /// descend into the node's children
    #[default]
    Continue,
    /// `Skip(0)` skips the children of the visited node, `Skip(n)` also
    /// abandons the rest of the current list and `n - 1` enclosing lists
    Skip(usize),
    /// stop the whole walk
    StopAll,
}

impl WalkControl {
    pub const SKIP_NESTED: Self = Self::Skip(0);
    pub const SKIP_CURRENT_SELECTOR: Self = Self::Skip(1);
}

impl From<()> for WalkControl {
    fn from(_: ()) -> Self {
        WalkControl::Continue
    }
}

/// Where a walk starts: a whole list, or one node.
#[derive(Debug, Clone, Copy)]
pub struct WalkRoot<'a>(pub Siblings<'a>);

impl<'a> From<&'a SelectorList> for WalkRoot<'a> {
    fn from(list: &'a SelectorList) -> Self {
        WalkRoot(Siblings::Selectors(list))
    }
}

impl<'a> From<&'a [Selector]> for WalkRoot<'a> {
    fn from(list: &'a [Selector]) -> Self {
        WalkRoot(Siblings::Selectors(list))
    }
}

impl<'a> From<&'a [SelectorNode]> for WalkRoot<'a> {
    fn from(nodes: &'a [SelectorNode]) -> Self {
        WalkRoot(Siblings::Nodes(nodes))
    }
}

impl<'a> From<&'a Selector> for WalkRoot<'a> {
    fn from(selector: &'a Selector) -> Self {
        WalkRoot(Siblings::Single(NodeRef::Selector(selector)))
    }
}

impl<'a> From<&'a SelectorNode> for WalkRoot<'a> {
    fn from(node: &'a SelectorNode) -> Self {
        WalkRoot(Siblings::Single(NodeRef::Node(node)))
    }
}

impl<'a> From<&'a NthNode> for WalkRoot<'a> {
    fn from(node: &'a NthNode) -> Self {
        WalkRoot(Siblings::Single(NodeRef::Nth(node)))
    }
}

impl<'a> From<NodeRef<'a>> for WalkRoot<'a> {
    fn from(node: NodeRef<'a>) -> Self {
        WalkRoot(Siblings::Single(node))
    }
}

struct Frame<'a> {
    siblings: Siblings<'a>,
    next: usize,
}

/// Depth-first pre-order walk. The visitor gets the node, its index within
/// its siblings, the siblings and the chain of ancestors (outermost first).
///
/// Nodes filtered out by `options` are not visited but still descended into.
pub fn walk<'a, R: Into<WalkControl>>(
    root: impl Into<WalkRoot<'a>>,
    mut visit: impl FnMut(NodeRef<'a>, usize, Siblings<'a>, &[NodeRef<'a>]) -> R,
    options: &WalkOptions,
) {
    let WalkRoot(root) = root.into();
    // frame `i` lists the children of `parents[i - 1]`
    let mut stack = vec![Frame {
        siblings: root,
        next: 0,
    }];
    let mut parents: Vec<NodeRef<'a>> = Vec::new();

    while let Some(frame) = stack.last_mut() {
        let index = frame.next;
        let siblings = frame.siblings;
        let Some(node) = siblings.get(index) else {
            stack.pop();
            parents.pop();
            continue;
        };
        frame.next += 1;

        let control = if options.should_visit(node.kind()) {
            visit(node, index, siblings, &parents).into()
        } else {
            WalkControl::Continue
        };

        match control {
            WalkControl::StopAll => return,
            WalkControl::Skip(0) => {}
            WalkControl::Skip(levels) => {
                for _ in 0..levels {
                    if stack.pop().is_none() {
                        break;
                    }
                    parents.pop();
                }
            }
            WalkControl::Continue => {
                let children = node.children();
                if !children.is_empty() {
                    parents.push(node);
                    stack.push(Frame {
                        siblings: children,
                        next: 0,
                    });
                }
            }
        }
    }
}
