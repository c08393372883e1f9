use tracing::trace;

use crate::config::CompoundOptions;
use crate::parser::ast::{CompoundSelector, Selector, SelectorList, SelectorNode, Spanned};

/// Trees that can be regrouped into compound selectors and flattened back.
pub trait CompoundTransform: Clone {
    /// Wraps each run of adjacent simple selectors into a `CompoundSelector`.
    fn group_in_place(&mut self, options: &CompoundOptions);
    /// Replaces every `CompoundSelector` by its members.
    fn split_in_place(&mut self);
}

/// Returns a grouped copy, `tree` is left as is.
#[tracing::instrument(skip_all)]
pub fn group_compound_selectors<T: CompoundTransform>(tree: &T, options: &CompoundOptions) -> T {
    let mut grouped = tree.clone();
    grouped.group_in_place(options);
    grouped
}

pub fn group_compound_selectors_in_place<T: CompoundTransform>(tree: &mut T, options: &CompoundOptions) {
    tree.group_in_place(options);
}

/// Returns a flat copy, `tree` is left as is.
#[tracing::instrument(skip_all)]
pub fn split_compound_selectors<T: CompoundTransform>(tree: &T) -> T {
    let mut split = tree.clone();
    split.split_in_place();
    split
}

pub fn split_compound_selectors_in_place<T: CompoundTransform>(tree: &mut T) {
    tree.split_in_place();
}

impl CompoundTransform for SelectorList {
    fn group_in_place(&mut self, options: &CompoundOptions) {
        self.iter_mut()
            .for_each(|selector| selector.group_in_place(options));
    }

    fn split_in_place(&mut self) {
        self.iter_mut().for_each(Selector::split_in_place);
    }
}

impl CompoundTransform for SelectorNode {
    /// Groups inside nested lists and inside the members of a compound.
    fn group_in_place(&mut self, options: &CompoundOptions) {
        match self {
            SelectorNode::CompoundSelector(compound) => compound
                .nodes
                .iter_mut()
                .for_each(|node| node.group_in_place(options)),
            node => {
                if let Some(nested) = node.nested_mut() {
                    nested.group_in_place(options);
                }
            }
        }
    }

    /// Splits inside nested lists; a compound node itself keeps its shape
    /// since a single node has nowhere to spill its members.
    fn split_in_place(&mut self) {
        match self {
            SelectorNode::CompoundSelector(compound) => compound
                .nodes
                .iter_mut()
                .for_each(SelectorNode::split_in_place),
            node => {
                if let Some(nested) = node.nested_mut() {
                    nested.split_in_place();
                }
            }
        }
    }
}

fn close_compound(open: &mut Option<CompoundSelector>, grouped: &mut Vec<SelectorNode>) {
    let Some(mut compound) = open.take() else {
        return;
    };
    compound.invalid = compound.nodes.iter().skip(1).any(|node| {
        matches!(node, SelectorNode::Type(_) | SelectorNode::Universal(_))
    });
    if compound.invalid {
        trace!(start = compound.start, "type selector inside compound selector");
    }
    grouped.push(SelectorNode::CompoundSelector(compound));
}

fn open_compound(node: SelectorNode) -> CompoundSelector {
    CompoundSelector {
        start: node.start(),
        end: node.end(),
        nodes: vec![node],
        invalid: false,
    }
}

impl CompoundTransform for Selector {
    fn group_in_place(&mut self, options: &CompoundOptions) {
        let nodes = std::mem::take(&mut self.nodes);
        let mut grouped = Vec::with_capacity(nodes.len());
        let mut open: Option<CompoundSelector> = None;
        for mut node in nodes {
            node.group_in_place(options);
            if node.is_simple_selector() {
                let breaks =
                    options.split_pseudo_elements && matches!(node, SelectorNode::PseudoElement(_));
                match open.as_mut() {
                    Some(compound) if !breaks => {
                        compound.end = node.end();
                        compound.nodes.push(node);
                    }
                    _ => {
                        close_compound(&mut open, &mut grouped);
                        open = Some(open_compound(node));
                    }
                }
                continue;
            }
            // a comment glued to a compound stays inside it
            let glued = matches!(&node, SelectorNode::Comment(comment) if !comment.is_spacing());
            match open.as_mut() {
                Some(compound) if glued => {
                    compound.end = node.end();
                    compound.nodes.push(node);
                }
                _ => {
                    close_compound(&mut open, &mut grouped);
                    grouped.push(node);
                }
            }
        }
        close_compound(&mut open, &mut grouped);
        self.nodes = grouped;
    }

    fn split_in_place(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = nodes
            .into_iter()
            .flat_map(|node| match node {
                SelectorNode::CompoundSelector(compound) => compound.nodes,
                node => vec![node],
            })
            .map(|mut node| {
                node.split_in_place();
                node
            })
            .collect();
    }
}

#[cfg(test)]
mod test_compound {
    use super::*;
    use crate::parser::ast::NodeKind;
    use crate::parser::parse_selector;
    use crate::services::stringify::stringify;

    fn kinds(selector: &Selector) -> Vec<NodeKind> {
        selector.nodes.iter().map(SelectorNode::kind).collect()
    }

    fn compound_kinds(node: &SelectorNode) -> Vec<NodeKind> {
        match node {
            SelectorNode::CompoundSelector(compound) => {
                compound.nodes.iter().map(SelectorNode::kind).collect()
            }
            _ => panic!("expected compound selector, got {:?}", node.kind()),
        }
    }

    #[test]
    fn groups_simple_selectors() {
        let list = parse_selector("div.a#b > .c:hover");
        let grouped = group_compound_selectors(&list, &CompoundOptions::default());
        assert_eq!(
            kinds(&grouped[0]),
            vec![NodeKind::CompoundSelector, NodeKind::Combinator, NodeKind::CompoundSelector]
        );
        assert_eq!(
            compound_kinds(&grouped[0].nodes[0]),
            vec![NodeKind::Type, NodeKind::Class, NodeKind::Id]
        );
        assert_eq!(grouped[0].nodes[0].span(), 0..7);
        assert_eq!(grouped[0].nodes[2].span(), 10..18);
        assert_eq!(stringify(&grouped), "div.a#b > .c:hover");
        // the source tree is untouched
        assert_eq!(kinds(&list[0]).len(), 6);
    }

    #[test]
    fn pseudo_elements_break_by_default() {
        let list = parse_selector("a::before:hover");
        let grouped = group_compound_selectors(&list, &CompoundOptions::default());
        assert_eq!(
            kinds(&grouped[0]),
            vec![NodeKind::CompoundSelector, NodeKind::CompoundSelector]
        );
        assert_eq!(
            compound_kinds(&grouped[0].nodes[1]),
            vec![NodeKind::PseudoElement, NodeKind::PseudoClass]
        );

        let options = CompoundOptions {
            split_pseudo_elements: false,
        };
        let grouped = group_compound_selectors(&list, &options);
        assert_eq!(kinds(&grouped[0]), vec![NodeKind::CompoundSelector]);
    }

    #[test]
    fn comments() {
        let list = parse_selector(".a/*x*/.b /*y*/ .c");
        let grouped = group_compound_selectors(&list, &CompoundOptions::default());
        assert_eq!(
            kinds(&grouped[0]),
            vec![
                NodeKind::CompoundSelector,
                NodeKind::Combinator,
                NodeKind::Comment,
                NodeKind::CompoundSelector
            ]
        );
        assert_eq!(
            compound_kinds(&grouped[0].nodes[0]),
            vec![NodeKind::Class, NodeKind::Comment, NodeKind::Class]
        );

        // no compound open yet
        let list = parse_selector("/*x*/.a");
        let grouped = group_compound_selectors(&list, &CompoundOptions::default());
        assert_eq!(
            kinds(&grouped[0]),
            vec![NodeKind::Comment, NodeKind::CompoundSelector]
        );
    }

    #[test]
    fn invalid_compound() {
        let list = parse_selector(".a div, *.b, .c*");
        let grouped = group_compound_selectors(&list, &CompoundOptions::default());
        let invalid: Vec<bool> = grouped
            .iter()
            .flat_map(|selector| &selector.nodes)
            .filter_map(|node| match node {
                SelectorNode::CompoundSelector(compound) => Some(compound.invalid),
                _ => None,
            })
            .collect();
        assert_eq!(invalid, vec![false, false, false, true]);
    }

    #[test]
    fn groups_nested_lists() {
        let list = parse_selector(":is(.a.b, c d).e");
        let grouped = group_compound_selectors(&list, &CompoundOptions::default());
        let SelectorNode::CompoundSelector(outer) = &grouped[0].nodes[0] else {
            panic!("expected compound selector");
        };
        let nested = outer.nodes[0].nested().unwrap();
        assert_eq!(kinds(&nested[0]), vec![NodeKind::CompoundSelector]);
        assert_eq!(
            kinds(&nested[1]),
            vec![NodeKind::CompoundSelector, NodeKind::Combinator, NodeKind::CompoundSelector]
        );
    }

    #[test]
    fn split_restores_flat_tree() {
        let list = parse_selector(":is(.a.b, c d).e::before, f");
        let grouped = group_compound_selectors(&list, &CompoundOptions::default());
        assert_ne!(grouped, list);
        let split = split_compound_selectors(&grouped);
        assert_eq!(split, list);
        assert_eq!(stringify(&split), stringify(&list));
    }

    #[test]
    fn in_place_variants() {
        let mut list = parse_selector("a.b c");
        group_compound_selectors_in_place(&mut list, &CompoundOptions::default());
        assert_eq!(list[0].nodes.len(), 3);
        group_compound_selectors_in_place(&mut list, &CompoundOptions::default());
        assert_eq!(list[0].nodes.len(), 3);
        split_compound_selectors_in_place(&mut list);
        assert_eq!(list, parse_selector("a.b c"));
    }

    #[test]
    fn single_node_roots() {
        let list = parse_selector(":not(a.b)");
        let grouped = group_compound_selectors(&list[0].nodes[0], &CompoundOptions::default());
        let nested = grouped.nested().unwrap();
        assert_eq!(kinds(&nested[0]), vec![NodeKind::CompoundSelector]);
        let mut selector = list[0].clone();
        selector.group_in_place(&CompoundOptions::default());
        assert_eq!(kinds(&selector), vec![NodeKind::CompoundSelector]);
    }
}
