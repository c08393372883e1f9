use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::walk::{walk, WalkControl, WalkRoot};
use crate::config::WalkOptions;
use crate::parser::ast::{NodeRef, SelectorList, SelectorNode};

/// [Selector Specificity](https://developer.mozilla.org/docs/Web/CSS/Specificity)
/// as `[inline, id, class, type]`, compared left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Specificity(pub [u32; 4]);

impl Specificity {
    pub const INLINE: usize = 0;
    /// count of identifiers (e.g. `#app`)
    pub const ID: usize = 1;
    /// count of attributes (`[type="number"]`), classes (`.container-fluid`), and pseudo-classes (`:hover`)
    pub const CLASS: usize = 2;
    /// count of tag names (`div`), and pseudo-elements (`::before`)
    pub const TYPE: usize = 3;

    pub fn id(&self) -> u32 {
        self.0[Self::ID]
    }

    pub fn class(&self) -> u32 {
        self.0[Self::CLASS]
    }

    pub fn tag(&self) -> u32 {
        self.0[Self::TYPE]
    }
}

impl std::ops::Add for Specificity {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        return self;
    }
}

impl std::ops::AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Self) {
        for (slot, add) in self.0.iter_mut().zip(rhs.0) {
            *slot += add;
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [inline, id, class, tag] = self.0;
        write!(f, "{inline},{id},{class},{tag}")
    }
}

pub fn compare_specificity(a: &Specificity, b: &Specificity) -> Ordering {
    a.cmp(b)
}

/// Sums the specificity of every simple selector under `root`.
///
/// `:where()` counts nothing, `:is()`, `:not()` and `:has()` count their most
/// specific argument, `:nth-*()` counts as a pseudo-class plus its most specific
/// `of` argument. Other nested content is ignored.
pub fn calc_specificity<'a>(root: impl Into<WalkRoot<'a>>) -> Specificity {
    let mut specificity = Specificity::default();
    walk(
        root,
        |node, _, _, _| {
            let NodeRef::Node(node) = node else {
                return WalkControl::Continue;
            };
            match node {
                SelectorNode::Id(_) => specificity.0[Specificity::ID] += 1,
                SelectorNode::Class(_) | SelectorNode::Attribute(_) => {
                    specificity.0[Specificity::CLASS] += 1
                }
                SelectorNode::Type(_) | SelectorNode::PseudoElement(_) => {
                    specificity.0[Specificity::TYPE] += 1
                }
                SelectorNode::PseudoClass(pseudo) => {
                    let name = pseudo.value.to_ascii_lowercase();
                    match name.as_str() {
                        "where" => {}
                        "is" | "not" | "has" => {
                            if let Some(nested) = &pseudo.nodes {
                                specificity += calculate_most_specific_list_item(nested);
                            }
                        }
                        _ if name.starts_with("nth-") => {
                            specificity.0[Specificity::CLASS] += 1;
                            if let Some(nested) = &pseudo.nodes {
                                specificity += calculate_most_specific_list_item(nested);
                            }
                        }
                        _ => specificity.0[Specificity::CLASS] += 1,
                    }
                }
                SelectorNode::CompoundSelector(_) => return WalkControl::Continue,
                _ => {}
            }
            WalkControl::SKIP_NESTED
        },
        &WalkOptions::default(),
    );
    return specificity;
}

/// Ties keep the earliest selector.
fn calculate_most_specific_list_item(list: &SelectorList) -> Specificity {
    let mut most_specific_list_item = Specificity::default();
    for selector in list {
        let item_specificity = calc_specificity(selector);
        if item_specificity > most_specific_list_item {
            most_specific_list_item = item_specificity;
        }
    }
    return most_specific_list_item;
}
