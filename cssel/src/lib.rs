#![allow(clippy::needless_return)]
#![allow(clippy::new_without_default)]

pub mod config;
pub mod fuzz;
pub mod logging;
pub mod parser;
pub mod services;
pub mod tokenizer;

pub use config::{CompoundOptions, Config, ConfigError, ParseOptions, WalkOptions};
pub use parser::ast::{
    CombinatorType, NamespaceError, NodeKind, NodeRef, NthNode, Selector, SelectorList,
    SelectorNode, Siblings, Spanned,
};
pub use parser::{parse_selector, parse_selector_with, MAX_NESTING_DEPTH};
pub use services::{
    calc_specificity, collect_diagnostics, compare_specificity, group_compound_selectors,
    group_compound_selectors_in_place, split_compound_selectors, split_compound_selectors_in_place,
    stringify, walk, CompoundTransform, SelectorDiagnostic, Specificity, WalkControl, WalkRoot,
};
