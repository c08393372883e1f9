pub mod compound;
pub mod diagnostics;
pub mod specificity;
pub mod stringify;
pub mod walk;

pub use compound::{
    group_compound_selectors, group_compound_selectors_in_place, split_compound_selectors,
    split_compound_selectors_in_place, CompoundTransform,
};
pub use diagnostics::{collect_diagnostics, SelectorDiagnostic};
pub use specificity::{calc_specificity, compare_specificity, Specificity};
pub use stringify::stringify;
pub use walk::{walk, WalkControl, WalkRoot};
