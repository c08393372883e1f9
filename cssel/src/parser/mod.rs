pub mod ast;
mod nth_parser;
pub mod selector_parser;
pub mod token_cursor;

pub use selector_parser::{parse_selector, parse_selector_with, MAX_NESTING_DEPTH};
