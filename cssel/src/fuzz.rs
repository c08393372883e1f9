// Random selector text is fed through the parser to check two things:
// printing the tree gives back the input, and grouping then splitting
// compound selectors gives back the tree.

use thiserror::Error;

use crate::config::{CompoundOptions, ParseOptions, WalkOptions};
use crate::parser::ast::SelectorList;
use crate::parser::{parse_selector, parse_selector_with};
use crate::services::compound::{group_compound_selectors, split_compound_selectors};
use crate::services::stringify::stringify;
use crate::services::walk::{walk, WalkControl};

/// Fragments glued together by [`random_selector_source`]. Mixes valid
/// selector syntax with the broken bits the parser has to survive.
pub const PIECES: &[&str] = &[
    "a", "div", "*", "ns", "|", ".", "#", "x-y", "\\.", ":", "::", "hover", "before",
    "is(", "not(", "where(", "nth-child(", "nth-of-type(", "(", ")", "[", "]", "[a=\"b\"]",
    "[a='b' i]", ",", " ", "  ", "\n", ">", "+", "~", "&", "/*c*/", "/*", "*/", "\"", "'",
    "2n", "+1", "-n", "-", "odd", "even", "of", "5n-4", "{", "}", "é", "🦀",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundTripMismatch {
    #[error("printing `{input}` gave `{printed}`")]
    Print { input: String, printed: String },
    #[error("node `{value}` in `{input}` spans {start}..{end} outside of the input")]
    Span {
        input: String,
        value: String,
        start: usize,
        end: usize,
    },
    #[error("grouping then splitting `{input}` changed the tree")]
    Compound { input: String },
    #[error("parsing `{input}` at offset {offset} did not shift every node")]
    Offset { input: String, offset: usize },
}

pub fn random_selector_source(rng: &mut fastrand::Rng, pieces: &[&str]) -> String {
    if pieces.is_empty() {
        return String::new();
    }
    let count = rng.usize(0..24);
    return (0..count)
        .map(|_| pieces[rng.usize(..pieces.len())])
        .collect();
}

fn spans(list: &SelectorList) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    walk(
        list,
        |node, _, _, _| {
            spans.push((node.start(), node.end()));
            WalkControl::Continue
        },
        &WalkOptions::default(),
    );
    spans
}

/// Runs every check on `input`, reporting the first that fails.
pub fn retest_round_trip(input: &str) -> Result<(), RoundTripMismatch> {
    let list = parse_selector(input);

    let printed = stringify(&list);
    if printed != input {
        return Err(RoundTripMismatch::Print {
            input: input.to_owned(),
            printed,
        });
    }

    let mut out_of_bounds = None;
    walk(
        &list,
        |node, _, _, _| {
            if node.start() > node.end() || node.end() > input.len() {
                out_of_bounds = Some((node.value().to_owned(), node.start(), node.end()));
                return WalkControl::StopAll;
            }
            WalkControl::Continue
        },
        &WalkOptions::default(),
    );
    if let Some((value, start, end)) = out_of_bounds {
        return Err(RoundTripMismatch::Span {
            input: input.to_owned(),
            value,
            start,
            end,
        });
    }

    let grouped = group_compound_selectors(&list, &CompoundOptions::default());
    if split_compound_selectors(&grouped) != list {
        return Err(RoundTripMismatch::Compound {
            input: input.to_owned(),
        });
    }

    let offset = 7;
    let shifted = parse_selector_with(input, &ParseOptions { offset });
    let expected: Vec<(usize, usize)> = spans(&list)
        .into_iter()
        .map(|(start, end)| (start + offset, end + offset))
        .collect();
    if spans(&shifted) != expected {
        return Err(RoundTripMismatch::Offset {
            input: input.to_owned(),
            offset,
        });
    }

    return Ok(());
}

/// Retests a JSON list of previously failing inputs.
pub fn retest_samples(json: &str) -> Result<Vec<RoundTripMismatch>, serde_json::Error> {
    let samples: Vec<String> = serde_json::from_str(json)?;
    let failures: Vec<RoundTripMismatch> = samples
        .iter()
        .filter_map(|sample| retest_round_trip(sample).err())
        .collect();
    for failure in &failures {
        tracing::error!(%failure, "fuzz sample failed");
    }
    return Ok(failures);
}
