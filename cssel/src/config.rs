use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::parser::ast::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// added to every reported start/end
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkOptions {
    /// when set, only nodes of these kinds are handed to the visitor
    pub visit_list: Option<Vec<NodeKind>>,
    /// nodes of these kinds are never handed to the visitor
    pub ignore_list: Option<Vec<NodeKind>>,
}

impl WalkOptions {
    pub fn visit_only(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        Self {
            visit_list: Some(kinds.into_iter().collect()),
            ignore_list: None,
        }
    }

    pub fn ignoring(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        Self {
            visit_list: None,
            ignore_list: Some(kinds.into_iter().collect()),
        }
    }

    /// Filtered nodes are still descended into.
    pub fn should_visit(&self, kind: NodeKind) -> bool {
        if let Some(visit_list) = &self.visit_list {
            if !visit_list.contains(&kind) {
                return false;
            }
        }
        if let Some(ignore_list) = &self.ignore_list {
            if ignore_list.contains(&kind) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompoundOptions {
    /// start a new compound selector at every pseudo-element
    pub split_pseudo_elements: bool,
}

impl Default for CompoundOptions {
    fn default() -> Self {
        Self {
            split_pseudo_elements: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("got invalid configuration object {0}")]
    NotAnObject(Value),
    #[error("invalid `{section}` configuration: {source}")]
    Section {
        section: &'static str,
        source: serde_json::Error,
    },
}

const CONFIG_ITEMS: &[&str] = &["parse", "walk", "compound"];

/// All options in one place, updatable from a json object like
/// `{"parse": {"offset": 4}, "compound": {"splitPseudoElements": false}}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub parse: ParseOptions,
    pub walk: WalkOptions,
    pub compound: CompoundOptions,
}

impl Config {
    pub fn update(&mut self, update: &Value) -> Result<(), ConfigError> {
        if let Value::Object(update) = update {
            self.update_by_map(update)
        } else {
            Err(ConfigError::NotAnObject(update.clone()))
        }
    }

    /// Sections absent from the map are left untouched, unknown sections are ignored.
    pub fn update_by_map(&mut self, update: &Map<String, Value>) -> Result<(), ConfigError> {
        for (key, value) in update {
            let Some(section) = CONFIG_ITEMS.iter().copied().find(|item| *item == key.as_str()) else {
                tracing::debug!(key = key.as_str(), "ignoring unknown configuration section");
                continue;
            };
            let err = |source: serde_json::Error| ConfigError::Section { section, source };
            match section {
                "parse" => self.parse = ParseOptions::deserialize(value).map_err(err)?,
                "walk" => self.walk = WalkOptions::deserialize(value).map_err(err)?,
                _ => self.compound = CompoundOptions::deserialize(value).map_err(err)?,
            }
        }
        Ok(())
    }
}
