//! Config types for loading key sets and evaluation requests from YAML/JSON.
//!
//! A state file may be written either as a list of names or as a mapping whose
//! values are ignored, so a caller's state dictionary can be used unchanged:
//!
//! ```yaml
//! # list form
//! [user_input, document]
//! ---
//! # mapping form
//! user_input: "what is the title?"
//! document: null
//! ```

use crate::{ExpressionError, KeyMatcher, StateKeys};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A key universe loaded from configuration.
///
/// Serializes back as a sorted list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "StateRepr", into = "Vec<String>")]
pub struct StateConfig {
    keys: BTreeSet<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StateRepr {
    List(Vec<String>),
    Map(BTreeMap<String, IgnoredAny>),
}

impl From<StateRepr> for StateConfig {
    fn from(repr: StateRepr) -> Self {
        match repr {
            StateRepr::List(keys) => keys.into_iter().collect(),
            StateRepr::Map(map) => map.into_keys().collect(),
        }
    }
}

impl From<StateConfig> for Vec<String> {
    fn from(state: StateConfig) -> Self {
        state.keys.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for StateConfig {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl StateConfig {
    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl StateKeys for StateConfig {
    fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.keys.iter().map(String::as_str))
    }
}

/// One evaluation request: an expression and the keys to evaluate it against.
///
/// ```yaml
/// expression: "user_input & (relevant_chunks | document)"
/// state: [user_input, document]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExpressionConfig {
    /// The expression to evaluate.
    pub expression: String,
    /// The key universe.
    pub state: StateConfig,
}

impl ExpressionConfig {
    /// Evaluate the configured expression against the configured state.
    ///
    /// # Errors
    ///
    /// See [`KeyMatcher::new`] and [`KeyMatcher::evaluate`].
    pub fn evaluate(&self) -> Result<Vec<String>, ExpressionError> {
        KeyMatcher::new(&self.state)?.evaluate(&self.expression)
    }
}
