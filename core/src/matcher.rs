//! `KeyMatcher` - Expression evaluation against one borrowed key set
//!
//! Compiling the adjacency scan is the only per-key-set cost, so a
//! `KeyMatcher` is built once and reused for every expression checked against
//! the same keys. [`match_keys`] is the one-shot form.

use crate::flat::{evaluate_flat, evaluate_flat_with_trace};
use crate::resolve::resolve_groups;
use crate::validate::{validate, AdjacencyScan};
use crate::{EvalTrace, ExpressionError, StateKeys};
use std::collections::HashSet;
use std::fmt::{self, Debug};
use tracing::debug;

/// Evaluates expressions against a borrowed set of state keys.
///
/// # INV: Non-empty, verified, de-duplicated
///
/// On success the result is non-empty, every element is a key of the set,
/// and duplicates are removed keeping first-occurrence order.
///
/// # Example
///
/// ```
/// use keyexpr::KeyMatcher;
/// use std::collections::BTreeSet;
///
/// let state: BTreeSet<&str> = ["a", "b", "x"].into_iter().collect();
/// let matcher = KeyMatcher::new(&state).unwrap();
///
/// assert_eq!(matcher.evaluate("a|b").unwrap(), vec!["a"]);
/// assert_eq!(matcher.evaluate("(a)&a&b").unwrap(), vec!["a", "b"]);
/// assert_eq!(matcher.evaluate("a&z").unwrap_err().kind(), "NoKeysMatched");
/// ```
pub struct KeyMatcher<'k, K: StateKeys + ?Sized> {
    keys: &'k K,
    adjacency: AdjacencyScan,
}

impl<'k, K: StateKeys + ?Sized> KeyMatcher<'k, K> {
    /// Create a matcher over `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::KeyPattern`] if the key set is too large to
    /// compile into the adjacency pattern.
    pub fn new(keys: &'k K) -> Result<Self, ExpressionError> {
        Ok(Self {
            keys,
            adjacency: AdjacencyScan::compile(keys)?,
        })
    }

    /// The key set this matcher evaluates against.
    #[must_use]
    pub fn keys(&self) -> &'k K {
        self.keys
    }

    /// Run the structural checks only.
    ///
    /// Returns the expression with spaces stripped.
    ///
    /// # Errors
    ///
    /// Returns the first violated check: [`ExpressionError::EmptyExpression`],
    /// [`ExpressionError::AdjacentKeysWithoutOperator`],
    /// [`ExpressionError::InvalidOperatorUsage`],
    /// [`ExpressionError::InvalidOperatorPlacement`] or
    /// [`ExpressionError::UnbalancedParentheses`].
    pub fn validate(&self, expression: &str) -> Result<String, ExpressionError> {
        validate(expression, &self.adjacency)
    }

    /// Evaluate an expression, returning the keys that satisfy it.
    ///
    /// # Errors
    ///
    /// Any validation error (see [`validate()`](Self::validate)), or
    /// [`ExpressionError::NoKeysMatched`] if nothing is satisfied.
    pub fn evaluate(&self, expression: &str) -> Result<Vec<String>, ExpressionError> {
        let normalized = self.validate(expression)?;
        let flat = resolve_groups(&normalized, self.keys, None)?;
        let matched = evaluate_flat(&flat, self.keys);

        if matched.is_empty() {
            debug!(expression = %normalized, "no state keys matched");
            return Err(ExpressionError::NoKeysMatched);
        }
        Ok(dedup_preserving_order(matched))
    }

    /// Evaluate with a full record of every rewrite and segment tried.
    ///
    /// Unlike [`evaluate()`](Self::evaluate), an unsatisfied expression is not
    /// an error here: the trace comes back with an empty `result`. Use
    /// [`EvalTrace::into_result()`] to get the `evaluate()` outcome.
    ///
    /// # Errors
    ///
    /// Any validation error, or [`ExpressionError::UnbalancedParentheses`]
    /// for a `(` with no `)` after it.
    pub fn evaluate_with_trace(&self, expression: &str) -> Result<EvalTrace, ExpressionError> {
        let normalized = self.validate(expression)?;
        let mut groups = Vec::new();
        let remainder = resolve_groups(&normalized, self.keys, Some(&mut groups))?;
        let flat = evaluate_flat_with_trace(&remainder, self.keys);
        let result = dedup_preserving_order(flat.matched.clone());

        Ok(EvalTrace {
            normalized,
            groups,
            flat,
            result,
        })
    }
}

impl<K: StateKeys + ?Sized> Debug for KeyMatcher<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMatcher")
            .field("keys", &self.keys.keys().count())
            .field("adjacency", &self.adjacency)
            .finish()
    }
}

/// Evaluate `expression` against `keys` in one call.
///
/// Equivalent to `KeyMatcher::new(keys)?.evaluate(expression)`.
///
/// # Errors
///
/// See [`KeyMatcher::new`] and [`KeyMatcher::evaluate`].
///
/// # Example
///
/// ```
/// let keys = ["x", "b"];
/// assert_eq!(keyexpr::match_keys("x & (a|b|c)", &keys).unwrap(), vec!["x", "b"]);
/// ```
pub fn match_keys<K: StateKeys + ?Sized>(
    expression: &str,
    keys: &K,
) -> Result<Vec<String>, ExpressionError> {
    KeyMatcher::new(keys)?.evaluate(expression)
}

fn dedup_preserving_order(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.into_iter()
        .filter(|k| seen.insert(k.clone()))
        .collect()
}
