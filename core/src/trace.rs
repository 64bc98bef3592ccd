//! Evaluation trace types for debugging expression behavior.
//!
//! Use [`KeyMatcher::evaluate_with_trace()`](crate::KeyMatcher::evaluate_with_trace)
//! to see every group rewrite and which OR-segments were tried.
//!
//! # Example
//!
//! ```
//! use keyexpr::KeyMatcher;
//!
//! let keys = ["x", "b"];
//! let matcher = KeyMatcher::new(&keys).unwrap();
//! let trace = matcher.evaluate_with_trace("x & (a|b|c)").unwrap();
//!
//! assert_eq!(trace.groups[0].group, "a|b|c");
//! assert_eq!(trace.groups[0].rewritten, "x&b");
//! assert_eq!(trace.result, vec!["x", "b"]);
//! ```

use crate::ExpressionError;

/// Trace of one expression evaluation.
///
/// # INV: `into_result()` == `evaluate()` result
///
/// For every expression that passes validation, [`into_result()`](Self::into_result)
/// returns exactly what [`KeyMatcher::evaluate()`](crate::KeyMatcher::evaluate) would.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvalTrace {
    /// The expression after space stripping.
    pub normalized: String,
    /// Each parenthesized group rewrite, innermost (rightmost) first.
    pub groups: Vec<GroupTrace>,
    /// The final flat evaluation over the fully rewritten expression.
    pub flat: FlatTrace,
    /// De-duplicated matched keys. Empty when nothing matched.
    pub result: Vec<String>,
}

impl EvalTrace {
    /// Whether the expression was satisfied.
    #[must_use]
    pub fn matched(&self) -> bool {
        !self.result.is_empty()
    }

    /// Convert into the same outcome `evaluate()` produces.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::NoKeysMatched`] if the result is empty.
    pub fn into_result(self) -> Result<Vec<String>, ExpressionError> {
        if self.result.is_empty() {
            Err(ExpressionError::NoKeysMatched)
        } else {
            Ok(self.result)
        }
    }
}

/// One parenthesized group resolved during evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupTrace {
    /// Text strictly between the parentheses.
    pub group: String,
    /// Keys the group matched (may be empty, or contain duplicates).
    pub matched: Vec<String>,
    /// The working expression after the group was replaced.
    pub rewritten: String,
}

/// A flat (parenthesis-free) evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlatTrace {
    /// The expression that was evaluated.
    pub expression: String,
    /// OR-segments in the order they were tried. Stops at the first satisfied one.
    pub segments: Vec<SegmentTrace>,
    /// The winning segment's operands, before de-duplication.
    pub matched: Vec<String>,
}

/// One OR-segment of a flat evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SegmentTrace {
    /// Trimmed AND-operands.
    pub operands: Vec<String>,
    /// Whether every operand is a state key.
    pub satisfied: bool,
}
