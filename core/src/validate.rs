//! Structural validation - fail-fast checks run before any evaluation.
//!
//! Checks run in a fixed order and the first violation aborts:
//!
//! 1. empty expression
//! 2. adjacent state keys with no operator between them
//! 3. (space stripping)
//! 4. operator at either end, or a doubled operator sequence
//! 5. adjacent operator characters
//! 6. parenthesis counts
//!
//! Checks 4 and 5 overlap but are kept independent, as are 2 and 4: keys that
//! contain operator-like characters can make them disagree.

use crate::{ExpressionError, StateKeys, AND, OR};
use regex::Regex;
use tracing::trace;

/// Operator pairs rejected by the operator-usage check.
const DOUBLED_OPERATORS: [&str; 4] = ["&&", "||", "&|", "|&"];

fn is_operator(c: u8) -> bool {
    c == AND as u8 || c == OR as u8
}

/// Compiled scan for `<key> <whitespace> <key>`.
///
/// The pattern is `\b(k1|k2|…)(\b\s*\b)(k1|k2|…)\b` over every escaped key, so
/// `doc` never matches inside `document`. Empty keys are skipped; with no
/// usable keys there is nothing to scan for.
#[derive(Debug, Clone)]
pub(crate) struct AdjacencyScan {
    pattern: Option<Regex>,
}

impl AdjacencyScan {
    /// Build the scan for a key set.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::KeyPattern`] if the alternation exceeds the
    /// regex size limit.
    pub(crate) fn compile<K: StateKeys + ?Sized>(keys: &K) -> Result<Self, ExpressionError> {
        let escaped: Vec<String> = keys
            .keys()
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if escaped.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternation = escaped.join("|");
        let source = format!(r"\b({alternation})(\b\s*\b)({alternation})\b");
        let pattern = Regex::new(&source).map_err(|e| ExpressionError::KeyPattern {
            keys: escaped.len(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Find the first pair of adjacent keys, if any.
    pub(crate) fn find(&self, expression: &str) -> Option<(String, String)> {
        let captures = self.pattern.as_ref()?.captures(expression)?;
        Some((captures[1].to_owned(), captures[3].to_owned()))
    }
}

/// Run every structural check and return the space-stripped expression.
///
/// Only the ASCII space is stripped; other whitespace survives into the
/// operands and is trimmed during flat evaluation.
pub(crate) fn validate(
    expression: &str,
    adjacency: &AdjacencyScan,
) -> Result<String, ExpressionError> {
    if expression.is_empty() {
        return Err(ExpressionError::EmptyExpression);
    }

    if let Some((left, right)) = adjacency.find(expression) {
        return Err(ExpressionError::AdjacentKeysWithoutOperator { left, right });
    }

    let stripped = expression.replace(' ', "");
    if stripped.is_empty() {
        return Err(ExpressionError::EmptyExpression);
    }

    check_operator_usage(&stripped)?;
    check_operator_placement(&stripped)?;
    check_parentheses(&stripped)?;

    trace!(expression = %stripped, "expression passed validation");
    Ok(stripped)
}

fn check_operator_usage(stripped: &str) -> Result<(), ExpressionError> {
    let bytes = stripped.as_bytes();
    let at_edge = bytes.first().copied().is_some_and(is_operator)
        || bytes.last().copied().is_some_and(is_operator);

    if at_edge || DOUBLED_OPERATORS.iter().any(|op| stripped.contains(op)) {
        return Err(ExpressionError::InvalidOperatorUsage {
            expression: stripped.to_owned(),
        });
    }
    Ok(())
}

fn check_operator_placement(stripped: &str) -> Result<(), ExpressionError> {
    match stripped
        .as_bytes()
        .windows(2)
        .position(|w| is_operator(w[0]) && is_operator(w[1]))
    {
        Some(position) => Err(ExpressionError::InvalidOperatorPlacement { position }),
        None => Ok(()),
    }
}

fn check_parentheses(stripped: &str) -> Result<(), ExpressionError> {
    let (open, close) = paren_counts(stripped);
    if open == close {
        Ok(())
    } else {
        Err(ExpressionError::UnbalancedParentheses { open, close })
    }
}

/// Count `(` and `)` in an expression.
pub(crate) fn paren_counts(expression: &str) -> (usize, usize) {
    expression.bytes().fold((0, 0), |(open, close), b| match b {
        b'(' => (open + 1, close),
        b')' => (open, close + 1),
        _ => (open, close),
    })
}
