//! Parenthesis resolution - innermost group first, right to left.
//!
//! The rightmost `(` and the first `)` after it always enclose a group with no
//! nested parentheses. That group is evaluated flat and replaced, parentheses
//! included, by its matched keys joined with `|`. An unsatisfied group
//! collapses to the empty string. Repeat until no `(` remains.
//!
//! No parse tree is built; the working string is rewritten in place.

use crate::flat::evaluate_flat;
use crate::validate::paren_counts;
use crate::{ExpressionError, GroupTrace, StateKeys, OR};
use tracing::debug;

/// Rewrite every parenthesized group, returning the parenthesis-free remainder.
///
/// When `groups` is provided, each rewrite is recorded in order.
///
/// # Errors
///
/// Returns [`ExpressionError::UnbalancedParentheses`] if a `(` has no `)`
/// after it. Validation only compares counts, so `)a(` reaches this point.
pub(crate) fn resolve_groups<K: StateKeys + ?Sized>(
    expression: &str,
    keys: &K,
    mut groups: Option<&mut Vec<GroupTrace>>,
) -> Result<String, ExpressionError> {
    let mut working = expression.to_owned();

    while let Some(start) = working.rfind('(') {
        let Some(offset) = working[start..].find(')') else {
            let (open, close) = paren_counts(&working);
            return Err(ExpressionError::UnbalancedParentheses { open, close });
        };
        let end = start + offset;

        let group = working[start + 1..end].to_owned();
        let matched = evaluate_flat(&group, keys);
        let separator = OR.to_string();
        working.replace_range(start..=end, &matched.join(&separator));

        debug!(%group, ?matched, rewritten = %working, "resolved parenthesized group");

        if let Some(groups) = groups.as_deref_mut() {
            groups.push(GroupTrace {
                group,
                matched,
                rewritten: working.clone(),
            });
        }
    }

    Ok(working)
}
