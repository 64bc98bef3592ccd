//! Flat evaluation of parenthesis-free expressions.
//!
//! # INV: First satisfied OR-segment wins
//!
//! Segments are tried left to right and evaluation stops at the first one
//! whose AND-operands are all state keys, even if a later segment would also
//! be satisfied.

use crate::{FlatTrace, SegmentTrace, StateKeys, AND, OR};
use tracing::trace;

/// Evaluate a parenthesis-free expression.
///
/// Returns the winning segment's trimmed operands in their original order,
/// or an empty vector if no segment is satisfied. Operands that are not
/// state keys only make their segment unsatisfied.
pub(crate) fn evaluate_flat<K: StateKeys + ?Sized>(expression: &str, keys: &K) -> Vec<String> {
    for segment in expression.split(OR) {
        let operands: Vec<&str> = segment.split(AND).map(str::trim).collect();
        if operands.iter().all(|op| keys.contains_key(op)) {
            trace!(segment, "OR-segment satisfied");
            return operands.into_iter().map(str::to_owned).collect();
        }
    }
    Vec::new()
}

/// Same as [`evaluate_flat`], recording every segment that was tried.
pub(crate) fn evaluate_flat_with_trace<K: StateKeys + ?Sized>(
    expression: &str,
    keys: &K,
) -> FlatTrace {
    let mut segments = Vec::new();
    let mut matched = Vec::new();

    for segment in expression.split(OR) {
        let operands: Vec<String> = segment
            .split(AND)
            .map(|op| op.trim().to_owned())
            .collect();
        let satisfied = operands.iter().all(|op| keys.contains_key(op));
        if satisfied {
            matched.clone_from(&operands);
        }
        segments.push(SegmentTrace {
            operands,
            satisfied,
        });
        if satisfied {
            break;
        }
    }

    FlatTrace {
        expression: expression.to_owned(),
        segments,
        matched,
    }
}
