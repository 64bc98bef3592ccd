//! keyexpr - Boolean expressions over a set of known state keys
//!
//! Validates and evaluates expressions such as
//! `user_input & (relevant_chunks | parsed_document | document)` against a
//! universe of state keys, returning the keys that witness the match.
//!
//! # Evaluation
//!
//! Evaluation runs in three phases over a working copy of the expression:
//!
//! 1. **Validation** - fail-fast structural checks ([`ExpressionError`]).
//! 2. **Group resolution** - the innermost parenthesized group (rightmost `(`,
//!    first `)` after it) is evaluated flat and replaced by its matched keys
//!    joined with `|`, until no parentheses remain.
//! 3. **Flat evaluation** - split on `|`, then `&`; the first OR-segment whose
//!    operands are all state keys wins.
//!
//! The winning keys are de-duplicated in first-occurrence order.
//!
//! # Key Design Insights
//!
//! 1. **First satisfied OR-segment wins**: `a|b` with both keys present yields
//!    `["a"]`, never `["b"]`.
//!
//! 2. **Groups become disjunctions**: a resolved group is re-injected as the
//!    OR of its winning keys, so `(a&b)&c` rewrites to `a|b&c`.
//!
//! 3. **Borrowed key universe**: [`StateKeys`] is a read-only view; the matcher
//!    never mutates or retains the caller's keys beyond one borrow.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//!
//! let state: HashSet<&str> = ["user_input", "document"].into_iter().collect();
//!
//! let keys = keyexpr::match_keys(
//!     "user_input & (relevant_chunks | parsed_document | document)",
//!     &state,
//! )
//! .unwrap();
//! assert_eq!(keys, vec!["user_input", "document"]);
//!
//! let err = keyexpr::match_keys("user_input document", &state).unwrap_err();
//! assert_eq!(err.kind(), "AdjacentKeysWithoutOperator");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod flat;
mod matcher;
mod resolve;
mod state_keys;
mod trace;
mod validate;

#[cfg(feature = "serde")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use matcher::{match_keys, KeyMatcher};
pub use state_keys::StateKeys;
pub use trace::{EvalTrace, FlatTrace, GroupTrace, SegmentTrace};

#[cfg(feature = "serde")]
pub use config::{ExpressionConfig, StateConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use keyexpr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        match_keys, EvalTrace, ExpressionError, FlatTrace, GroupTrace, KeyMatcher, SegmentTrace,
        StateKeys,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Binary AND operator.
pub const AND: char = '&';

/// Binary OR operator.
pub const OR: char = '|';

/// Maximum expression length accepted by front ends (the CLI).
///
/// The evaluator itself accepts any length; group resolution is at most
/// quadratic in the expression length for pathological nesting.
pub const MAX_EXPRESSION_LENGTH: usize = 64 * 1024;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Why an expression was rejected or could not be satisfied.
///
/// Every variant is final: none are transient, and retrying with the same
/// expression and key set yields the same error. No partial result is ever
/// produced alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// The expression is empty (or contains nothing but spaces).
    #[error("empty expression")]
    EmptyExpression,

    /// Two state keys are separated only by whitespace.
    #[error(
        "adjacent state keys \"{left}\" and \"{right}\" found without an operator between them"
    )]
    AdjacentKeysWithoutOperator {
        /// The first key of the adjacent pair.
        left: String,
        /// The second key of the adjacent pair.
        right: String,
    },

    /// An operator starts or ends the expression, or is doubled.
    #[error("invalid operator usage in \"{expression}\": operators need an operand on both sides")]
    InvalidOperatorUsage {
        /// The space-stripped expression.
        expression: String,
    },

    /// Two operator characters are adjacent after space stripping.
    #[error("invalid operator placement at position {position}: operators cannot be adjacent")]
    InvalidOperatorPlacement {
        /// Byte offset of the first operator in the space-stripped expression.
        position: usize,
    },

    /// Opening and closing parentheses do not pair up.
    #[error("missing or unbalanced parentheses ({open} opening, {close} closing)")]
    UnbalancedParentheses {
        /// Count of `(`.
        open: usize,
        /// Count of `)`.
        close: usize,
    },

    /// No OR-segment was fully satisfied after resolving every group.
    #[error("no state keys matched the expression")]
    NoKeysMatched,

    /// The key set could not be compiled into the adjacency pattern.
    ///
    /// Raised only by [`KeyMatcher::new`], never during evaluation.
    #[error("cannot compile adjacency pattern for {keys} state keys: {reason}")]
    KeyPattern {
        /// Number of keys in the set.
        keys: usize,
        /// The underlying regex error message.
        reason: String,
    },
}

impl ExpressionError {
    /// Stable name of this error kind, e.g. `"NoKeysMatched"`.
    ///
    /// Used by conformance fixtures and the CLI to compare failures without
    /// depending on message text.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyExpression => "EmptyExpression",
            Self::AdjacentKeysWithoutOperator { .. } => "AdjacentKeysWithoutOperator",
            Self::InvalidOperatorUsage { .. } => "InvalidOperatorUsage",
            Self::InvalidOperatorPlacement { .. } => "InvalidOperatorPlacement",
            Self::UnbalancedParentheses { .. } => "UnbalancedParentheses",
            Self::NoKeysMatched => "NoKeysMatched",
            Self::KeyPattern { .. } => "KeyPattern",
        }
    }
}
