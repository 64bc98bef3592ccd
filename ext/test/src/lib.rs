//! keyexpr-test: Conformance fixtures for keyexpr
//!
//! Provides the YAML fixture format (feature = `"fixtures"`) and small helpers
//! for building key sets in tests.
//!
//! # Example
//!
//! ```
//! use keyexpr_test::prelude::*;
//!
//! let state = state(["user_input", "document"]);
//! assert_eq!(
//!     match_keys("user_input & document", &state).unwrap(),
//!     vec!["user_input", "document"]
//! );
//! ```

use keyexpr::StateConfig;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Build a key set from any list of names.
#[must_use]
pub fn state<I, S>(keys: I) -> StateConfig
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter().collect()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::state;
    pub use keyexpr::prelude::*;
    pub use keyexpr::StateConfig;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn state_builder_dedups() {
        let keys = state(["a", "b", "a"]);
        assert_eq!(keys.len(), 2);
        assert!(keys.contains_key("a"));
    }

    #[test]
    fn state_with_full_matcher() {
        let keys = state(["x", "b"]);
        let matcher = KeyMatcher::new(&keys).unwrap();
        assert_eq!(matcher.evaluate("x & (a|b|c)").unwrap(), vec!["x", "b"]);
    }

    #[test]
    fn empty_state_matches_nothing() {
        let keys = state(Vec::<String>::new());
        assert!(keys.is_empty());
        assert_eq!(
            match_keys("a", &keys).unwrap_err(),
            ExpressionError::NoKeysMatched
        );
    }
}
