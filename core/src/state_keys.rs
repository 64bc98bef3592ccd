//! `StateKeys` - Read-only view over the universe of known identifiers
//!
//! Callers usually hold their state as a map (values irrelevant here) or a
//! set of names. `StateKeys` lets the matcher borrow either without copying.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

/// The universe of valid identifiers for one evaluation.
///
/// Only key membership matters. Implementations must be consistent:
/// every name yielded by [`keys()`](Self::keys) satisfies
/// [`contains_key()`](Self::contains_key).
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use keyexpr::StateKeys;
///
/// let mut state: HashMap<String, u32> = HashMap::new();
/// state.insert("document".into(), 1);
///
/// assert!(state.contains_key("document"));
/// assert!(!StateKeys::contains_key(&state, "doc"));
/// assert_eq!(StateKeys::keys(&state).count(), 1);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a state-key set",
    label = "this type does not expose string keys",
    note = "StateKeys is implemented for HashSet, BTreeSet, HashMap and BTreeMap with string keys, and for slices, arrays and Vecs of strings"
)]
pub trait StateKeys {
    /// Returns `true` if `key` is a known identifier.
    fn contains_key(&self, key: &str) -> bool;

    /// Iterate every known identifier, in no particular order.
    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

fn borrowed<S: Borrow<str>>(key: &S) -> &str {
    <S as Borrow<str>>::borrow(key)
}

impl<T: StateKeys + ?Sized> StateKeys for &T {
    fn contains_key(&self, key: &str) -> bool {
        (**self).contains_key(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        (**self).keys()
    }
}

impl<S, H> StateKeys for HashSet<S, H>
where
    S: Borrow<str> + Hash + Eq,
    H: BuildHasher,
{
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(borrowed))
    }
}

impl<S: Borrow<str> + Ord> StateKeys for BTreeSet<S> {
    fn contains_key(&self, key: &str) -> bool {
        self.contains(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(borrowed))
    }
}

impl<S, V, H> StateKeys for HashMap<S, V, H>
where
    S: Borrow<str> + Hash + Eq,
    H: BuildHasher,
{
    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(HashMap::keys(self).map(borrowed))
    }
}

impl<S: Borrow<str> + Ord, V> StateKeys for BTreeMap<S, V> {
    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(BTreeMap::keys(self).map(borrowed))
    }
}

// Linear scans: fine for the handful of keys a literal list usually holds.

impl<S: AsRef<str>> StateKeys for [S] {
    fn contains_key(&self, key: &str) -> bool {
        self.iter().any(|k| k.as_ref() == key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(|k| k.as_ref()))
    }
}

impl<S: AsRef<str>, const N: usize> StateKeys for [S; N] {
    fn contains_key(&self, key: &str) -> bool {
        self.as_slice().contains_key(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        self.as_slice().keys()
    }
}

impl<S: AsRef<str>> StateKeys for Vec<S> {
    fn contains_key(&self, key: &str) -> bool {
        self.as_slice().contains_key(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        self.as_slice().keys()
    }
}
