//! Capability scope sets.
//!
//! A [`ScopeSet`] is an unordered set of capability strings. Sets are
//! compared by containment, not equality: a token granted for a superset of
//! the requested scopes satisfies the request. Serialization to the
//! engine's comma-joined wire form is deterministic (sorted), so repeated
//! requests for the same logical set produce identical wire strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An unordered set of capability scope strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet(BTreeSet<String>);

impl ScopeSet {
    /// Create an empty scope set.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parse a comma-separated scope string as the engine reports it.
    /// Whitespace around elements is trimmed and empty elements dropped.
    pub fn parse_csv(csv: &str) -> Self {
        csv.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Deterministic comma-joined wire form (scopes in sorted order).
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (i, scope) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(scope);
        }
        out
    }

    /// Whether every scope in `required` is present in this set.
    pub fn contains_all(&self, required: &ScopeSet) -> bool {
        required.0.is_subset(&self.0)
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    pub fn insert(&mut self, scope: impl Into<String>) {
        self.0.insert(scope.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_csv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_csv_trims_and_drops_empty() {
        let scopes = ScopeSet::parse_csv("streaming, user-read-email,, ");
        assert_eq!(scopes.len(), 2);
        assert!(scopes.contains("streaming"));
        assert!(scopes.contains("user-read-email"));
    }

    #[test]
    fn to_csv_is_sorted_and_deterministic() {
        let a: ScopeSet = ["b-scope", "a-scope", "c-scope"].into_iter().collect();
        let b = ScopeSet::parse_csv("c-scope,a-scope,b-scope");
        assert_eq!(a.to_csv(), "a-scope,b-scope,c-scope");
        assert_eq!(a.to_csv(), b.to_csv());
    }

    #[test]
    fn containment_is_subset_not_equality() {
        let granted: ScopeSet = ["streaming", "user-read-email", "user-read-private"]
            .into_iter()
            .collect();
        let narrow: ScopeSet = ["streaming"].into_iter().collect();
        let disjoint: ScopeSet = ["playlist-modify-public"].into_iter().collect();

        assert!(granted.contains_all(&narrow));
        assert!(granted.contains_all(&granted));
        assert!(!narrow.contains_all(&granted));
        assert!(!granted.contains_all(&disjoint));
    }

    #[test]
    fn empty_set_is_satisfied_by_anything() {
        let granted: ScopeSet = ["streaming"].into_iter().collect();
        assert!(granted.contains_all(&ScopeSet::new()));
    }

    #[test]
    fn serde_roundtrip() {
        let scopes: ScopeSet = ["streaming", "user-read-email"].into_iter().collect();
        let json = serde_json::to_string(&scopes).unwrap();
        let back: ScopeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(scopes, back);
    }
}
