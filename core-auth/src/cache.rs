//! In-memory scope-aware token cache.
//!
//! ## Matching rules
//!
//! - `lookup` returns a stored, non-expired token whose scope set is a
//!   superset of the requested scopes. When several qualify, the freshest
//!   (latest `issued_at`) wins.
//! - `store` replaces the entry with the *exact same* scope set, if any.
//!   Scope sets are never merged across entries; each entry keeps the set
//!   it was fetched with.
//! - Expired entries are purged lazily whenever a lookup scans the cache.
//!
//! ## Concurrency
//!
//! All operations take `&self` behind a mutex, so concurrent `lookup` and
//! `store` calls never observe a half-written entry and a `store` is
//! visible to every subsequently issued `lookup` (last store wins for an
//! identical scope set).

use crate::scope::ScopeSet;
use crate::token::AccessToken;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::{debug, trace};

/// Thread-safe cache of access tokens keyed by the scope set each was
/// fetched with.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: Mutex<Vec<AccessToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Return a non-expired token covering `required`, purging expired
    /// entries encountered along the way.
    pub fn lookup(&self, required: &ScopeSet, now: DateTime<Utc>) -> Option<AccessToken> {
        let mut entries = self.entries.lock().expect("token cache poisoned");

        let before = entries.len();
        entries.retain(|token| !token.is_expired_at(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "Purged expired token cache entries");
        }

        let hit = entries
            .iter()
            .filter(|token| token.scopes.contains_all(required))
            .max_by_key(|token| token.issued_at)
            .cloned();

        trace!(
            requested = %required,
            hit = hit.is_some(),
            entries = entries.len(),
            "Token cache lookup"
        );
        hit
    }

    /// Store a token, replacing any entry with an identical scope set.
    pub fn store(&self, token: AccessToken) {
        let mut entries = self.entries.lock().expect("token cache poisoned");
        entries.retain(|existing| existing.scopes != token.scopes);
        debug!(scopes = %token.scopes, "Caching access token");
        entries.push(token);
    }

    /// Remove every entry. Used when the owning controller closes; tokens
    /// tied to a torn-down engine session must not be reused.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("token cache poisoned");
        if !entries.is_empty() {
            debug!(dropped = entries.len(), "Clearing token cache");
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("token cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn scopes(list: &[&str]) -> ScopeSet {
        list.iter().copied().collect()
    }

    fn token(value: &str, list: &[&str], expires_in: i64, issued_at: DateTime<Utc>) -> AccessToken {
        AccessToken::new(value, "Bearer", scopes(list), expires_in, issued_at)
    }

    #[test]
    fn superset_scope_match_satisfies_narrower_request() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store(token("wide", &["streaming", "user-read-email"], 3600, now));

        let hit = cache.lookup(&scopes(&["streaming"]), now).unwrap();
        assert_eq!(hit.access_token, "wide");
    }

    #[test]
    fn narrower_token_does_not_satisfy_wider_request() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store(token("narrow", &["streaming"], 3600, now));

        let miss = cache.lookup(&scopes(&["streaming", "user-read-email"]), now);
        assert!(miss.is_none());
    }

    #[test]
    fn expired_token_is_never_returned() {
        let cache = TokenCache::new();
        let issued = Utc::now() - Duration::seconds(7200);
        cache.store(token("stale", &["streaming"], 3600, issued));

        assert!(cache.lookup(&scopes(&["streaming"]), Utc::now()).is_none());
        // lazy purge removed the entry during the scan
        assert!(cache.is_empty());
    }

    #[test]
    fn freshest_qualifying_token_wins() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store(token("older", &["streaming", "a"], 3600, now - Duration::seconds(60)));
        cache.store(token("newer", &["streaming", "b"], 3600, now));

        let hit = cache.lookup(&scopes(&["streaming"]), now).unwrap();
        assert_eq!(hit.access_token, "newer");
    }

    #[test]
    fn identical_scope_set_is_replaced_not_duplicated() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store(token("first", &["streaming"], 3600, now));
        cache.store(token("second", &["streaming"], 3600, now + Duration::seconds(1)));

        assert_eq!(cache.len(), 1);
        let hit = cache.lookup(&scopes(&["streaming"]), now).unwrap();
        assert_eq!(hit.access_token, "second");
    }

    #[test]
    fn different_scope_sets_keep_separate_entries() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store(token("a", &["streaming"], 3600, now));
        cache.store(token("b", &["user-read-email"], 3600, now));

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store(token("a", &["streaming"], 3600, now));
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.lookup(&scopes(&["streaming"]), now).is_none());
    }

    #[test]
    fn scope_order_does_not_matter() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache.store(token("t", &["b", "a"], 3600, now));

        assert!(cache.lookup(&scopes(&["a", "b"]), now).is_some());
    }
}
