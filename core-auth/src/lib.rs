//! # Access Token Cache
//!
//! Scope-aware caching of access tokens obtained from the streaming engine.
//!
//! ## Overview
//!
//! Tokens are granted for a set of capability scopes and expire a fixed
//! number of seconds after issuance. The cache answers "do I already hold a
//! usable token for these scopes?" with superset matching: a token granted
//! for a broader scope set satisfies a narrower request. Expired entries are
//! purged lazily during lookup, so the cache never serves a stale token.
//!
//! The cache is an optimization, never a correctness requirement: a miss is
//! always satisfiable by fetching a fresh token from the engine.
//!
//! ## Security
//!
//! Token values are never logged, and the `Debug` implementation of
//! [`AccessToken`] redacts them.

pub mod cache;
pub mod scope;
pub mod token;

pub use cache::TokenCache;
pub use scope::ScopeSet;
pub use token::AccessToken;
