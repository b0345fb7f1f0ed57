//! Cached access token type.

use crate::scope::ScopeSet;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An access token together with the scope set it was granted for and its
/// issuance time.
///
/// Expiry is computed once relative to issuance, never relative to last
/// access: the token is unusable at `issued_at + expires_in` seconds no
/// matter how recently it was read.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The opaque token value presented as a bearer credential.
    pub access_token: String,
    /// Token type, `"Bearer"` in practice.
    pub token_type: String,
    /// The exact scope set this token was fetched with.
    pub scopes: ScopeSet,
    /// When the token was issued (UTC).
    pub issued_at: DateTime<Utc>,
    /// Seconds until expiry, relative to `issued_at`.
    pub expires_in: i64,
}

impl AccessToken {
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        scopes: ScopeSet,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            scopes,
            issued_at,
            expires_in,
        }
    }

    /// Instant at which the token stops being usable.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(self.expires_in)
    }

    /// Whether the token is expired as of `now`. The boundary instant
    /// itself counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

// Custom Debug implementation to avoid logging token values
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("scopes", &self.scopes)
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
