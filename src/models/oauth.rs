// SPDX-License-Identifier: MIT

//! One-time OAuth state tokens.

use serde::{Deserialize, Serialize};

/// A pending OAuth state token, stored in Firestore.
///
/// Issued when login is initiated and consumed (deleted) by the callback.
/// Tokens older than [`OAuthState::TTL_SECS`] are treated as expired even
/// if still present in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthState {
    /// Random URL-safe token (also used as document ID)
    pub state: String,
    /// When the token was issued (RFC3339)
    pub created_at: String,
}

impl OAuthState {
    /// How long an issued state token stays valid.
    pub const TTL_SECS: i64 = 10 * 60;

    /// Whether this token is past its TTL at time `now`.
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        match chrono::DateTime::parse_from_rfc3339(&self.created_at) {
            Ok(created) => (now - created.with_timezone(&chrono::Utc)).num_seconds() > Self::TTL_SECS,
            // Unparseable timestamps are treated as expired rather than trusted.
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn fresh_state_is_not_expired() {
        let state = OAuthState {
            state: "abc".to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        assert!(!state.is_expired(Utc::now()));
    }

    #[test]
    fn old_state_is_expired() {
        let state = OAuthState {
            state: "abc".to_string(),
            created_at: (Utc::now() - Duration::seconds(OAuthState::TTL_SECS + 1)).to_rfc3339(),
        };
        assert!(state.is_expired(Utc::now()));
    }

    #[test]
    fn garbage_timestamp_is_expired() {
        let state = OAuthState {
            state: "abc".to_string(),
            created_at: "not-a-timestamp".to_string(),
        };
        assert!(state.is_expired(Utc::now()));
    }
}
