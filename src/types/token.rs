//! Token Types
//!
//! The token state held and persisted by the lifecycle manager.

use serde::{Deserialize, Serialize};

use crate::types::JwtClaims;

/// Token state derived from a redirect payload.
///
/// Created only by `TokenManager::derive_token`; at most one instance is
/// live per manager.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenState {
    /// Raw bearer token.
    pub token: String,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Absolute expiration instant (epoch seconds), re-based onto the local
    /// clock at derivation time.
    pub expires_at: i64,
    /// Decoded claim set, retained for inspection.
    pub claims: JwtClaims,
}

impl TokenState {
    /// Format as an Authorization header value.
    ///
    /// Only the first character of the type is upper-cased ("bearer"
    /// becomes "Bearer"; multi-word types are otherwise left as-is).
    pub fn authorization_header(&self) -> String {
        let mut chars = self.token_type.chars();
        match chars.next() {
            Some(first) => format!("{}{} {}", first.to_uppercase(), chars.as_str(), self.token),
            None => String::new(),
        }
    }
}

impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenState")
            .field("token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("claims", &self.claims)
            .finish()
    }
}
