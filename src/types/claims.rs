//! Claim Types
//!
//! Decoded claim set from a bearer token.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decoded JWT claim set.
///
/// `exp` and `iat` are required: without them no lifetime can be computed
/// and the token is treated as malformed by the decoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Expiration time (epoch seconds).
    pub exp: i64,
    /// Issued-at time (epoch seconds).
    pub iat: i64,
    /// Not-before time (epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issuer identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience (string or array of strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    /// JWT identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Additional claims.
    #[serde(flatten, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl JwtClaims {
    /// Effective issue instant: `nbf` when present, `iat` otherwise.
    pub fn issued_time(&self) -> i64 {
        self.nbf.unwrap_or(self.iat)
    }

    /// Token lifetime in seconds, from issue instant to expiration.
    pub fn lifetime_secs(&self) -> i64 {
        self.exp - self.issued_time()
    }
}
