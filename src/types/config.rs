//! Configuration Types
//!
//! Token lifecycle configuration with partial-override merging.

use serde::{Deserialize, Serialize};

/// Default safety margin subtracted from real expiration.
pub const DEFAULT_EXPIRE_OFFSET_SECS: u64 = 60;
/// Default key under which token state is mirrored to durable storage.
pub const DEFAULT_STORAGE_KEY: &str = "oauthAccessToken";

/// Token lifecycle configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Logical identifier for the token kind.
    pub name: String,
    /// Names of the redirect-payload parameters to read.
    pub redirect_params: RedirectParamNames,
    /// Safety margin subtracted from real expiration before the token is
    /// considered invalid.
    pub expire_offset_secs: u64,
    /// Mirror token state to the durable storage backend.
    pub persist_to_storage: bool,
    /// Key for the mirrored durable entry.
    pub storage_key: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "id_token".to_string(),
            redirect_params: RedirectParamNames::default(),
            expire_offset_secs: DEFAULT_EXPIRE_OFFSET_SECS,
            persist_to_storage: false,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl TokenConfig {
    /// Merge supplied overrides over this configuration.
    ///
    /// Shallow merge, except `redirect_params` which is itself merged
    /// field-by-field so a caller can override just one parameter name.
    pub fn apply(&mut self, overrides: &TokenConfigOverrides) {
        if let Some(name) = &overrides.name {
            self.name = name.clone();
        }
        if let Some(params) = &overrides.redirect_params {
            if let Some(id_token) = &params.id_token {
                self.redirect_params.id_token = id_token.clone();
            }
            if let Some(token_type) = &params.token_type {
                self.redirect_params.token_type = token_type.clone();
            }
        }
        if let Some(offset) = overrides.expire_offset_secs {
            self.expire_offset_secs = offset;
        }
        if let Some(persist) = overrides.persist_to_storage {
            self.persist_to_storage = persist;
        }
        if let Some(key) = &overrides.storage_key {
            self.storage_key = key.clone();
        }
    }
}

/// Names of the fields read from the incoming redirect payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RedirectParamNames {
    /// Parameter carrying the raw token value.
    pub id_token: String,
    /// Parameter carrying the token type.
    pub token_type: String,
}

impl Default for RedirectParamNames {
    fn default() -> Self {
        Self {
            id_token: "id_token".to_string(),
            token_type: "token_type".to_string(),
        }
    }
}

/// Partial configuration supplied to `TokenManager::configure`.
///
/// Unset fields leave the current configuration untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_params: Option<RedirectParamOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_offset_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_to_storage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

/// Partial redirect-parameter names.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RedirectParamOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}
