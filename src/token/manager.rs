//! Token Lifecycle Manager
//!
//! Owns the single token slot: derives token state from redirect payloads,
//! evaluates expiration, and mediates between in-memory state and optional
//! durable storage.

use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::core::{ClaimsDecoder, Clock, JwtClaimsDecoder, SystemClock};
use crate::error::{TokenError, TokenResult};
use crate::token::{FileTokenStorage, InMemoryTokenStorage, TokenStorage};
use crate::types::{RedirectPayload, TokenConfig, TokenConfigOverrides, TokenState};

/// Fixed renewal buffer added on top of the configured offset by
/// `get_token_expiration_time`. Distinct from the validity offset used by
/// `is_token_valid`.
pub const RENEWAL_BUFFER_SECS: i64 = 30;

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// The single token slot.
///
/// `storage_checked` records that the one lazy load from durable storage
/// has been attempted; afterwards memory is authoritative.
#[derive(Debug, Default)]
struct Slot {
    state: Option<TokenState>,
    storage_checked: bool,
}

/// Bearer token lifecycle manager.
///
/// Holds at most one live token. Independent instances manage independent
/// token kinds; nothing is shared between managers.
pub struct TokenManager<D, S, C = SystemClock> {
    config: TokenConfig,
    decoder: D,
    storage: S,
    clock: C,
    slot: Mutex<Slot>,
}

impl<D: ClaimsDecoder, S: TokenStorage> TokenManager<D, S, SystemClock> {
    /// Create a manager using the system clock.
    pub fn new(config: TokenConfig, decoder: D, storage: S) -> Self {
        Self::with_clock(config, decoder, storage, SystemClock)
    }
}

impl<D: ClaimsDecoder, S: TokenStorage, C: Clock> TokenManager<D, S, C> {
    /// Create a manager with an explicit time source.
    pub fn with_clock(config: TokenConfig, decoder: D, storage: S, clock: C) -> Self {
        Self {
            config,
            decoder,
            storage,
            clock,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Current effective configuration.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Merge supplied overrides over the current configuration.
    ///
    /// Shallow merge with field-by-field merging of the redirect parameter
    /// names. Returns the supplied overrides unchanged; the merged result
    /// is observable via [`config`](Self::config). Empty overrides are a
    /// no-op.
    pub fn configure(&mut self, overrides: TokenConfigOverrides) -> TokenConfigOverrides {
        self.config.apply(&overrides);
        overrides
    }

    /// Derive token state from a redirect payload.
    ///
    /// Returns `Ok(None)` when the payload carries no token under the
    /// configured parameter name — a normal outcome the caller must check,
    /// not an error. A token that cannot be decoded fails with a decode
    /// error, never masked.
    ///
    /// The expiration instant is re-based onto the local clock: only the
    /// lifetime from the claims (`exp` minus the issue instant) is trusted,
    /// which tolerates clock skew between issuer and client.
    #[instrument(skip(self, payload))]
    pub fn derive_token(&self, payload: &RedirectPayload) -> TokenResult<Option<TokenState>> {
        let token = match payload.get(&self.config.redirect_params.id_token) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Ok(None),
        };

        let token_type = payload
            .get(&self.config.redirect_params.token_type)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOKEN_TYPE)
            .to_string();

        let claims = self.decoder.decode(&token)?;
        let expires_at = self.clock.now() + claims.lifetime_secs();

        debug!(token_type, expires_at, "derived token from redirect payload");

        Ok(Some(TokenState {
            token,
            token_type,
            expires_at,
            claims,
        }))
    }

    /// Set the token slot, mirroring the change to durable storage when
    /// persistence is enabled and the backend is available.
    ///
    /// `None` clears the durable entry, equivalent to explicit removal.
    /// Returns what was set.
    pub fn set_token(&self, state: Option<TokenState>) -> TokenResult<Option<TokenState>> {
        let mut slot = self.slot.lock().unwrap();

        if self.durable_storage_ready("set") {
            match &state {
                Some(state) => self.storage.set(&self.config.storage_key, state)?,
                None => self.storage.remove(&self.config.storage_key)?,
            }
        }

        slot.state = state;
        slot.storage_checked = true;
        Ok(slot.state.clone())
    }

    /// Get the current token state.
    ///
    /// When the slot is empty and persistence is enabled and available, the
    /// backing store is read once; the attempt is recorded before the read,
    /// so it is never retried — even when the store held nothing. Memory is
    /// authoritative afterwards.
    pub fn get_token(&self) -> TokenResult<Option<TokenState>> {
        let mut slot = self.slot.lock().unwrap();

        if slot.state.is_none() && !slot.storage_checked && self.durable_storage_ready("get") {
            slot.storage_checked = true;
            slot.state = self.storage.get(&self.config.storage_key)?;
        }

        Ok(slot.state.clone())
    }

    /// The raw token value, if a token is present.
    pub fn get_id_token(&self) -> TokenResult<Option<String>> {
        Ok(self.get_token()?.map(|state| state.token))
    }

    /// The token type, if a token is present.
    pub fn get_token_type(&self) -> TokenResult<Option<String>> {
        Ok(self.get_token()?.map(|state| state.token_type))
    }

    /// Authorization header value for the current token.
    ///
    /// Empty string when either token value or type is absent.
    pub fn get_authorization_header(&self) -> TokenResult<String> {
        Ok(match self.get_token()? {
            Some(state) if !state.token.is_empty() && !state.token_type.is_empty() => {
                state.authorization_header()
            }
            _ => String::new(),
        })
    }

    /// Seconds until the held token should be renewed:
    /// `expires_at - now - (expire_offset_secs + 30)`.
    ///
    /// Requires an active token; fails with [`TokenError::NoActiveToken`]
    /// otherwise. Reads the slot directly and performs no lazy load.
    pub fn get_token_expiration_time(&self) -> TokenResult<i64> {
        let slot = self.slot.lock().unwrap();
        let state = slot.state.as_ref().ok_or(TokenError::NoActiveToken)?;

        let offset = self.config.expire_offset_secs as i64 + RENEWAL_BUFFER_SECS;
        Ok(state.expires_at - self.clock.now() - offset)
    }

    /// Clear the token slot.
    ///
    /// The durable entry is removed when a token was present and
    /// persistence is enabled and available.
    pub fn remove_token(&self) -> TokenResult<()> {
        let mut slot = self.slot.lock().unwrap();

        if slot.state.is_some() && self.durable_storage_ready("remove") {
            self.storage.remove(&self.config.storage_key)?;
        }

        slot.state = None;
        slot.storage_checked = true;
        debug!("removed token");
        Ok(())
    }

    /// Whether the current token is usable.
    ///
    /// `false` with no token; otherwise `true` iff `expires_at` lies
    /// strictly after `now + expire_offset_secs`. The single source of
    /// truth for validity.
    pub fn is_token_valid(&self) -> TokenResult<bool> {
        Ok(match self.get_token()? {
            Some(state) => state.expires_at > self.clock.now() + self.config.expire_offset_secs as i64,
            None => false,
        })
    }

    /// Probe the durable backend before an access; degradation to
    /// memory-only behavior is silent at the API boundary.
    fn durable_storage_ready(&self, op: &str) -> bool {
        if !self.config.persist_to_storage {
            return false;
        }
        if self.storage.is_available() {
            return true;
        }
        warn!(op, "durable storage unavailable, continuing memory-only");
        false
    }
}

/// Create a token manager over in-memory storage with the default JWT
/// decoder and system clock.
pub fn create_token_manager(
    config: TokenConfig,
) -> TokenManager<JwtClaimsDecoder, InMemoryTokenStorage> {
    TokenManager::new(config, JwtClaimsDecoder::new(), InMemoryTokenStorage::new())
}

/// Create a token manager over file-backed storage with the default JWT
/// decoder and system clock.
pub fn create_file_backed_token_manager(
    config: TokenConfig,
    dir: impl Into<std::path::PathBuf>,
) -> TokenManager<JwtClaimsDecoder, FileTokenStorage> {
    TokenManager::new(config, JwtClaimsDecoder::new(), FileTokenStorage::new(dir))
}
