//! OAuth Token Lifecycle Integration Module
//!
//! Client-side lifecycle management for a single OAuth2/OIDC bearer token:
//! derive it from an authorization redirect, track its expiration, mirror
//! it to durable storage, and expose it for authenticated requests.
//!
//! # Features
//!
//! - Token derivation from redirect query/fragment parameters
//! - Expiration re-based onto the local clock (issuer clock-skew tolerant)
//! - Offset-based validity evaluation with a separate renewal buffer
//! - Optional durable persistence with runtime availability probing
//! - JWT claim-set decoding (no signature verification)
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth_token_integration::{
//!     create_file_backed_token_manager, RedirectPayload, TokenConfig, TokenConfigOverrides,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut manager = create_file_backed_token_manager(
//!         TokenConfig::default(),
//!         "/var/lib/myapp/tokens",
//!     );
//!     manager.configure(TokenConfigOverrides {
//!         persist_to_storage: Some(true),
//!         ..Default::default()
//!     });
//!
//!     // The authorization server redirected back with the token
//!     let payload = RedirectPayload::from_url_str(
//!         "https://myapp.com/callback#id_token=eyJh...&token_type=bearer",
//!     )?;
//!
//!     if let Some(state) = manager.derive_token(&payload)? {
//!         manager.set_token(Some(state))?;
//!     }
//!
//!     if manager.is_token_valid()? {
//!         let header = manager.get_authorization_header()?;
//!         println!("Authorization: {}", header);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The module is organized into several sub-modules:
//!
//! - `types`: configuration, claim, redirect-payload, and token-state types
//! - `error`: error hierarchy with telemetry codes
//! - `core`: infrastructure seams (clock, JWT claims decoding)
//! - `token`: token lifecycle management (storage backends, manager)

pub mod core;
pub mod error;
pub mod token;
pub mod types;

// Re-export errors
pub use error::{DecodeError, OAuthTokenError, StorageError, TokenError, TokenResult};

// Re-export types
pub use types::{
    // Config
    RedirectParamNames, RedirectParamOverrides, TokenConfig, TokenConfigOverrides,
    DEFAULT_EXPIRE_OFFSET_SECS, DEFAULT_STORAGE_KEY,
    // Claims
    JwtClaims,
    // Redirect
    RedirectPayload,
    // Token
    TokenState,
};

// Re-export core components
pub use core::{
    // Clock
    Clock, MockClock, SystemClock,
    // JWT
    create_jwt_claims_decoder, ClaimsDecoder, JwtClaimsDecoder, MockClaimsDecoder,
};

// Re-export token management
pub use token::{
    // Storage
    create_in_memory_token_storage, create_mock_token_storage, FileTokenStorage,
    InMemoryTokenStorage, MockTokenStorage, TokenStorage,
    // Manager
    create_file_backed_token_manager, create_token_manager, TokenManager, RENEWAL_BUFFER_SECS,
};
