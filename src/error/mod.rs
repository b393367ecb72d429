//! Token Lifecycle Error Types
//!
//! Error hierarchy for bearer token lifecycle operations.

use thiserror::Error;

/// Root error type for token lifecycle operations.
#[derive(Error, Debug)]
pub enum OAuthTokenError {
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl OAuthTokenError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Token(_) => "TOKEN_STATE",
            Self::Decode(_) => "TOKEN_DECODE",
            Self::Storage(_) => "TOKEN_STORAGE",
        }
    }

    /// Check if error requires a new authorization redirect.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Token(TokenError::NoActiveToken) => true,
            Self::Decode(_) => true,
            Self::Storage(_) => false,
        }
    }
}

/// Token state error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("No active token held by the manager")]
    NoActiveToken,
}

/// Token decoding error.
///
/// Raised when a compact token string cannot be turned into a claim set.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed token: {message}")]
    InvalidFormat { message: String },

    #[error("Malformed token payload encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Malformed token claims: {message}")]
    InvalidClaims { message: String },
}

/// Durable storage error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Delete failed: {message}")]
    DeleteFailed { message: String },
}

/// Result type for token lifecycle operations.
pub type TokenResult<T> = Result<T, OAuthTokenError>;
