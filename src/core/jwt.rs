//! JWT Claims Decoding
//!
//! Turns a compact token string into its decoded claim set. Signature
//! verification is out of scope; only the payload segment is interpreted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::sync::Mutex;

use crate::error::DecodeError;
use crate::types::JwtClaims;

/// Claims decoder interface.
pub trait ClaimsDecoder: Send + Sync {
    /// Decode a compact token string into its claim set.
    fn decode(&self, token: &str) -> Result<JwtClaims, DecodeError>;
}

/// Default JWT claims decoder.
///
/// Accepts the compact serialization `header.payload[.signature]` — two
/// segments for unsecured tokens, three for signed ones — and parses the
/// base64url-encoded (unpadded, RFC 7515) payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct JwtClaimsDecoder;

impl JwtClaimsDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }
}

impl ClaimsDecoder for JwtClaimsDecoder {
    fn decode(&self, token: &str) -> Result<JwtClaims, DecodeError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() < 2 || segments.len() > 3 {
            return Err(DecodeError::InvalidFormat {
                message: format!(
                    "expected compact serialization with 2 or 3 segments, got {}",
                    segments.len()
                ),
            });
        }

        let payload = URL_SAFE_NO_PAD.decode(segments[1])?;

        serde_json::from_slice(&payload).map_err(|e| DecodeError::InvalidClaims {
            message: e.to_string(),
        })
    }
}

/// Mock claims decoder for testing.
#[derive(Default)]
pub struct MockClaimsDecoder {
    claims: Mutex<Option<JwtClaims>>,
    next_error: Mutex<Option<DecodeError>>,
    decode_history: Mutex<Vec<String>>,
}

impl MockClaimsDecoder {
    /// Create a new mock decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the claims returned by every subsequent decode.
    pub fn set_claims(&self, claims: JwtClaims) -> &Self {
        *self.claims.lock().unwrap() = Some(claims);
        self
    }

    /// Set an error for the next decode.
    pub fn set_next_error(&self, error: DecodeError) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Get decode call history.
    pub fn get_decode_history(&self) -> Vec<String> {
        self.decode_history.lock().unwrap().clone()
    }
}

impl ClaimsDecoder for MockClaimsDecoder {
    fn decode(&self, token: &str) -> Result<JwtClaims, DecodeError> {
        self.decode_history.lock().unwrap().push(token.to_string());

        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }

        self.claims
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DecodeError::InvalidFormat {
                message: "mock decoder has no claims configured".to_string(),
            })
    }
}

impl<D: ClaimsDecoder> ClaimsDecoder for std::sync::Arc<D> {
    fn decode(&self, token: &str) -> Result<JwtClaims, DecodeError> {
        self.as_ref().decode(token)
    }
}

/// Create the default JWT claims decoder.
pub fn create_jwt_claims_decoder() -> JwtClaimsDecoder {
    JwtClaimsDecoder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_token(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#);
        format!("{}.{}.", header, URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_decode_valid_token() {
        let token = encode_token(r#"{"exp":1700003600,"iat":1700000000,"sub":"user-1"}"#);
        let claims = JwtClaimsDecoder::new().decode(&token).unwrap();

        assert_eq!(claims.exp, 1700003600);
        assert_eq!(claims.iat, 1700000000);
        assert_eq!(claims.sub, Some("user-1".to_string()));
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        let result = JwtClaimsDecoder::new().decode("not-a-jwt");
        assert!(matches!(result, Err(DecodeError::InvalidFormat { .. })));

        let result = JwtClaimsDecoder::new().decode("a.b.c.d");
        assert!(matches!(result, Err(DecodeError::InvalidFormat { .. })));
    }

    #[test]
    fn test_decode_rejects_bad_encoding() {
        let result = JwtClaimsDecoder::new().decode("header.!!not-base64!!.sig");
        assert!(matches!(result, Err(DecodeError::InvalidEncoding(_))));
    }

    #[test]
    fn test_decode_rejects_missing_required_claims() {
        let token = encode_token(r#"{"sub":"user-1"}"#);
        let result = JwtClaimsDecoder::new().decode(&token);
        assert!(matches!(result, Err(DecodeError::InvalidClaims { .. })));
    }

    #[test]
    fn test_mock_decoder_history_and_error() {
        let decoder = MockClaimsDecoder::new();
        decoder.set_next_error(DecodeError::InvalidFormat {
            message: "boom".to_string(),
        });

        assert!(decoder.decode("tok-1").is_err());

        let history = decoder.get_decode_history();
        assert_eq!(history, vec!["tok-1".to_string()]);
    }
}
