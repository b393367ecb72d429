//! Core Infrastructure
//!
//! Infrastructure seams consumed by the token lifecycle manager.

pub mod clock;
pub mod jwt;

pub use clock::{Clock, MockClock, SystemClock};
pub use jwt::{create_jwt_claims_decoder, ClaimsDecoder, JwtClaimsDecoder, MockClaimsDecoder};
