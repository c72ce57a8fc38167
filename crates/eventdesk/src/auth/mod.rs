//! Access tokens: HS256 JWTs carried in an httpOnly cookie.
//!
//! - [`TokenService`] signs and verifies tokens
//! - [`VerifiedToken`] is an extractor that rejects requests without a valid token

mod error;
mod extractors;
mod token;

pub use error::AuthError;
pub use extractors::VerifiedToken;
pub use token::{TokenClaims, TokenService};

/// Name of the cookie holding the access token.
pub const TOKEN_COOKIE: &str = "token";
