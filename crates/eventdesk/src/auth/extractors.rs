use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use super::{AuthError, TokenClaims, TokenService, TOKEN_COOKIE};

/// Extractor that requires a valid access token cookie.
///
/// Rejects with 401 if the cookie is missing, tampered with or expired.
#[derive(Debug, Clone)]
pub struct VerifiedToken(pub TokenClaims);

impl<S> FromRequestParts<S> for VerifiedToken
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(TOKEN_COOKIE).ok_or(AuthError::MissingToken)?;

        tokens.verify(cookie.value()).map(VerifiedToken)
    }
}
