//! Bearer-token gate for user-facing routes.
//!
//! Tokens are issued by the hosted auth provider; this service only checks
//! signature and expiry and takes the caller's identity from `sub`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use photoai_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity, available to any handler that takes it as a parameter.
/// Rejects with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Auth provider subject, e.g. `user_2abc...`.
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;

        if claims.sub.trim().is_empty() {
            return Err(CoreError::Unauthorized("Token has no subject".into()).into());
        }

        Ok(Self {
            user_id: claims.sub,
        })
    }
}

/// Pull the token out of `Authorization: Bearer <token>`. The scheme is
/// matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| CoreError::Unauthorized("Malformed Authorization header".into()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(CoreError::Unauthorized(
            "Expected Authorization: Bearer <token>".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token_after_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer  abc.def ")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_or_foreign_scheme() {
        assert_matches!(bearer_token(&HeaderMap::new()), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("Basic dXNlcg==")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("Bearer ")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("abc.def")), Err(CoreError::Unauthorized(_)));
    }
}
