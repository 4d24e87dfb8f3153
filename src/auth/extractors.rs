use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState};

/// Authenticated caller, resolved from the auth cookie (or a Bearer header).
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, &state.config.cookie.name)
            .ok_or_else(|| AppError::Unauthorized("Access token not found".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = match keys.verify(&token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                return Err(AppError::Unauthorized("Invalid or expired token".into()));
            }
        };

        // Tokens outlive deleted accounts.
        if state.users.find_by_id(claims.sub).await?.is_none() {
            warn!(user_id = %claims.sub, "token for unknown user");
            return Err(AppError::Unauthorized("Could not validate credentials".into()));
        }

        Ok(AuthUser(claims.sub))
    }
}

fn token_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}
