use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{
    error::AppError,
    session::{SESSION_COOKIE, decode_token},
    state::AppState,
};

/// An authenticated session: the bound user plus the exact token presented,
/// so logout can revoke that token server-side.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub token: String,
}

pub(crate) fn unauthorized() -> AppError {
    AppError::Unauthorized("Unauthorized token provided".to_string())
}

/// Pull the session token from the `session` cookie, falling back to an
/// `Authorization: Bearer` header.
fn token_from_parts(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    let auth_str = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

impl<S> FromRequestParts<S> for AuthSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    // Missing token, bad signature, unknown user and revoked token all
    // collapse into the same Unauthorized response.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = token_from_parts(parts).ok_or_else(unauthorized)?;
        let user_id = decode_token(&state.keys, &token).ok_or_else(unauthorized)?;

        if !state.sessions.contains(user_id, &token).await? {
            return Err(unauthorized());
        }

        Ok(AuthSession { user_id, token })
    }
}
