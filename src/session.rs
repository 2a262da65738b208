use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
};

/// Cookie holding the session token.
pub const SESSION_COOKIE: &str = "session";

/// Sessions live for 300 days, both in the cookie and in the token signature.
pub const SESSION_TTL_DAYS: i64 = 300;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Issuance time (unix seconds).
    pub iat: usize,
    /// Expiry (unix seconds).
    pub exp: usize,
}

/// HS256 key pair derived from the configured session secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "stored password hash is unparseable");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Sign a token binding `user_id` and the issuance time.
pub fn issue_token(keys: &SessionKeys, user_id: Uuid) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(SESSION_TTL_DAYS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok(token)
}

/// Verify signature and embedded expiry, yielding the bound user id. Every
/// failure collapses to `None` so callers cannot distinguish why.
pub fn decode_token(keys: &SessionKeys, token: &str) -> Option<Uuid> {
    let decoded = decode::<Claims>(token, &keys.decoding, &Validation::default()).ok()?;
    Uuid::parse_str(&decoded.claims.sub).ok()
}

/// The per-user set of live session tokens, backed by the `session_tokens`
/// table. A signature-valid token that is absent here has been revoked.
#[derive(Clone)]
pub struct SessionStore {
    pool: DbPool,
}

impl SessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        // Two logins in the same second mint byte-identical tokens; adding an
        // element the set already holds is a no-op.
        sqlx::query(
            "INSERT INTO session_tokens (id, user_id, token) VALUES ($1, $2, $3) \
             ON CONFLICT (token) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove(&self, user_id: Uuid, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn contains(&self, user_id: Uuid, token: &str) -> AppResult<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM session_tokens WHERE user_id = $1 AND token = $2)",
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }
}
