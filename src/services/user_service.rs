use rand::{Rng, distributions::Alphanumeric};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{LoginRequest, LoginResponse, LoginResult, RegisterRequest, VerifyEmailRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthSession, unauthorized},
    models::{User, UserPublic},
    response::StatusMessage,
    session::{hash_password, issue_token, verify_password},
    state::AppState,
};

const VERIFICATION_CODE_LEN: usize = 8;

fn generate_verification_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFICATION_CODE_LEN)
        .map(char::from)
        .collect()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
        }
        _ => false,
    }
}

/// Registers a new account. The verification mail goes out before anything
/// is persisted: if delivery fails, no user row exists afterwards.
pub async fn register(state: &AppState, payload: RegisterRequest) -> AppResult<StatusMessage> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let verification_code = generate_verification_code();

    if let Err(err) = state
        .mailer
        .send(
            &payload.email,
            "Verify your email address",
            &format!("Your verification code is: {verification_code}"),
            None,
        )
        .await
    {
        tracing::error!(error = %err, "verification mail failed");
        return Err(AppError::Collaborator(
            "Could not send verification email".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let id = Uuid::new_v4();

    let inserted = sqlx::query(
        r#"
        INSERT INTO users
            (id, first_name, last_name, email, mobile, address, dob, gender,
             password_hash, verification_code, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE)
        "#,
    )
    .bind(id)
    .bind(payload.first_name)
    .bind(payload.last_name)
    .bind(payload.email.as_str())
    .bind(payload.mobile)
    .bind(payload.address)
    .bind(payload.dob)
    .bind(payload.gender)
    .bind(password_hash)
    .bind(verification_code)
    .execute(&state.pool)
    .await;

    // Two registrations can pass the SELECT above at the same time; the
    // UNIQUE index on email picks the loser here.
    if let Err(err) = inserted {
        if is_unique_violation(&err) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        return Err(err.into());
    }

    audit::record(
        &state.pool,
        Some(id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    )
    .await;

    Ok(StatusMessage::new(201, "User created successfully"))
}

pub async fn verify_email(
    state: &AppState,
    payload: VerifyEmailRequest,
) -> AppResult<StatusMessage> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(&state.pool)
        .await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    if user.verification_code != payload.verification_code {
        return Err(AppError::Validation("Invalid verification code".to_string()));
    }

    sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(&state.pool)
        .await?;

    audit::record(&state.pool, Some(user.id), "email_verified", Some("users"), None).await;

    Ok(StatusMessage::new(200, "Email verified successfully"))
}

/// Checks credentials, refuses unverified accounts, then issues a session
/// token and records it in the user's token set. Wrong email and wrong
/// password are indistinguishable from the outside.
pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(&state.pool)
        .await?;
    let user = match user {
        Some(u) => u,
        None => {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_verified {
        return Err(AppError::Unauthorized("Email not verified".to_string()));
    }

    let token = issue_token(&state.keys, user.id)?;
    state.sessions.add(user.id, &token).await?;

    audit::record(&state.pool, Some(user.id), "user_login", Some("users"), None).await;

    Ok(LoginResponse {
        status: 200,
        result: LoginResult {
            user: user.into(),
            token,
        },
    })
}

pub async fn profile(state: &AppState, session: &AuthSession) -> AppResult<UserPublic> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(session.user_id)
        .fetch_optional(&state.pool)
        .await?;
    // A live session for a vanished user reads as no session at all.
    let user = match user {
        Some(u) => u,
        None => return Err(unauthorized()),
    };
    Ok(user.into())
}

/// Removes the presented token from the user's token set, so the session is
/// dead server-side even if the cookie survives on a client.
pub async fn logout(state: &AppState, session: &AuthSession) -> AppResult<StatusMessage> {
    state.sessions.remove(session.user_id, &session.token).await?;

    audit::record(
        &state.pool,
        Some(session.user_id),
        "user_logout",
        Some("users"),
        None,
    )
    .await;

    Ok(StatusMessage::new(200, "logout successfully"))
}
