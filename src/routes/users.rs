use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, VerifyEmailRequest},
    error::AppResult,
    middleware::{auth::AuthSession, json::AppJson},
    models::UserPublic,
    response::StatusMessage,
    services::user_service,
    session::{SESSION_COOKIE, SESSION_TTL_DAYS},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/verify-email", post(verify_email))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/logout", get(logout))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, verification mail sent", body = StatusMessage),
        (status = 400, description = "Email already registered"),
        (status = 500, description = "Verification mail could not be sent"),
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<StatusMessage>)> {
    let resp = user_service::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = StatusMessage),
        (status = 400, description = "Wrong verification code"),
        (status = 404, description = "Unknown email"),
    ),
    tag = "Users"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyEmailRequest>,
) -> AppResult<Json<StatusMessage>> {
    let resp = user_service::verify_email(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued, cookie set", body = LoginResponse),
        (status = 401, description = "Bad credentials or unverified email"),
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let resp = user_service::login(&state, payload).await?;
    let jar = jar.add(session_cookie(resp.result.token.clone()));
    Ok((jar, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The signed-in user", body = UserPublic),
        (status = 401, description = "No valid session"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn profile(
    State(state): State<AppState>,
    session: AuthSession,
) -> AppResult<Json<UserPublic>> {
    let user = user_service::profile(&state, &session).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Session revoked, cookie cleared", body = StatusMessage),
        (status = 401, description = "No valid session"),
    ),
    security(("cookie_auth" = [])),
    tag = "Users"
)]
pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<StatusMessage>)> {
    let resp = user_service::logout(&state, &session).await?;
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok((jar, Json(resp)))
}
