use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    middleware::json::AppJson,
    models::ContactMessage,
    services::contact_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/contacts", get(list_messages).post(create_message))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "All contact messages", body = [ContactMessage]),
    ),
    tag = "Contacts"
)]
pub async fn list_messages(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ContactMessage>>> {
    let messages = contact_service::list_messages(&state).await?;
    Ok(Json(messages))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Stored contact message", body = ContactMessage),
    ),
    tag = "Contacts"
)]
pub async fn create_message(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContactRequest>,
) -> AppResult<(StatusCode, Json<ContactMessage>)> {
    let message = contact_service::create_message(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
