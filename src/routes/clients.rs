use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::json::AppJson,
    models::Client,
    response::Message,
    services::client_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ClientRequest {
    pub name: String,
    pub address: String,
    pub zip: String,
    pub city: String,
    pub country: String,
    pub email: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route("/clients/{id}", put(update_client).delete(delete_client))
}

#[utoipa::path(
    get,
    path = "/clients",
    responses(
        (status = 200, description = "All clients", body = [Client]),
    ),
    tag = "Clients"
)]
pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    let clients = client_service::list_clients(&state).await?;
    Ok(Json(clients))
}

#[utoipa::path(
    post,
    path = "/clients",
    request_body = ClientRequest,
    responses(
        (status = 201, description = "Created client", body = Client),
    ),
    tag = "Clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ClientRequest>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = client_service::create_client(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    request_body = ClientRequest,
    responses(
        (status = 200, description = "Updated client", body = Client),
        (status = 404, description = "No such client"),
    ),
    tag = "Clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<ClientRequest>,
) -> AppResult<Json<Client>> {
    let client = client_service::update_client(&state, id, payload).await?;
    Ok(Json(client))
}

#[utoipa::path(
    delete,
    path = "/clients/{id}",
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client deleted; items and payments keep their reference", body = Message),
        (status = 404, description = "No such client"),
    ),
    tag = "Clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    client_service::delete_client(&state, id).await?;
    Ok(Json(Message::new("Client deleted successfully")))
}
