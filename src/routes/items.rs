use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::inventory::{
        CreateItemRequest, OwnedItemRequest, TotalSum, UpdateItemRequest, WeeklySum,
    },
    error::AppResult,
    middleware::json::AppJson,
    models::{InventoryItem, ItemWithClient},
    response::Message,
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/create", post(create_item))
        .route("/items/{id}", put(update_item))
        .route("/items/{id}", delete(delete_item))
        .route("/total-sum", get(total_sum))
        .route("/weekly-sum", get(weekly_sum))
        .route("/inventory/sold-yesterday", get(sold_yesterday))
}

#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "All inventory items", body = [InventoryItem]),
    ),
    tag = "Inventory"
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = inventory_service::list_items(&state).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Created item with derived amounts", body = InventoryItem),
        (status = 400, description = "Invalid figures"),
    ),
    tag = "Inventory"
)]
pub async fn create_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateItemRequest>,
) -> AppResult<Json<InventoryItem>> {
    let item = inventory_service::create_item(&state, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = InventoryItem),
        (status = 404, description = "No such item for that client"),
    ),
    tag = "Inventory"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateItemRequest>,
) -> AppResult<Json<InventoryItem>> {
    let item = inventory_service::update_item(&state, id, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = OwnedItemRequest,
    responses(
        (status = 200, description = "Item deleted", body = Message),
        (status = 404, description = "No such item for that client"),
    ),
    tag = "Inventory"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<OwnedItemRequest>,
) -> AppResult<Json<Message>> {
    inventory_service::delete_item(&state, id, payload.client_id).await?;
    Ok(Json(Message::new("Item deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/total-sum",
    responses(
        (status = 200, description = "Sum of all item totals", body = TotalSum),
    ),
    tag = "Inventory"
)]
pub async fn total_sum(State(state): State<AppState>) -> AppResult<Json<TotalSum>> {
    let total_sum = inventory_service::total_sum(&state).await?;
    Ok(Json(TotalSum { total_sum }))
}

#[utoipa::path(
    get,
    path = "/weekly-sum",
    responses(
        (status = 200, description = "Item totals from the day one week ago", body = WeeklySum),
    ),
    tag = "Inventory"
)]
pub async fn weekly_sum(State(state): State<AppState>) -> AppResult<Json<WeeklySum>> {
    let weekly_sum = inventory_service::weekly_sum(&state).await?;
    Ok(Json(WeeklySum { weekly_sum }))
}

#[utoipa::path(
    get,
    path = "/inventory/sold-yesterday",
    responses(
        (status = 200, description = "Items created yesterday, each with its client", body = [ItemWithClient]),
    ),
    tag = "Inventory"
)]
pub async fn sold_yesterday(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ItemWithClient>>> {
    let items = inventory_service::sold_yesterday(&state).await?;
    Ok(Json(items))
}
