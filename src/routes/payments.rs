use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::payments::{
        CreatePaymentRequest, PaymentSummary, UpdatePaymentRequest, UpdatePaymentStatusRequest,
    },
    error::AppResult,
    middleware::json::AppJson,
    models::Payment,
    response::Message,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addPayments", post(create_payment))
        .route("/allPayments", get(list_payments))
        .route(
            "/payments/{id}",
            get(payments_for_client)
                .put(update_payment)
                .delete(delete_payment),
        )
        .route("/updatePaymentStatus/{id}", put(update_payment_status))
        .route("/payment-summary", get(payment_summary))
}

#[utoipa::path(
    post,
    path = "/addPayments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Recorded payment", body = Payment),
        (status = 400, description = "Invalid status value"),
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let payment = payment_service::create_payment(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/allPayments",
    responses(
        (status = 200, description = "All payments", body = [Payment]),
    ),
    tag = "Payments"
)]
pub async fn list_payments(State(state): State<AppState>) -> AppResult<Json<Vec<Payment>>> {
    let payments = payment_service::list_payments(&state).await?;
    Ok(Json(payments))
}

#[utoipa::path(
    get,
    path = "/payments/{clientId}",
    params(
        ("clientId" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Payments recorded for the client", body = [Payment]),
    ),
    tag = "Payments"
)]
pub async fn payments_for_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Vec<Payment>>> {
    let payments = payment_service::list_payments_for_client(&state, client_id).await?;
    Ok(Json(payments))
}

#[utoipa::path(
    put,
    path = "/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Updated payment", body = Payment),
        (status = 404, description = "No such payment"),
    ),
    tag = "Payments"
)]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdatePaymentRequest>,
) -> AppResult<Json<Payment>> {
    let payment = payment_service::update_payment(&state, id, payload).await?;
    Ok(Json(payment))
}

#[utoipa::path(
    delete,
    path = "/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment deleted", body = Message),
        (status = 404, description = "No such payment"),
    ),
    tag = "Payments"
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    payment_service::delete_payment(&state, id).await?;
    Ok(Json(Message::new("Payment deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/updatePaymentStatus/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment ID")
    ),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment with the new status", body = Payment),
        (status = 404, description = "No such payment"),
    ),
    tag = "Payments"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdatePaymentStatusRequest>,
) -> AppResult<Json<Payment>> {
    let payment = payment_service::update_payment_status(&state, id, payload).await?;
    Ok(Json(payment))
}

#[utoipa::path(
    get,
    path = "/payment-summary",
    responses(
        (status = 200, description = "Sum of all payment amounts", body = PaymentSummary),
    ),
    tag = "Payments"
)]
pub async fn payment_summary(State(state): State<AppState>) -> AppResult<Json<PaymentSummary>> {
    let total_amount = payment_service::payment_summary(&state).await?;
    Ok(Json(PaymentSummary { total_amount }))
}
