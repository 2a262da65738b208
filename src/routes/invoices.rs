use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::invoices::SendInvoiceRequest,
    error::AppResult,
    middleware::json::AppJson,
    response::Message,
    services::invoice_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/send-invoice", post(send_invoice))
}

#[utoipa::path(
    post,
    path = "/send-invoice",
    request_body = SendInvoiceRequest,
    responses(
        (status = 200, description = "Invoice rendered and mailed", body = Message),
        (status = 500, description = "Rendering or delivery failed"),
    ),
    tag = "Invoices"
)]
pub async fn send_invoice(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SendInvoiceRequest>,
) -> AppResult<Json<Message>> {
    let resp = invoice_service::send_invoice(&state, payload).await?;
    Ok(Json(resp))
}
