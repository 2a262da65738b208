use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendInvoiceRequest {
    pub email: String,
    /// Arbitrary invoice document, forwarded verbatim to the renderer.
    #[schema(value_type = Object)]
    pub invoice_data: serde_json::Value,
}
