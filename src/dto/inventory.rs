use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateItemRequest {
    pub item_code: String,
    pub item_name: String,
    pub mrp: f64,
    pub discount_pct: f64,
    pub qty: f64,
    pub client_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateItemRequest {
    pub item_code: String,
    pub item_name: String,
    pub mrp: f64,
    pub discount_pct: f64,
    pub qty: f64,
    pub client_id: Uuid,
}

/// Body carried by item deletes so ownership can be checked.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OwnedItemRequest {
    pub client_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalSum {
    pub total_sum: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySum {
    pub weekly_sum: f64,
}
