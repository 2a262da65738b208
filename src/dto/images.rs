use serde::Serialize;
use utoipa::ToSchema;

use crate::models::ImageRecord;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub status: String,
    pub image: ImageRecord,
}
