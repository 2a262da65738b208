use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::images::UploadResponse,
    error::{AppError, AppResult},
    models::ImageRecord,
    services::image_service,
    state::AppState,
};

/// Multipart field that carries the file.
const UPLOAD_FIELD: &str = "profilePicture";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/images", get(list_images))
}

#[utoipa::path(
    post,
    path = "/upload",
    responses(
        (status = 201, description = "Image stored on the blob host", body = UploadResponse),
        (status = 400, description = "No file in the form"),
        (status = 500, description = "Blob upload failed"),
    ),
    tag = "Images"
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(err.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::Validation(err.to_string()))?;

        let image = image_service::store_profile_picture(&state, &file_name, &bytes).await?;
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                status: "success".to_string(),
                image,
            }),
        ));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

#[utoipa::path(
    get,
    path = "/images",
    responses(
        (status = 200, description = "All stored images", body = [ImageRecord]),
    ),
    tag = "Images"
)]
pub async fn list_images(State(state): State<AppState>) -> AppResult<Json<Vec<ImageRecord>>> {
    let images = image_service::list_images(&state).await?;
    Ok(Json(images))
}
