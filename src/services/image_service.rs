use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    audit,
    error::{AppError, AppResult},
    models::ImageRecord,
    state::AppState,
};

/// Scratch copy of an upload. Owns the path from before the write happens,
/// so a partial write is removed the same way a fully transferred one is.
struct TempUpload {
    path: PathBuf,
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            // A write that failed before creating the file leaves nothing to
            // remove.
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    error = %err,
                    path = %self.path.display(),
                    "failed to remove upload scratch file"
                );
            }
        }
    }
}

pub async fn list_images(state: &AppState) -> AppResult<Vec<ImageRecord>> {
    let images = sqlx::query_as::<_, ImageRecord>("SELECT * FROM images ORDER BY created_at")
        .fetch_all(&state.pool)
        .await?;
    Ok(images)
}

/// Spools the uploaded bytes to the upload directory, hands the file to blob
/// storage and records the returned URL. The image row stores the durable
/// URL, never the local path.
pub async fn store_profile_picture(
    state: &AppState,
    file_name: &str,
    bytes: &[u8],
) -> AppResult<ImageRecord> {
    // Client-sent names are untrusted: keep only the final path component.
    let file_name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Validation("Invalid file name".to_string()))?;

    let local_path = state.upload_dir.join(file_name);
    let _guard = TempUpload {
        path: local_path.clone(),
    };
    tokio::fs::write(&local_path, bytes)
        .await
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;

    let blob = match state.blob.upload(&local_path).await {
        Ok(blob) => blob,
        Err(err) => {
            tracing::error!(error = %err, "blob upload failed");
            return Err(AppError::Collaborator("Error uploading image".to_string()));
        }
    };

    let image = sqlx::query_as::<_, ImageRecord>(
        "INSERT INTO images (id, image_name, image_url) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(file_name)
    .bind(blob.url)
    .fetch_one(&state.pool)
    .await?;

    audit::record(
        &state.pool,
        None,
        "image_upload",
        Some("images"),
        Some(serde_json::json!({ "image_id": image.id })),
    )
    .await;

    Ok(image)
}
