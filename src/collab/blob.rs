use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Blob storage collaborator: takes a local file, returns a durable URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, path: &Path) -> anyhow::Result<StoredBlob>;
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub url: String,
}

/// Uploads to a Cloudinary-style HTTP endpoint and reads back `secure_url`.
pub struct HttpBlobStore {
    http: reqwest::Client,
    upload_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct UploadReply {
    secure_url: String,
}

impl HttpBlobStore {
    pub fn new(upload_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url,
            api_key,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(&self, path: &Path) -> anyhow::Result<StoredBlob> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .context("upload path has no file name")?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(key) = &self.api_key {
            form = form.text("api_key", key.clone());
        }

        let reply: UploadReply = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .context("blob upload request failed")?
            .error_for_status()
            .context("blob host rejected the upload")?
            .json()
            .await
            .context("blob host reply was not the expected JSON")?;

        Ok(StoredBlob {
            url: reply.secure_url,
        })
    }
}
