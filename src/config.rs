use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Signing secret for session tokens. Required: there is deliberately no
    /// built-in fallback value.
    pub session_secret: String,
    pub cors_origin: String,
    pub upload_dir: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub mail_from: String,
    pub blob_api_url: String,
    pub blob_api_key: Option<String>,
    pub renderer_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let session_secret = env::var("SESSION_SECRET").context("SESSION_SECRET is not set")?;
        if session_secret.trim().is_empty() {
            anyhow::bail!("SESSION_SECRET must not be empty");
        }

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        let smtp_host = env::var("SMTP_HOST").context("SMTP_HOST is not set")?;
        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(587);
        let smtp_user = env::var("SMTP_USER").ok();
        let smtp_pass = env::var("SMTP_PASS").ok();
        let mail_from = env::var("MAIL_FROM").context("MAIL_FROM is not set")?;

        let blob_api_url = env::var("BLOB_API_URL").context("BLOB_API_URL is not set")?;
        let blob_api_key = env::var("BLOB_API_KEY").ok();
        let renderer_api_url =
            env::var("RENDERER_API_URL").context("RENDERER_API_URL is not set")?;

        Ok(Self {
            database_url,
            host,
            port,
            session_secret,
            cors_origin,
            upload_dir,
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_pass,
            mail_from,
            blob_api_url,
            blob_api_key,
            renderer_api_url,
        })
    }
}
