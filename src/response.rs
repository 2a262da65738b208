use serde::Serialize;
use utoipa::ToSchema;

/// `{ "status": 200, "message": ".." }` confirmation body, used by
/// registration, verification and logout.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusMessage {
    pub status: u16,
    pub message: String,
}

impl StatusMessage {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Bare `{ "message": ".." }` body for delete confirmations and the like.
#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
