use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Full user row. Never serialized: responses go through [`UserPublic`] so
/// the password hash and verification code stay server-side.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub password_hash: String,
    pub verification_code: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            mobile: user.mobile,
            address: user.address,
            dob: user.dob,
            gender: user.gender,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub zip: String,
    pub city: String,
    pub country: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub mrp: f64,
    pub discount_pct: f64,
    /// Derived: `mrp * discount_pct * qty / 100`.
    pub discount_amount: f64,
    /// Derived: `mrp * qty`.
    pub rate: f64,
    pub qty: f64,
    /// Derived: `rate - discount_amount`.
    pub total: f64,
    pub client_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An inventory item with its owning client embedded, as returned by the
/// sold-yesterday report. The client may be gone: references are allowed to
/// dangle.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemWithClient {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub client: Option<Client>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Due,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Due => "due",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "paid" => Ok(PaymentStatus::Paid),
            "due" => Ok(PaymentStatus::Due),
            other => Err(AppError::Validation(format!(
                "Invalid payment status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub invoice_number: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub date: DateTime<Utc>,
    pub client_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: Uuid,
    pub image_name: String,
    /// URL on the blob host, never a local path.
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}
