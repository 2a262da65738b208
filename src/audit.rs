use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

/// Append a row to the audit trail. Auditing never fails the request that
/// triggered it; insert errors are logged and swallowed here so callers can
/// fire and forget.
pub async fn record(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) {
    let outcome = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await;

    if let Err(err) = outcome {
        tracing::warn!(error = %err, action, "audit insert failed");
    }
}
