use uuid::Uuid;

use crate::{
    error::AppResult, models::ContactMessage, routes::contacts::ContactRequest, state::AppState,
};

pub async fn list_messages(state: &AppState) -> AppResult<Vec<ContactMessage>> {
    let messages = sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages ORDER BY created_at",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(messages)
}

pub async fn create_message(
    state: &AppState,
    payload: ContactRequest,
) -> AppResult<ContactMessage> {
    let message = sqlx::query_as::<_, ContactMessage>(
        "INSERT INTO contact_messages (id, name, email, message) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name)
    .bind(payload.email)
    .bind(payload.message)
    .fetch_one(&state.pool)
    .await?;
    Ok(message)
}
