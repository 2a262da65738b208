use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::payments::{CreatePaymentRequest, UpdatePaymentRequest, UpdatePaymentStatusRequest},
    entity::payments::{
        ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
        Model as PaymentModel,
    },
    error::{AppError, AppResult},
    models::{Payment, PaymentStatus},
    state::AppState,
};

pub async fn create_payment(
    state: &AppState,
    payload: CreatePaymentRequest,
) -> AppResult<Payment> {
    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        invoice_number: Set(payload.invoice_number),
        amount: Set(payload.amount),
        status: Set(payload.status.as_str().to_string()),
        date: Set(payload.date.into()),
        client_id: Set(payload.client_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    payment_from_entity(payment)
}

pub async fn list_payments(state: &AppState) -> AppResult<Vec<Payment>> {
    let payments = Payments::find()
        .order_by_asc(PaymentCol::CreatedAt)
        .all(&state.orm)
        .await?;
    payments.into_iter().map(payment_from_entity).collect()
}

pub async fn list_payments_for_client(
    state: &AppState,
    client_id: Uuid,
) -> AppResult<Vec<Payment>> {
    let payments = Payments::find()
        .filter(PaymentCol::ClientId.eq(client_id))
        .order_by_asc(PaymentCol::CreatedAt)
        .all(&state.orm)
        .await?;
    payments.into_iter().map(payment_from_entity).collect()
}

pub async fn update_payment(
    state: &AppState,
    id: Uuid,
    payload: UpdatePaymentRequest,
) -> AppResult<Payment> {
    let existing = Payments::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(payment) => payment,
        None => return Err(AppError::NotFound),
    };

    let mut active: PaymentActive = existing.into();
    active.invoice_number = Set(payload.invoice_number);
    active.amount = Set(payload.amount);
    active.status = Set(payload.status.as_str().to_string());
    active.date = Set(payload.date.into());
    active.client_id = Set(payload.client_id);
    active.updated_at = Set(Utc::now().into());
    let payment = active.update(&state.orm).await?;

    payment_from_entity(payment)
}

pub async fn update_payment_status(
    state: &AppState,
    id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<Payment> {
    let existing = Payments::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(payment) => payment,
        None => return Err(AppError::NotFound),
    };

    let mut active: PaymentActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let payment = active.update(&state.orm).await?;

    payment_from_entity(payment)
}

pub async fn delete_payment(state: &AppState, id: Uuid) -> AppResult<()> {
    let result = Payments::delete_many()
        .filter(PaymentCol::Id.eq(id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn payment_summary(state: &AppState) -> AppResult<f64> {
    let sum: (f64,) = sqlx::query_as("SELECT COALESCE(SUM(amount), 0)::float8 FROM payments")
        .fetch_one(&state.pool)
        .await?;
    Ok(sum.0)
}

fn payment_from_entity(model: PaymentModel) -> AppResult<Payment> {
    // The CHECK constraint keeps the column in range, but a row edited out
    // of band should fail loudly rather than deserialize garbage.
    let status = PaymentStatus::parse(&model.status)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("payment {} has invalid status", model.id)))?;

    Ok(Payment {
        id: model.id,
        invoice_number: model.invoice_number,
        amount: model.amount,
        status,
        date: model.date.with_timezone(&Utc),
        client_id: model.client_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
