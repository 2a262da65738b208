use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    dto::inventory::{CreateItemRequest, UpdateItemRequest},
    entity::{
        clients::Entity as Clients,
        inventory_items::{
            ActiveModel as ItemActive, Column as ItemCol, Entity as InventoryItems,
            Model as ItemModel,
        },
    },
    error::{AppError, AppResult},
    models::{InventoryItem, ItemWithClient},
    services::client_service::client_from_entity,
    state::AppState,
};

/// Derived amounts for one line item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPricing {
    pub discount_amount: f64,
    pub rate: f64,
    pub total: f64,
}

/// Computes the derived amounts from the caller-supplied figures. The same
/// formula runs on create and on update; derived fields sent by the caller
/// are never trusted.
pub fn price_item(mrp: f64, discount_pct: f64, qty: f64) -> AppResult<ItemPricing> {
    if !mrp.is_finite() || !discount_pct.is_finite() || !qty.is_finite() {
        return Err(AppError::Validation(
            "mrp, discountPct and qty must be finite numbers".to_string(),
        ));
    }
    if mrp <= 0.0 {
        return Err(AppError::Validation(
            "mrp must be greater than zero".to_string(),
        ));
    }
    if qty <= 0.0 {
        return Err(AppError::Validation(
            "qty must be greater than zero".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&discount_pct) {
        return Err(AppError::Validation(
            "discountPct must be between 0 and 100".to_string(),
        ));
    }

    let discount_amount = mrp * discount_pct * qty / 100.0;
    let rate = mrp * qty;
    let total = rate - discount_amount;

    Ok(ItemPricing {
        discount_amount,
        rate,
        total,
    })
}

/// Half-open `[00:00 of `day`, 00:00 of the next day)`.
pub fn day_window(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// The whole of the day before `today`.
pub fn yesterday_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    day_window(today - Duration::days(1))
}

/// The single day exactly one week before `today`.
pub fn week_ago_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    day_window(today - Duration::days(7))
}

pub async fn list_items(state: &AppState) -> AppResult<Vec<InventoryItem>> {
    let items = InventoryItems::find()
        .order_by_asc(ItemCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();
    Ok(items)
}

pub async fn create_item(
    state: &AppState,
    payload: CreateItemRequest,
) -> AppResult<InventoryItem> {
    let pricing = price_item(payload.mrp, payload.discount_pct, payload.qty)?;

    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        item_code: Set(payload.item_code),
        item_name: Set(payload.item_name),
        mrp: Set(payload.mrp),
        discount_pct: Set(payload.discount_pct),
        discount_amount: Set(pricing.discount_amount),
        rate: Set(pricing.rate),
        qty: Set(payload.qty),
        total: Set(pricing.total),
        client_id: Set(payload.client_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(item_from_entity(item))
}

pub async fn update_item(
    state: &AppState,
    id: Uuid,
    payload: UpdateItemRequest,
) -> AppResult<InventoryItem> {
    let pricing = price_item(payload.mrp, payload.discount_pct, payload.qty)?;

    // Scoped to the claimed owner: an id belonging to another client reads
    // as absent.
    let existing = InventoryItems::find()
        .filter(
            Condition::all()
                .add(ItemCol::Id.eq(id))
                .add(ItemCol::ClientId.eq(payload.client_id)),
        )
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(item) => item,
        None => return Err(AppError::NotFound),
    };

    let mut active: ItemActive = existing.into();
    active.item_code = Set(payload.item_code);
    active.item_name = Set(payload.item_name);
    active.mrp = Set(payload.mrp);
    active.discount_pct = Set(payload.discount_pct);
    active.discount_amount = Set(pricing.discount_amount);
    active.rate = Set(pricing.rate);
    active.qty = Set(payload.qty);
    active.total = Set(pricing.total);
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    Ok(item_from_entity(item))
}

pub async fn delete_item(state: &AppState, id: Uuid, client_id: Uuid) -> AppResult<()> {
    let result = InventoryItems::delete_many()
        .filter(
            Condition::all()
                .add(ItemCol::Id.eq(id))
                .add(ItemCol::ClientId.eq(client_id)),
        )
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn total_sum(state: &AppState) -> AppResult<f64> {
    let sum: (f64,) =
        sqlx::query_as("SELECT COALESCE(SUM(total), 0)::float8 FROM inventory_items")
            .fetch_one(&state.pool)
            .await?;
    Ok(sum.0)
}

pub async fn weekly_sum(state: &AppState) -> AppResult<f64> {
    let (start, end) = week_ago_window(Utc::now().date_naive());
    let sum: (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0)::float8 FROM inventory_items
         WHERE created_at >= $1 AND created_at < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(&state.pool)
    .await?;
    Ok(sum.0)
}

pub async fn sold_yesterday(state: &AppState) -> AppResult<Vec<ItemWithClient>> {
    let (start, end) = yesterday_window(Utc::now().date_naive());

    let rows = InventoryItems::find()
        .filter(
            Condition::all()
                .add(ItemCol::CreatedAt.gte(start))
                .add(ItemCol::CreatedAt.lt(end)),
        )
        .order_by_asc(ItemCol::CreatedAt)
        .find_also_related(Clients)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(item, client)| ItemWithClient {
            item: item_from_entity(item),
            client: client.map(client_from_entity),
        })
        .collect();
    Ok(items)
}

fn item_from_entity(model: ItemModel) -> InventoryItem {
    InventoryItem {
        id: model.id,
        item_code: model.item_code,
        item_name: model.item_name,
        mrp: model.mrp,
        discount_pct: model.discount_pct,
        discount_amount: model.discount_amount,
        rate: model.rate,
        qty: model.qty,
        total: model.total,
        client_id: model.client_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
