use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    entity::clients::{
        ActiveModel as ClientActive, Column as ClientCol, Entity as Clients, Model as ClientModel,
    },
    error::{AppError, AppResult},
    models::Client,
    routes::clients::ClientRequest,
    state::AppState,
};

pub async fn list_clients(state: &AppState) -> AppResult<Vec<Client>> {
    let clients = Clients::find()
        .order_by_asc(ClientCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(client_from_entity)
        .collect();
    Ok(clients)
}

pub async fn create_client(state: &AppState, payload: ClientRequest) -> AppResult<Client> {
    let client = ClientActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        address: Set(payload.address),
        zip: Set(payload.zip),
        city: Set(payload.city),
        country: Set(payload.country),
        email: Set(payload.email),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(client_from_entity(client))
}

pub async fn update_client(
    state: &AppState,
    id: Uuid,
    payload: ClientRequest,
) -> AppResult<Client> {
    let existing = Clients::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(client) => client,
        None => return Err(AppError::NotFound),
    };

    let mut active: ClientActive = existing.into();
    active.name = Set(payload.name);
    active.address = Set(payload.address);
    active.zip = Set(payload.zip);
    active.city = Set(payload.city);
    active.country = Set(payload.country);
    active.email = Set(payload.email);
    let client = active.update(&state.orm).await?;

    Ok(client_from_entity(client))
}

/// No cascade: the client's items and payments keep their (now dangling)
/// client_id.
pub async fn delete_client(state: &AppState, id: Uuid) -> AppResult<()> {
    let result = Clients::delete_many()
        .filter(ClientCol::Id.eq(id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub(crate) fn client_from_entity(model: ClientModel) -> Client {
    Client {
        id: model.id,
        name: model.name,
        address: model.address,
        zip: model.zip,
        city: model.city,
        country: model.country,
        email: model.email,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
