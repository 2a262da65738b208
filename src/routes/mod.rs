use axum::Router;

use crate::state::AppState;

pub mod clients;
pub mod contacts;
pub mod doc;
pub mod health;
pub mod images;
pub mod invoices;
pub mod items;
pub mod payments;
pub mod users;

// Build the API router without binding state; it will be provided at the top
// level. The resources share no path prefix, so the per-resource routers
// declare absolute paths and are merged rather than nested.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(items::router())
        .merge(users::router())
        .merge(clients::router())
        .merge(payments::router())
        .merge(contacts::router())
        .merge(images::router())
        .merge(invoices::router())
}
