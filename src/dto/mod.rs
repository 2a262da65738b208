pub mod auth;
pub mod images;
pub mod inventory;
pub mod invoices;
pub mod payments;
