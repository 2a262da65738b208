pub mod client_service;
pub mod contact_service;
pub mod image_service;
pub mod inventory_service;
pub mod invoice_service;
pub mod payment_service;
pub mod user_service;
