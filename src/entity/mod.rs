pub mod clients;
pub mod inventory_items;
pub mod payments;

pub use clients::Entity as Clients;
pub use inventory_items::Entity as InventoryItems;
pub use payments::Entity as Payments;
