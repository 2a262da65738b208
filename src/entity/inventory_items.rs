use sea_orm::entity::prelude::*;

// client_id carries no database-level foreign key: a deleted client leaves
// its items behind, and the relation below is purely logical.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub item_code: String,
    pub item_name: String,
    pub mrp: f64,
    pub discount_pct: f64,
    pub discount_amount: f64,
    pub rate: f64,
    pub qty: f64,
    pub total: f64,
    pub client_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Client,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
