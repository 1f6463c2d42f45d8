//! `SeaORM` Entity for the account_heads table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account_heads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    /// "debit" or "credit".
    pub side: String,
    pub name: String,
    /// Informational grouping, defaults to "CashBook".
    pub category: String,
    /// Legacy per-head opening, superseded by the society's initial balance.
    pub opening_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::societies::Entity",
        from = "Column::SocietyId",
        to = "super::societies::Column::Id"
    )]
    Societies,
    #[sea_orm(has_many = "super::cash_book_entries::Entity")]
    CashBookEntries,
}

impl Related<super::societies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Societies.def()
    }
}

impl Related<super::cash_book_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashBookEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
