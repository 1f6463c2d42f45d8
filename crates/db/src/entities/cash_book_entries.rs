//! `SeaORM` Entity for the cash_book_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_book_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub date: Date,
    /// Free text; this system writes "debit"/"credit" but aggregation is
    /// permissive over whatever is stored.
    pub side: String,
    pub account_head_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::account_heads::Entity",
        from = "Column::AccountHeadId",
        to = "super::account_heads::Column::Id"
    )]
    AccountHeads,
}

impl Related<super::societies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Societies.def()
    }
}

impl Related<super::account_heads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountHeads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
