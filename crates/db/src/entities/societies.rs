//! `SeaORM` Entity for the societies table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "societies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub accountant_id: Uuid,
    pub name: String,
    pub secretary_name: String,
    pub taluka: String,
    pub district: String,
    pub address: String,
    /// "housing" or "labour".
    pub kind: String,
    pub initial_balance: Decimal,
    pub financial_year_start: Date,
    pub financial_year_end: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AccountantId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::account_heads::Entity")]
    AccountHeads,
    #[sea_orm(has_many = "super::cash_book_entries::Entity")]
    CashBookEntries,
    #[sea_orm(has_many = "super::report_mappings::Entity")]
    ReportMappings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::account_heads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountHeads.def()
    }
}

impl Related<super::cash_book_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashBookEntries.def()
    }
}

impl Related<super::report_mappings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportMappings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
