//! `SeaORM` Entity for the report_mappings table.
//!
//! One row per (society, year, account head, side): the explicit-record
//! form of the report classification, unique on that tuple.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "report_mappings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    /// Start year of the financial year (2024 for FY 2024-2025).
    pub year: i32,
    pub account_head_id: Uuid,
    /// "debit" or "credit".
    pub side: String,
    /// "profit_loss", "balance_sheet" or "construction".
    pub report_kind: String,
    /// Trial-balance amount snapshotted when the mapping was written.
    pub total_amount: Decimal,
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
