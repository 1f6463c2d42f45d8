//! Report mapping repository for database operations.
//!
//! Mappings are stored as explicit records, one row per
//! (society, year, account head, side), unique on that tuple. Same-key
//! writes are last-write-wins upserts.

use std::str::FromStr;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::warn;
use uuid::Uuid;

use sahakar_core::fiscal::FinancialYear;
use sahakar_core::ledger::EntrySide;
use sahakar_core::reports::{MappingRecord, ReportKind, YearMappings};
use sahakar_shared::types::AccountHeadId;

use crate::entities::report_mappings;

/// Report mapping repository.
#[derive(Debug, Clone)]
pub struct ReportMappingRepository {
    db: DatabaseConnection,
}

impl ReportMappingRepository {
    /// Creates a new report mapping repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All records of one society for one year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn records_for_year(
        &self,
        society_id: Uuid,
        year: FinancialYear,
    ) -> Result<Vec<MappingRecord>, DbErr> {
        let rows = report_mappings::Entity::find()
            .filter(report_mappings::Column::SocietyId.eq(society_id))
            .filter(report_mappings::Column::Year.eq(year.start_year()))
            .order_by_asc(report_mappings::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows.iter().filter_map(to_record).collect())
    }

    /// All records of one society, grouped by year ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn all_for_society(&self, society_id: Uuid) -> Result<Vec<YearMappings>, DbErr> {
        let rows = report_mappings::Entity::find()
            .filter(report_mappings::Column::SocietyId.eq(society_id))
            .order_by_asc(report_mappings::Column::Year)
            .order_by_asc(report_mappings::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut years: Vec<YearMappings> = Vec::new();
        for row in &rows {
            let Some(record) = to_record(row) else {
                continue;
            };
            let year = FinancialYear::new(row.year);
            match years.last_mut() {
                Some(last) if last.year == year => last.records.push(record),
                _ => years.push(YearMappings {
                    year,
                    records: vec![record],
                }),
            }
        }
        Ok(years)
    }

    /// Upserts one record: an existing row for the same
    /// (society, year, head, side) gets its kind and snapshot overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert(
        &self,
        society_id: Uuid,
        year: FinancialYear,
        record: &MappingRecord,
    ) -> Result<(), DbErr> {
        let now = chrono::Utc::now().into();
        let model = report_mappings::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(society_id),
            year: Set(year.start_year()),
            account_head_id: Set(record.account_head_id.into_inner()),
            side: Set(record.side.as_str().to_string()),
            report_kind: Set(record.kind.as_str().to_string()),
            total_amount: Set(record.total_amount),
            created_at: Set(now),
            updated_at: Set(now),
        };

        report_mappings::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    report_mappings::Column::SocietyId,
                    report_mappings::Column::Year,
                    report_mappings::Column::AccountHeadId,
                    report_mappings::Column::Side,
                ])
                .update_columns([
                    report_mappings::Column::ReportKind,
                    report_mappings::Column::TotalAmount,
                    report_mappings::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Removes the record for (head, side) in one year. Idempotent: removing
    /// an absent record succeeds and reports `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn remove(
        &self,
        society_id: Uuid,
        year: FinancialYear,
        account_head_id: AccountHeadId,
        side: EntrySide,
    ) -> Result<bool, DbErr> {
        let result = report_mappings::Entity::delete_many()
            .filter(report_mappings::Column::SocietyId.eq(society_id))
            .filter(report_mappings::Column::Year.eq(year.start_year()))
            .filter(report_mappings::Column::AccountHeadId.eq(account_head_id.into_inner()))
            .filter(report_mappings::Column::Side.eq(side.as_str()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Converts a stored row to a domain record. Rows with an unknown report
/// kind are skipped with a warning instead of failing the whole read.
fn to_record(row: &report_mappings::Model) -> Option<MappingRecord> {
    let kind = match ReportKind::from_str(&row.report_kind) {
        Ok(kind) => kind,
        Err(_) => {
            warn!(mapping_id = %row.id, kind = %row.report_kind, "Skipping mapping with unknown report kind");
            return None;
        }
    };

    Some(MappingRecord {
        account_head_id: AccountHeadId::from_uuid(row.account_head_id),
        side: EntrySide::classify(&row.side),
        kind,
        total_amount: row.total_amount,
    })
}
