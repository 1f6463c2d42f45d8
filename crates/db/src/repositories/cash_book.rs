//! Cash book repository for database operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use sahakar_core::ledger::{EntrySide, LedgerEntry};
use sahakar_shared::types::AccountHeadId;

use crate::entities::{account_heads, cash_book_entries};

/// Input for creating a cash book entry.
///
/// The account head must already be resolved; inserting an entry never
/// touches the head registry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// Owning society.
    pub society_id: Uuid,
    /// Entry date.
    pub date: NaiveDate,
    /// "debit" or "credit" (validated upstream).
    pub side: String,
    /// Confirmed account head id.
    pub account_head_id: Uuid,
    /// Amount (validated positive upstream).
    pub amount: Decimal,
    /// Optional narration.
    pub description: Option<String>,
}

/// Partial update of an entry; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateEntryInput {
    /// Entry date.
    pub date: Option<NaiveDate>,
    /// "debit" or "credit" (validated upstream).
    pub side: Option<String>,
    /// Re-resolved account head id.
    pub account_head_id: Option<Uuid>,
    /// Narration.
    pub description: Option<String>,
    /// Amount (validated positive upstream).
    pub amount: Option<Decimal>,
}

/// Cash book repository.
#[derive(Debug, Clone)]
pub struct CashBookRepository {
    db: DatabaseConnection,
}

impl CashBookRepository {
    /// Creates a new cash book repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert(
        &self,
        input: CreateEntryInput,
    ) -> Result<cash_book_entries::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let entry = cash_book_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(input.society_id),
            date: Set(input.date),
            side: Set(input.side),
            account_head_id: Set(input.account_head_id),
            amount: Set(input.amount),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        entry.insert(&self.db).await
    }

    /// Finds one entry with its account head populated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<(cash_book_entries::Model, Option<account_heads::Model>)>, DbErr> {
        cash_book_entries::Entity::find_by_id(id)
            .find_also_related(account_heads::Entity)
            .one(&self.db)
            .await
    }

    /// Lists all entries of a society, date ascending, heads populated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_society(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<(cash_book_entries::Model, Option<account_heads::Model>)>, DbErr> {
        cash_book_entries::Entity::find()
            .filter(cash_book_entries::Column::SocietyId.eq(society_id))
            .order_by_asc(cash_book_entries::Column::Date)
            .order_by_asc(cash_book_entries::Column::CreatedAt)
            .find_also_related(account_heads::Entity)
            .all(&self.db)
            .await
    }

    /// Loads a society's full history as engine-ready ledger entries, date
    /// ascending. Sides are classified permissively; a missing head yields
    /// an empty name rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ledger_entries(&self, society_id: Uuid) -> Result<Vec<LedgerEntry>, DbErr> {
        let rows = self.list_for_society(society_id).await?;

        Ok(rows
            .into_iter()
            .map(|(entry, head)| LedgerEntry {
                id: entry.id,
                account_head_id: AccountHeadId::from_uuid(entry.account_head_id),
                account_head_name: head.map(|h| h.name).unwrap_or_default(),
                date: entry.date,
                side: EntrySide::classify(&entry.side),
                amount: entry.amount,
            })
            .collect())
    }

    /// Applies a partial update. Returns `None` when the entry is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateEntryInput,
    ) -> Result<Option<cash_book_entries::Model>, DbErr> {
        let Some(existing) = cash_book_entries::Entity::find_by_id(id).one(&self.db).await?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        if let Some(date) = input.date {
            model.date = Set(date);
        }
        if let Some(side) = input.side {
            model.side = Set(side);
        }
        if let Some(account_head_id) = input.account_head_id {
            model.account_head_id = Set(account_head_id);
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description));
        }
        if let Some(amount) = input.amount {
            model.amount = Set(amount);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        model.update(&self.db).await.map(Some)
    }

    /// Deletes one entry. Returns `false` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = cash_book_entries::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Deletes a batch of entries by id, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = cash_book_entries::Entity::delete_many()
            .filter(cash_book_entries::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
