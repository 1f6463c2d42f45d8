//! Account head repository for database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::account_heads;

/// Input for creating an account head.
#[derive(Debug, Clone)]
pub struct CreateAccountHeadInput {
    /// Owning society.
    pub society_id: Uuid,
    /// "debit" or "credit".
    pub side: String,
    /// Head name, society-scoped free text.
    pub name: String,
    /// Informational grouping; defaults to "CashBook".
    pub category: Option<String>,
    /// Legacy per-head opening amount.
    pub opening_amount: Option<Decimal>,
}

/// Account head repository.
#[derive(Debug, Clone)]
pub struct AccountHeadRepository {
    db: DatabaseConnection,
}

impl AccountHeadRepository {
    /// Creates a new account head repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all heads of a society, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_society(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<account_heads::Model>, DbErr> {
        account_heads::Entity::find()
            .filter(account_heads::Column::SocietyId.eq(society_id))
            .order_by_asc(account_heads::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Finds a head by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<account_heads::Model>, DbErr> {
        account_heads::Entity::find_by_id(id).one(&self.db).await
    }

    /// Fetches a batch of heads by ID in one query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<account_heads::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        account_heads::Entity::find()
            .filter(account_heads::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    /// Checks whether a head with the exact (society, side, name) tuple
    /// already exists. Names are compared verbatim; no normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, society_id: Uuid, side: &str, name: &str) -> Result<bool, DbErr> {
        let count = account_heads::Entity::find()
            .filter(account_heads::Column::SocietyId.eq(society_id))
            .filter(account_heads::Column::Side.eq(side))
            .filter(account_heads::Column::Name.eq(name))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new head.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateAccountHeadInput,
    ) -> Result<account_heads::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let head = account_heads::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(input.society_id),
            side: Set(input.side),
            name: Set(input.name),
            category: Set(input.category.unwrap_or_else(|| "CashBook".to_string())),
            opening_amount: Set(input.opening_amount.unwrap_or(Decimal::ZERO)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        head.insert(&self.db).await
    }

    /// Resolves a head by name within a society, creating it when unseen.
    ///
    /// This is the explicit first step of the two-step entry contract: the
    /// caller resolves the head here, then writes the ledger entry with the
    /// confirmed id. Resolution matches on name only, so an existing head
    /// keeps its original side even if the entry sits on the other side.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn resolve_or_create(
        &self,
        society_id: Uuid,
        name: &str,
        side: &str,
    ) -> Result<account_heads::Model, DbErr> {
        let existing = account_heads::Entity::find()
            .filter(account_heads::Column::SocietyId.eq(society_id))
            .filter(account_heads::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        if let Some(head) = existing {
            return Ok(head);
        }

        self.create(CreateAccountHeadInput {
            society_id,
            side: side.to_string(),
            name: name.to_string(),
            category: None,
            opening_amount: None,
        })
        .await
    }
}
