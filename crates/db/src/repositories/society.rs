//! Society repository for database operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::societies;

/// Input for creating a society.
#[derive(Debug, Clone)]
pub struct CreateSocietyInput {
    /// Owning accountant.
    pub accountant_id: Uuid,
    /// Society name.
    pub name: String,
    /// Secretary name.
    pub secretary_name: String,
    /// Taluka.
    pub taluka: String,
    /// District.
    pub district: String,
    /// Address.
    pub address: String,
    /// "housing" or "labour".
    pub kind: String,
    /// Opening balance at inception.
    pub initial_balance: Decimal,
    /// First financial year start.
    pub financial_year_start: NaiveDate,
    /// First financial year end.
    pub financial_year_end: NaiveDate,
}

/// Partial update of a society; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateSocietyInput {
    /// Society name.
    pub name: Option<String>,
    /// Secretary name.
    pub secretary_name: Option<String>,
    /// Taluka.
    pub taluka: Option<String>,
    /// District.
    pub district: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// "housing" or "labour".
    pub kind: Option<String>,
    /// Opening balance at inception.
    pub initial_balance: Option<Decimal>,
    /// First financial year start.
    pub financial_year_start: Option<NaiveDate>,
    /// First financial year end.
    pub financial_year_end: Option<NaiveDate>,
}

/// Society repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SocietyRepository {
    db: DatabaseConnection,
}

impl SocietyRepository {
    /// Creates a new society repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a society by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<societies::Model>, DbErr> {
        societies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a society by ID, restricted to its owning accountant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        id: Uuid,
        accountant_id: Uuid,
    ) -> Result<Option<societies::Model>, DbErr> {
        societies::Entity::find_by_id(id)
            .filter(societies::Column::AccountantId.eq(accountant_id))
            .one(&self.db)
            .await
    }

    /// Lists all societies of one accountant, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_accountant(
        &self,
        accountant_id: Uuid,
    ) -> Result<Vec<societies::Model>, DbErr> {
        societies::Entity::find()
            .filter(societies::Column::AccountantId.eq(accountant_id))
            .order_by_desc(societies::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Creates a new society.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateSocietyInput) -> Result<societies::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let society = societies::ActiveModel {
            id: Set(Uuid::new_v4()),
            accountant_id: Set(input.accountant_id),
            name: Set(input.name),
            secretary_name: Set(input.secretary_name),
            taluka: Set(input.taluka),
            district: Set(input.district),
            address: Set(input.address),
            kind: Set(input.kind),
            initial_balance: Set(input.initial_balance),
            financial_year_start: Set(input.financial_year_start),
            financial_year_end: Set(input.financial_year_end),
            created_at: Set(now),
            updated_at: Set(now),
        };

        society.insert(&self.db).await
    }

    /// Applies a partial update to an owned society.
    ///
    /// Returns `None` when the society does not exist or is not owned by
    /// the accountant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update(
        &self,
        id: Uuid,
        accountant_id: Uuid,
        input: UpdateSocietyInput,
    ) -> Result<Option<societies::Model>, DbErr> {
        let Some(existing) = self.find_owned(id, accountant_id).await? else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(secretary_name) = input.secretary_name {
            model.secretary_name = Set(secretary_name);
        }
        if let Some(taluka) = input.taluka {
            model.taluka = Set(taluka);
        }
        if let Some(district) = input.district {
            model.district = Set(district);
        }
        if let Some(address) = input.address {
            model.address = Set(address);
        }
        if let Some(kind) = input.kind {
            model.kind = Set(kind);
        }
        if let Some(initial_balance) = input.initial_balance {
            model.initial_balance = Set(initial_balance);
        }
        if let Some(start) = input.financial_year_start {
            model.financial_year_start = Set(start);
        }
        if let Some(end) = input.financial_year_end {
            model.financial_year_end = Set(end);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        model.update(&self.db).await.map(Some)
    }
}
