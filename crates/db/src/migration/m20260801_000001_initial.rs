//! Initial schema: users, societies, account heads, cash book entries and
//! report mappings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS report_mappings, cash_book_entries, account_heads, societies, users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Accountant users
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Societies, each owned by one accountant
CREATE TABLE societies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    accountant_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    secretary_name VARCHAR(255) NOT NULL,
    taluka VARCHAR(255) NOT NULL,
    district VARCHAR(255) NOT NULL,
    address TEXT NOT NULL,
    kind VARCHAR(16) NOT NULL CHECK (kind IN ('housing', 'labour')),
    initial_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    financial_year_start DATE NOT NULL,
    financial_year_end DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_societies_accountant ON societies(accountant_id, created_at DESC);

-- Account heads: named classifications of money movement
-- Uniqueness of (society_id, side, name) is checked at creation time but
-- deliberately not enforced here (see duplicate-head policy).
CREATE TABLE account_heads (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    side VARCHAR(16) NOT NULL,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(32) NOT NULL DEFAULT 'CashBook',
    opening_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_account_heads_society ON account_heads(society_id, created_at);

-- Dated cash transactions; side is free text and classified permissively
-- at aggregation time
CREATE TABLE cash_book_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    date DATE NOT NULL,
    side VARCHAR(16) NOT NULL,
    account_head_id UUID NOT NULL REFERENCES account_heads(id),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_cash_book_society_date ON cash_book_entries(society_id, date);
CREATE INDEX idx_cash_book_head ON cash_book_entries(account_head_id);

-- Report classifications: one explicit record per (society, year, head, side)
CREATE TABLE report_mappings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    year INTEGER NOT NULL,
    account_head_id UUID NOT NULL REFERENCES account_heads(id) ON DELETE CASCADE,
    side VARCHAR(16) NOT NULL CHECK (side IN ('debit', 'credit')),
    report_kind VARCHAR(32) NOT NULL
        CHECK (report_kind IN ('profit_loss', 'balance_sheet', 'construction')),
    total_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_report_mapping UNIQUE (society_id, year, account_head_id, side)
);

CREATE INDEX idx_report_mappings_society_year ON report_mappings(society_id, year);
";
