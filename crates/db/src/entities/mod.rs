//! `SeaORM` entity definitions.

pub mod account_heads;
pub mod cash_book_entries;
pub mod report_mappings;
pub mod societies;
pub mod users;
