//! Shared domain types.

pub mod id;

pub use id::{AccountHeadId, CashBookEntryId, SocietyId, UserId};
