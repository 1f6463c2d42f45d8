//! Repository abstractions for data access.

pub mod account_head;
pub mod cash_book;
pub mod report_mapping;
pub mod society;
pub mod user;

pub use account_head::AccountHeadRepository;
pub use cash_book::CashBookRepository;
pub use report_mapping::ReportMappingRepository;
pub use society::SocietyRepository;
pub use user::UserRepository;
