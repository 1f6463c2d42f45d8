//! Report error types.

use sahakar_shared::types::AccountHeadId;
use thiserror::Error;

use crate::fiscal::FinancialYear;

/// Errors that can occur while classifying trial-balance rows.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The opposite side of this head is already on the Balance Sheet for
    /// the same year.
    #[error(
        "Opposite side of account head {account_head_id} is already mapped to the Balance Sheet for {year}. Remove that mapping first."
    )]
    OppositeSideMapped {
        /// The account head whose sides collided.
        account_head_id: AccountHeadId,
        /// The year the collision occurred in.
        year: FinancialYear,
    },

    /// Unknown report kind string.
    #[error("Unknown report type: {0}")]
    InvalidKind(String),
}
