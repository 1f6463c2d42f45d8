//! Cash book routes.
//!
//! Entry creation follows a two-step contract: the handler first resolves
//! (or creates) the named account head through the registry, then writes the
//! entry with the confirmed id. The ledger write itself never touches the
//! registry.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::fetch_owned_society};
use sahakar_core::ledger::{EntrySide, validate_new_entry};
use sahakar_db::entities::{account_heads, cash_book_entries};
use sahakar_db::repositories::cash_book::{CreateEntryInput, UpdateEntryInput};
use sahakar_db::{AccountHeadRepository, CashBookRepository, SocietyRepository};

use super::account_heads::head_to_response;

/// Creates the cash book routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/societies/{society_id}/cashbook", post(add_entry))
        .route("/societies/{society_id}/cashbook", get(list_entries))
        .route("/cashbook/entries/{entry_id}", get(get_entry))
        .route("/cashbook/entries/{entry_id}", put(update_entry))
        .route("/cashbook/entries/{entry_id}", delete(delete_entry))
        .route("/cashbook/batch-delete", post(batch_delete_entries))
}

/// Request body for adding an entry.
#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    /// Entry date (YYYY-MM-DD).
    pub date: Option<NaiveDate>,
    /// "debit" or "credit".
    #[serde(rename = "type")]
    pub side: Option<String>,
    /// Account head name; the head is resolved or created first.
    pub account_head_name: Option<String>,
    /// Optional narration.
    pub description: Option<String>,
    /// Amount as a decimal string.
    pub amount: Option<String>,
}

/// Request body for updating an entry (any subset of fields).
#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    /// Entry date (YYYY-MM-DD).
    pub date: Option<NaiveDate>,
    /// "debit" or "credit".
    #[serde(rename = "type")]
    pub side: Option<String>,
    /// Account head name; re-resolved when present.
    pub account_head_name: Option<String>,
    /// Narration.
    pub description: Option<String>,
    /// Amount as a decimal string.
    pub amount: Option<String>,
}

/// Request body for batch deletion.
#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    /// Entry ids to delete; every id must be a valid UUID.
    pub ids: Option<Vec<String>>,
}

/// Response for one entry, head populated.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Owning society.
    pub society_id: Uuid,
    /// Entry date.
    pub date: String,
    /// "debit" or "credit".
    #[serde(rename = "type")]
    pub side: String,
    /// The referenced account head, if it still exists.
    pub account_head: Option<super::account_heads::AccountHeadResponse>,
    /// Narration.
    pub description: Option<String>,
    /// Amount.
    pub amount: String,
    /// Creation timestamp.
    pub created_at: String,
}

fn entry_to_response(
    entry: &cash_book_entries::Model,
    head: Option<&account_heads::Model>,
) -> EntryResponse {
    EntryResponse {
        id: entry.id,
        society_id: entry.society_id,
        date: entry.date.to_string(),
        side: entry.side.clone(),
        account_head: head.map(head_to_response),
        description: entry.description.clone(),
        amount: format!("{:.2}", entry.amount),
        created_at: entry.created_at.to_rfc3339(),
    }
}

fn validation_error(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "validation_error",
            "message": message
        })),
    )
        .into_response()
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Entry not found"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// POST /societies/{society_id}/cashbook - Add an entry.
async fn add_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<AddEntryRequest>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    let society = match fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        Ok(society) => society,
        Err(response) => return response,
    };

    let (Some(date), Some(side_raw), Some(account_head_name), Some(amount_raw)) = (
        payload.date,
        payload.side,
        payload.account_head_name,
        payload.amount,
    ) else {
        return validation_error("Missing fields");
    };

    let Ok(amount) = Decimal::from_str(&amount_raw) else {
        return validation_error("Amount must be a positive number");
    };

    let side = match validate_new_entry(
        &side_raw,
        amount,
        &account_head_name,
        date,
        Some(society.financial_year_start),
    ) {
        Ok(side) => side,
        Err(e) => return validation_error(&e.to_string()),
    };

    // Two-step contract: resolve the head first, then write the entry.
    let head_repo = AccountHeadRepository::new((*state.db).clone());
    let head = match head_repo
        .resolve_or_create(society_id, account_head_name.trim(), side.as_str())
        .await
    {
        Ok(head) => head,
        Err(e) => {
            error!(error = %e, "Failed to resolve account head");
            return internal_error();
        }
    };

    let cash_book = CashBookRepository::new((*state.db).clone());
    let input = CreateEntryInput {
        society_id,
        date,
        side: side.as_str().to_string(),
        account_head_id: head.id,
        amount,
        description: payload.description,
    };

    match cash_book.insert(input).await {
        Ok(entry) => {
            info!(entry_id = %entry.id, society_id = %society_id, "Cash book entry added");
            (
                StatusCode::CREATED,
                Json(json!({ "entry": entry_to_response(&entry, Some(&head)) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to insert cash book entry");
            internal_error()
        }
    }
}

/// GET /societies/{society_id}/cashbook - All entries, date ascending.
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let cash_book = CashBookRepository::new((*state.db).clone());
    match cash_book.list_for_society(society_id).await {
        Ok(rows) => {
            let entries: Vec<EntryResponse> = rows
                .iter()
                .map(|(entry, head)| entry_to_response(entry, head.as_ref()))
                .collect();
            (StatusCode::OK, Json(json!({ "entries": entries }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list cash book entries");
            internal_error()
        }
    }
}

/// GET /cashbook/entries/{entry_id} - Single entry.
async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    let cash_book = CashBookRepository::new((*state.db).clone());
    let (entry, head) = match cash_book.find_by_id(entry_id).await {
        Ok(Some(found)) => found,
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch cash book entry");
            return internal_error();
        }
    };

    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) =
        fetch_owned_society(&society_repo, entry.society_id, auth.user_id()).await
    {
        return response;
    }

    (
        StatusCode::OK,
        Json(json!({ "entry": entry_to_response(&entry, head.as_ref()) })),
    )
        .into_response()
}

/// PUT /cashbook/entries/{entry_id} - Update any subset of fields.
async fn update_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<UpdateEntryRequest>,
) -> impl IntoResponse {
    let cash_book = CashBookRepository::new((*state.db).clone());
    let (existing, _) = match cash_book.find_by_id(entry_id).await {
        Ok(Some(found)) => found,
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch cash book entry");
            return internal_error();
        }
    };

    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) =
        fetch_owned_society(&society_repo, existing.society_id, auth.user_id()).await
    {
        return response;
    }

    let side = match payload.side.as_deref() {
        None => None,
        Some(raw) => match EntrySide::parse_strict(raw) {
            Ok(side) => Some(side),
            Err(e) => return validation_error(&e.to_string()),
        },
    };

    let amount = match payload.amount.as_deref() {
        None => None,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(amount) if amount > Decimal::ZERO => Some(amount),
            _ => return validation_error("Amount must be a positive number"),
        },
    };

    // Re-resolve the head when a new name is given, on the same two-step
    // contract as entry creation.
    let account_head_id = match payload.account_head_name.as_deref() {
        None => None,
        Some(name) if name.trim().is_empty() => {
            return validation_error("Account head name is required");
        }
        Some(name) => {
            let head_side = side.unwrap_or_else(|| EntrySide::classify(&existing.side));
            let head_repo = AccountHeadRepository::new((*state.db).clone());
            match head_repo
                .resolve_or_create(existing.society_id, name.trim(), head_side.as_str())
                .await
            {
                Ok(head) => Some(head.id),
                Err(e) => {
                    error!(error = %e, "Failed to resolve account head");
                    return internal_error();
                }
            }
        }
    };

    let input = UpdateEntryInput {
        date: payload.date,
        side: side.map(|s| s.as_str().to_string()),
        account_head_id,
        description: payload.description,
        amount,
    };

    match cash_book.update(entry_id, input).await {
        Ok(Some(entry)) => {
            info!(entry_id = %entry.id, "Cash book entry updated");
            let head = match cash_book.find_by_id(entry.id).await {
                Ok(Some((_, head))) => head,
                _ => None,
            };
            (
                StatusCode::OK,
                Json(json!({ "entry": entry_to_response(&entry, head.as_ref()) })),
            )
                .into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update cash book entry");
            internal_error()
        }
    }
}

/// DELETE /cashbook/entries/{entry_id} - Delete one entry.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    let cash_book = CashBookRepository::new((*state.db).clone());
    let (existing, _) = match cash_book.find_by_id(entry_id).await {
        Ok(Some(found)) => found,
        Ok(None) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch cash book entry");
            return internal_error();
        }
    };

    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) =
        fetch_owned_society(&society_repo, existing.society_id, auth.user_id()).await
    {
        return response;
    }

    match cash_book.delete(entry_id).await {
        Ok(true) => {
            info!(entry_id = %entry_id, "Cash book entry deleted");
            (StatusCode::OK, Json(json!({ "message": "Deleted successfully" }))).into_response()
        }
        Ok(false) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete cash book entry");
            internal_error()
        }
    }
}

/// POST /cashbook/batch-delete - Delete a batch of entries by id.
///
/// Every id must be a valid UUID, or the whole call is rejected with no
/// deletions performed.
async fn batch_delete_entries(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<BatchDeleteRequest>,
) -> impl IntoResponse {
    let Some(ids) = payload.ids.filter(|ids| !ids.is_empty()) else {
        return validation_error("Please provide an array of entry IDs");
    };

    let mut parsed = Vec::with_capacity(ids.len());
    for id in &ids {
        match Uuid::from_str(id) {
            Ok(parsed_id) => parsed.push(parsed_id),
            Err(_) => return validation_error("Some IDs are invalid"),
        }
    }

    let cash_book = CashBookRepository::new((*state.db).clone());
    match cash_book.delete_many(&parsed).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "No entries found to delete"
            })),
        )
            .into_response(),
        Ok(deleted_count) => {
            info!(deleted_count, "Cash book entries batch deleted");
            (
                StatusCode::OK,
                Json(json!({
                    "message": format!("{deleted_count} entries deleted successfully"),
                    "deleted_count": deleted_count
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to batch delete cash book entries");
            internal_error()
        }
    }
}
