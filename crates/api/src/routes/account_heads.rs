//! Account head registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::fetch_owned_society};
use sahakar_core::ledger::EntrySide;
use sahakar_db::{AccountHeadRepository, SocietyRepository};
use sahakar_db::entities::account_heads;
use sahakar_db::repositories::account_head::CreateAccountHeadInput;

/// Creates the account head routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/societies/{society_id}/account-heads", get(list_account_heads))
        .route("/societies/{society_id}/account-heads", post(add_account_head))
}

/// Request body for creating an account head.
#[derive(Debug, Deserialize)]
pub struct CreateAccountHeadRequest {
    /// "debit" or "credit".
    #[serde(rename = "type")]
    pub side: Option<String>,
    /// Head name.
    pub name: Option<String>,
    /// Informational grouping.
    pub category: Option<String>,
    /// Legacy per-head opening amount, as a decimal string.
    pub opening_amount: Option<String>,
}

/// Response for one account head.
#[derive(Debug, Serialize)]
pub struct AccountHeadResponse {
    /// Head ID.
    pub id: Uuid,
    /// "debit" or "credit".
    #[serde(rename = "type")]
    pub side: String,
    /// Head name.
    pub name: String,
    /// Informational grouping.
    pub category: String,
    /// Legacy per-head opening amount.
    pub opening_amount: String,
}

pub(crate) fn head_to_response(head: &account_heads::Model) -> AccountHeadResponse {
    AccountHeadResponse {
        id: head.id,
        side: head.side.clone(),
        name: head.name.clone(),
        category: head.category.clone(),
        opening_amount: format!("{:.2}", head.opening_amount),
    }
}

/// GET /societies/{society_id}/account-heads - List heads, split by side.
async fn list_account_heads(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let head_repo = AccountHeadRepository::new((*state.db).clone());
    match head_repo.list_for_society(society_id).await {
        Ok(heads) => {
            let debit: Vec<&str> = heads
                .iter()
                .filter(|h| EntrySide::classify(&h.side) == EntrySide::Debit)
                .map(|h| h.name.as_str())
                .collect();
            let credit: Vec<&str> = heads
                .iter()
                .filter(|h| EntrySide::classify(&h.side) == EntrySide::Credit)
                .map(|h| h.name.as_str())
                .collect();
            let items: Vec<AccountHeadResponse> = heads.iter().map(head_to_response).collect();

            (
                StatusCode::OK,
                Json(json!({ "debit": debit, "credit": credit, "heads": items })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list account heads");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// POST /societies/{society_id}/account-heads - Create a head.
///
/// Duplicates on the exact (society, side, name) tuple are rejected with a
/// conflict; names are not normalized first.
async fn add_account_head(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<CreateAccountHeadRequest>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let (Some(side_raw), Some(name)) = (payload.side, payload.name) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Type and Name are required"
            })),
        )
            .into_response();
    };

    let side = match EntrySide::parse_strict(&side_raw) {
        Ok(side) => side,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let head_repo = AccountHeadRepository::new((*state.db).clone());
    match head_repo.exists(society_id, side.as_str(), &name).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "conflict",
                    "message": "Account head already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Failed to check for duplicate account head");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    }

    let opening_amount = match payload.opening_amount.as_deref() {
        None => None,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(amount) => Some(amount),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "validation_error",
                        "message": "Opening amount must be a number"
                    })),
                )
                    .into_response();
            }
        },
    };

    let input = CreateAccountHeadInput {
        society_id,
        side: side.as_str().to_string(),
        name,
        category: payload.category,
        opening_amount,
    };

    match head_repo.create(input).await {
        Ok(head) => {
            info!(head_id = %head.id, society_id = %society_id, "Account head created");
            (
                StatusCode::CREATED,
                Json(json!({ "head": head_to_response(&head) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create account head");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}
