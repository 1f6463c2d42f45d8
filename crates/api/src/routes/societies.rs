//! Society management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::fetch_owned_society};
use sahakar_core::fiscal::FinancialYear;
use sahakar_db::SocietyRepository;
use sahakar_db::entities::societies;
use sahakar_db::repositories::society::{CreateSocietyInput, UpdateSocietyInput};

/// Creates the society routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/societies", post(create_society))
        .route("/societies", get(list_societies))
        .route("/societies/{society_id}", get(get_society))
        .route("/societies/{society_id}", put(update_society))
}

/// Request body for creating a society.
#[derive(Debug, Deserialize)]
pub struct CreateSocietyRequest {
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
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Opening balance at inception, as a decimal string.
    pub initial_balance: Option<String>,
    /// First financial year start.
    pub financial_year_start: Option<NaiveDate>,
    /// First financial year end.
    pub financial_year_end: Option<NaiveDate>,
}

/// Request body for updating a society (all fields optional).
#[derive(Debug, Deserialize)]
pub struct UpdateSocietyRequest {
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
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Opening balance at inception, as a decimal string.
    pub initial_balance: Option<String>,
    /// First financial year start.
    pub financial_year_start: Option<NaiveDate>,
    /// First financial year end.
    pub financial_year_end: Option<NaiveDate>,
}

/// Response for a society.
#[derive(Debug, Serialize)]
pub struct SocietyResponse {
    /// Society ID.
    pub id: Uuid,
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
    #[serde(rename = "type")]
    pub kind: String,
    /// Opening balance at inception.
    pub initial_balance: String,
    /// First financial year start.
    pub financial_year_start: String,
    /// First financial year end.
    pub financial_year_end: String,
    /// Label of the first financial year, e.g. "2024-2025".
    pub current_year: String,
    /// Creation timestamp.
    pub created_at: String,
}

fn society_to_response(society: &societies::Model) -> SocietyResponse {
    SocietyResponse {
        id: society.id,
        name: society.name.clone(),
        secretary_name: society.secretary_name.clone(),
        taluka: society.taluka.clone(),
        district: society.district.clone(),
        address: society.address.clone(),
        kind: society.kind.clone(),
        initial_balance: format!("{:.2}", society.initial_balance),
        financial_year_start: society.financial_year_start.to_string(),
        financial_year_end: society.financial_year_end.to_string(),
        current_year: FinancialYear::of_date(society.financial_year_start).label(),
        created_at: society.created_at.to_rfc3339(),
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

fn validate_kind(kind: &str) -> bool {
    matches!(kind, "housing" | "labour")
}

/// POST /societies - Create a society owned by the caller.
async fn create_society(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSocietyRequest>,
) -> impl IntoResponse {
    let (Some(name), Some(secretary_name), Some(kind), Some(start), Some(end)) = (
        payload.name,
        payload.secretary_name,
        payload.kind,
        payload.financial_year_start,
        payload.financial_year_end,
    ) else {
        return validation_error("Please fill all required fields");
    };

    if !validate_kind(&kind) {
        return validation_error("Type must be either 'housing' or 'labour'");
    }
    if start >= end {
        return validation_error("Financial year start must be before its end");
    }

    let initial_balance = match payload.initial_balance.as_deref() {
        None => Decimal::ZERO,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(balance) => balance,
            Err(_) => return validation_error("Initial balance must be a number"),
        },
    };

    let society_repo = SocietyRepository::new((*state.db).clone());
    let input = CreateSocietyInput {
        accountant_id: auth.user_id(),
        name,
        secretary_name,
        taluka: payload.taluka.unwrap_or_default(),
        district: payload.district.unwrap_or_default(),
        address: payload.address.unwrap_or_default(),
        kind,
        initial_balance,
        financial_year_start: start,
        financial_year_end: end,
    };

    match society_repo.create(input).await {
        Ok(society) => {
            info!(society_id = %society.id, "Society created");
            (
                StatusCode::CREATED,
                Json(json!({ "society": society_to_response(&society) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create society");
            internal_error()
        }
    }
}

/// GET /societies - List the caller's societies, newest first.
async fn list_societies(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());

    match society_repo.list_for_accountant(auth.user_id()).await {
        Ok(societies) => {
            let items: Vec<SocietyResponse> = societies.iter().map(society_to_response).collect();
            (
                StatusCode::OK,
                Json(json!({ "count": items.len(), "societies": items })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list societies");
            internal_error()
        }
    }
}

/// GET /societies/{society_id} - Fetch one owned society.
async fn get_society(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());

    match fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        Ok(society) => (
            StatusCode::OK,
            Json(json!({ "society": society_to_response(&society) })),
        )
            .into_response(),
        Err(response) => response,
    }
}

/// PUT /societies/{society_id} - Update allowed fields of an owned society.
async fn update_society(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<UpdateSocietyRequest>,
) -> impl IntoResponse {
    if let Some(kind) = payload.kind.as_deref() {
        if !validate_kind(kind) {
            return validation_error("Type must be either 'housing' or 'labour'");
        }
    }

    let initial_balance = match payload.initial_balance.as_deref() {
        None => None,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(balance) => Some(balance),
            Err(_) => return validation_error("Initial balance must be a number"),
        },
    };

    let society_repo = SocietyRepository::new((*state.db).clone());
    let input = UpdateSocietyInput {
        name: payload.name,
        secretary_name: payload.secretary_name,
        taluka: payload.taluka,
        district: payload.district,
        address: payload.address,
        kind: payload.kind,
        initial_balance,
        financial_year_start: payload.financial_year_start,
        financial_year_end: payload.financial_year_end,
    };

    match society_repo.update(society_id, auth.user_id(), input).await {
        Ok(Some(society)) => {
            info!(society_id = %society.id, "Society updated");
            (
                StatusCode::OK,
                Json(json!({ "society": society_to_response(&society) })),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Society not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update society");
            internal_error()
        }
    }
}
