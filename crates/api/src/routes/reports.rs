//! Reporting routes: trial balance, available years, report mappings, and
//! the derived Profit & Loss and Balance Sheet views.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::fetch_owned_society};
use sahakar_core::fiscal::FinancialYear;
use sahakar_core::ledger::{BalanceEngine, EntrySide, LedgerEntry, first_financial_year};
use sahakar_core::reports::{
    MappingRecord, ReportKind, ReportLine, balance_sheet_lines, ensure_balance_sheet_exclusive,
    profit_loss_lines, snapshot_amount,
};
use sahakar_db::entities::societies;
use sahakar_db::{
    AccountHeadRepository, CashBookRepository, ReportMappingRepository, SocietyRepository,
};
use sahakar_shared::types::AccountHeadId;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/societies/{society_id}/reports/trial-balance",
            get(get_trial_balance),
        )
        .route("/societies/{society_id}/reports/years", get(get_available_years))
        .route("/societies/{society_id}/reports/mappings", get(get_mappings))
        .route("/societies/{society_id}/reports/mappings", post(set_mapping))
        .route(
            "/societies/{society_id}/reports/mappings/bulk",
            post(bulk_set_mappings),
        )
        .route(
            "/societies/{society_id}/reports/mappings",
            delete(remove_mapping),
        )
        .route(
            "/societies/{society_id}/reports/profit-loss",
            get(get_profit_loss),
        )
        .route(
            "/societies/{society_id}/reports/balance-sheet",
            get(get_balance_sheet),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters carrying a financial year.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Start year ("2024") or label ("2024-2025").
    pub year: Option<String>,
}

/// Request body for setting a single mapping.
#[derive(Debug, Deserialize)]
pub struct SetMappingRequest {
    /// Start year ("2024") or label ("2024-2025").
    pub year: Option<String>,
    /// The classified account head.
    pub account_head_id: Option<String>,
    /// "debit" or "credit".
    pub side: Option<String>,
    /// "profit_loss", "balance_sheet" or "construction".
    pub report_type: Option<String>,
}

/// One item of a bulk mapping request.
#[derive(Debug, Deserialize)]
pub struct BulkMappingItem {
    /// The classified account head.
    pub account_head_id: String,
    /// "debit" or "credit".
    pub side: String,
    /// "profit_loss", "balance_sheet" or "construction".
    pub report_type: String,
}

/// Request body for bulk-setting mappings.
#[derive(Debug, Deserialize)]
pub struct BulkSetMappingsRequest {
    /// Start year ("2024") or label ("2024-2025").
    pub year: Option<String>,
    /// Records to upsert; malformed items are dropped.
    pub mappings: Option<Vec<BulkMappingItem>>,
}

/// Query parameters for removing a mapping.
#[derive(Debug, Deserialize)]
pub struct RemoveMappingQuery {
    /// Start year ("2024") or label ("2024-2025").
    pub year: Option<String>,
    /// The classified account head.
    pub account_head_id: Option<String>,
    /// "debit" or "credit".
    pub side: Option<String>,
}

/// One trial balance row in responses.
#[derive(Debug, Serialize)]
pub struct TrialBalanceRowResponse {
    /// Account head ID.
    pub account_head_id: Uuid,
    /// Account head name.
    pub account_head_name: String,
    /// Debit total.
    pub debit: String,
    /// Credit total.
    pub credit: String,
}

/// One mapping record in responses.
#[derive(Debug, Serialize)]
pub struct MappingRecordResponse {
    /// Account head ID.
    pub account_head_id: Uuid,
    /// "debit" or "credit".
    pub side: String,
    /// "profit_loss", "balance_sheet" or "construction".
    pub report_type: String,
    /// Snapshotted amount.
    pub total_amount: String,
}

/// One derived report line in responses.
#[derive(Debug, Serialize)]
pub struct ReportLineResponse {
    /// Account head ID.
    pub account_head_id: Uuid,
    /// Account head name.
    pub account_head_name: String,
    /// Line amount.
    pub amount: String,
    /// "debit" or "credit".
    pub side: String,
    /// Start year of the financial year.
    pub year: i32,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Formats a Decimal as a money string with 2 decimal places.
fn format_money(amount: Decimal) -> String {
    format!("{amount:.2}")
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

/// Parses the year parameter; it is required wherever this is called.
fn parse_year(year: Option<&str>) -> Result<FinancialYear, axum::response::Response> {
    let Some(raw) = year else {
        return Err(validation_error("Year required"));
    };
    FinancialYear::parse(raw).map_err(|_| validation_error("Year must be a valid year"))
}

/// Builds the balance engine for a society from its recorded anchors and
/// loaded entry history.
fn build_engine(society: &societies::Model, entries: &[LedgerEntry]) -> BalanceEngine {
    let first = first_financial_year(
        entries,
        Some(society.financial_year_start),
        society.created_at.date_naive(),
    );
    BalanceEngine::new(society.initial_balance, first)
}

fn record_to_response(record: &MappingRecord) -> MappingRecordResponse {
    MappingRecordResponse {
        account_head_id: record.account_head_id.into_inner(),
        side: record.side.as_str().to_string(),
        report_type: record.kind.as_str().to_string(),
        total_amount: format_money(record.total_amount),
    }
}

fn line_to_response(line: &ReportLine) -> ReportLineResponse {
    ReportLineResponse {
        account_head_id: line.account_head_id.into_inner(),
        account_head_name: line.account_head_name.clone(),
        amount: format_money(line.amount),
        side: line.side.as_str().to_string(),
        year: line.year.start_year(),
    }
}

/// Resolves head names for a set of ids in one batched lookup.
async fn resolve_head_names(
    head_repo: &AccountHeadRepository,
    ids: &[AccountHeadId],
) -> Result<HashMap<AccountHeadId, String>, sea_orm::DbErr> {
    let raw: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();
    let heads = head_repo.find_by_ids(&raw).await?;
    Ok(heads
        .into_iter()
        .map(|h| (AccountHeadId::from_uuid(h.id), h.name))
        .collect())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /societies/{society_id}/reports/trial-balance?year=
///
/// Per-head debit/credit totals for the year plus the opening/closing
/// balance chained from the society's initial balance. Heads mapped for the
/// year but inactive in it appear as zero rows.
async fn get_trial_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<YearQuery>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    let society = match fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        Ok(society) => society,
        Err(response) => return response,
    };

    let year = match parse_year(query.year.as_deref()) {
        Ok(year) => year,
        Err(response) => return response,
    };

    let cash_book = CashBookRepository::new((*state.db).clone());
    let entries = match cash_book.ledger_entries(society_id).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "Failed to load ledger entries");
            return internal_error();
        }
    };

    // Heads mapped for this year still show up with zero activity.
    let mapping_repo = ReportMappingRepository::new((*state.db).clone());
    let records = match mapping_repo.records_for_year(society_id, year).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to load report mappings");
            return internal_error();
        }
    };
    let mapped_ids: Vec<AccountHeadId> = {
        let mut ids: Vec<AccountHeadId> = records.iter().map(|r| r.account_head_id).collect();
        ids.sort_unstable_by_key(|id| id.into_inner());
        ids.dedup();
        ids
    };
    let head_repo = AccountHeadRepository::new((*state.db).clone());
    let names = match resolve_head_names(&head_repo, &mapped_ids).await {
        Ok(names) => names,
        Err(e) => {
            error!(error = %e, "Failed to resolve account head names");
            return internal_error();
        }
    };
    let mapped_heads: Vec<(AccountHeadId, String)> = mapped_ids
        .iter()
        .map(|id| (*id, names.get(id).cloned().unwrap_or_default()))
        .collect();

    let engine = build_engine(&society, &entries);
    let tb = engine.trial_balance(&entries, year, &mapped_heads);

    let rows: Vec<TrialBalanceRowResponse> = tb
        .rows
        .iter()
        .map(|row| TrialBalanceRowResponse {
            account_head_id: row.account_head_id.into_inner(),
            account_head_name: row.account_head_name.clone(),
            debit: format_money(row.debit),
            credit: format_money(row.credit),
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "year": tb.year.label(),
            "trial_balance": rows,
            "totals": {
                "debit": format_money(tb.totals.debit),
                "credit": format_money(tb.totals.credit),
            },
            "opening_balance": format_money(tb.opening_balance),
            "closing_balance": format_money(tb.closing_balance),
        })),
    )
        .into_response()
}

/// GET /societies/{society_id}/reports/years
///
/// Financial year labels touched by the ledger, newest first; a fresh
/// society reports its first financial year.
async fn get_available_years(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    let society = match fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        Ok(society) => society,
        Err(response) => return response,
    };

    let cash_book = CashBookRepository::new((*state.db).clone());
    let entries = match cash_book.ledger_entries(society_id).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "Failed to load ledger entries");
            return internal_error();
        }
    };

    let fallback = FinancialYear::of_date(society.financial_year_start);
    let years: Vec<String> = BalanceEngine::available_years(&entries, fallback)
        .iter()
        .map(FinancialYear::label)
        .collect();

    (StatusCode::OK, Json(json!({ "years": years }))).into_response()
}

/// GET /societies/{society_id}/reports/mappings?year=
async fn get_mappings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<YearQuery>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let year = match parse_year(query.year.as_deref()) {
        Ok(year) => year,
        Err(response) => return response,
    };

    let mapping_repo = ReportMappingRepository::new((*state.db).clone());
    match mapping_repo.records_for_year(society_id, year).await {
        Ok(records) => {
            let items: Vec<MappingRecordResponse> =
                records.iter().map(record_to_response).collect();
            (
                StatusCode::OK,
                Json(json!({ "year": year.label(), "mappings": items })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load report mappings");
            internal_error()
        }
    }
}

/// POST /societies/{society_id}/reports/mappings
///
/// Classifies one (head, side) pair for a year, snapshotting the head's
/// current trial-balance amount. Mapping a side to the balance sheet is
/// rejected while the opposite side of the same head sits there.
async fn set_mapping(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<SetMappingRequest>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let year = match parse_year(payload.year.as_deref()) {
        Ok(year) => year,
        Err(response) => return response,
    };

    let Some(head_raw) = payload.account_head_id.as_deref() else {
        return validation_error("Account head id required");
    };
    let Ok(head_uuid) = Uuid::from_str(head_raw) else {
        return validation_error("Invalid account head id");
    };
    let account_head_id = AccountHeadId::from_uuid(head_uuid);

    let side = match payload.side.as_deref().map(EntrySide::parse_strict) {
        Some(Ok(side)) => side,
        Some(Err(e)) => return validation_error(&e.to_string()),
        None => return validation_error("Side required"),
    };

    let kind = match payload.report_type.as_deref().map(ReportKind::from_str) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => return validation_error(&e.to_string()),
        None => return validation_error("Report type required"),
    };

    // The head must exist and belong to this society.
    let head_repo = AccountHeadRepository::new((*state.db).clone());
    match head_repo.find_by_id(head_uuid).await {
        Ok(Some(head)) if head.society_id == society_id => {}
        Ok(_) => return validation_error("Invalid account head id"),
        Err(e) => {
            error!(error = %e, "Failed to fetch account head");
            return internal_error();
        }
    }

    let mapping_repo = ReportMappingRepository::new((*state.db).clone());
    let existing = match mapping_repo.records_for_year(society_id, year).await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to load report mappings");
            return internal_error();
        }
    };

    if let Err(e) = ensure_balance_sheet_exclusive(&existing, account_head_id, side, kind, year) {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "conflict",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    // Snapshot the head's current totals for the mapped side.
    let cash_book = CashBookRepository::new((*state.db).clone());
    let entries = match cash_book.ledger_entries(society_id).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "Failed to load ledger entries");
            return internal_error();
        }
    };
    let totals = BalanceEngine::head_totals_for(&entries, year, account_head_id);

    let record = MappingRecord {
        account_head_id,
        side,
        kind,
        total_amount: snapshot_amount(&totals, side),
    };

    if let Err(e) = mapping_repo.upsert(society_id, year, &record).await {
        error!(error = %e, "Failed to upsert report mapping");
        return internal_error();
    }

    info!(
        society_id = %society_id,
        account_head_id = %account_head_id,
        side = %side,
        kind = %kind,
        "Report mapping set"
    );

    match mapping_repo.records_for_year(society_id, year).await {
        Ok(records) => {
            let items: Vec<MappingRecordResponse> =
                records.iter().map(record_to_response).collect();
            (
                StatusCode::OK,
                Json(json!({ "year": year.label(), "mappings": items })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to reload report mappings");
            internal_error()
        }
    }
}

/// POST /societies/{society_id}/reports/mappings/bulk
///
/// Upserts a batch of records for one year. Malformed items are dropped
/// with a warning instead of failing the batch; snapshots are recomputed
/// per record.
async fn bulk_set_mappings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<BulkSetMappingsRequest>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let year = match parse_year(payload.year.as_deref()) {
        Ok(year) => year,
        Err(response) => return response,
    };

    let Some(items) = payload.mappings else {
        return validation_error("Year and mappings required");
    };

    let cash_book = CashBookRepository::new((*state.db).clone());
    let entries = match cash_book.ledger_entries(society_id).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "Failed to load ledger entries");
            return internal_error();
        }
    };

    let mapping_repo = ReportMappingRepository::new((*state.db).clone());
    for item in &items {
        let (Ok(head_uuid), Ok(side), Ok(kind)) = (
            Uuid::from_str(&item.account_head_id),
            EntrySide::parse_strict(&item.side),
            ReportKind::from_str(&item.report_type),
        ) else {
            warn!(
                account_head_id = %item.account_head_id,
                side = %item.side,
                report_type = %item.report_type,
                "Dropping malformed bulk mapping item"
            );
            continue;
        };

        let account_head_id = AccountHeadId::from_uuid(head_uuid);
        let totals = BalanceEngine::head_totals_for(&entries, year, account_head_id);
        let record = MappingRecord {
            account_head_id,
            side,
            kind,
            total_amount: snapshot_amount(&totals, side),
        };

        if let Err(e) = mapping_repo.upsert(society_id, year, &record).await {
            error!(error = %e, "Failed to upsert report mapping");
            return internal_error();
        }
    }

    match mapping_repo.records_for_year(society_id, year).await {
        Ok(records) => {
            let items: Vec<MappingRecordResponse> =
                records.iter().map(record_to_response).collect();
            (
                StatusCode::OK,
                Json(json!({ "year": year.label(), "mappings": items })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to reload report mappings");
            internal_error()
        }
    }
}

/// DELETE /societies/{society_id}/reports/mappings?year=&account_head_id=&side=
///
/// Idempotent: removing an absent mapping succeeds.
async fn remove_mapping(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<RemoveMappingQuery>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let year = match parse_year(query.year.as_deref()) {
        Ok(year) => year,
        Err(response) => return response,
    };

    let Some(Ok(head_uuid)) = query.account_head_id.as_deref().map(Uuid::from_str) else {
        return validation_error("Invalid account head id");
    };

    let side = match query.side.as_deref().map(EntrySide::parse_strict) {
        Some(Ok(side)) => side,
        _ => return validation_error("Invalid side"),
    };

    let mapping_repo = ReportMappingRepository::new((*state.db).clone());
    match mapping_repo
        .remove(society_id, year, AccountHeadId::from_uuid(head_uuid), side)
        .await
    {
        Ok(removed) => {
            if removed {
                info!(society_id = %society_id, account_head_id = %head_uuid, "Report mapping removed");
            }
            (StatusCode::OK, Json(json!({ "success": true }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to remove report mapping");
            internal_error()
        }
    }
}

/// GET /societies/{society_id}/reports/profit-loss
///
/// Flat list of profit-loss lines across all years, snapshot amounts, no
/// carry-forward. Head names are resolved in one batched lookup.
async fn get_profit_loss(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let mapping_repo = ReportMappingRepository::new((*state.db).clone());
    let years = match mapping_repo.all_for_society(society_id).await {
        Ok(years) => years,
        Err(e) => {
            error!(error = %e, "Failed to load report mappings");
            return internal_error();
        }
    };

    let head_repo = AccountHeadRepository::new((*state.db).clone());
    let ids = collect_head_ids(&years, ReportKind::ProfitLoss);
    let names = match resolve_head_names(&head_repo, &ids).await {
        Ok(names) => names,
        Err(e) => {
            error!(error = %e, "Failed to resolve account head names");
            return internal_error();
        }
    };

    let lines = profit_loss_lines(&years, &names);
    let items: Vec<ReportLineResponse> = lines.iter().map(line_to_response).collect();

    (StatusCode::OK, Json(json!({ "mappings": items }))).into_response()
}

/// GET /societies/{society_id}/reports/balance-sheet
///
/// Balance-sheet lines across all years with per-head carry-forward,
/// recomputed from live ledger totals rather than the stored snapshots.
async fn get_balance_sheet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> impl IntoResponse {
    let society_repo = SocietyRepository::new((*state.db).clone());
    if let Err(response) = fetch_owned_society(&society_repo, society_id, auth.user_id()).await {
        return response;
    }

    let mapping_repo = ReportMappingRepository::new((*state.db).clone());
    let years = match mapping_repo.all_for_society(society_id).await {
        Ok(years) => years,
        Err(e) => {
            error!(error = %e, "Failed to load report mappings");
            return internal_error();
        }
    };

    let cash_book = CashBookRepository::new((*state.db).clone());
    let entries = match cash_book.ledger_entries(society_id).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "Failed to load ledger entries");
            return internal_error();
        }
    };

    let totals_by_year = years
        .iter()
        .map(|y| (y.year, BalanceEngine::totals_by_head(&entries, y.year)))
        .collect();

    let head_repo = AccountHeadRepository::new((*state.db).clone());
    let ids = collect_head_ids(&years, ReportKind::BalanceSheet);
    let names = match resolve_head_names(&head_repo, &ids).await {
        Ok(names) => names,
        Err(e) => {
            error!(error = %e, "Failed to resolve account head names");
            return internal_error();
        }
    };

    let lines = balance_sheet_lines(&years, &totals_by_year, &names);
    let items: Vec<ReportLineResponse> = lines.iter().map(line_to_response).collect();

    (StatusCode::OK, Json(json!({ "mappings": items }))).into_response()
}

/// Collects the distinct head ids referenced by records of one kind.
fn collect_head_ids(
    years: &[sahakar_core::reports::YearMappings],
    kind: ReportKind,
) -> Vec<AccountHeadId> {
    let mut ids: Vec<AccountHeadId> = years
        .iter()
        .flat_map(|y| y.records.iter())
        .filter(|r| r.kind == kind)
        .map(|r| r.account_head_id)
        .collect();
    ids.sort_unstable_by_key(|id| id.into_inner());
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_two_places() {
        assert_eq!(format_money(Decimal::new(123_456, 2)), "1234.56");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_parse_year_accepts_label_and_bare_year() {
        assert_eq!(parse_year(Some("2023")).unwrap(), FinancialYear::new(2023));
        assert_eq!(
            parse_year(Some("2023-2024")).unwrap(),
            FinancialYear::new(2023)
        );
        assert!(parse_year(Some("not-a-year")).is_err());
        assert!(parse_year(None).is_err());
    }

    #[test]
    fn test_collect_head_ids_dedups_and_filters_kind() {
        use sahakar_core::reports::YearMappings;

        let head = AccountHeadId::new();
        let other = AccountHeadId::new();
        let record = |id, kind| MappingRecord {
            account_head_id: id,
            side: EntrySide::Debit,
            kind,
            total_amount: Decimal::ZERO,
        };

        let years = vec![
            YearMappings {
                year: FinancialYear::new(2023),
                records: vec![
                    record(head, ReportKind::BalanceSheet),
                    record(other, ReportKind::ProfitLoss),
                ],
            },
            YearMappings {
                year: FinancialYear::new(2024),
                records: vec![record(head, ReportKind::BalanceSheet)],
            },
        ];

        let ids = collect_head_ids(&years, ReportKind::BalanceSheet);
        assert_eq!(ids, vec![head]);
    }
}
