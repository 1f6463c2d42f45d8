//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::Response};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::auth::auth_middleware};
use sahakar_db::SocietyRepository;

pub mod account_heads;
pub mod auth;
pub mod cashbook;
pub mod health;
pub mod reports;
pub mod societies;

/// Creates the API router with all routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(societies::routes())
        .merge(account_heads::routes())
        .merge(cashbook::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Fetches a society owned by the caller, or produces the error response.
///
/// Every society-scoped route goes through this check: a society that does
/// not exist or belongs to another accountant is reported as not found.
pub(crate) async fn fetch_owned_society(
    society_repo: &SocietyRepository,
    society_id: Uuid,
    user_id: Uuid,
) -> Result<sahakar_db::entities::societies::Model, Response> {
    use axum::response::IntoResponse;

    match society_repo.find_owned(society_id, user_id).await {
        Ok(Some(society)) => Ok(society),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Society not found"
            })),
        )
            .into_response()),
        Err(e) => {
            error!(error = %e, "Failed to fetch society");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response())
        }
    }
}
