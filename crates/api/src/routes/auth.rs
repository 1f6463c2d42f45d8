//! Authentication routes for register, login, and token refresh.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use sahakar_core::auth::{hash_password, verify_password};
use sahakar_db::UserRepository;
use sahakar_shared::auth::{LoginRequest, RefreshRequest, RegisterRequest};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

/// Creates the authenticated part of the auth router; the caller applies
/// the auth middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// Basic user info in responses.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Full name.
    pub full_name: String,
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let access_token = match state.jwt_service.generate_access_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error("An error occurred during login");
        }
    };
    let refresh_token = match state.jwt_service.generate_refresh_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error("An error occurred during login");
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    (
        StatusCode::OK,
        Json(json!({
            "user": UserInfo {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
            },
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_in": state.jwt_service.access_token_expires_in(),
        })),
    )
        .into_response()
}

/// POST /auth/register - Register a new accountant.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return internal_error("An error occurred during registration");
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("An error occurred during registration");
        }
    };

    let user = match user_repo
        .create(&payload.email, &password_hash, &payload.full_name)
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return internal_error("An error occurred during registration");
        }
    };

    info!(user_id = %user.id, email = %user.email, "New user registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "user": UserInfo {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
            }
        })),
    )
        .into_response()
}

/// POST /auth/refresh - Refresh access token using refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            let (error, message) = match e {
                sahakar_shared::JwtError::Expired => ("token_expired", "Refresh token has expired"),
                _ => ("invalid_token", "Invalid refresh token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response();
        }
    };

    let access_token = match state.jwt_service.generate_access_token(claims.user_id()) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error("An error occurred during token refresh");
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

/// GET /auth/me - Return the authenticated caller's identity.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!({
                "user": UserInfo {
                    id: user.id,
                    email: user.email,
                    full_name: user.full_name,
                }
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch user");
            internal_error("An error occurred")
        }
    }
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
