use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::AuthContext;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role_id: i32,
    pub admin_code: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i32,
    pub username: String,
    pub role_id: i32,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware for protected routes. Verifies the
/// `Authorization: Bearer <token>` header and stashes the caller's
/// [`AuthContext`] in request extensions for handlers to pick up.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state.token_issuer().verify(token)?;
    let ctx = AuthContext::try_from(&claims)?;

    tracing::Span::current().record("user_id", &claims.name);
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create an account. Registering with the Admin role requires the
/// configured admin code; missing or wrong codes are rejected outright.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>, ApiError> {
    let wants_admin = state
        .store()
        .is_admin_role(payload.role_id)
        .await
        .map_err(|e| ApiError::internal(format!("Role lookup failed: {e}")))?;

    if wants_admin {
        let expected = state.config().read().await.auth.admin_registration_code.clone();
        if expected.is_empty() || payload.admin_code.as_deref() != Some(expected.as_str()) {
            return Err(ApiError::forbidden(
                "Admin registration requires a valid admin code",
            ));
        }
    }

    let account = state
        .auth_service()
        .register(&payload.username, &payload.password, payload.role_id)
        .await?;

    Ok(Json(ApiResponse::success(RegisterResponse {
        id: account.id,
        username: account.username,
        role_id: account.role_id,
    })))
}

/// POST /auth/login
/// Authenticate with username and password, returns a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let grant = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(LoginResponse {
        username: grant.username,
        token: grant.token,
    })))
}

/// GET /auth/is-admin
/// Whether the calling account's role resolves to Admin
pub async fn is_admin(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<IsAdminResponse>>, ApiError> {
    let is_admin = state.auth_service().is_admin_role(ctx.role_id).await?;

    Ok(Json(ApiResponse::success(IsAdminResponse { is_admin })))
}

/// PUT /auth/password
/// Change password (requires current password verification)
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .change_password(
            ctx.account_id,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    tracing::info!("Password changed for account {}", ctx.account_id);

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}

// ============================================================================
// Role guards
// ============================================================================

/// Rejects callers whose role does not resolve to Admin. Unrecognized
/// roles are denied along with Client.
pub async fn require_admin(state: &AppState, ctx: AuthContext) -> Result<(), ApiError> {
    let is_admin = state
        .store()
        .is_admin_role(ctx.role_id)
        .await
        .map_err(|e| ApiError::internal(format!("Role lookup failed: {e}")))?;

    if is_admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Catalog changes require the Admin role"))
    }
}

/// Rejects Admin callers. Favourites belong to regular accounts.
pub async fn require_non_admin(state: &AppState, ctx: AuthContext) -> Result<(), ApiError> {
    let is_admin = state
        .store()
        .is_admin_role(ctx.role_id)
        .await
        .map_err(|e| ApiError::internal(format!("Role lookup failed: {e}")))?;

    if is_admin {
        Err(ApiError::forbidden(
            "Favourites are not available to the Admin role",
        ))
    } else {
        Ok(())
    }
}
