use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims, TokenKind};
use crate::config;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const USER_COLUMNS: &str =
    "id, name, phone, email, password, is_staff, is_superuser, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// POST /api/login - Authenticate against the control-plane users table and
/// issue an access/refresh token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Value> {
    let user: Option<User> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(&payload.email)
            .fetch_optional(&state.control)
            .await?;

    // Same response for unknown email and wrong password
    let user = user
        .filter(|u| auth::verify_password(&payload.password, &u.password))
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let security = &config::config().security;
    let access = Claims::new(
        user.id,
        &user.email,
        user.access_level(),
        TokenKind::Access,
        security.jwt_expiry_hours,
    );
    let refresh = Claims::new(
        user.id,
        &user.email,
        user.access_level(),
        TokenKind::Refresh,
        security.refresh_expiry_hours,
    );

    Ok(ApiResponse::success(json!({
        "token": auth::encode_token(&access, &security.jwt_secret)?,
        "refresh": auth::encode_token(&refresh, &security.jwt_secret)?,
        "expires_in": security.jwt_expiry_hours * 3600,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "access": user.access_level(),
        },
    })))
}

/// POST /api/token/refresh - Exchange a refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Value> {
    let security = &config::config().security;
    let claims = auth::decode_token(&payload.refresh, &security.jwt_secret, TokenKind::Refresh)?;

    // The account must still exist before a new access token is issued
    let user: Option<User> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(claims.sub)
            .fetch_optional(&state.control)
            .await?;
    let user = user.ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    let access = Claims::new(
        user.id,
        &user.email,
        user.access_level(),
        TokenKind::Access,
        security.jwt_expiry_hours,
    );

    Ok(ApiResponse::success(json!({
        "token": auth::encode_token(&access, &security.jwt_secret)?,
        "expires_in": security.jwt_expiry_hours * 3600,
    })))
}

/// POST /api/logout - Token issuance is stateless; this acknowledges the
/// logout so clients can drop their tokens.
pub async fn logout() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "detail": "Successfully logged out."
    })))
}
