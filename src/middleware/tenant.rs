use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolved tenant database pool, injected by middleware
#[derive(Clone)]
pub struct TenantPool(pub PgPool);

/// The tenant a request operates against, resolved once per request
#[derive(Clone, Debug)]
pub struct TenantContext {
    pub key: String,
    pub database: String,
}

#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    pub gym: Option<String>,
}

/// Middleware for tenant-scoped routes: reads the `gym` query parameter,
/// resolves it through the connection registry and injects the tenant pool.
/// An unknown key surfaces as a structured 404, never as a fallback to the
/// control-plane database.
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    Query(params): Query<TenantQuery>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = params
        .gym
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required query parameter: gym"))?;

    let pool = state.registry.resolve(key).await?;
    let config = state.registry.config_for(key).await?;

    tracing::debug!("Resolved gym {} -> {}", key, config.database);

    request.extensions_mut().insert(TenantContext {
        key: key.to_string(),
        database: config.database,
    });
    request.extensions_mut().insert(TenantPool(pool));

    Ok(next.run(request).await)
}
