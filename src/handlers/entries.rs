use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ListQuery;
use crate::database::models::MemberEntry;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};

const ENTRY_COLUMNS: &str = "id, member_id, entry_time, exit_time";

#[derive(Debug, Deserialize)]
pub struct CreateEntry {
    pub member_id: i64,
    pub exit_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntry {
    pub member_id: Option<i64>,
    pub exit_time: Option<DateTime<Utc>>,
}

/// GET /api/member-entries - List entry records of one gym
pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Vec<MemberEntry>> {
    let (limit, offset) = query.page();
    let entries = sqlx::query_as::<_, MemberEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM member_entries ORDER BY entry_time DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(entries))
}

/// POST /api/member-entries - Record an entry; entry_time defaults to now
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<CreateEntry>,
) -> ApiResult<MemberEntry> {
    let entry = sqlx::query_as::<_, MemberEntry>(&format!(
        "INSERT INTO member_entries (member_id, exit_time) VALUES ($1, $2) RETURNING {ENTRY_COLUMNS}"
    ))
    .bind(payload.member_id)
    .bind(payload.exit_time)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(entry))
}

/// GET /api/member-entries/:id - Retrieve one entry record
pub async fn retrieve(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<MemberEntry> {
    let entry = sqlx::query_as::<_, MemberEntry>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM member_entries WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Entry record not found"))?;
    Ok(ApiResponse::success(entry))
}

/// PUT /api/member-entries/:id - Partial update, typically setting exit_time
pub async fn update(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<UpdateEntry>,
) -> ApiResult<MemberEntry> {
    let entry = sqlx::query_as::<_, MemberEntry>(&format!(
        "UPDATE member_entries SET \
           member_id = COALESCE($2, member_id), \
           exit_time = COALESCE($3, exit_time) \
         WHERE id = $1 RETURNING {ENTRY_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.member_id)
    .bind(payload.exit_time)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Entry record not found"))?;
    Ok(ApiResponse::success(entry))
}

/// DELETE /api/member-entries/:id
pub async fn destroy(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM member_entries WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Entry record not found"));
    }
    Ok(ApiResponse::no_content())
}
