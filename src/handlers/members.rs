use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::ListQuery;
use crate::database::models::Member;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantContext, TenantPool};

const MEMBER_COLUMNS: &str = "id, first_name, last_name, email, phone_number, \
     membership_start, membership_end, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreateMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub membership_start: NaiveDate,
    pub membership_end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMember {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub membership_start: Option<NaiveDate>,
    pub membership_end: Option<NaiveDate>,
}

/// GET /api/members - List members of one gym
pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Vec<Member>> {
    let (limit, offset) = query.page();
    let members = sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(members))
}

/// POST /api/members - Create a member
pub async fn create(
    Extension(tenant): Extension<TenantContext>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<CreateMember>,
) -> ApiResult<Member> {
    let member = sqlx::query_as::<_, Member>(&format!(
        "INSERT INTO members (first_name, last_name, email, phone_number, membership_start, membership_end) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {MEMBER_COLUMNS}"
    ))
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone_number)
    .bind(payload.membership_start)
    .bind(payload.membership_end)
    .fetch_one(&pool)
    .await?;

    tracing::info!("Created member {} in {}", member.id, tenant.database);
    Ok(ApiResponse::created(member))
}

/// GET /api/members/:id - Retrieve one member
pub async fn retrieve(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Member> {
    let member = sqlx::query_as::<_, Member>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Member not found"))?;
    Ok(ApiResponse::success(member))
}

/// PUT /api/members/:id - Partial update; absent fields keep current values
pub async fn update(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<UpdateMember>,
) -> ApiResult<Member> {
    let member = sqlx::query_as::<_, Member>(&format!(
        "UPDATE members SET \
           first_name = COALESCE($2, first_name), \
           last_name = COALESCE($3, last_name), \
           email = COALESCE($4, email), \
           phone_number = COALESCE($5, phone_number), \
           membership_start = COALESCE($6, membership_start), \
           membership_end = COALESCE($7, membership_end), \
           updated_at = now() \
         WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.first_name)
    .bind(payload.last_name)
    .bind(payload.email)
    .bind(payload.phone_number)
    .bind(payload.membership_start)
    .bind(payload.membership_end)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Member not found"))?;
    Ok(ApiResponse::success(member))
}

/// DELETE /api/members/:id
pub async fn destroy(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Member not found"));
    }
    Ok(ApiResponse::no_content())
}
