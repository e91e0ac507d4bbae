use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use chrono::NaiveTime;
use serde::Deserialize;

use super::ListQuery;
use crate::database::models::GymClass;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};

const CLASS_COLUMNS: &str =
    "id, name, trainer_id, member_id, start_time, end_time, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreateGymClass {
    pub name: String,
    pub trainer_id: i64,
    pub member_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGymClass {
    pub name: Option<String>,
    pub trainer_id: Option<i64>,
    pub member_id: Option<i64>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// GET /api/gym-classes - List classes of one gym
pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Vec<GymClass>> {
    let (limit, offset) = query.page();
    let classes = sqlx::query_as::<_, GymClass>(&format!(
        "SELECT {CLASS_COLUMNS} FROM gym_classes ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(classes))
}

/// POST /api/gym-classes - Create a class
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<CreateGymClass>,
) -> ApiResult<GymClass> {
    let class = sqlx::query_as::<_, GymClass>(&format!(
        "INSERT INTO gym_classes (name, trainer_id, member_id, start_time, end_time) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {CLASS_COLUMNS}"
    ))
    .bind(&payload.name)
    .bind(payload.trainer_id)
    .bind(payload.member_id)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(class))
}

/// GET /api/gym-classes/:id - Retrieve one class
pub async fn retrieve(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<GymClass> {
    let class = sqlx::query_as::<_, GymClass>(&format!(
        "SELECT {CLASS_COLUMNS} FROM gym_classes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Gym class not found"))?;
    Ok(ApiResponse::success(class))
}

/// PUT /api/gym-classes/:id - Partial update
pub async fn update(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<UpdateGymClass>,
) -> ApiResult<GymClass> {
    let class = sqlx::query_as::<_, GymClass>(&format!(
        "UPDATE gym_classes SET \
           name = COALESCE($2, name), \
           trainer_id = COALESCE($3, trainer_id), \
           member_id = COALESCE($4, member_id), \
           start_time = COALESCE($5, start_time), \
           end_time = COALESCE($6, end_time), \
           updated_at = now() \
         WHERE id = $1 RETURNING {CLASS_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.name)
    .bind(payload.trainer_id)
    .bind(payload.member_id)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Gym class not found"))?;
    Ok(ApiResponse::success(class))
}

/// DELETE /api/gym-classes/:id
pub async fn destroy(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM gym_classes WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Gym class not found"));
    }
    Ok(ApiResponse::no_content())
}
