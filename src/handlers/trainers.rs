use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use super::ListQuery;
use crate::database::models::Trainer;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};

const TRAINER_COLUMNS: &str = "id, name, specialty, email, phone_number, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreateTrainer {
    pub name: String,
    pub specialty: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTrainer {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// GET /api/trainers - List trainers of one gym
pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Vec<Trainer>> {
    let (limit, offset) = query.page();
    let trainers = sqlx::query_as::<_, Trainer>(&format!(
        "SELECT {TRAINER_COLUMNS} FROM trainers ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(trainers))
}

/// POST /api/trainers - Create a trainer
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<CreateTrainer>,
) -> ApiResult<Trainer> {
    let trainer = sqlx::query_as::<_, Trainer>(&format!(
        "INSERT INTO trainers (name, specialty, email, phone_number) \
         VALUES ($1, $2, $3, $4) RETURNING {TRAINER_COLUMNS}"
    ))
    .bind(&payload.name)
    .bind(&payload.specialty)
    .bind(&payload.email)
    .bind(&payload.phone_number)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(trainer))
}

/// GET /api/trainers/:id - Retrieve one trainer
pub async fn retrieve(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Trainer> {
    let trainer = sqlx::query_as::<_, Trainer>(&format!(
        "SELECT {TRAINER_COLUMNS} FROM trainers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Trainer not found"))?;
    Ok(ApiResponse::success(trainer))
}

/// PUT /api/trainers/:id - Partial update
pub async fn update(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<UpdateTrainer>,
) -> ApiResult<Trainer> {
    let trainer = sqlx::query_as::<_, Trainer>(&format!(
        "UPDATE trainers SET \
           name = COALESCE($2, name), \
           specialty = COALESCE($3, specialty), \
           email = COALESCE($4, email), \
           phone_number = COALESCE($5, phone_number), \
           updated_at = now() \
         WHERE id = $1 RETURNING {TRAINER_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.name)
    .bind(payload.specialty)
    .bind(payload.email)
    .bind(payload.phone_number)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Trainer not found"))?;
    Ok(ApiResponse::success(trainer))
}

/// DELETE /api/trainers/:id
pub async fn destroy(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM trainers WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Trainer not found"));
    }
    Ok(ApiResponse::no_content())
}
