use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::ListQuery;
use crate::database::models::payment::{Payment, PAYMENT_METHODS};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};

const PAYMENT_COLUMNS: &str =
    "id, member_id, amount, payment_date, payment_method, created_at, updated_at";

#[derive(Debug, Deserialize)]
pub struct CreatePayment {
    pub member_id: i64,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePayment {
    pub member_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
}

fn validate_payment_method(method: &str) -> Result<(), ApiError> {
    if PAYMENT_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(ApiError::validation_error(
            format!(
                "payment_method must be one of {:?}, got {:?}",
                PAYMENT_METHODS, method
            ),
            None,
        ))
    }
}

/// GET /api/payments - List payments of one gym
pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Vec<Payment>> {
    let (limit, offset) = query.page();
    let payments = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY payment_date DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(payments))
}

/// POST /api/payments - Record a payment
pub async fn create(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<CreatePayment>,
) -> ApiResult<Payment> {
    validate_payment_method(&payload.payment_method)?;

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "INSERT INTO payments (member_id, amount, payment_date, payment_method) \
         VALUES ($1, $2, $3, $4) RETURNING {PAYMENT_COLUMNS}"
    ))
    .bind(payload.member_id)
    .bind(payload.amount)
    .bind(payload.payment_date)
    .bind(&payload.payment_method)
    .fetch_one(&pool)
    .await?;
    Ok(ApiResponse::created(payment))
}

/// GET /api/payments/:id - Retrieve one payment
pub async fn retrieve(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<Payment> {
    let payment = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Payment not found"))?;
    Ok(ApiResponse::success(payment))
}

/// PUT /api/payments/:id - Partial update
pub async fn update(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Json(payload): Json<UpdatePayment>,
) -> ApiResult<Payment> {
    if let Some(method) = payload.payment_method.as_deref() {
        validate_payment_method(method)?;
    }

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "UPDATE payments SET \
           member_id = COALESCE($2, member_id), \
           amount = COALESCE($3, amount), \
           payment_date = COALESCE($4, payment_date), \
           payment_method = COALESCE($5, payment_method), \
           updated_at = now() \
         WHERE id = $1 RETURNING {PAYMENT_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.member_id)
    .bind(payload.amount)
    .bind(payload.payment_date)
    .bind(payload.payment_method)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Payment not found"))?;
    Ok(ApiResponse::success(payment))
}

/// DELETE /api/payments/:id
pub async fn destroy(
    Path(id): Path<i64>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
) -> ApiResult<()> {
    let result = sqlx::query("DELETE FROM payments WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Payment not found"));
    }
    Ok(ApiResponse::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_payment_methods() {
        assert!(validate_payment_method("online").is_ok());
        assert!(validate_payment_method("cash").is_ok());
    }

    #[test]
    fn rejects_unknown_payment_method() {
        let err = validate_payment_method("wire").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
