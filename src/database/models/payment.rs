use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const PAYMENT_METHODS: &[&str] = &["online", "cash"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub member_id: i64,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    /// One of [`PAYMENT_METHODS`]; checked at the API boundary.
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
