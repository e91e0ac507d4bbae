use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique within one gym's database only.
    pub email: String,
    pub phone_number: String,
    pub membership_start: NaiveDate,
    pub membership_end: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
