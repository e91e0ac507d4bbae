use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scheduled class. Trainer and member references are only valid within
/// the same gym database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GymClass {
    pub id: i64,
    pub name: String,
    pub trainer_id: i64,
    pub member_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
