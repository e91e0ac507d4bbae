use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tenant metadata row in the control-plane database. The physical database
/// name is derived from `gym_key`, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gym {
    pub id: i64,
    pub name: String,
    pub gym_key: String,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
