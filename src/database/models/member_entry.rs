use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One visit to the gym; `exit_time` stays null until the member leaves.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberEntry {
    pub id: i64,
    pub member_id: i64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
}
