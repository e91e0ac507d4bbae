use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Control-plane account: gym owners and staff. Lives only in the shared
/// database, never in tenant databases.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn access_level(&self) -> &'static str {
        if self.is_staff {
            "admin"
        } else {
            "user"
        }
    }
}
