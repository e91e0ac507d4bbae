use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::Gym;
use crate::database::provisioner::{validate_tenant_key, ProvisionError, TenantProvisioner};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum GymError {
    #[error("Gym already exists: {0}")]
    AlreadyExists(String),

    #[error("Admin user not found: {0}")]
    AdminNotFound(Uuid),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct CreateGym {
    pub name: String,
    pub gym_key: String,
    pub admin_id: Uuid,
}

/// Outcome of one startup-loader pass over the gyms table.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub attempted: usize,
    pub activated: usize,
    pub failed: Vec<(String, String)>,
}

const GYM_COLUMNS: &str = "id, name, gym_key, admin_id, created_at, updated_at";

/// Tenant lifecycle orchestration over the control-plane database and the
/// provisioner. Creation is an explicit two-step workflow (persist metadata,
/// then provision) rather than a persistence-layer side effect, and runs
/// synchronously: the caller waits for database creation and migration.
pub struct GymService {
    control: PgPool,
    provisioner: Arc<TenantProvisioner>,
}

impl GymService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            control: state.control.clone(),
            provisioner: state.provisioner.clone(),
        }
    }

    /// Create a new gym. Ordering matters: the physical database is created
    /// before the gyms row is written, so no row can ever reference a
    /// database that does not exist. A creation failure propagates to the
    /// caller with nothing persisted and nothing registered.
    pub async fn create_gym(&self, req: CreateGym) -> Result<Gym, GymError> {
        validate_tenant_key(&req.gym_key)?;

        if self.gym_exists(&req.gym_key).await? {
            return Err(GymError::AlreadyExists(req.gym_key));
        }
        if !self.admin_exists(req.admin_id).await? {
            return Err(GymError::AdminNotFound(req.admin_id));
        }

        let database = self.provisioner.ensure_database(&req.gym_key).await?;

        let gym: Gym = sqlx::query_as(&format!(
            "INSERT INTO gyms (name, gym_key, admin_id) VALUES ($1, $2, $3) RETURNING {GYM_COLUMNS}"
        ))
        .bind(&req.name)
        .bind(&req.gym_key)
        .bind(req.admin_id)
        .fetch_one(&self.control)
        .await?;

        // Transient activation failures leave the gym registered but
        // unmigrated; the next startup pass or an explicit re-provision
        // retries.
        if let Err(e) = self.provisioner.activate(&req.gym_key).await {
            warn!(
                "Gym {} created with database {} but activation failed: {}",
                gym.gym_key, database, e
            );
        }

        info!("Created gym {} ({})", gym.name, gym.gym_key);
        Ok(gym)
    }

    pub async fn list_gyms(&self) -> Result<Vec<Gym>, GymError> {
        let gyms = sqlx::query_as(&format!(
            "SELECT {GYM_COLUMNS} FROM gyms ORDER BY created_at DESC"
        ))
        .fetch_all(&self.control)
        .await?;
        Ok(gyms)
    }

    pub async fn get_gym(&self, id: i64) -> Result<Option<Gym>, GymError> {
        let gym = sqlx::query_as(&format!("SELECT {GYM_COLUMNS} FROM gyms WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.control)
            .await?;
        Ok(gym)
    }

    /// Startup loader: register and migrate every known gym. Databases are
    /// assumed to exist from prior provisioning; this never creates one.
    /// One gym's failure never prevents the remaining gyms from loading.
    pub async fn load_all(&self) -> Result<LoadReport, GymError> {
        let keys: Vec<(String,)> = sqlx::query_as("SELECT gym_key FROM gyms ORDER BY created_at")
            .fetch_all(&self.control)
            .await?;

        let mut report = LoadReport {
            attempted: keys.len(),
            ..Default::default()
        };
        for (key,) in keys {
            match self.provisioner.activate(&key).await {
                Ok(_) => report.activated += 1,
                Err(e) => {
                    warn!("Could not load gym database for {}: {}", key, e);
                    report.failed.push((key, e.to_string()));
                }
            }
        }
        Ok(report)
    }

    async fn gym_exists(&self, gym_key: &str) -> Result<bool, GymError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM gyms WHERE gym_key = $1")
            .bind(gym_key)
            .fetch_one(&self.control)
            .await?;
        Ok(count.0 > 0)
    }

    async fn admin_exists(&self, admin_id: Uuid) -> Result<bool, GymError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = $1")
            .bind(admin_id)
            .fetch_one(&self.control)
            .await?;
        Ok(count.0 > 0)
    }
}
