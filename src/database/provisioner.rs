use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::info;

use crate::database::migrations;
use crate::database::registry::{ConnectionConfig, ConnectionRegistry, RegistryError};

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Invalid gym key: {0}")]
    InvalidKey(String),

    #[error("Failed to create database {0}: {1}")]
    CreateDatabase(String, sqlx::Error),

    #[error("Failed to connect to gym database {0}: {1}")]
    Connect(String, sqlx::Error),

    #[error("Migration failed for gym database {0}: {1}")]
    Migrate(String, sqlx::Error),

    #[error("Timed out while {0}")]
    Timeout(&'static str),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Physical database name for a gym key.
pub fn database_name_for(key: &str) -> String {
    format!("{}_db", key)
}

/// Gym keys become unquoted parts of database identifiers, so the accepted
/// alphabet is strict: lowercase ascii alphanumerics and underscores, leading
/// letter, 2..=50 chars.
pub fn validate_tenant_key(key: &str) -> Result<(), ProvisionError> {
    if key.len() < 2 || key.len() > 50 {
        return Err(ProvisionError::InvalidKey(format!(
            "gym key must be 2-50 characters, got {:?}",
            key
        )));
    }
    if !key.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return Err(ProvisionError::InvalidKey(format!(
            "gym key must start with a lowercase letter, got {:?}",
            key
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ProvisionError::InvalidKey(format!(
            "gym key may only contain lowercase letters, digits and underscores, got {:?}",
            key
        )));
    }
    Ok(())
}

/// Creates tenant databases, registers their connection configuration and
/// applies the tenant schema. Database creation goes through the
/// administrative (control-plane) connection; everything else uses the
/// tenant's own registered pool.
pub struct TenantProvisioner {
    registry: Arc<ConnectionRegistry>,
    admin: PgPool,
    database_url: String,
    provision_timeout: Duration,
}

impl TenantProvisioner {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        admin: PgPool,
        database_url: String,
        provision_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            admin,
            database_url,
            provision_timeout,
        }
    }

    /// Full provisioning: create the physical database if absent, then
    /// register and migrate. The explicit re-provision entry point.
    pub async fn provision(&self, key: &str) -> Result<PgPool, ProvisionError> {
        self.ensure_database(key).await?;
        self.activate(key).await
    }

    /// Create the physical database for a gym key if it does not exist.
    /// Idempotent. Errors here are fatal to tenant creation: without the
    /// database there is nothing for the tenant to operate against.
    pub async fn ensure_database(&self, key: &str) -> Result<String, ProvisionError> {
        validate_tenant_key(key)?;
        let database = database_name_for(key);

        let created = timeout(self.provision_timeout, self.create_if_absent(&database))
            .await
            .map_err(|_| ProvisionError::Timeout("creating gym database"))??;
        if created {
            info!("Created gym database: {}", database);
        }
        Ok(database)
    }

    async fn create_if_absent(&self, database: &str) -> Result<bool, ProvisionError> {
        let exists: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM pg_catalog.pg_database WHERE datname = $1")
                .bind(database)
                .fetch_optional(&self.admin)
                .await
                .map_err(|e| ProvisionError::CreateDatabase(database.to_string(), e))?;
        if exists.is_some() {
            return Ok(false);
        }

        // CREATE DATABASE takes no bind parameters; the identifier is quoted
        // and the key alphabet already validated.
        let statement = format!("CREATE DATABASE {}", quote_identifier(database));
        match sqlx::query(&statement).execute(&self.admin).await {
            Ok(_) => Ok(true),
            // duplicate_database: a concurrent provisioning call won the race
            Err(sqlx::Error::Database(dbe)) if dbe.code().as_deref() == Some("42P04") => Ok(false),
            Err(e) => Err(ProvisionError::CreateDatabase(database.to_string(), e)),
        }
    }

    /// Register the gym's connection configuration and bring its schema up to
    /// date. The registry entry survives a failed connect or migration
    /// (registered but unmigrated); callers decide whether that failure is
    /// fatal or retried on the next startup pass.
    pub async fn activate(&self, key: &str) -> Result<PgPool, ProvisionError> {
        validate_tenant_key(key)?;
        let database = database_name_for(key);
        let config = ConnectionConfig::from_url(&self.database_url, &database)?;
        let pool = self.registry.register(key, config).await;

        timeout(self.provision_timeout, migrations::migrate_tenant_schema(&pool))
            .await
            .map_err(|_| ProvisionError::Timeout("migrating gym database"))?
            .map_err(|e| classify_tenant_error(&database, e))?;

        info!("Gym database ready: {} ({})", key, database);
        Ok(pool)
    }
}

fn classify_tenant_error(database: &str, err: sqlx::Error) -> ProvisionError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => ProvisionError::Connect(database.to_string(), err),
        other => ProvisionError::Migrate(database.to_string(), other),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_database_name() {
        assert_eq!(database_name_for("alpha"), "alpha_db");
        assert_eq!(database_name_for("iron_temple"), "iron_temple_db");
    }

    #[test]
    fn accepts_valid_keys() {
        for key in ["alpha", "iron_temple", "gym42", "a1"] {
            assert!(validate_tenant_key(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_keys() {
        for key in ["", "a", "Alpha", "1gym", "gym-1", "gym key", "gym;drop"] {
            assert!(
                matches!(validate_tenant_key(key), Err(ProvisionError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overlong_keys() {
        let key = "a".repeat(51);
        assert!(validate_tenant_key(&key).is_err());
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_identifier("alpha_db"), "\"alpha_db\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
