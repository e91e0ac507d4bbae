use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::database::provisioner::TenantProvisioner;
use crate::database::registry::{ConnectionConfig, ConnectionRegistry, RegistryError};

/// Long-lived application state: the control-plane pool, the connection
/// registry and the provisioner built around them. Constructed once at
/// process start and shared by both the server and the CLI.
#[derive(Clone)]
pub struct AppState {
    pub control: PgPool,
    pub registry: Arc<ConnectionRegistry>,
    pub provisioner: Arc<TenantProvisioner>,
}

impl AppState {
    pub fn bootstrap(config: &AppConfig) -> Result<Self, RegistryError> {
        let db = &config.database;
        let acquire_timeout = Duration::from_secs(db.acquire_timeout_secs);

        let control_config = ConnectionConfig::from_url(&db.url, &db.control_database_name())?;
        let control = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(control_config.connect_options());

        let registry = Arc::new(ConnectionRegistry::new(db.max_connections, acquire_timeout));
        let provisioner = Arc::new(TenantProvisioner::new(
            registry.clone(),
            control.clone(),
            db.url.clone(),
            Duration::from_secs(db.provision_timeout_secs),
        ));

        Ok(Self {
            control,
            registry,
            provisioner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn bootstrap_builds_state_without_io() {
        // connect_lazy pools mean bootstrap succeeds with no server running
        let state = AppState::bootstrap(&AppConfig::development()).unwrap();
        assert_eq!(Arc::strong_count(&state.registry), 2); // state + provisioner
    }

    #[test]
    fn bootstrap_rejects_bad_url() {
        let mut config = AppConfig::development();
        config.database.url = "not-a-url".to_string();
        assert!(AppState::bootstrap(&config).is_err());
    }
}
