pub mod init;
pub mod tenant;
pub mod user;

use crate::config;
use crate::state::AppState;

pub(crate) fn bootstrap_state() -> anyhow::Result<AppState> {
    Ok(AppState::bootstrap(config::config())?)
}
