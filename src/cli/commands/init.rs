use anyhow::Context;

use super::bootstrap_state;
use crate::database::migrations;
use crate::services::GymService;

/// Initialize the control-plane schema and bring every known gym database
/// up to date. Per-gym failures are reported but do not stop the pass.
pub async fn handle() -> anyhow::Result<()> {
    let state = bootstrap_state()?;

    migrations::migrate_control_schema(&state.control)
        .await
        .context("control-plane migration failed")?;
    println!("Control-plane schema up to date");

    let report = GymService::from_state(&state).load_all().await?;
    for (key, reason) in &report.failed {
        println!("ERROR   {}: {}", key, reason);
    }
    println!(
        "Initialized {}/{} gym databases",
        report.activated, report.attempted
    );

    state.registry.close_all().await;
    Ok(())
}
