use anyhow::{bail, Context};
use clap::Subcommand;
use uuid::Uuid;

use super::bootstrap_state;
use crate::database::provisioner::database_name_for;
use crate::services::{CreateGym, GymService};

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List all gyms")]
    List,

    #[command(about = "Create a new gym and provision its database")]
    Create {
        #[arg(help = "Display name of the gym")]
        name: String,

        #[arg(long, help = "Tenant key (lowercase, becomes <key>_db)")]
        key: String,

        #[arg(long, help = "Email of the owning admin user")]
        admin_email: String,
    },

    #[command(about = "Re-provision an existing gym (create database if missing, re-register, migrate)")]
    Provision {
        #[arg(help = "Tenant key of the gym")]
        key: String,
    },
}

pub async fn handle(cmd: TenantCommands) -> anyhow::Result<()> {
    match cmd {
        TenantCommands::List => {
            let state = bootstrap_state()?;
            let gyms = GymService::from_state(&state).list_gyms().await?;

            if gyms.is_empty() {
                println!("No gyms registered");
                return Ok(());
            }

            println!("{:<6} {:<20} {:<20} {:<25} {}", "ID", "KEY", "DATABASE", "NAME", "CREATED");
            println!("{}", "-".repeat(90));
            for gym in gyms {
                println!(
                    "{:<6} {:<20} {:<20} {:<25} {}",
                    gym.id,
                    gym.gym_key,
                    database_name_for(&gym.gym_key),
                    gym.name,
                    gym.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }

        TenantCommands::Create { name, key, admin_email } => {
            let state = bootstrap_state()?;

            let admin_id: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM users WHERE email = $1")
                    .bind(&admin_email)
                    .fetch_optional(&state.control)
                    .await
                    .context("failed to look up admin user")?;
            let Some((admin_id,)) = admin_id else {
                bail!("no user with email {admin_email}; create one with `gym-cli user create`");
            };

            let gym = GymService::from_state(&state)
                .create_gym(CreateGym { name, gym_key: key, admin_id })
                .await?;
            println!(
                "Created gym {} (key {}, database {})",
                gym.name,
                gym.gym_key,
                database_name_for(&gym.gym_key)
            );
            Ok(())
        }

        TenantCommands::Provision { key } => {
            let state = bootstrap_state()?;
            state.provisioner.provision(&key).await?;
            println!("Provisioned gym {} (database {})", key, database_name_for(&key));
            Ok(())
        }
    }
}
