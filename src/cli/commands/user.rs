use anyhow::Context;
use clap::Subcommand;
use uuid::Uuid;

use super::bootstrap_state;
use crate::auth::hash_password;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a control-plane user account")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, help = "Grant staff access (may manage gyms)")]
        staff: bool,

        #[arg(long, help = "Grant superuser access (implies --staff)")]
        superuser: bool,
    },
}

pub async fn handle(cmd: UserCommands) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create {
            name,
            email,
            password,
            phone,
            staff,
            superuser,
        } => {
            let state = bootstrap_state()?;

            let (id,): (Uuid,) = sqlx::query_as(
                "INSERT INTO users (name, phone, email, password, is_staff, is_superuser) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
            )
            .bind(&name)
            .bind(&phone)
            .bind(&email)
            .bind(hash_password(&password))
            .bind(staff || superuser)
            .bind(superuser)
            .fetch_one(&state.control)
            .await
            .context("failed to create user")?;

            println!("Created user {} ({})", email, id);
            Ok(())
        }
    }
}
