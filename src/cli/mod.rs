pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gym-cli")]
#[command(about = "Operational CLI for the Gym API backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply control-plane migrations and load every gym database")]
    Init,

    #[command(about = "Tenant (gym) management")]
    Tenant {
        #[command(subcommand)]
        cmd: commands::tenant::TenantCommands,
    },

    #[command(about = "Control-plane user management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init => commands::init::handle().await,
        Commands::Tenant { cmd } => commands::tenant::handle(cmd).await,
        Commands::User { cmd } => commands::user::handle(cmd).await,
    }
}
