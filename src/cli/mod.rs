pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use crate::config;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "blogctl")]
#[command(about = "blogctl - administration for the Blog API database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Grant the admin flag to a user")]
    Promote {
        #[arg(help = "Username")]
        username: String,
    },

    #[command(about = "Revoke the admin flag from a user")]
    Demote {
        #[arg(help = "Username")]
        username: String,
    },

    #[command(about = "List registered users")]
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let pool = open_pool().await?;

    match cli.command {
        Commands::Migrate => commands::db::migrate(&pool, output_format).await,
        Commands::Promote { username } => {
            commands::users::set_admin(&pool, &username, true, output_format).await
        }
        Commands::Demote { username } => {
            commands::users::set_admin(&pool, &username, false, output_format).await
        }
        Commands::Users => commands::users::list(&pool, output_format).await,
    }
}

async fn open_pool() -> anyhow::Result<SqlitePool> {
    let database = &config::config().database;
    Ok(DatabaseManager::connect(database).await?)
}
