//! CLI command definitions and dispatch.

pub mod migrate;
pub mod seed;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use bizdesk_core::error::AppError;

/// BizDesk — Multi-tenant back-office administration
#[derive(Debug, Parser)]
#[command(name = "bizdesk", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/default.toml plus config/<env>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Seed a business with an administrator account
    Seed(seed::SeedArgs),
    /// User management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Seed(args) => seed::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for the given environment
pub fn load_config(env: &str) -> Result<bizdesk_core::config::AppConfig, AppError> {
    bizdesk_core::config::AppConfig::load(env)
}

/// Helper: create database pool from config
pub async fn create_db_pool(
    config: &bizdesk_core::config::AppConfig,
) -> Result<sqlx::PgPool, AppError> {
    bizdesk_database::connection::create_pool(&config.database).await
}
