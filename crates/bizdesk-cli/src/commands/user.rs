//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use bizdesk_core::error::AppError;
use bizdesk_core::types::pagination::PageRequest;
use bizdesk_database::repositories::user::UserRepository;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users of a business
    List {
        /// Business ID to list users for
        #[arg(long)]
        business: Uuid,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Enable a user
    Enable {
        /// Email or username
        login: String,
    },
    /// Disable a user
    Disable {
        /// Email or username
        login: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Username
    username: String,
    /// Full name
    name: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(args: &UserArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let user_repo = UserRepository::new(pool);

    match &args.command {
        UserCommand::List {
            business,
            page,
            per_page,
        } => {
            let result = user_repo
                .find_all(*business, &PageRequest::new(*page, *per_page))
                .await?;

            let rows: Vec<UserRow> = result
                .items
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone(),
                    username: u.username.clone().unwrap_or_default(),
                    name: match &u.last_name {
                        Some(last) => format!("{} {}", u.first_name, last),
                        None => u.first_name.clone(),
                    },
                    status: if u.is_active { "active" } else { "inactive" }.to_string(),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::Enable { login } => {
            let user = user_repo
                .find_by_login(login)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", login)))?;

            user_repo.set_active(user.business_id, user.id, true).await?;
            output::print_success(&format!("User '{}' enabled", login));
        }
        UserCommand::Disable { login } => {
            let user = user_repo
                .find_by_login(login)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", login)))?;

            user_repo
                .set_active(user.business_id, user.id, false)
                .await?;
            output::print_success(&format!("User '{}' disabled", login));
        }
    }

    Ok(())
}
