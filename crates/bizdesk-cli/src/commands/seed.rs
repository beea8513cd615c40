//! Bootstrap seeding: a business, an administrator role, and a first user.

use clap::Args;

use crate::output;
use bizdesk_auth::PasswordHasher;
use bizdesk_core::error::AppError;
use bizdesk_database::repositories::business::BusinessRepository;
use bizdesk_database::repositories::permission::PermissionRepository;
use bizdesk_database::repositories::role::RoleRepository;
use bizdesk_database::repositories::user::UserRepository;
use bizdesk_entity::permission::PermissionName;
use bizdesk_entity::role::RoleChange;
use bizdesk_entity::user::NewUser;

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Name of the business to create
    #[arg(long, default_value = "Default Business")]
    pub business_name: String,

    /// Email of the administrator account
    #[arg(long, default_value = "admin@example.com")]
    pub email: String,

    /// Username of the administrator account
    #[arg(long, default_value = "admin")]
    pub username: String,

    /// Initial password of the administrator account
    #[arg(long, default_value = "admin")]
    pub password: String,
}

/// Execute the seed command
pub async fn execute(args: &SeedArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    let businesses = BusinessRepository::new(pool.clone());
    let permissions = PermissionRepository::new(pool.clone());
    let roles = RoleRepository::new(pool.clone());
    let users = UserRepository::new(pool);

    if users.find_by_login(&args.username).await?.is_some()
        || users.find_by_login(&args.email).await?.is_some()
    {
        output::print_warning("An account with that email or username already exists.");
        return Ok(());
    }

    let admin_permission = permissions
        .find_by_name(PermissionName::Admin.as_str())
        .await?
        .ok_or_else(|| {
            AppError::internal("Permission catalog is empty; run `migrate run` first")
        })?;

    let business = businesses.create(&args.business_name, None).await?;

    let role = roles
        .create(&RoleChange {
            business_id: business.id,
            name: "Administrator".to_string(),
            description: Some("Full access to all operations".to_string()),
            permission_ids: vec![admin_permission.id],
        })
        .await?;

    let hasher = PasswordHasher::new(&config.auth)?;
    let password_hash = hasher.hash_password(&args.password)?;

    let user = users
        .create(
            &NewUser {
                business_id: business.id,
                email: args.email.clone(),
                username: Some(args.username.clone()),
                password_hash: Some(password_hash),
                first_name: "Admin".to_string(),
                last_name: None,
                created_by: None,
            },
            &[role.id],
        )
        .await?;

    output::print_success("Seed data created.");
    output::print_kv("Business", &format!("{} ({})", business.name, business.id));
    output::print_kv("Role", &format!("{} ({})", role.name, role.id));
    output::print_kv("User", &format!("{} ({})", user.email, user.id));
    output::print_kv("Login", &format!("{} / {}", args.username, args.password));

    Ok(())
}
