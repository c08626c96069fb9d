//! Admin seeding utility
//!
//! Creates the fixed administrator account, replacing any previous account
//! under the same email (tasks included, through the same transactional
//! cascade the admin delete uses). Running it twice is safe.
//!
//! ```bash
//! cargo run -p taskdeck-api --bin seed-admin
//! ```

use taskdeck_api::config::Config;
use taskdeck_shared::{
    auth::password,
    db::{migrations, pool},
    models::user::{CreateUser, User},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fixed seed credentials; change the password after first login.
const ADMIN_NAME: &str = "Admin";
const ADMIN_EMAIL: &str = "admin@taskdeck.local";
const ADMIN_PASSWORD: &str = "admin123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_admin=info,taskdeck_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: 2,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    // Remove any previous admin account under this email
    if let Some(existing) = User::find_by_email(&db, ADMIN_EMAIL).await? {
        let tasks_deleted = User::delete_cascade(&db, existing.id).await?.unwrap_or(0);
        tracing::info!(
            user_id = %existing.id,
            tasks_deleted,
            "Deleted previous admin account"
        );
    }

    let password_hash = password::hash_password(ADMIN_PASSWORD)?;

    let admin = User::create(
        &db,
        CreateUser {
            name: ADMIN_NAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash,
            is_admin: true,
        },
    )
    .await?;

    tracing::info!(user_id = %admin.id, "Admin user created successfully");
    tracing::info!("Email: {}", admin.email);
    tracing::info!("Password: {}", ADMIN_PASSWORD);
    tracing::info!("You can now log in as the administrator with these credentials.");

    pool::close_pool(db).await;

    Ok(())
}
