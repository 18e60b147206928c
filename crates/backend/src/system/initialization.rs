use anyhow::Result;
use contracts::domain::users::{CreateUserRequest, RegistrationSource, Role, UserStatus};
use sea_orm::{DatabaseBackend, FromQueryResult, Statement};

use crate::domain::users::service as users_service;
use crate::shared::query::CountRow;

/// Ensure admin user exists (create if table is empty)
pub async fn ensure_admin_user_exists() -> Result<()> {
    use crate::shared::data::db::get_connection;

    let count = CountRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT COUNT(*) AS total FROM users".to_string(),
    ))
    .one(get_connection())
    .await?
    .map(|r| r.total)
    .unwrap_or(0);

    if count == 0 {
        tracing::info!("No users found. Creating default admin user...");

        let email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        let admin = CreateUserRequest {
            name: "Administrator".to_string(),
            email: email.clone(),
            password,
            phone: None,
            role: Some(Role::Admin),
            status: Some(UserStatus::Active),
            registration_source: Some(RegistrationSource::AdminPanel),
            notes: None,
        };

        let user = users_service::create(admin, RegistrationSource::AdminPanel)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create default admin: {e}"))?;

        tracing::warn!("═══════════════════════════════════════════════");
        tracing::warn!("  Default admin user created!");
        tracing::warn!("  Email: {}", email);
        tracing::warn!("  User ID: {}", user.id);
        tracing::warn!("  ⚠️  PLEASE CHANGE THE PASSWORD IMMEDIATELY!");
        tracing::warn!("═══════════════════════════════════════════════");
    }

    Ok(())
}
