use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use contracts::domain::users::Role;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::shared::data::db::get_connection;

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;
const SECRET_SETTING_KEY: &str = "jwt_secret";

/// Issue an HS256 access token carrying the user's id, email and role.
pub async fn generate_access_token(user_id: &str, email: &str, role: Role) -> Result<String> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let secret = get_jwt_secret().await?;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

/// Decode and verify a token, returning its claims. Expiry is checked by
/// the default validation.
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(data.claims)
}

/// The signing secret lives in sys_settings so tokens survive restarts; a
/// missing or unreadable row gets a freshly generated secret.
pub async fn get_jwt_secret() -> Result<String> {
    if let Ok(Some(secret)) = load_secret().await {
        return Ok(secret);
    }
    let secret = generate_jwt_secret();
    let _ = store_secret(&secret).await;
    Ok(secret)
}

/// 256 random bits, base64-encoded.
fn generate_jwt_secret() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&bytes)
}

async fn load_secret() -> Result<Option<String>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [SECRET_SETTING_KEY.into()],
        ))
        .await?;
    row.map(|r| r.try_get("", "value")).transpose().map_err(Into::into)
}

async fn store_secret(secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                SECRET_SETTING_KEY.into(),
                secret.to_string().into(),
                "Auto-generated JWT signing secret".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;
    Ok(())
}
