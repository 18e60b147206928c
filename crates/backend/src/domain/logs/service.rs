use contracts::domain::logs::{
    LogListParams, LogStatus, LoginLog, LoginStats, RegistrationLog, RegistrationStats,
};
use contracts::domain::users::RegistrationSource;
use uuid::Uuid;

use super::repository::{self, login, registration};
use crate::shared::data::dates;
use crate::shared::error::ApiResult;
use crate::shared::query::AccessScope;

/// Request metadata captured for audit rows.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Audit writes are best effort: a failed log write must never fail the
/// login or registration it describes.
pub async fn record_login_attempt(
    user_id: Option<&str>,
    email: &str,
    status: LogStatus,
    failure_reason: Option<&str>,
    meta: &RequestMeta,
) {
    let model = login::Model {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.map(str::to_string),
        email: email.to_string(),
        ip_address: meta.ip_address.clone(),
        user_agent: meta.user_agent.clone(),
        status: status.as_str().to_string(),
        failure_reason: failure_reason.map(str::to_string),
        login_at: dates::now(),
    };
    if let Err(e) = repository::insert_login(model).await {
        tracing::warn!("Failed to write login log for {email}: {e:#}");
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn record_registration_attempt(
    user_id: Option<&str>,
    email: &str,
    name: &str,
    role: &str,
    source: RegistrationSource,
    status: LogStatus,
    failure_reason: Option<&str>,
    meta: &RequestMeta,
) {
    let model = registration::Model {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.map(str::to_string),
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        registration_source: source.as_str().to_string(),
        ip_address: meta.ip_address.clone(),
        user_agent: meta.user_agent.clone(),
        status: status.as_str().to_string(),
        failure_reason: failure_reason.map(str::to_string),
        registered_at: dates::now(),
    };
    if let Err(e) = repository::insert_registration(model).await {
        tracing::warn!("Failed to write registration log for {email}: {e:#}");
    }
}

pub async fn list_login(
    params: &LogListParams,
    scope: &AccessScope,
) -> ApiResult<(Vec<LoginLog>, u64)> {
    Ok(repository::list_login(params, scope).await?)
}

pub async fn list_registration(params: &LogListParams) -> ApiResult<(Vec<RegistrationLog>, u64)> {
    Ok(repository::list_registration(params).await?)
}

pub async fn login_stats() -> ApiResult<LoginStats> {
    Ok(repository::login_stats().await?)
}

pub async fn registration_stats() -> ApiResult<RegistrationStats> {
    Ok(repository::registration_stats().await?)
}
