use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::RegistrationSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStatus {
    Success,
    Failed,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "Success",
            LogStatus::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Success" => Some(LogStatus::Success),
            "Failed" => Some(LogStatus::Failed),
            _ => None,
        }
    }
}

/// Append-only audit record of a login attempt. `user` is null when the
/// attempt failed before a user could be resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLog {
    pub id: String,
    pub user: Option<String>,
    pub email: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: LogStatus,
    pub failure_reason: Option<String>,
    pub login_at: DateTime<Utc>,
}

/// Append-only audit record of a registration attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationLog {
    pub id: String,
    pub user: Option<String>,
    pub email: String,
    pub name: String,
    pub role: String,
    pub registration_source: RegistrationSource,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: LogStatus,
    pub failure_reason: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<LogStatus>,
    pub email: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStats {
    pub total_attempts: i64,
    pub successful: i64,
    pub failed: i64,
    pub last24h: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    pub total_attempts: i64,
    pub successful: i64,
    pub failed: i64,
    pub last24h: i64,
}
