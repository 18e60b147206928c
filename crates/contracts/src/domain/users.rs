use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles a dashboard account can hold. Admin and Manager unlock the
/// management surfaces; everyone else is a regular caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Customer,
    Support,
    Sales,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Customer => "Customer",
            Role::Support => "Support",
            Role::Sales => "Sales",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Role::Admin),
            "Manager" => Some(Role::Manager),
            "Customer" => Some(Role::Customer),
            "Support" => Some(Role::Support),
            "Sales" => Some(Role::Sales),
            _ => None,
        }
    }

    pub fn is_admin_or_manager(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Pending => "Pending",
            UserStatus::Suspended => "Suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(UserStatus::Active),
            "Inactive" => Some(UserStatus::Inactive),
            "Pending" => Some(UserStatus::Pending),
            "Suspended" => Some(UserStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationSource {
    #[serde(rename = "Website")]
    Website,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "Admin Panel")]
    AdminPanel,
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "Import")]
    Import,
}

impl RegistrationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationSource::Website => "Website",
            RegistrationSource::MobileApp => "Mobile App",
            RegistrationSource::AdminPanel => "Admin Panel",
            RegistrationSource::Api => "API",
            RegistrationSource::Import => "Import",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Website" => Some(RegistrationSource::Website),
            "Mobile App" => Some(RegistrationSource::MobileApp),
            "Admin Panel" => Some(RegistrationSource::AdminPanel),
            "API" => Some(RegistrationSource::Api),
            "Import" => Some(RegistrationSource::Import),
            _ => None,
        }
    }
}

/// A dashboard account. The password hash lives only in the store and is
/// never part of this struct, so it cannot leak through serialization.
///
/// `orders_count`, `total_spent` and `average_order_value` are denormalized
/// caches maintained at order creation; average = spent / count whenever
/// count > 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub registration_source: RegistrationSource,
    pub registered_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(rename = "orders")]
    pub orders_count: i64,
    pub total_spent: f64,
    pub average_order_value: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for POST /api/users (Admin/Manager) and POST /api/auth/register.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub registration_source: Option<RegistrationSource>,
    pub notes: Option<String>,
}

/// Partial merge for PUT /api/users/:id. Absent fields keep their value;
/// the password is never updatable through this shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub notes: Option<String>,
}

/// Filters accepted by GET /api/users.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    pub active_users: i64,
    pub new_users_today: i64,
    pub churn_rate: String,
}
