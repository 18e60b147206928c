use contracts::domain::logs::{
    LogListParams, LogStatus, LoginLog, LoginStats, RegistrationLog, RegistrationStats,
};
use contracts::domain::users::RegistrationSource;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseBackend, FromQueryResult, Set, Statement};

use crate::shared::data::dates;
use crate::shared::data::db::get_connection;
use crate::shared::query::{AccessScope, CountRow, ListQuery};

pub mod login {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "login_logs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub user_id: Option<String>,
        pub email: String,
        pub ip_address: Option<String>,
        pub user_agent: Option<String>,
        pub status: String,
        pub failure_reason: Option<String>,
        pub login_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod registration {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "registration_logs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub user_id: Option<String>,
        pub email: String,
        pub name: String,
        pub role: String,
        pub registration_source: String,
        pub ip_address: Option<String>,
        pub user_agent: Option<String>,
        pub status: String,
        pub failure_reason: Option<String>,
        pub registered_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<login::Model> for LoginLog {
    fn from(m: login::Model) -> Self {
        LoginLog {
            id: m.id,
            user: m.user_id,
            email: m.email,
            ip_address: m.ip_address,
            user_agent: m.user_agent,
            status: LogStatus::parse(&m.status).unwrap_or(LogStatus::Failed),
            failure_reason: m.failure_reason,
            login_at: dates::parse_or_now(&m.login_at),
        }
    }
}

impl From<registration::Model> for RegistrationLog {
    fn from(m: registration::Model) -> Self {
        RegistrationLog {
            id: m.id,
            user: m.user_id,
            email: m.email,
            name: m.name,
            role: m.role,
            registration_source: RegistrationSource::parse(&m.registration_source)
                .unwrap_or(RegistrationSource::Website),
            ip_address: m.ip_address,
            user_agent: m.user_agent,
            status: LogStatus::parse(&m.status).unwrap_or(LogStatus::Failed),
            failure_reason: m.failure_reason,
            registered_at: dates::parse_or_now(&m.registered_at),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert_login(model: login::Model) -> anyhow::Result<()> {
    let active = login::ActiveModel {
        id: Set(model.id),
        user_id: Set(model.user_id),
        email: Set(model.email),
        ip_address: Set(model.ip_address),
        user_agent: Set(model.user_agent),
        status: Set(model.status),
        failure_reason: Set(model.failure_reason),
        login_at: Set(model.login_at),
    };
    active.insert(conn()).await?;
    Ok(())
}

pub async fn insert_registration(model: registration::Model) -> anyhow::Result<()> {
    let active = registration::ActiveModel {
        id: Set(model.id),
        user_id: Set(model.user_id),
        email: Set(model.email),
        name: Set(model.name),
        role: Set(model.role),
        registration_source: Set(model.registration_source),
        ip_address: Set(model.ip_address),
        user_agent: Set(model.user_agent),
        status: Set(model.status),
        failure_reason: Set(model.failure_reason),
        registered_at: Set(model.registered_at),
    };
    active.insert(conn()).await?;
    Ok(())
}

fn build_query(params: &LogListParams, scope: &AccessScope, date_column: &str) -> ListQuery {
    let mut q = ListQuery::new();
    q.scope("user_id", scope);
    if let Some(status) = params.status {
        q.eq("status", status.as_str());
    }
    if let Some(email) = params.email.as_deref().filter(|e| !e.is_empty()) {
        q.contains_any(&["email"], email);
    }
    if let Some(from) = params.date_from {
        q.gte(date_column, from.to_rfc3339());
    }
    if let Some(to) = params.date_to {
        q.lte(date_column, to.to_rfc3339());
    }
    q.order_by_fixed(&format!("{date_column} DESC"));
    q.paginate(params.page, params.limit);
    q
}

pub async fn list_login(
    params: &LogListParams,
    scope: &AccessScope,
) -> anyhow::Result<(Vec<LoginLog>, u64)> {
    let q = build_query(params, scope, "login_at");

    let (sql, values) = q.page_sql("SELECT * FROM login_logs");
    let rows = login::Entity::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .all(conn())
        .await?;

    let (count_sql, count_values) = q.count_sql("login_logs");
    let total = CountRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &count_sql,
        count_values,
    ))
    .one(conn())
    .await?
    .map(|r| r.total as u64)
    .unwrap_or(0);

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

pub async fn list_registration(
    params: &LogListParams,
) -> anyhow::Result<(Vec<RegistrationLog>, u64)> {
    let q = build_query(params, &AccessScope::All, "registered_at");

    let (sql, values) = q.page_sql("SELECT * FROM registration_logs");
    let rows = registration::Entity::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .all(conn())
        .await?;

    let (count_sql, count_values) = q.count_sql("registration_logs");
    let total = CountRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &count_sql,
        count_values,
    ))
    .one(conn())
    .await?
    .map(|r| r.total as u64)
    .unwrap_or(0);

    Ok((rows.into_iter().map(Into::into).collect(), total))
}

#[derive(Debug, FromQueryResult)]
struct LoginStatsRow {
    total_attempts: i64,
    successful: i64,
    failed: i64,
    last24h: i64,
}

pub async fn login_stats() -> anyhow::Result<LoginStats> {
    let day_ago = (chrono::Utc::now() - chrono::Duration::hours(24)).to_rfc3339();
    let row = LoginStatsRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT
            COUNT(*) AS total_attempts,
            COALESCE(SUM(CASE WHEN status = 'Success' THEN 1 ELSE 0 END), 0) AS successful,
            COALESCE(SUM(CASE WHEN status = 'Failed' THEN 1 ELSE 0 END), 0) AS failed,
            COALESCE(SUM(CASE WHEN login_at >= ? THEN 1 ELSE 0 END), 0) AS last24h
         FROM login_logs",
        [day_ago.into()],
    ))
    .one(conn())
    .await?
    .unwrap_or(LoginStatsRow {
        total_attempts: 0,
        successful: 0,
        failed: 0,
        last24h: 0,
    });

    Ok(LoginStats {
        total_attempts: row.total_attempts,
        successful: row.successful,
        failed: row.failed,
        last24h: row.last24h,
    })
}

pub async fn registration_stats() -> anyhow::Result<RegistrationStats> {
    let day_ago = (chrono::Utc::now() - chrono::Duration::hours(24)).to_rfc3339();
    let row = LoginStatsRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT
            COUNT(*) AS total_attempts,
            COALESCE(SUM(CASE WHEN status = 'Success' THEN 1 ELSE 0 END), 0) AS successful,
            COALESCE(SUM(CASE WHEN status = 'Failed' THEN 1 ELSE 0 END), 0) AS failed,
            COALESCE(SUM(CASE WHEN registered_at >= ? THEN 1 ELSE 0 END), 0) AS last24h
         FROM registration_logs",
        [day_ago.into()],
    ))
    .one(conn())
    .await?
    .unwrap_or(LoginStatsRow {
        total_attempts: 0,
        successful: 0,
        failed: 0,
        last24h: 0,
    });

    Ok(RegistrationStats {
        total_attempts: row.total_attempts,
        successful: row.successful,
        failed: row.failed,
        last24h: row.last24h,
    })
}
