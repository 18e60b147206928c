use contracts::domain::users::{
    RegistrationSource, Role, User, UserListParams, UserStats, UserStatus,
};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Set, Statement};
use serde::{Deserialize, Serialize};

use crate::shared::data::dates;
use crate::shared::data::db::get_connection;
use crate::shared::query::{CountRow, ListQuery};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub registration_source: String,
    pub registered_at: String,
    pub last_login: Option<String>,
    pub orders_count: i64,
    pub total_spent: f64,
    pub average_order_value: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The password hash never crosses this boundary.
impl From<Model> for User {
    fn from(m: Model) -> Self {
        User {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            role: Role::parse(&m.role).unwrap_or(Role::Customer),
            status: UserStatus::parse(&m.status).unwrap_or(UserStatus::Active),
            registration_source: RegistrationSource::parse(&m.registration_source)
                .unwrap_or(RegistrationSource::Website),
            registered_at: dates::parse_or_now(&m.registered_at),
            last_login: dates::parse_opt(m.last_login.as_deref()),
            orders_count: m.orders_count,
            total_spent: m.total_spent,
            average_order_value: m.average_order_value,
            notes: m.notes,
            created_at: dates::parse_or_now(&m.created_at),
            updated_at: dates::parse_or_now(&m.updated_at),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

const SORTABLE: &[&str] = &[
    "name",
    "email",
    "role",
    "status",
    "registered_at",
    "last_login",
    "orders_count",
    "total_spent",
    "created_at",
];

fn build_query(params: &UserListParams) -> ListQuery {
    let mut q = ListQuery::new();
    if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
        q.contains_any(&["name", "email"], search.trim());
    }
    if let Some(role) = params.role {
        q.eq("role", role.as_str());
    }
    if let Some(status) = params.status {
        q.eq("status", status.as_str());
    }
    q.order_by(
        params.sort_by.as_deref(),
        params.sort_desc.unwrap_or(true),
        SORTABLE,
        "created_at DESC",
    );
    q.paginate(params.page, params.limit);
    q
}

pub async fn list(params: &UserListParams) -> anyhow::Result<(Vec<User>, u64)> {
    let q = build_query(params);

    let (sql, values) = q.page_sql("SELECT * FROM users");
    let rows = Entity::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .all(conn())
        .await?;

    let (count_sql, count_values) = q.count_sql("users");
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

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<User>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_model_by_id(id: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find_by_id(id).one(conn()).await?)
}

pub async fn get_model_by_email(email: &str) -> anyhow::Result<Option<Model>> {
    let result = Entity::find()
        .filter(Column::Email.eq(email))
        .one(conn())
        .await?;
    Ok(result)
}

pub async fn email_taken(email: &str, exclude_id: Option<&str>) -> anyhow::Result<bool> {
    let mut query = Entity::find().filter(Column::Email.eq(email));
    if let Some(id) = exclude_id {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.one(conn()).await?.is_some())
}

pub async fn insert(model: Model) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        email: Set(model.email),
        password: Set(model.password),
        phone: Set(model.phone),
        role: Set(model.role),
        status: Set(model.status),
        registration_source: Set(model.registration_source),
        registered_at: Set(model.registered_at),
        last_login: Set(model.last_login),
        orders_count: Set(model.orders_count),
        total_spent: Set(model.total_spent),
        average_order_value: Set(model.average_order_value),
        notes: Set(model.notes),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    };
    active.insert(conn()).await?;
    Ok(())
}

pub async fn update(model: Model) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        email: Set(model.email),
        password: Set(model.password),
        phone: Set(model.phone),
        role: Set(model.role),
        status: Set(model.status),
        registration_source: Set(model.registration_source),
        registered_at: Set(model.registered_at),
        last_login: Set(model.last_login),
        orders_count: Set(model.orders_count),
        total_spent: Set(model.total_spent),
        average_order_value: Set(model.average_order_value),
        notes: Set(model.notes),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn record_login(id: &str) -> anyhow::Result<()> {
    let now = dates::now();
    conn()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE users SET last_login = ?, updated_at = ? WHERE id = ?",
            [now.clone().into(), now.into(), id.to_string().into()],
        ))
        .await?;
    Ok(())
}

pub async fn update_password(id: &str, password_hash: &str) -> anyhow::Result<()> {
    conn()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE users SET password = ?, updated_at = ? WHERE id = ?",
            [
                password_hash.to_string().into(),
                dates::now().into(),
                id.to_string().into(),
            ],
        ))
        .await?;
    Ok(())
}

/// Shift the denormalized order aggregates by the given deltas, flooring at
/// zero, then recompute the average from the stored values.
pub async fn apply_order_totals(
    customer_id: &str,
    delta_orders: i64,
    delta_spent: f64,
) -> anyhow::Result<()> {
    let c = conn();
    c.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE users SET
            orders_count = MAX(orders_count + ?, 0),
            total_spent = MAX(total_spent + ?, 0),
            updated_at = ?
         WHERE id = ?",
        [
            delta_orders.into(),
            delta_spent.into(),
            dates::now().into(),
            customer_id.to_string().into(),
        ],
    ))
    .await?;
    c.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE users SET average_order_value =
            CASE WHEN orders_count > 0 THEN total_spent / orders_count ELSE 0 END
         WHERE id = ?",
        [customer_id.to_string().into()],
    ))
    .await?;
    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct UserStatsRow {
    total_users: i64,
    active_users: i64,
    inactive_users: i64,
    new_users_today: i64,
}

pub async fn stats() -> anyhow::Result<UserStats> {
    let today_start = chrono::Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|d| d.and_utc().to_rfc3339())
        .unwrap_or_default();

    let row = UserStatsRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT
            COUNT(*) AS total_users,
            COALESCE(SUM(CASE WHEN status = 'Active' THEN 1 ELSE 0 END), 0) AS active_users,
            COALESCE(SUM(CASE WHEN status = 'Inactive' THEN 1 ELSE 0 END), 0) AS inactive_users,
            COALESCE(SUM(CASE WHEN registered_at >= ? THEN 1 ELSE 0 END), 0) AS new_users_today
         FROM users",
        [today_start.into()],
    ))
    .one(conn())
    .await?
    .unwrap_or(UserStatsRow {
        total_users: 0,
        active_users: 0,
        inactive_users: 0,
        new_users_today: 0,
    });

    let churn = if row.total_users > 0 {
        row.inactive_users as f64 / row.total_users as f64 * 100.0
    } else {
        0.0
    };

    Ok(UserStats {
        total_users: row.total_users,
        active_users: row.active_users,
        new_users_today: row.new_users_today,
        churn_rate: format!("{churn:.1}%"),
    })
}
