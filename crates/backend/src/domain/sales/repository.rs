use contracts::domain::orders::PaymentMethod;
use contracts::domain::sales::{
    Sale, SaleChannel, SaleListParams, SaleStatus, SalesGroupTotal, SalesStats,
};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseBackend, FromQueryResult, Set, Statement};
use serde::{Deserialize, Serialize};

use crate::shared::data::dates;
use crate::shared::data::db::get_connection;
use crate::shared::query::{AccessScope, CountRow, ListQuery};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sale_id: String,
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub sale_date: String,
    pub payment_method: String,
    pub channel: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sale {
    fn from(m: Model) -> Self {
        Sale {
            id: m.id,
            sale_id: m.sale_id,
            order: m.order_id,
            customer: m.customer_id,
            customer_name: m.customer_name,
            product: m.product_id,
            product_name: m.product_name,
            category: m.category,
            quantity: m.quantity,
            unit_price: m.unit_price,
            total_amount: m.total_amount,
            sale_date: dates::parse_or_now(&m.sale_date),
            payment_method: PaymentMethod::parse(&m.payment_method)
                .unwrap_or(PaymentMethod::CreditCard),
            channel: SaleChannel::parse(&m.channel).unwrap_or(SaleChannel::Website),
            status: SaleStatus::parse(&m.status).unwrap_or(SaleStatus::Completed),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn build_query(params: &SaleListParams, scope: &AccessScope) -> ListQuery {
    let mut q = ListQuery::new();
    q.scope("customer_id", scope);
    if let Some(category) = params.category.as_deref().filter(|c| !c.is_empty()) {
        q.eq("category", category);
    }
    if let Some(channel) = params.channel {
        q.eq("channel", channel.as_str());
    }
    if let Some(status) = params.status {
        q.eq("status", status.as_str());
    }
    if let Some(customer) = params.customer_id.as_deref().filter(|c| !c.is_empty()) {
        q.eq("customer_id", customer);
    }
    if let Some(product) = params.product_id.as_deref().filter(|p| !p.is_empty()) {
        q.eq("product_id", product);
    }
    if let Some(from) = params.date_from {
        q.gte("sale_date", from.to_rfc3339());
    }
    if let Some(to) = params.date_to {
        q.lte("sale_date", to.to_rfc3339());
    }
    q.order_by_fixed("sale_date DESC");
    q.paginate(params.page, params.limit);
    q
}

pub async fn list(
    params: &SaleListParams,
    scope: &AccessScope,
) -> anyhow::Result<(Vec<Sale>, u64)> {
    let q = build_query(params, scope);

    let (sql, values) = q.page_sql("SELECT * FROM sales");
    let rows = Entity::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .all(conn())
        .await?;

    let (count_sql, count_values) = q.count_sql("sales");
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

pub async fn get_by_id(id: &str, scope: &AccessScope) -> anyhow::Result<Option<Sale>> {
    let Some(model) = Entity::find_by_id(id).one(conn()).await? else {
        return Ok(None);
    };
    if let Some(owner) = scope.owner_id() {
        if model.customer_id != owner {
            return Ok(None);
        }
    }
    Ok(Some(model.into()))
}

pub async fn insert(model: Model) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(model.id),
        sale_id: Set(model.sale_id),
        order_id: Set(model.order_id),
        customer_id: Set(model.customer_id),
        customer_name: Set(model.customer_name),
        product_id: Set(model.product_id),
        product_name: Set(model.product_name),
        category: Set(model.category),
        quantity: Set(model.quantity),
        unit_price: Set(model.unit_price),
        total_amount: Set(model.total_amount),
        sale_date: Set(model.sale_date),
        payment_method: Set(model.payment_method),
        channel: Set(model.channel),
        status: Set(model.status),
    };
    active.insert(conn()).await?;
    Ok(())
}

pub async fn count_all() -> anyhow::Result<i64> {
    let row = CountRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT COUNT(*) AS total FROM sales".to_string(),
    ))
    .one(conn())
    .await?;
    Ok(row.map(|r| r.total).unwrap_or(0))
}

#[derive(Debug, FromQueryResult)]
struct GroupRow {
    name: String,
    total: f64,
    count: i64,
}

/// Completed-sale totals grouped by an enumerated column. The column name
/// comes from a fixed internal set, never from the caller.
async fn group_totals(column: &str, scope: &AccessScope) -> anyhow::Result<Vec<SalesGroupTotal>> {
    let scope_clause = match scope {
        AccessScope::All => String::new(),
        AccessScope::Owner(_) => " AND customer_id = ?".to_string(),
    };
    let sql = format!(
        "SELECT {column} AS name,
                COALESCE(SUM(total_amount), 0) AS total,
                COUNT(*) AS count
         FROM sales
         WHERE status = 'Completed'{scope_clause}
         GROUP BY {column}
         ORDER BY total DESC"
    );
    let values: Vec<sea_orm::Value> = match scope.owner_id() {
        Some(owner) => vec![owner.to_string().into()],
        None => vec![],
    };
    let rows = GroupRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &sql,
        values,
    ))
    .all(conn())
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| SalesGroupTotal {
            name: r.name,
            total: r.total,
            count: r.count,
        })
        .collect())
}

pub async fn totals_by_category(scope: &AccessScope) -> anyhow::Result<Vec<SalesGroupTotal>> {
    group_totals("category", scope).await
}

pub async fn totals_by_channel(scope: &AccessScope) -> anyhow::Result<Vec<SalesGroupTotal>> {
    group_totals("channel", scope).await
}

#[derive(Debug, FromQueryResult)]
struct SalesTotalsRow {
    total_sales: i64,
    total_revenue: f64,
    recent_sales: i64,
}

pub async fn stats(scope: &AccessScope) -> anyhow::Result<SalesStats> {
    let month_ago = (chrono::Utc::now() - chrono::Duration::days(30)).to_rfc3339();
    let scope_clause = match scope {
        AccessScope::All => String::new(),
        AccessScope::Owner(_) => " AND customer_id = ?".to_string(),
    };
    let sql = format!(
        "SELECT
            COUNT(*) AS total_sales,
            COALESCE(SUM(total_amount), 0) AS total_revenue,
            COALESCE(SUM(CASE WHEN sale_date >= ? THEN 1 ELSE 0 END), 0) AS recent_sales
         FROM sales
         WHERE status = 'Completed'{scope_clause}"
    );
    let mut values: Vec<sea_orm::Value> = vec![month_ago.into()];
    if let Some(owner) = scope.owner_id() {
        values.push(owner.to_string().into());
    }
    let row = SalesTotalsRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &sql,
        values,
    ))
    .one(conn())
    .await?
    .unwrap_or(SalesTotalsRow {
        total_sales: 0,
        total_revenue: 0.0,
        recent_sales: 0,
    });

    Ok(SalesStats {
        total_sales: row.total_sales,
        total_revenue: row.total_revenue,
        sales_by_category: totals_by_category(scope).await?,
        sales_by_channel: totals_by_channel(scope).await?,
        recent_sales: row.recent_sales,
    })
}
