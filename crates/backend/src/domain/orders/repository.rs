use std::collections::HashMap;

use contracts::domain::orders::{
    Order, OrderItem, OrderListParams, OrderStats, OrderStatus, PaymentMethod, PaymentStatus,
};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, DatabaseBackend, FromQueryResult, Set, Statement};
use serde::{Deserialize, Serialize};

use crate::shared::data::dates;
use crate::shared::data::db::get_connection;
use crate::shared::query::{AccessScope, CountRow, ListQuery};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub status: String,
    pub payment_method: String,
    pub payment_status: String,
    pub total: f64,
    pub shipping_cost: f64,
    pub tax: f64,
    pub discount: f64,
    pub date: String,
    pub processed_at: Option<String>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Line items live in their own table; quantities and prices are immutable
/// after the order is created.
pub mod items {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "order_items")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub order_id: String,
        pub product_id: String,
        pub product_name: Option<String>,
        pub quantity: i64,
        pub price: f64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

fn to_order(m: Model, item_rows: Vec<items::Model>) -> Order {
    Order {
        id: m.id,
        order_id: m.order_id,
        customer: m.customer_id,
        customer_name: m.customer_name,
        items: item_rows
            .into_iter()
            .map(|i| OrderItem {
                product_id: i.product_id,
                product_name: i.product_name,
                quantity: i.quantity,
                price: i.price,
            })
            .collect(),
        total: m.total,
        status: OrderStatus::parse(&m.status).unwrap_or(OrderStatus::Pending),
        payment_method: PaymentMethod::parse(&m.payment_method)
            .unwrap_or(PaymentMethod::CreditCard),
        payment_status: PaymentStatus::parse(&m.payment_status).unwrap_or(PaymentStatus::Pending),
        shipping_cost: m.shipping_cost,
        tax: m.tax,
        discount: m.discount,
        date: dates::parse_or_now(&m.date),
        processed_at: dates::parse_opt(m.processed_at.as_deref()),
        shipped_at: dates::parse_opt(m.shipped_at.as_deref()),
        delivered_at: dates::parse_opt(m.delivered_at.as_deref()),
        cancelled_at: dates::parse_opt(m.cancelled_at.as_deref()),
        cancellation_reason: m.cancellation_reason,
        notes: m.notes,
        created_at: dates::parse_or_now(&m.created_at),
        updated_at: dates::parse_or_now(&m.updated_at),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn build_query(params: &OrderListParams, scope: &AccessScope) -> ListQuery {
    let mut q = ListQuery::new();
    q.scope("customer_id", scope);
    if let Some(status) = params.status {
        q.eq("status", status.as_str());
    }
    if let Some(customer) = params.customer.as_deref().filter(|c| !c.is_empty()) {
        q.eq("customer_id", customer);
    }
    if let Some(from) = params.date_from {
        q.gte("date", from.to_rfc3339());
    }
    if let Some(to) = params.date_to {
        q.lte("date", to.to_rfc3339());
    }
    q.order_by_fixed("date DESC");
    q.paginate(params.page, params.limit);
    q
}

async fn items_for(order_ids: &[String]) -> anyhow::Result<HashMap<String, Vec<items::Model>>> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = items::Entity::find()
        .filter(items::Column::OrderId.is_in(order_ids.to_vec()))
        .all(conn())
        .await?;
    let mut by_order: HashMap<String, Vec<items::Model>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id.clone()).or_default().push(row);
    }
    Ok(by_order)
}

pub async fn list(
    params: &OrderListParams,
    scope: &AccessScope,
) -> anyhow::Result<(Vec<Order>, u64)> {
    let q = build_query(params, scope);

    let (sql, values) = q.page_sql("SELECT * FROM orders");
    let rows = Entity::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &sql,
            values,
        ))
        .all(conn())
        .await?;

    let (count_sql, count_values) = q.count_sql("orders");
    let total = CountRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &count_sql,
        count_values,
    ))
    .one(conn())
    .await?
    .map(|r| r.total as u64)
    .unwrap_or(0);

    let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let mut by_order = items_for(&ids).await?;
    let orders = rows
        .into_iter()
        .map(|m| {
            let item_rows = by_order.remove(&m.id).unwrap_or_default();
            to_order(m, item_rows)
        })
        .collect();

    Ok((orders, total))
}

/// Owner-scoped readers see nothing for orders they do not own; the caller
/// decides whether that is a 404.
pub async fn get_by_id(id: &str, scope: &AccessScope) -> anyhow::Result<Option<Order>> {
    let Some(model) = Entity::find_by_id(id).one(conn()).await? else {
        return Ok(None);
    };
    if let Some(owner) = scope.owner_id() {
        if model.customer_id != owner {
            return Ok(None);
        }
    }
    let item_rows = items::Entity::find()
        .filter(items::Column::OrderId.eq(id))
        .all(conn())
        .await?;
    Ok(Some(to_order(model, item_rows)))
}

pub async fn get_model_by_id(id: &str) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find_by_id(id).one(conn()).await?)
}

pub async fn get_items(order_id: &str) -> anyhow::Result<Vec<items::Model>> {
    Ok(items::Entity::find()
        .filter(items::Column::OrderId.eq(order_id))
        .all(conn())
        .await?)
}

pub struct NewItem {
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

pub async fn insert(model: Model, line_items: Vec<NewItem>) -> anyhow::Result<()> {
    let order_id = model.id.clone();
    let active = ActiveModel {
        id: Set(model.id),
        order_id: Set(model.order_id),
        customer_id: Set(model.customer_id),
        customer_name: Set(model.customer_name),
        status: Set(model.status),
        payment_method: Set(model.payment_method),
        payment_status: Set(model.payment_status),
        total: Set(model.total),
        shipping_cost: Set(model.shipping_cost),
        tax: Set(model.tax),
        discount: Set(model.discount),
        date: Set(model.date),
        processed_at: Set(model.processed_at),
        shipped_at: Set(model.shipped_at),
        delivered_at: Set(model.delivered_at),
        cancelled_at: Set(model.cancelled_at),
        cancellation_reason: Set(model.cancellation_reason),
        notes: Set(model.notes),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    };
    active.insert(conn()).await?;

    for item in line_items {
        let active = items::ActiveModel {
            id: ActiveValue::NotSet,
            order_id: Set(order_id.clone()),
            product_id: Set(item.product_id),
            product_name: Set(item.product_name),
            quantity: Set(item.quantity),
            price: Set(item.price),
        };
        active.insert(conn()).await?;
    }
    Ok(())
}

pub async fn update(model: Model) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(model.id),
        order_id: Set(model.order_id),
        customer_id: Set(model.customer_id),
        customer_name: Set(model.customer_name),
        status: Set(model.status),
        payment_method: Set(model.payment_method),
        payment_status: Set(model.payment_status),
        total: Set(model.total),
        shipping_cost: Set(model.shipping_cost),
        tax: Set(model.tax),
        discount: Set(model.discount),
        date: Set(model.date),
        processed_at: Set(model.processed_at),
        shipped_at: Set(model.shipped_at),
        delivered_at: Set(model.delivered_at),
        cancelled_at: Set(model.cancelled_at),
        cancellation_reason: Set(model.cancellation_reason),
        notes: Set(model.notes),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    items::Entity::delete_many()
        .filter(items::Column::OrderId.eq(id))
        .exec(conn())
        .await?;
    let result = Entity::delete_by_id(id).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count_all() -> anyhow::Result<i64> {
    let row = CountRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT COUNT(*) AS total FROM orders".to_string(),
    ))
    .one(conn())
    .await?;
    Ok(row.map(|r| r.total).unwrap_or(0))
}

#[derive(Debug, FromQueryResult)]
struct OrderStatsRow {
    total_orders: i64,
    pending_orders: i64,
    completed_orders: i64,
    total_revenue: f64,
}

/// Owner-scoped callers get stats over their own orders only.
pub async fn stats(scope: &AccessScope) -> anyhow::Result<OrderStats> {
    let scope_clause = match scope {
        AccessScope::All => "",
        AccessScope::Owner(_) => " WHERE customer_id = ?",
    };
    let sql = format!(
        "SELECT
            COUNT(*) AS total_orders,
            COALESCE(SUM(CASE WHEN status = 'Pending' THEN 1 ELSE 0 END), 0) AS pending_orders,
            COALESCE(SUM(CASE WHEN status = 'Delivered' THEN 1 ELSE 0 END), 0) AS completed_orders,
            COALESCE(SUM(CASE WHEN status != 'Cancelled' THEN total ELSE 0.0 END), 0.0) AS total_revenue
         FROM orders{scope_clause}"
    );
    let values: Vec<sea_orm::Value> = match scope.owner_id() {
        Some(owner) => vec![owner.to_string().into()],
        None => vec![],
    };
    let row = OrderStatsRow::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &sql,
        values,
    ))
    .one(conn())
    .await?
    .unwrap_or(OrderStatsRow {
        total_orders: 0,
        pending_orders: 0,
        completed_orders: 0,
        total_revenue: 0.0,
    });

    Ok(OrderStats {
        total_orders: row.total_orders,
        pending_orders: row.pending_orders,
        completed_orders: row.completed_orders,
        total_revenue: row.total_revenue,
    })
}
