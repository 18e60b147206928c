use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use contracts::shared::analytics::{
    DashboardOverview, GroupSlice, MonthlyRevenue, MonthlyUserGrowth, TopProduct,
};
use sea_orm::{FromQueryResult, Statement};

use crate::shared::data::db::get_connection;

/// The trailing twelve calendar months ending at `now`, oldest first,
/// keyed "YYYY-MM" to match `substr(rfc3339, 1, 7)`.
pub fn trailing_months(now: DateTime<Utc>) -> Vec<String> {
    let mut months = Vec::with_capacity(12);
    let mut year = now.year();
    let mut month = now.month() as i32;
    for _ in 0..12 {
        months.push(format!("{year:04}-{month:02}"));
        month -= 1;
        if month == 0 {
            month = 12;
            year -= 1;
        }
    }
    months.reverse();
    months
}

fn window_start(months: &[String]) -> String {
    // First day of the oldest bucket; RFC3339 text compares correctly.
    format!("{}-01T00:00:00+00:00", months[0])
}

#[derive(Debug, FromQueryResult)]
struct MonthAggRow {
    month: String,
    amount: f64,
    count: i64,
}

/// Revenue and order count per calendar month over the last twelve months.
/// Cancelled orders are excluded; months without orders report zeros.
pub async fn monthly_revenue(now: DateTime<Utc>) -> Result<Vec<MonthlyRevenue>> {
    let months = trailing_months(now);
    let sql = r#"
        SELECT substr(date, 1, 7) AS month,
               COALESCE(SUM(total), 0) AS amount,
               COUNT(*) AS count
        FROM orders
        WHERE status != 'Cancelled' AND date >= ?
        GROUP BY month
    "#;
    let rows = MonthAggRow::find_by_statement(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Sqlite,
        sql,
        [window_start(&months).into()],
    ))
    .all(get_connection())
    .await?;

    let by_month: HashMap<String, (f64, i64)> = rows
        .into_iter()
        .map(|r| (r.month, (r.amount, r.count)))
        .collect();

    Ok(months
        .into_iter()
        .map(|month| {
            let (revenue, orders) = by_month.get(&month).copied().unwrap_or((0.0, 0));
            MonthlyRevenue {
                month,
                revenue,
                orders,
            }
        })
        .collect())
}

/// New registrations per calendar month over the last twelve months.
pub async fn monthly_user_growth(now: DateTime<Utc>) -> Result<Vec<MonthlyUserGrowth>> {
    let months = trailing_months(now);
    let sql = r#"
        SELECT substr(registered_at, 1, 7) AS month,
               0.0 AS amount,
               COUNT(*) AS count
        FROM users
        WHERE registered_at >= ?
        GROUP BY month
    "#;
    let rows = MonthAggRow::find_by_statement(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Sqlite,
        sql,
        [window_start(&months).into()],
    ))
    .all(get_connection())
    .await?;

    let by_month: HashMap<String, i64> = rows.into_iter().map(|r| (r.month, r.count)).collect();

    Ok(months
        .into_iter()
        .map(|month| MonthlyUserGrowth {
            users: by_month.get(&month).copied().unwrap_or(0),
            month,
        })
        .collect())
}

#[derive(Debug, FromQueryResult)]
struct SliceRow {
    name: String,
    value: f64,
}

/// Completed-sale revenue grouped by product category.
pub async fn sales_by_category() -> Result<Vec<GroupSlice>> {
    group_sales_by("category").await
}

/// Completed-sale revenue grouped by sale channel.
pub async fn channel_performance() -> Result<Vec<GroupSlice>> {
    group_sales_by("channel").await
}

async fn group_sales_by(column: &str) -> Result<Vec<GroupSlice>> {
    let sql = format!(
        "SELECT {column} AS name, COALESCE(SUM(total_amount), 0) AS value
         FROM sales
         WHERE status = 'Completed'
         GROUP BY {column}
         ORDER BY value DESC"
    );
    let rows = SliceRow::find_by_statement(Statement::from_string(
        sea_orm::DatabaseBackend::Sqlite,
        sql,
    ))
    .all(get_connection())
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| GroupSlice {
            name: r.name,
            value: r.value,
        })
        .collect())
}

#[derive(Debug, FromQueryResult)]
struct TopProductRow {
    name: String,
    sales: i64,
    revenue: f64,
}

/// The N products with the highest sales counters.
pub async fn top_products(limit: u64) -> Result<Vec<TopProduct>> {
    let sql = format!(
        "SELECT name, sales, price * sales AS revenue
         FROM products
         ORDER BY sales DESC
         LIMIT {limit}"
    );
    let rows = TopProductRow::find_by_statement(Statement::from_string(
        sea_orm::DatabaseBackend::Sqlite,
        sql,
    ))
    .all(get_connection())
    .await?;
    Ok(rows
        .into_iter()
        .map(|r| TopProduct {
            name: r.name,
            sales: r.sales,
            revenue: r.revenue,
        })
        .collect())
}

#[derive(Debug, FromQueryResult)]
struct OverviewRow {
    total_users: i64,
    total_products: i64,
    total_orders: i64,
    total_revenue: f64,
}

pub async fn overview() -> Result<DashboardOverview> {
    let sql = r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM products) AS total_products,
            (SELECT COUNT(*) FROM orders WHERE status != 'Cancelled') AS total_orders,
            (SELECT COALESCE(SUM(total), 0) FROM orders WHERE status != 'Cancelled')
                AS total_revenue
    "#;
    let row = OverviewRow::find_by_statement(Statement::from_string(
        sea_orm::DatabaseBackend::Sqlite,
        sql.to_string(),
    ))
    .one(get_connection())
    .await?
    .unwrap_or(OverviewRow {
        total_users: 0,
        total_products: 0,
        total_orders: 0,
        total_revenue: 0.0,
    });

    Ok(DashboardOverview {
        total_users: row.total_users,
        total_products: row.total_products,
        total_orders: row.total_orders,
        total_revenue: row.total_revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn trailing_months_cover_a_full_year() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let months = trailing_months(now);
        assert_eq!(months.len(), 12);
        assert_eq!(months.first().unwrap(), "2024-04");
        assert_eq!(months.last().unwrap(), "2025-03");
    }

    #[test]
    fn trailing_months_handle_january_rollover() {
        let now = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
        let months = trailing_months(now);
        assert_eq!(months.first().unwrap(), "2024-02");
        assert_eq!(months.last().unwrap(), "2025-01");
    }

    #[test]
    fn window_start_is_first_day_of_oldest_bucket() {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap();
        let months = trailing_months(now);
        assert_eq!(window_start(&months), "2024-07-01T00:00:00+00:00");
    }
}
