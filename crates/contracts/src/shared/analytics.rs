use serde::{Deserialize, Serialize};

/// One calendar-month bucket of the trailing-twelve-months revenue rollup.
/// Cancelled orders are excluded; empty months report zeros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyUserGrowth {
    pub month: String,
    pub users: i64,
}

/// Category (or channel) slice: `name` is the group key, `value` the summed
/// amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub sales: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_users: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
}
