use chrono::Utc;
use contracts::shared::analytics::{
    DashboardOverview, GroupSlice, MonthlyRevenue, MonthlyUserGrowth, TopProduct,
};

use super::repository;
use crate::shared::error::ApiResult;

pub const DEFAULT_TOP_PRODUCTS: u64 = 5;
const MAX_TOP_PRODUCTS: u64 = 50;

pub async fn overview() -> ApiResult<DashboardOverview> {
    Ok(repository::overview().await?)
}

pub async fn revenue() -> ApiResult<Vec<MonthlyRevenue>> {
    Ok(repository::monthly_revenue(Utc::now()).await?)
}

pub async fn user_growth() -> ApiResult<Vec<MonthlyUserGrowth>> {
    Ok(repository::monthly_user_growth(Utc::now()).await?)
}

pub async fn sales_by_category() -> ApiResult<Vec<GroupSlice>> {
    Ok(repository::sales_by_category().await?)
}

pub async fn channel_performance() -> ApiResult<Vec<GroupSlice>> {
    Ok(repository::channel_performance().await?)
}

pub async fn top_products(limit: Option<u64>) -> ApiResult<Vec<TopProduct>> {
    let limit = limit.unwrap_or(DEFAULT_TOP_PRODUCTS).clamp(1, MAX_TOP_PRODUCTS);
    Ok(repository::top_products(limit).await?)
}
