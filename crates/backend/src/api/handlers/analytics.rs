use axum::extract::Query;
use axum::Json;
use contracts::shared::analytics::{
    DashboardOverview, GroupSlice, MonthlyRevenue, MonthlyUserGrowth, TopProduct,
};
use contracts::shared::envelope::ApiResponse;
use serde::Deserialize;

use crate::dashboards::analytics::service;
use crate::shared::error::ApiResult;

/// GET /api/analytics/overview
pub async fn overview() -> ApiResult<Json<ApiResponse<DashboardOverview>>> {
    Ok(Json(ApiResponse::data(service::overview().await?)))
}

/// GET /api/analytics/revenue
pub async fn revenue() -> ApiResult<Json<ApiResponse<Vec<MonthlyRevenue>>>> {
    Ok(Json(ApiResponse::data(service::revenue().await?)))
}

/// GET /api/analytics/user-growth
pub async fn user_growth() -> ApiResult<Json<ApiResponse<Vec<MonthlyUserGrowth>>>> {
    Ok(Json(ApiResponse::data(service::user_growth().await?)))
}

/// GET /api/analytics/sales-by-category
pub async fn sales_by_category() -> ApiResult<Json<ApiResponse<Vec<GroupSlice>>>> {
    Ok(Json(ApiResponse::data(service::sales_by_category().await?)))
}

/// GET /api/analytics/channel-performance
pub async fn channel_performance() -> ApiResult<Json<ApiResponse<Vec<GroupSlice>>>> {
    Ok(Json(ApiResponse::data(
        service::channel_performance().await?,
    )))
}

#[derive(Debug, Deserialize)]
pub struct TopProductsParams {
    pub limit: Option<u64>,
}

/// GET /api/analytics/top-products
pub async fn top_products(
    Query(params): Query<TopProductsParams>,
) -> ApiResult<Json<ApiResponse<Vec<TopProduct>>>> {
    Ok(Json(ApiResponse::data(
        service::top_products(params.limit).await?,
    )))
}
