use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::orders::{
    CreateOrderRequest, Order, OrderListParams, OrderStats, UpdateOrderRequest,
};
use contracts::shared::envelope::{ApiResponse, ListEnvelope};

use crate::domain::orders::service;
use crate::shared::error::ApiResult;
use crate::shared::query::resolve_pagination;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/orders — Customers only see their own orders.
pub async fn list(
    user: CurrentUser,
    Query(params): Query<OrderListParams>,
) -> ApiResult<Json<ListEnvelope<Order>>> {
    let (page, limit) = resolve_pagination(params.page, params.limit);
    let (data, total) = service::list(&params, &user.scope()).await?;
    Ok(Json(ListEnvelope::new(data, total, page, limit)))
}

/// GET /api/orders/stats — Customers get stats over their own orders only.
pub async fn stats(user: CurrentUser) -> ApiResult<Json<ApiResponse<OrderStats>>> {
    Ok(Json(ApiResponse::data(
        service::stats(&user.scope()).await?,
    )))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    Ok(Json(ApiResponse::data(
        service::get(&id, &user.scope()).await?,
    )))
}

/// POST /api/orders — the order belongs to the calling user.
pub async fn create(
    user: CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    Ok(Json(ApiResponse::data(
        service::create(req, &user.0.sub).await?,
    )))
}

/// PUT /api/orders/:id
pub async fn update(
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    Ok(Json(ApiResponse::data(service::update(&id, req).await?)))
}

/// DELETE /api/orders/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<Json<ApiResponse<()>>> {
    service::delete(&id).await?;
    Ok(Json(ApiResponse::message("Order deleted successfully")))
}
