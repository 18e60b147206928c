use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::products::{
    CreateProductRequest, Product, ProductListParams, ProductStats, UpdateProductRequest,
};
use contracts::shared::envelope::{ApiResponse, ListEnvelope};

use crate::domain::products::service;
use crate::shared::error::ApiResult;
use crate::shared::query::resolve_pagination;

/// GET /api/products
pub async fn list(
    Query(params): Query<ProductListParams>,
) -> ApiResult<Json<ListEnvelope<Product>>> {
    let (page, limit) = resolve_pagination(params.page, params.limit);
    let (data, total) = service::list(&params).await?;
    Ok(Json(ListEnvelope::new(data, total, page, limit)))
}

/// GET /api/products/stats
pub async fn stats() -> ApiResult<Json<ApiResponse<ProductStats>>> {
    Ok(Json(ApiResponse::data(service::stats().await?)))
}

/// GET /api/products/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<ApiResponse<Product>>> {
    Ok(Json(ApiResponse::data(service::get(&id).await?)))
}

/// POST /api/products
pub async fn create(
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    Ok(Json(ApiResponse::data(service::create(req).await?)))
}

/// PUT /api/products/:id
pub async fn update(
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    Ok(Json(ApiResponse::data(service::update(&id, req).await?)))
}

/// DELETE /api/products/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<Json<ApiResponse<()>>> {
    service::delete(&id).await?;
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}
