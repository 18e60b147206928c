use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::sales::{Sale, SaleListParams, SalesStats};
use contracts::shared::envelope::{ApiResponse, ListEnvelope};

use crate::domain::sales::service;
use crate::shared::error::ApiResult;
use crate::shared::query::resolve_pagination;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/sales — Customers only see their own sales.
pub async fn list(
    user: CurrentUser,
    Query(params): Query<SaleListParams>,
) -> ApiResult<Json<ListEnvelope<Sale>>> {
    let (page, limit) = resolve_pagination(params.page, params.limit);
    let (data, total) = service::list(&params, &user.scope()).await?;
    Ok(Json(ListEnvelope::new(data, total, page, limit)))
}

/// GET /api/sales/stats
pub async fn stats(user: CurrentUser) -> ApiResult<Json<ApiResponse<SalesStats>>> {
    Ok(Json(ApiResponse::data(
        service::stats(&user.scope()).await?,
    )))
}

/// GET /api/sales/:id
pub async fn get_by_id(
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Sale>>> {
    Ok(Json(ApiResponse::data(
        service::get(&id, &user.scope()).await?,
    )))
}
