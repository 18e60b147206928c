use contracts::domain::sales::{Sale, SaleListParams, SalesStats};

use super::repository;
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::query::AccessScope;

pub async fn list(params: &SaleListParams, scope: &AccessScope) -> ApiResult<(Vec<Sale>, u64)> {
    Ok(repository::list(params, scope).await?)
}

pub async fn get(id: &str, scope: &AccessScope) -> ApiResult<Sale> {
    repository::get_by_id(id, scope)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale not found"))
}

pub async fn stats(scope: &AccessScope) -> ApiResult<SalesStats> {
    Ok(repository::stats(scope).await?)
}
