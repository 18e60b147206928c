use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::users::{
    CreateUserRequest, RegistrationSource, UpdateUserRequest, User, UserListParams, UserStats,
};
use contracts::shared::envelope::{ApiResponse, ListEnvelope};

use crate::domain::users::service;
use crate::shared::error::ApiResult;
use crate::shared::query::resolve_pagination;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/users
pub async fn list(Query(params): Query<UserListParams>) -> ApiResult<Json<ListEnvelope<User>>> {
    let (page, limit) = resolve_pagination(params.page, params.limit);
    let (data, total) = service::list(&params).await?;
    Ok(Json(ListEnvelope::new(data, total, page, limit)))
}

/// GET /api/users/stats
pub async fn stats() -> ApiResult<Json<ApiResponse<UserStats>>> {
    Ok(Json(ApiResponse::data(service::stats().await?)))
}

/// GET /api/users/:id
pub async fn get_by_id(Path(id): Path<String>) -> ApiResult<Json<ApiResponse<User>>> {
    Ok(Json(ApiResponse::data(service::get(&id).await?)))
}

/// POST /api/users
pub async fn create(Json(req): Json<CreateUserRequest>) -> ApiResult<Json<ApiResponse<User>>> {
    Ok(Json(ApiResponse::data(
        service::create(req, RegistrationSource::AdminPanel).await?,
    )))
}

/// PUT /api/users/:id
pub async fn update(
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    Ok(Json(ApiResponse::data(service::update(&id, req).await?)))
}

/// DELETE /api/users/:id — self-deletion is rejected regardless of role.
pub async fn delete(user: CurrentUser, Path(id): Path<String>) -> ApiResult<Json<ApiResponse<()>>> {
    service::delete(&id, &user.0.sub).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}
