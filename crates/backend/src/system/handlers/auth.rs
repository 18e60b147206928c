use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::Json;
use contracts::domain::logs::{
    LogListParams, LogStatus, LoginLog, LoginStats, RegistrationLog, RegistrationStats,
};
use contracts::domain::users::{
    CreateUserRequest, RegistrationSource, Role, User, UserStatus,
};
use contracts::shared::envelope::{ApiResponse, ListEnvelope};
use contracts::system::auth::{
    AuthResponse, AuthUser, ChangePasswordRequest, LoginRequest, UpdateProfileRequest,
};

use crate::domain::logs::service::{self as logs_service, RequestMeta};
use crate::domain::users::{repository as users_repo, service as users_service};
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::query::resolve_pagination;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::{jwt, password};

fn meta_from_headers(headers: &HeaderMap) -> RequestMeta {
    RequestMeta {
        ip_address: headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string()),
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

fn auth_user(user: &User) -> AuthUser {
    AuthUser {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        status: user.status,
        last_login: user.last_login,
    }
}

/// POST /api/auth/register — public self-registration always produces an
/// Active Customer account; role and status in the payload are ignored.
pub async fn register(
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let meta = meta_from_headers(&headers);
    let email = req.email.trim().to_lowercase();
    let name = req.name.clone();

    let sanitized = CreateUserRequest {
        role: Some(Role::Customer),
        status: Some(UserStatus::Active),
        registration_source: None,
        ..req
    };

    let user = match users_service::create(sanitized, RegistrationSource::Website).await {
        Ok(user) => user,
        Err(e @ ApiError::Conflict(_)) => {
            logs_service::record_registration_attempt(
                None,
                &email,
                &name,
                Role::Customer.as_str(),
                RegistrationSource::Website,
                LogStatus::Failed,
                Some("Email is already registered"),
                &meta,
            )
            .await;
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    logs_service::record_registration_attempt(
        Some(&user.id),
        &user.email,
        &user.name,
        user.role.as_str(),
        user.registration_source,
        LogStatus::Success,
        None,
        &meta,
    )
    .await;

    let token = jwt::generate_access_token(&user.id, &user.email, user.role).await?;
    Ok(Json(AuthResponse {
        success: true,
        token,
        user: auth_user(&user),
    }))
}

/// POST /api/auth/login
///
/// Every attempt is audited; the unknown-email and wrong-password branches
/// return the same message so the response does not leak which one failed.
pub async fn login(
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let meta = meta_from_headers(&headers);
    let email = req.email.trim().to_lowercase();

    let Some(model) = users_repo::get_model_by_email(&email).await? else {
        logs_service::record_login_attempt(
            None,
            &email,
            LogStatus::Failed,
            Some("User not found"),
            &meta,
        )
        .await;
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    };

    if !password::verify_password(&req.password, &model.password)? {
        logs_service::record_login_attempt(
            Some(&model.id),
            &email,
            LogStatus::Failed,
            Some("Invalid password"),
            &meta,
        )
        .await;
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    if model.status != UserStatus::Active.as_str() {
        logs_service::record_login_attempt(
            Some(&model.id),
            &email,
            LogStatus::Failed,
            Some("Account is not active"),
            &meta,
        )
        .await;
        return Err(ApiError::conflict("Account is not active"));
    }

    users_repo::record_login(&model.id).await?;
    logs_service::record_login_attempt(Some(&model.id), &email, LogStatus::Success, None, &meta)
        .await;

    let user = users_service::get(&model.id).await?;
    let token = jwt::generate_access_token(&user.id, &user.email, user.role).await?;
    Ok(Json(AuthResponse {
        success: true,
        token,
        user: auth_user(&user),
    }))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> ApiResult<Json<ApiResponse<AuthUser>>> {
    let user = users_service::get(&user.0.sub).await?;
    Ok(Json(ApiResponse::data(auth_user(&user))))
}

/// PUT /api/auth/profile — a caller may only change their own name/email.
pub async fn update_profile(
    user: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<AuthUser>>> {
    let update = contracts::domain::users::UpdateUserRequest {
        name: req.name,
        email: req.email,
        ..Default::default()
    };
    let updated = users_service::update(&user.0.sub, update).await?;
    Ok(Json(ApiResponse::data(auth_user(&updated))))
}

/// PUT /api/auth/password
pub async fn change_password(
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let model = users_repo::get_model_by_id(&user.0.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !password::verify_password(&req.current_password, &model.password)? {
        return Err(ApiError::Unauthorized("Current password is incorrect".into()));
    }
    if let Err(msg) = password::check_strength(&req.new_password) {
        return Err(ApiError::validation(msg));
    }

    let hash = password::hash_password(&req.new_password)?;
    users_repo::update_password(&model.id, &hash).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

/// POST /api/auth/logout — tokens are stateless, the server only confirms.
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Logged out successfully"))
}

/// GET /api/auth/login-logs — Customers only see their own attempts.
pub async fn login_logs(
    user: CurrentUser,
    Query(params): Query<LogListParams>,
) -> ApiResult<Json<ListEnvelope<LoginLog>>> {
    let (page, limit) = resolve_pagination(params.page, params.limit);
    let (data, total) = logs_service::list_login(&params, &user.scope()).await?;
    Ok(Json(ListEnvelope::new(data, total, page, limit)))
}

/// GET /api/auth/login-logs/user/:id — a caller may read their own history,
/// Admin and Manager may read anyone's.
pub async fn login_logs_for_user(
    user: CurrentUser,
    Path(id): Path<String>,
    Query(params): Query<LogListParams>,
) -> ApiResult<Json<ListEnvelope<LoginLog>>> {
    if !user.0.role.is_admin_or_manager() && user.0.sub != id {
        return Err(ApiError::Forbidden(
            "You may only view your own login history".into(),
        ));
    }
    let (page, limit) = resolve_pagination(params.page, params.limit);
    let scope = crate::shared::query::AccessScope::Owner(id);
    let (data, total) = logs_service::list_login(&params, &scope).await?;
    Ok(Json(ListEnvelope::new(data, total, page, limit)))
}

/// GET /api/registration-logs
pub async fn registration_logs(
    Query(params): Query<LogListParams>,
) -> ApiResult<Json<ListEnvelope<RegistrationLog>>> {
    let (page, limit) = resolve_pagination(params.page, params.limit);
    let (data, total) = logs_service::list_registration(&params).await?;
    Ok(Json(ListEnvelope::new(data, total, page, limit)))
}

/// GET /api/auth/login-stats
pub async fn login_stats() -> ApiResult<Json<ApiResponse<LoginStats>>> {
    Ok(Json(ApiResponse::data(logs_service::login_stats().await?)))
}

/// GET /api/auth/registration-stats
pub async fn registration_stats() -> ApiResult<Json<ApiResponse<RegistrationStats>>> {
    Ok(Json(ApiResponse::data(
        logs_service::registration_stats().await?,
    )))
}
