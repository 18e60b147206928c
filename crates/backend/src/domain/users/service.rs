use contracts::domain::users::{
    CreateUserRequest, RegistrationSource, UpdateUserRequest, User, UserListParams, UserStats,
    UserStatus,
};
use uuid::Uuid;

use super::repository::{self, Model};
use crate::shared::data::dates;
use crate::shared::error::{ApiError, ApiResult, FieldError};
use crate::system::auth::password;

pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.contains(' ')
}

fn validate_new_user(req: &CreateUserRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name".into(),
            message: "Name is required".into(),
        });
    }
    if !is_valid_email(&req.email) {
        errors.push(FieldError {
            field: "email".into(),
            message: "A valid email address is required".into(),
        });
    }
    if let Err(msg) = password::check_strength(&req.password) {
        errors.push(FieldError {
            field: "password".into(),
            message: msg,
        });
    }
    errors
}

pub async fn list(params: &UserListParams) -> ApiResult<(Vec<User>, u64)> {
    Ok(repository::list(params).await?)
}

pub async fn get(id: &str) -> ApiResult<User> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Create an account and read it back; a write the store cannot confirm is
/// an infrastructure fault, not a validation failure.
pub async fn create(req: CreateUserRequest, default_source: RegistrationSource) -> ApiResult<User> {
    let errors = validate_new_user(&req);
    if !errors.is_empty() {
        return Err(ApiError::FieldValidation(errors));
    }

    let email = req.email.trim().to_lowercase();
    if repository::email_taken(&email, None).await? {
        return Err(ApiError::conflict("Email is already registered"));
    }

    let id = Uuid::new_v4().to_string();
    let now = dates::now();
    let model = Model {
        id: id.clone(),
        name: req.name.trim().to_string(),
        email,
        password: password::hash_password(&req.password)?,
        phone: req.phone,
        role: req.role.unwrap_or(contracts::domain::users::Role::Customer).as_str().to_string(),
        status: req.status.unwrap_or(UserStatus::Active).as_str().to_string(),
        registration_source: req
            .registration_source
            .unwrap_or(default_source)
            .as_str()
            .to_string(),
        registered_at: now.clone(),
        last_login: None,
        orders_count: 0,
        total_spent: 0.0,
        average_order_value: 0.0,
        notes: req.notes,
        created_at: now.clone(),
        updated_at: now,
    };
    repository::insert(model).await?;

    repository::get_by_id(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User {id} was not found after insert").into())
}

pub async fn update(id: &str, req: UpdateUserRequest) -> ApiResult<User> {
    let mut model = repository::get_model_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Name cannot be empty"));
        }
        model.name = name.trim().to_string();
    }
    if let Some(email) = req.email {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::validation("A valid email address is required"));
        }
        if repository::email_taken(&email, Some(id)).await? {
            return Err(ApiError::conflict("Email is already registered"));
        }
        model.email = email;
    }
    if let Some(phone) = req.phone {
        model.phone = Some(phone);
    }
    if let Some(role) = req.role {
        model.role = role.as_str().to_string();
    }
    if let Some(status) = req.status {
        model.status = status.as_str().to_string();
    }
    if let Some(notes) = req.notes {
        model.notes = Some(notes);
    }
    model.updated_at = dates::now();
    repository::update(model).await?;

    get(id).await
}

pub async fn delete(id: &str, caller_id: &str) -> ApiResult<()> {
    if id == caller_id {
        return Err(ApiError::conflict("You cannot delete your own account"));
    }
    if !repository::delete(id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(())
}

pub async fn stats() -> ApiResult<UserStats> {
    Ok(repository::stats().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::users::Role;

    #[test]
    fn email_validation_accepts_plausible_addresses() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+tag@mail.co.uk"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@nodot"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("sp ace@example.com"));
    }

    #[test]
    fn new_user_validation_collects_all_field_errors() {
        let req = CreateUserRequest {
            name: "  ".into(),
            email: "bad".into(),
            password: "123".into(),
            phone: None,
            role: Some(Role::Customer),
            status: None,
            registration_source: None,
            notes: None,
        };
        let errors = validate_new_user(&req);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }
}
