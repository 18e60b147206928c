use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use contracts::system::auth::TokenClaims;

use crate::shared::error::ApiError;
use crate::shared::query::AccessScope;

/// Extractor for getting current user from JWT token
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> ...`
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    /// Resolve what this caller may see: Admin and Manager see everything,
    /// everyone else only rows they own.
    pub fn scope(&self) -> AccessScope {
        if self.0.role.is_admin_or_manager() {
            AccessScope::All
        } else {
            AccessScope::Owner(self.0.sub.clone())
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are placed in extensions by the auth middleware
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::users::Role;

    fn claims(role: Role) -> TokenClaims {
        TokenClaims {
            sub: "u-1".into(),
            email: "a@b.c".into(),
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn managers_and_admins_see_everything() {
        assert_eq!(CurrentUser(claims(Role::Admin)).scope(), AccessScope::All);
        assert_eq!(CurrentUser(claims(Role::Manager)).scope(), AccessScope::All);
    }

    #[test]
    fn customers_are_scoped_to_their_own_rows() {
        let scope = CurrentUser(claims(Role::Customer)).scope();
        assert_eq!(scope, AccessScope::Owner("u-1".into()));
    }
}
