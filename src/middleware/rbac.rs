// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::{CurrentUser, Role},
};

/// 1. What a guarded route demands of the caller's role
pub trait RoleRequirement: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn description() -> &'static str;
}

/// 2. The extractor. Hands the caller through once the requirement holds.
pub struct RequireRole<T> {
    pub user: CurrentUser,
    _requirement: PhantomData<T>,
}

// 3. FromRequestParts: 401 without an identity, 403 with the wrong role
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !T::allows(user.role) {
            tracing::warn!("User {} ({:?}) denied: {}", user.user_id, user.role, T::description());
            return Err(AppError::Forbidden(format!("{}.", T::description())));
        }

        Ok(RequireRole {
            user,
            _requirement: PhantomData,
        })
    }
}

// ---
// REQUIREMENTS
// ---

pub struct AdminOnly;
impl RoleRequirement for AdminOnly {
    fn allows(role: Role) -> bool {
        role == Role::Admin
    }
    fn description() -> &'static str {
        "Admin access required"
    }
}

pub type RequireAdmin = RequireRole<AdminOnly>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use uuid::Uuid;

    async fn extract(user: Option<CurrentUser>) -> Result<RequireAdmin, AppError> {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        let (mut parts, _) = request.into_parts();
        RequireAdmin::from_request_parts(&mut parts, &()).await
    }

    fn user(role: Role) -> CurrentUser {
        CurrentUser { user_id: Uuid::new_v4(), role }
    }

    #[tokio::test]
    async fn admin_passes() {
        let guard = extract(Some(user(Role::Admin))).await.unwrap();
        assert_eq!(guard.user.role, Role::Admin);
    }

    #[tokio::test]
    async fn other_roles_are_forbidden() {
        for role in [Role::Vendor, Role::Customer] {
            assert!(matches!(extract(Some(user(role))).await, Err(AppError::Forbidden(_))));
        }
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        assert!(matches!(extract(None).await, Err(AppError::Unauthorized)));
    }
}
