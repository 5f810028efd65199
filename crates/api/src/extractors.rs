//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use sel4c_common::AppError;
use sel4c_db::{Scope, entities::user};

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl AuthUser {
    /// Visibility scope of the caller's records.
    #[must_use]
    pub fn scope(&self) -> Scope {
        Scope::for_user(&self.0)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
