//! Role checks.

use axum::{
    body::Body,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use sel4c_common::{AppError, AppResult};
use sel4c_db::entities::user;

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

/// Whether `method` only reads.
#[must_use]
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Reads are open to anyone; writes need an authenticated superuser.
pub fn check_superuser_or_read_only(method: &Method, user: Option<&user::Model>) -> AppResult<()> {
    if is_safe_method(method) {
        return Ok(());
    }
    match user {
        None => Err(AppError::Unauthorized),
        Some(user) => require_superuser(user),
    }
}

/// Require a superuser.
pub fn require_superuser(user: &user::Model) -> AppResult<()> {
    if user.is_superuser {
        Ok(())
    } else {
        Err(AppError::Forbidden(PERMISSION_DENIED.to_string()))
    }
}

/// Require a staff member.
pub fn require_staff(user: &user::Model) -> AppResult<()> {
    if user.is_staff {
        Ok(())
    } else {
        Err(AppError::Forbidden(PERMISSION_DENIED.to_string()))
    }
}

/// Middleware form of [`check_superuser_or_read_only`] for catalog routers.
pub async fn superuser_or_read_only(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    check_superuser_or_read_only(req.method(), req.extensions().get::<user::Model>())?;
    Ok(next.run(req).await)
}
