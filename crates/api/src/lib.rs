//! HTTP API layer for sel4c.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: user, methodology, and response routers under `/api`
//! - **Extractors**: the authenticated caller
//! - **Middleware**: token authentication
//! - **Permissions**: role checks shared by the routers
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod permissions;
pub mod response;

use axum::{Router, routing::get};

pub use endpoints::router;
pub use middleware::AppState;

/// Build the application router: `/api`, the health check, and token
/// authentication, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health-check", get(endpoints::health_check))
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .with_state(state)
}
