//! API endpoints.

mod health;
mod methodology;
mod profile;
mod responses;
mod scores;
mod swift_connection;
mod user;

use axum::Router;

use crate::middleware::AppState;

pub use health::health_check;
pub use responses::MediaUploadResponse;
pub use user::{TokenResponse, UserResponse};

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest(
            "/user",
            Router::new()
                .merge(user::router())
                .merge(profile::router())
                .merge(scores::router()),
        )
        .nest("/methodology", methodology::router())
        .nest("/response", responses::router())
        .nest("/swift-connection", swift_connection::router())
}
