//! Shared state and authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sel4c_common::AppError;
use sel4c_core::{
    ActivityResponseService, ActivityService, CompletionService, FormsQuestionService,
    MediaService, ProfileService, QuestionResponseService, ReportService, ScoreService,
    UserDefaultsService, UserService,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub profile_service: ProfileService,
    pub score_service: ScoreService,
    pub user_defaults_service: UserDefaultsService,
    pub report_service: ReportService,
    pub activity_service: ActivityService,
    pub forms_question_service: FormsQuestionService,
    pub activity_response_service: ActivityResponseService,
    pub question_response_service: QuestionResponseService,
    pub completion_service: CompletionService,
    pub media_service: MediaService,
}

/// Authorization schemes accepted in front of a token.
const TOKEN_SCHEMES: [&str; 2] = ["Bearer ", "Token "];

/// Extract the token from an `Authorization` header value.
fn bearer_token(value: &str) -> Option<&str> {
    TOKEN_SCHEMES
        .iter()
        .find_map(|scheme| value.strip_prefix(scheme))
        .map(str::trim)
}

/// Authentication middleware.
///
/// Resolves the caller from the `Authorization` header and stores the user
/// in the request extensions. Requests without a token pass through
/// anonymously; handlers decide whether that is acceptable. A token that is
/// unknown or belongs to a deactivated account is rejected with 401 even on
/// public routes. Other authorization schemes are ignored.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(ToString::to_string);

    if let Some(token) = token {
        let authenticated = if token.is_empty() {
            Err(AppError::Unauthorized)
        } else {
            state.user_service.authenticate_by_token(&token).await
        };
        match authenticated {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                return e.into_response();
            }
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_schemes() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Token abc123"), Some("abc123"));
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("Bearer "), Some(""));
    }
}
