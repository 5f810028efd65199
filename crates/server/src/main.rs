//! sel4c server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sel4c_api::{AppState, app};
use sel4c_common::{Config, LocalStorage, StorageBackend};
use sel4c_core::{
    ActivityResponseService, ActivityService, CompletionService, FormsQuestionService,
    MediaService, ProfileService, QuestionResponseService, ReportService, ScoreService,
    UserDefaultsService, UserService,
};
use sel4c_db::repositories::{
    ActivityRepository, ActivityResponseRepository, FormsQuestionRepository,
    FormsQuestionResponseRepository, ModuleCompletionRepository, UserDataRepository,
    UserDefaultsRepository, UserRepository, UserScoreRepository,
};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound on handling one request, media uploads included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Wire repositories and services over one connection pool.
fn build_state(db: DatabaseConnection, storage: Arc<dyn StorageBackend>) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = UserDataRepository::new(Arc::clone(&db));
    let score_repo = UserScoreRepository::new(Arc::clone(&db));
    let defaults_repo = UserDefaultsRepository::new(Arc::clone(&db));
    let activity_repo = ActivityRepository::new(Arc::clone(&db));
    let question_repo = FormsQuestionRepository::new(Arc::clone(&db));
    let activity_response_repo = ActivityResponseRepository::new(Arc::clone(&db));
    let question_response_repo = FormsQuestionResponseRepository::new(Arc::clone(&db));
    let completion_repo = ModuleCompletionRepository::new(db);

    AppState {
        user_service: UserService::new(user_repo.clone()),
        profile_service: ProfileService::new(profile_repo.clone()),
        score_service: ScoreService::new(score_repo.clone()),
        user_defaults_service: UserDefaultsService::new(defaults_repo),
        report_service: ReportService::new(user_repo, profile_repo, score_repo),
        activity_service: ActivityService::new(activity_repo.clone()),
        forms_question_service: FormsQuestionService::new(question_repo.clone()),
        activity_response_service: ActivityResponseService::new(
            activity_response_repo.clone(),
            activity_repo.clone(),
            Arc::clone(&storage),
        ),
        question_response_service: QuestionResponseService::new(
            question_response_repo,
            question_repo,
        ),
        completion_service: CompletionService::new(
            completion_repo,
            activity_repo,
            activity_response_repo,
        ),
        media_service: MediaService::new(storage),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sel4c=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting sel4c server...");

    let config = Config::load()?;

    let db = sel4c_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    sel4c_db::migrate(&db).await?;
    info!("Migrations completed");

    tokio::fs::create_dir_all(&config.storage.base_path).await?;
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::from_settings(&config.storage));
    info!(path = %config.storage.base_path.display(), "Media storage ready");

    let state = build_state(db, storage);

    let mut app = app(state);
    // Remote media URLs are served elsewhere.
    if config.storage.base_url.starts_with('/') {
        app = app.nest_service(
            &config.storage.base_url,
            ServeDir::new(&config.storage.base_path),
        );
    }

    let app = app
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
