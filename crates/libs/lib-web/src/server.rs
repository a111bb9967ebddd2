//! # Server Setup
//!
//! Composition root for the service: loads settings, initializes logging,
//! opens and verifies the database pool, builds the router, and runs the
//! HTTP server until shutdown.
//!
//! Startup is strictly ordered and each step is fatal on failure; a process
//! that cannot load its configuration or reach its store must not start
//! accepting requests.

// region: --- Imports
use crate::handlers;
use crate::logging;
use crate::middleware::mw_req_stamp::RequestStamp;
use crate::middleware::{log_requests, stamp_req};
use axum::extract::FromRef;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use lib_core::config::Settings;
use lib_core::model::store::{check_connectivity, create_pool, DbPool};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub settings: Arc<Settings>,
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration supplied by the binary.
pub struct ServerConfig {
    /// Bind address override; defaults to the configured APP_HOST:APP_PORT.
    pub bind_address: Option<String>,
    /// Allowed CORS origins.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: None,
            allowed_origins: vec![
                // Frontend dev server and its Docker container name.
                "http://localhost:3000".to_string(),
                "http://frontend:3000".to_string(),
            ],
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and run the HTTP server.
///
/// # Errors
///
/// Returns an error if configuration loading or validation fails, the
/// database pool cannot be opened, the store is unreachable, or the
/// listener cannot bind.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    settings.validate()?;

    logging::init_logging(&settings.app);

    info!("Email Reply Agent starting");
    info!(
        environment = %settings.app.env,
        azure_openai = %settings.azure_openai.endpoint,
        "Configuration loaded"
    );

    let pool = match create_pool(&settings.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "Failed to open database pool");
            return Err(e);
        }
    };
    if let Err(e) = check_connectivity(&pool).await {
        error!(error = %e, "Database connection failed");
        return Err(e);
    }
    info!("Database ready");

    let settings = Arc::new(settings);
    let bind_address = config.bind_address.unwrap_or_else(|| {
        format!("{}:{}", settings.app.host, settings.app.port)
    });

    let state = AppState {
        db: pool.clone(),
        settings,
    };
    let app = create_router(state, config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server ready: http://{bind_address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Email Reply Agent shutting down");
    pool.close().await;
    Ok(())
}

/// Resolve when the process receives ctrl-c.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Build the application router with routes, middleware, and CORS.
fn create_router(state: AppState, allowed_origins: Vec<String>) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Mirroring is the credential-safe form of "all methods and headers":
    // a wildcard cannot be combined with allow_credentials.
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(handlers::system::health))
        .route("/", get(handlers::system::root))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Route not found", "code": "NotFound" })),
            )
        })
        .with_state(state)
        // Layer order is inside-out: the last layer added runs first, so
        // stamping precedes span creation and request logging.
        .layer(axum::middleware::from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|stamp| stamp.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            ),
        )
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
}
// endregion: --- Server Setup

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use lib_core::config::{
        AppSettings, AzureOpenAiSettings, AzureResourceSettings, DatabaseSettings, GmailSettings,
        OperatorProfile, OutlookSettings, SchedulerSettings,
    };
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    fn test_settings() -> Settings {
        Settings {
            app: AppSettings {
                env: "development".to_string(),
                host: "0.0.0.0".to_string(),
                port: 8000,
                secret_key: "test".to_string(),
            },
            azure_openai: AzureOpenAiSettings {
                api_key: "test-key".to_string(),
                endpoint: "https://example.openai.azure.com".to_string(),
                deployment_name: "gpt-4o-email-agent".to_string(),
                api_version: "2024-02-01".to_string(),
            },
            gmail: GmailSettings {
                client_id: String::new(),
                client_secret: String::new(),
                redirect_uri: "http://localhost:8000/auth/gmail/callback".to_string(),
                token_file: "./gmail_token.json".to_string(),
            },
            outlook: OutlookSettings {
                client_id: String::new(),
                client_secret: String::new(),
                tenant_id: "common".to_string(),
                redirect_uri: "http://localhost:8000/auth/outlook/callback".to_string(),
            },
            database: DatabaseSettings {
                url: "sqlite::memory:".to_string(),
                host: "db".to_string(),
                port: 3306,
                database: "email_agent".to_string(),
                user: "agent_user".to_string(),
                password: String::new(),
                root_password: String::new(),
            },
            scheduler: SchedulerSettings {
                poll_interval_minutes: 3,
            },
            azure: AzureResourceSettings {
                subscription_id: String::new(),
                resource_group: "email-reply-agent-rg".to_string(),
                location: "eastus".to_string(),
                acr_name: "emailagentacr".to_string(),
                acr_login_server: "emailagentacr.azurecr.io".to_string(),
                container_app_name: "email-reply-agent".to_string(),
                key_vault_name: "email-agent-kv".to_string(),
            },
            profile: OperatorProfile {
                name: "Your Name".to_string(),
                visa_status: "OPT STEM".to_string(),
                skills: "Machine Learning, Python".to_string(),
                experience_years: 2,
                target_roles: "ML Engineer, AI Engineer".to_string(),
                linkedin: String::new(),
                github: String::new(),
            },
        }
    }

    /// Router with a lazily-connected pool; liveness handlers never touch
    /// the database, so no connection is ever opened.
    fn test_app() -> Router {
        let pool = SqlitePoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .expect("lazy test pool");
        let state = AppState {
            db: pool,
            settings: Arc::new(test_settings()),
        };
        create_router(state, ServerConfig::default().allowed_origins)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_reports_the_four_documented_fields() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "status": "healthy",
                "app": "Email Reply Agent",
                "version": "1.0.0",
                "environment": "development",
            })
        );
    }

    #[tokio::test]
    async fn root_points_at_docs_and_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Email Reply Agent API is running");
        assert_eq!(body["docs"], "http://0.0.0.0:8000/docs");
        assert_eq!(body["health"], "http://0.0.0.0:8000/health");
    }

    #[tokio::test]
    async fn unknown_route_is_a_json_404() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/emails")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NotFound");
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response
            .headers()
            .get("x-request-id")
            .expect("request id header")
            .to_str()
            .unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn cors_allows_the_frontend_origin_with_credentials() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn cors_ignores_unlisted_origins() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
