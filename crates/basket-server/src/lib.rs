//! Basket Web Server
//!
//! Axum-based REST API for the Basket shopping list.
//!
//! Security features:
//! - Bearer token authentication (HS256 JWT) on every list and suggestion route
//! - Restrictive CORS policy
//! - Request body size limit
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use basket_core::db::Database;

mod handlers;
pub mod token;

pub use token::Claims;

/// Maximum request body size (1 MB)
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable holding comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "BASKET_ALLOWED_ORIGINS";

/// Signing secret used when `JWT_SECRET` is not set
const DEV_JWT_SECRET: &str = "basket-dev-secret-change-in-production";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// HS256 secret for issuing and validating tokens
    pub jwt_secret: String,
    /// How long issued tokens stay valid
    pub token_ttl: chrono::Duration,
    /// Allowed CORS origins (empty = same-origin only, "*" = any)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: chrono::Duration::days(token::TOKEN_TTL_DAYS),
            allowed_origins: vec![],
        }
    }
}

impl ServerConfig {
    /// Build configuration from `JWT_SECRET` and `BASKET_ALLOWED_ORIGINS`
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var(JWT_SECRET_ENV) {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!(
                    "⚠️  {} not set - using the development secret. Do not expose to network!",
                    JWT_SECRET_ENV
                );
                DEV_JWT_SECRET.to_string()
            }
        };

        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_allowed_origins(&v))
            .unwrap_or_default();

        Self {
            jwt_secret,
            allowed_origins,
            ..Default::default()
        }
    }
}

/// Parse a comma-separated origin list, skipping blanks
pub fn parse_allowed_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Authentication middleware - validates the bearer token
///
/// Missing token is 401, a token that fails validation is 403. On success the
/// token's [`Claims`] are added to the request extensions.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        debug!(path = %request.uri().path(), "Missing bearer token");
        return AppError::unauthorized("Access token required").into_response();
    };

    let claims = match token::verify_token(token, &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, path = %request.uri().path(), "Rejected bearer token");
            return AppError::forbidden("Invalid or expired token").into_response();
        }
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Fallback for unknown `/api` paths
async fn api_not_found() -> AppError {
    AppError::not_found("API endpoint not found")
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let protected_routes = Router::new()
        .route("/auth/verify", get(handlers::verify))
        .route(
            "/items",
            get(handlers::list_items)
                .post(handlers::create_item)
                .delete(handlers::delete_all_items),
        )
        .route(
            "/items/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route(
            "/ai/suggestions",
            get(handlers::suggestions_for_list).post(handlers::suggestions),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .merge(protected_routes)
        .fallback(api_not_found);

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    // Build CORS layer
    let cors = if config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let mut app = Router::new().nest("/api", api_routes);

    // Serve the web client if directory provided, with index.html for client-side routes
    if let Some(dir) = static_dir {
        let index = std::path::Path::new(dir).join("index.html");
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    app.with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::from_env()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if let Some(dir) = static_dir {
        if !std::path::Path::new(dir).is_dir() {
            warn!(dir, "Static directory not found - web client will not be served");
        }
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn payload_too_large(msg: &str) -> Self {
        Self::with_status(StatusCode::PAYLOAD_TOO_LARGE, msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
