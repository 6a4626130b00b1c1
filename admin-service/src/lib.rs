pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AdminConfig;
use crate::services::{AccountStore, AuthService, JwtService, MongoDb, OrgService};

#[derive(Clone)]
pub struct AppState {
    pub config: AdminConfig,
    pub db: MongoDb,
    pub jwt: JwtService,
    pub accounts: Arc<dyn AccountStore>,
    pub auth_service: AuthService,
    pub org_service: OrgService,
}

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    // The listing endpoint is the only one behind bearer auth.
    let authenticated = Router::new()
        .route("/user/", get(handlers::user::list_users))
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware));

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .security
                .allowed_origins
                .iter()
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                        None
                    }
                })
                .collect::<Vec<HeaderValue>>(),
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/registration/", post(handlers::auth::register))
        .route("/login/", post(handlers::auth::login))
        .route("/refresh-token", post(handlers::auth::refresh))
        .route("/organizations/", post(handlers::org::create_organization))
        .merge(authenticated)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors);

    Ok(app)
}

/// Service health check: pings the document store.
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<axum::Json<serde_json::Value>, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "MongoDB health check failed");
        e
    })?;

    Ok(axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "mongodb": "up"
        }
    })))
}
