use admin_service::{
    build_router,
    config::AdminConfig,
    services::{AuthService, JwtService, MongoDb, OrgService, PasswordPolicy},
    AppState,
};
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AdminConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting admin backend service"
    );

    // Initialize database connection and the unique indexes the validators
    // rely on.
    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    db.initialize_indexes().await?;
    tracing::info!("Database initialized successfully");

    let jwt = JwtService::new(&config.jwt)?;

    let accounts: Arc<dyn admin_service::services::AccountStore> = Arc::new(db.clone());
    let entities: Arc<dyn admin_service::services::EntityStore> = Arc::new(db.clone());

    let policy = PasswordPolicy::from_config(&config.password_policy);
    let auth_service = AuthService::new(accounts.clone(), policy);
    let org_service = OrgService::new(entities);

    let state = AppState {
        config: config.clone(),
        db,
        jwt,
        accounts,
        auth_service,
        org_service,
    };

    let app = build_router(state)?;

    let addr = config.common.bind_addr();
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
