use std::sync::Arc;

use auth::JwtIssuer;
use auth::PasswordHasher;
use chrono::Duration;
use employee_service::config::Config;
use employee_service::domain::employee::service::AuthenticationService;
use employee_service::domain::employee::service::DirectoryQueryService;
use employee_service::domain::employee::service::RegistrationService;
use employee_service::inbound::http::router::create_router;
use employee_service::inbound::http::router::AppState;
use employee_service::outbound::repositories::PostgresEmployeeRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "employee-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        statement_timeout_ms = config.database.statement_timeout_ms,
        jwt_issuer = %config.jwt.issuer,
        "Configuration loaded"
    );

    let pg_pool = PostgresEmployeeRepository::connect(&config.database).await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_issuer = Arc::new(JwtIssuer::new(
        config.jwt.secret.as_bytes(),
        config.jwt.issuer.clone(),
        Duration::hours(config.jwt.expiration_hours),
    )?);
    let password_hasher = Arc::new(PasswordHasher::new());
    let employee_repository = Arc::new(PostgresEmployeeRepository::new(pg_pool));

    let state = AppState {
        registration_service: Arc::new(RegistrationService::new(
            Arc::clone(&employee_repository),
            Arc::clone(&password_hasher),
        )),
        authentication_service: Arc::new(AuthenticationService::new(
            Arc::clone(&employee_repository),
            Arc::clone(&password_hasher),
            token_issuer,
        )),
        directory_service: Arc::new(DirectoryQueryService::new(employee_repository)),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, config.server.request_timeout());
    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
