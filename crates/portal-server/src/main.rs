use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tracing::{error, info};

use portal_api::{build_router, AppState};
use portal_infrastructure::database::connection;
use portal_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    portal_shared::telemetry::init_telemetry();

    info!("Portal server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to Database
    let pool = connection::create_pool(&config.database.url, config.database.max_connections).await?;
    info!("Database connection established.");

    // Apply pending migrations
    connection::run_migrations(&pool).await?;
    info!("Migrations applied.");

    // Build router
    let state = AppState::new(pool, config.clone());
    let app = build_router(state).layer(CorsLayer::permissive());

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
