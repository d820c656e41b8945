//! # idw-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the IDW Stack API.
//! Binds to a configurable port (default 8080).

use idw_api::state::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let config = AppConfig { port };

    // Initialize database pool (optional — absent means in-memory only).
    let db_pool = idw_api::db::init_pool().await.map_err(|e| {
        tracing::error!("database initialization failed: {e}");
        e
    })?;

    // Attempt to create the remote provisioner client from environment.
    // Absent configuration means in-process provisioning.
    let remote_provisioner = match idw_provision_client::ProvisionerConfig::from_env() {
        Ok(provisioner_config) => {
            tracing::info!("remote wallet provisioner configured");
            match idw_provision_client::ProvisionerClient::new(provisioner_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("failed to create provisioner client: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::info!("remote provisioner not configured ({e}) — provisioning in-process");
            None
        }
    };

    // Bootstrap: load the deployment manifest if IDW_CONFIG is set.
    let state = idw_api::bootstrap::bootstrap(config, remote_provisioner, db_pool)
        .await
        .map_err(|e| {
            tracing::error!("bootstrap failed: {e}");
            e
        })?;

    // Hydrate in-memory stores from the database (if connected).
    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("database hydration failed: {e}");
        e
    })?;

    let app = idw_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("IDW API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
