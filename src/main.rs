use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use file_describer::{
    config::Config,
    api::routes::create_router,
    AppState,
};

const DEFAULT_LOG_FILTER: &str = "file_describer=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(mode = %config.ai.mode, model = %config.ai_model, "Starting server on {}", server_addr);

    // Create application state
    let app_state = AppState::from_config(config)?;
    app_state.store.ensure_dir().await?;
    info!("Storing uploads in {}", app_state.store.dir().display());

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
