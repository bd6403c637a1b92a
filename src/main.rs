use tasklane::{
    api::{start_api_server, AppState},
    auth::SessionService,
    observability::{init_observability, log_config_info},
    storage::connect_store,
    AppConfig, Result, APP_NAME, VERSION,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    // This must happen before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let config = AppConfig::from_env()?;
    init_observability(&config.observability)?;

    info!(app_name = APP_NAME, version = VERSION, "Starting Tasklane session service");
    log_config_info(&config);

    let store = connect_store(&config.store).await?;

    let sessions = SessionService::from_config(store, &config.session);
    let state = AppState::new(sessions, config.session.clone());

    if let Err(e) = start_api_server(config.server.clone(), state).await {
        error!(error = %e, "API server terminated with error");
        return Err(e);
    }

    info!("Tasklane shut down cleanly");
    Ok(())
}
