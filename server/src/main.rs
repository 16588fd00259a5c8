use clap::Parser;
use server::args::Args;
use server::auth::session_service::SessionService;
use server::configs::config_provider;
use server::configs::server::ServerConfig;
use server::console;
use server::console::registry::CommandRegistry;
use server::http::http_server;
use server::http::shared::AppState;
use server::log::logger::Logging;
use server::server_error::ServerError;
use server::storage::memory::InMemoryRepository;
use server::utils::clock::SystemClock;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let mut logging = Logging::new();
    logging.early_init();

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment variables from: {path:?}"),
        Err(err) => debug!("No .env file loaded: {err}"),
    }

    let args = Args::parse();
    let config_provider = config_provider::resolve(&args.config_provider, &args.config_path)?;
    let config = ServerConfig::load(config_provider.as_ref()).await?;
    logging.late_init(&config.logging)?;

    let repository = Arc::new(InMemoryRepository::new());
    let session_service =
        SessionService::from_config(&config, repository, Arc::new(SystemClock))?;
    session_service.ensure_admin_exists().await?;

    let shutdown = Arc::new(Notify::new());
    let http_shutdown = shutdown.clone();
    let app_state = Arc::new(AppState::new(session_service.clone()));
    let mut http_server = tokio::spawn(http_server::start(
        config.http.clone(),
        app_state,
        async move { http_shutdown.notified().await },
    ));

    let registry = CommandRegistry::with_default_commands();
    let console_enabled = config.console.enabled && !args.no_console;
    let console = async {
        if console_enabled {
            console::start(&registry, &session_service).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received CTRL-C, shutting down Codium server...");
        }
        _ = console => {
            info!("Received stop command, shutting down Codium server...");
        }
        result = &mut http_server => {
            return result?;
        }
    }

    shutdown.notify_one();
    http_server.await??;
    info!("Codium server has shutdown successfully.");
    Ok(())
}
