use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use conference_site::config::{AppState, Config};
use conference_site::error::SiteError;
use conference_site::{logger, server};

/// Config file name without extension; `config.toml` etc. are picked up
const DEFAULT_CONFIG_PATH: &str = "config";

/// How long in-flight connections get after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_from(&config_path)?;

    // Worker count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(run(config))?;
    Ok(())
}

async fn run(config: Config) -> Result<(), SiteError> {
    logger::init(&config)?;

    let state = match AppState::load(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            logger::log_error(&format!("Failed to load site: {e}"));
            return Err(e);
        }
    };
    logger::log_site_loaded(
        state.dispatcher.sections().iter(),
        state.dispatcher.schedule().len(),
    );

    let addr = config.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &config);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            Arc::new(AtomicUsize::new(0)),
            signals,
            SHUTDOWN_GRACE,
        ))
        .await;

    logger::log_info("Server stopped");
    Ok(())
}
