use std::sync::Arc;

use dish_server::config::{self, AppState, Config};
use dish_server::logger;
use dish_server::server::{self, SignalHandler};
use dish_server::store::DishStore;

fn main() {
    if let Err(e) = run() {
        logger::log_error(&format!("Startup failed: {e}"));
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let store = DishStore::open(&cfg.storage.data_file, cfg.storage.atomic_writes)?;
    let listener = server::create_listener(addr)?;

    let state = Arc::new(AppState::new(cfg, store));
    let dish_count = state.store.list().await.len();
    logger::log_server_start(&addr, &state.config, dish_count);

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::serve(listener, state, signals).await;
    Ok(())
}
