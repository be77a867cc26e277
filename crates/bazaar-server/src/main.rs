//! # Bazaar Server
//!
//! Main entry point: loads configuration, connects the shared cache and
//! keeps it open until the process is asked to stop.

use bazaar_cache::register_metrics;
use bazaar_config::ConfigLoader;
use bazaar_core::{init_logging, BazaarResult, LogFormat};
use bazaar_server::di::{build_cache_module, CacheResolver};
use bazaar_server::startup::{print_banner, print_startup_info, report_health, run_self_test};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be up yet if configuration failed to load.
        let _ = init_logging("info", LogFormat::Pretty);
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> BazaarResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_logging(&config.observability.log_level, config.observability.log_format)?;

    print_banner();
    info!("Starting Bazaar Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    print_startup_info(&config);

    register_metrics();

    let module = build_cache_module(&config.cache);
    let cache = module.cache();
    cache.initialize().await?;

    run_self_test(cache.as_ref()).await;
    report_health(cache.as_ref()).await;

    shutdown_signal().await;

    cache.close().await?;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
