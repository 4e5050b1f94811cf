//! NCE Transfer Webhooks - gateway entry point
//!
//! ```text
//! nce_transfer_webhooks [--env|-e <name>] [--port <port>]
//! ```
//!
//! Reads `config/<name>.yaml` (default `dev`) plus `NCE__*` overrides.

use std::sync::Arc;

use nce_transfer_webhooks::config::AppConfig;
use nce_transfer_webhooks::gateway::{self, state::AppState};
use nce_transfer_webhooks::logging::init_logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn main() {
    let env = get_env();
    let app_config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            // Logging is not up yet
            eprintln!("FATAL: failed to load config/{}.yaml: {}", env, e);
            std::process::exit(1);
        }
    };
    let _log_guard = init_logging(&app_config);

    tracing::info!(
        version = env!("GIT_HASH"),
        "Starting NCE transfer webhooks in {} mode",
        env
    );

    let port = get_port_override().unwrap_or(app_config.gateway.port);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(async {
        let state = Arc::new(AppState::from_config(&app_config)?);
        gateway::run_server(&app_config.gateway.host, port, state).await
    });

    if let Err(e) = result {
        tracing::error!("FATAL: {:#}", e);
        std::process::exit(1);
    }
}
