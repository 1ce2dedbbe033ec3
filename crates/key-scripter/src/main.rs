//! Key-Scripter: record global keystrokes as macro text and play them back.

mod app;
mod app_command;
mod app_state;
mod atomic_file;
mod config;
mod error;
mod hotkey_handler;
mod message_pump;
mod output_handler;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    app_state::AppState,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    message_pump::MessagePump,
    output_handler::OutputHandler,
};

use crate::config::Config;

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "key_scripter=debug,key_scripter_core=info";

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    // The pump must belong to the thread that registers the hotkeys, which
    // is where WM_HOTKEY is delivered.
    let (pump, quit_handle) = MessagePump::new();

    // Dropping the manager unregisters the hotkeys, so it lives until exit.
    let (_hotkey_manager, hotkey_ids) = match HotkeyHandler::register_hotkeys(&config.hotkeys) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to register hotkeys: {:?}", e);
            std::process::exit(1);
        }
    };

    let runtime_thread = std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime: {:?}", e);
                quit_handle.quit();
                return;
            }
        };

        rt.block_on(async {
            let state = Arc::new(Mutex::new(AppState::Idle));
            let (command_tx, command_rx) = mpsc::channel(32);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);

            let hotkey_handler =
                HotkeyHandler::new(hotkey_ids, Arc::clone(&state), command_tx.clone());
            let app = App::new(config, state, command_tx, command_rx, shutdown_tx);

            tokio::join!(
                async {
                    if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                        error!(error = ?e, "Hotkey handler error");
                    }
                },
                async {
                    if let Err(e) = app.run().await {
                        error!(error = ?e, "App error");
                    }
                }
            );
        });

        quit_handle.quit();
    });

    pump.run();

    if runtime_thread.join().is_err() {
        error!("Runtime thread panicked");
        std::process::exit(1);
    }

    info!("Goodbye");
}
