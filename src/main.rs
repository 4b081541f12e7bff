//! holdkey-daemon: start and stop recording while a hotkey is held
//!
//! - Keyboard hook feeding a hold listener (globe key or key combination)
//! - Recording state machine driven by the listener callbacks
//! - One JSON line per recording event on stdout

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use holdkey_daemon::config::Config;
use holdkey_daemon::events::RecordingEvent;
use holdkey_daemon::hotkey::{create_key_listener, KeyboardHook};
use holdkey_daemon::lifecycle::ShutdownSignal;
use holdkey_daemon::state::{RecorderHandle, StateMachine};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries recording events
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "holdkey-daemon starting"
    );

    let config = Config::load()?;
    info!(hotkey = ?config.hotkey, platform = %config.platform, "configuration loaded");

    let shutdown = ShutdownSignal::new();

    // Listener callbacks -> state machine
    let (command_tx, command_rx) = mpsc::channel(32);
    // State machine -> event printer
    let (event_tx, mut event_rx) = broadcast::channel::<RecordingEvent>(64);

    let mut state_machine = StateMachine::new(event_tx);

    // Held until shutdown so the state machine outlives a failed hook
    let recorder = RecorderHandle::new(command_tx);

    // An unparseable hotkey is fatal
    let listener =
        create_key_listener(config.hotkey.as_deref(), config.platform, recorder.clone())?;
    info!(listener = listener.kind(), "key listener created");

    let hook = KeyboardHook::new();
    // `start` blocks on the hook thread's readiness report
    match tokio::task::block_in_place(|| hook.start(listener)) {
        Ok(()) => {
            info!("keyboard hook started");
        }
        Err(e) => {
            error!(?e, "failed to start keyboard hook");
            warn!("continuing without hotkey support - check Accessibility or input permissions");
        }
    }

    info!("daemon initialized, entering main loop");

    tokio::select! {
        _ = state_machine.run(command_rx) => {
            info!("state machine exited");
        }

        _ = async {
            loop {
                match event_rx.recv().await {
                    Ok(event) => {
                        info!(%event, "recording event");
                        match serde_json::to_string(&event) {
                            Ok(line) => println!("{}", line),
                            Err(e) => warn!(?e, "failed to encode recording event"),
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "recording event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        } => {
            info!("event printer exited");
        }

        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "failed to wait for shutdown signal"),
            }
        }
    }

    info!("shutting down...");

    hook.stop();
    drop(recorder);

    info!("holdkey-daemon stopped");

    Ok(())
}
