//! Recording state machine
//!
//! Receives start/stop commands from the hold listener callbacks and
//! tracks whether a recording is in progress.

use std::time::Instant;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::events::RecordingEvent;
use crate::hotkey::Recorder;

/// The two states of the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Waiting for the hotkey
    #[default]
    Idle,
    /// Hotkey is held, recording
    Recording,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Idle => write!(f, "Idle"),
            State::Recording => write!(f, "Recording"),
        }
    }
}

/// Commands sent from the listener callbacks to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    Start,
    Stop,
}

/// `Recorder` that forwards to the state machine without blocking
///
/// Listener callbacks run on the keyboard hook thread, so commands are
/// queued with `try_send` and dropped with a warning if the queue is full.
#[derive(Debug, Clone)]
pub struct RecorderHandle {
    command_tx: mpsc::Sender<RecorderCommand>,
}

impl RecorderHandle {
    pub fn new(command_tx: mpsc::Sender<RecorderCommand>) -> Self {
        Self { command_tx }
    }

    fn send(&self, command: RecorderCommand) {
        match self.command_tx.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(?command, "recorder command queue full, dropping command");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(?command, "recorder command channel closed");
            }
        }
    }
}

impl Recorder for RecorderHandle {
    fn start_recording(&self) {
        self.send(RecorderCommand::Start);
    }

    fn stop_recording(&self) {
        self.send(RecorderCommand::Stop);
    }
}

/// The state machine that tracks recording sessions
pub struct StateMachine {
    state: State,
    /// Time when the current recording started
    started_at: Option<Instant>,
    /// Channel for emitting recording events
    event_tx: broadcast::Sender<RecordingEvent>,
}

impl StateMachine {
    pub fn new(event_tx: broadcast::Sender<RecordingEvent>) -> Self {
        Self {
            state: State::Idle,
            started_at: None,
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Run the state machine until every command sender is dropped
    pub async fn run(&mut self, mut command_rx: mpsc::Receiver<RecorderCommand>) {
        info!("state machine started in Idle state");

        while let Some(command) = command_rx.recv().await {
            self.handle_command(command);
        }

        info!("state machine stopped");
    }

    /// Apply one command
    pub fn handle_command(&mut self, command: RecorderCommand) {
        match (self.state, command) {
            (State::Idle, RecorderCommand::Start) => self.transition_to(State::Recording),
            (State::Recording, RecorderCommand::Stop) => self.transition_to(State::Idle),
            (state, command) => {
                warn!(%state, ?command, "ignoring command in current state");
            }
        }
    }

    fn transition_to(&mut self, new_state: State) {
        let old_state = self.state;
        let duration_ms = self
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "state transition"
        );

        self.state = new_state;
        let event = match new_state {
            State::Recording => {
                self.started_at = Some(Instant::now());
                RecordingEvent::RecordingStarted
            }
            State::Idle => {
                self.started_at = None;
                RecordingEvent::RecordingStopped { duration_ms }
            }
        };

        debug!(?event, "emitting recording event");
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}
