//! Events module for recording transitions
//!
//! Structured events emitted by the state machine when recording starts
//! and stops. The daemon prints them as JSON lines on stdout.

use serde::{Deserialize, Serialize};

/// Events emitted by the state machine during transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordingEvent {
    /// Hotkey became held, recording started
    RecordingStarted,

    /// Hotkey released, recording stopped
    RecordingStopped {
        /// How long the recording ran, in milliseconds
        duration_ms: u64,
    },
}

impl std::fmt::Display for RecordingEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingEvent::RecordingStarted => write!(f, "RECORDING_STARTED"),
            RecordingEvent::RecordingStopped { duration_ms } => {
                write!(f, "RECORDING_STOPPED ({}ms)", duration_ms)
            }
        }
    }
}
