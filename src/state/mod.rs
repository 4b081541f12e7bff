//! State machine module for recording sessions
//!
//! Two states:
//! - Idle: no recording, waiting for the hotkey
//! - Recording: momentary, while the hotkey is held

mod machine;

pub use machine::{RecorderCommand, RecorderHandle, State, StateMachine};
