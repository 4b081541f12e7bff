//! holdkey-daemon: hold-to-record hotkey handling
//!
//! - Hold listeners that turn raw key events into start/stop pairs
//! - macOS keyboard hook via CGEventTap
//! - Recording state machine emitting structured events

pub mod config;
pub mod events;
pub mod hotkey;
pub mod lifecycle;
pub mod platform;
pub mod state;
