//! Hotkey module for hold-to-record key detection
//!
//! Parses the configured hotkey, turns raw key events into one
//! activate/deactivate pair per hold, and installs the system keyboard
//! hook that delivers those events.

mod combination;
mod hook;
mod keycode;
mod keys;
mod listener;
#[cfg(any(target_os = "linux", target_os = "windows"))]
mod rdev_keys;
mod single_key;

pub use combination::HoldCombination;
pub use hook::{HookError, KeyboardHook};
pub use keycode::KeyEvent;
pub use keys::{Combination, Key, Modifier, NamedKey, ParseError, DEFAULT_HOTKEY, GLOBE_VK};
pub use listener::{create_key_listener, HoldListener, Recorder, GLOBE_TOKEN};
pub use single_key::HoldSingleKey;

/// Zero-argument callback fired on activation or deactivation
pub type Callback = Box<dyn FnMut() + Send>;
