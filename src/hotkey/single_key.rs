//! Toggle handling for the macOS globe key
//!
//! The event tap reports the globe key through `FlagsChanged`, and the
//! press and release edges cannot be told apart reliably. Every signal is
//! therefore treated as the next edge: odd signals start a hold, even
//! signals end it.
//!
//! Nothing resynchronises the toggle if a signal is lost; a dropped edge
//! leaves the listener inverted until the next dropped edge. Signals are
//! also lost while macOS has the event tap disabled (callback timeout or
//! secure input); the hook re-enables the tap but cannot replay them.

use tracing::debug;

use super::keys::{Key, GLOBE_VK};
use super::Callback;

/// Hold listener for a single key whose press and release look the same
pub struct HoldSingleKey {
    key: Key,
    held: bool,
    on_activate: Callback,
    on_deactivate: Callback,
}

impl HoldSingleKey {
    /// Create a listener bound to the globe key
    pub fn new<A, D>(on_activate: A, on_deactivate: D) -> Self
    where
        A: FnMut() + Send + 'static,
        D: FnMut() + Send + 'static,
    {
        Self::with_key(Key::Vk(GLOBE_VK), on_activate, on_deactivate)
    }

    /// Create a listener bound to an arbitrary key
    pub fn with_key<A, D>(key: Key, on_activate: A, on_deactivate: D) -> Self
    where
        A: FnMut() + Send + 'static,
        D: FnMut() + Send + 'static,
    {
        Self {
            key,
            held: false,
            on_activate: Box::new(on_activate),
            on_deactivate: Box::new(on_deactivate),
        }
    }

    /// Handle one signal from the hook; signals for other keys are ignored
    pub fn signal(&mut self, key: Key) {
        if key != self.key {
            return;
        }

        if self.held {
            debug!(key = %self.key, "single key released");
            (self.on_deactivate)();
        } else {
            debug!(key = %self.key, "single key held");
            (self.on_activate)();
        }
        self.held = !self.held;
    }

    pub fn press(&mut self, key: Key) {
        self.signal(key);
    }

    /// Releases arrive as the next toggle edge, same as presses
    pub fn release(&mut self, key: Key) {
        self.signal(key);
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// The key this listener reacts to
    pub fn key(&self) -> Key {
        self.key
    }
}

impl std::fmt::Debug for HoldSingleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldSingleKey")
            .field("key", &self.key)
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}
