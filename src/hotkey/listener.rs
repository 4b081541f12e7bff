//! Listener selection and wiring
//!
//! Picks the hold listener that matches the configured hotkey and platform,
//! and binds its callbacks to a recorder.

use tracing::info;

use super::combination::HoldCombination;
use super::keycode::KeyEvent;
use super::keys::{Combination, Key, ParseError, DEFAULT_HOTKEY};
use super::single_key::HoldSingleKey;
use crate::platform::Platform;

/// Hotkey value that selects the globe key on macOS
pub const GLOBE_TOKEN: &str = "<globe>";

/// Start/stop interface driven by the hold listeners
pub trait Recorder {
    fn start_recording(&self);
    fn stop_recording(&self);
}

/// One of the two hold listeners
#[derive(Debug)]
pub enum HoldListener {
    Combination(HoldCombination),
    SingleKey(HoldSingleKey),
}

impl HoldListener {
    pub fn press(&mut self, key: Key) {
        match self {
            HoldListener::Combination(listener) => listener.press(key),
            HoldListener::SingleKey(listener) => listener.press(key),
        }
    }

    pub fn release(&mut self, key: Key) {
        match self {
            HoldListener::Combination(listener) => listener.release(key),
            HoldListener::SingleKey(listener) => listener.release(key),
        }
    }

    /// Dispatch an event from the keyboard hook
    pub fn handle(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Press(key) => self.press(key),
            KeyEvent::Release(key) => self.release(key),
        }
    }

    /// Whether the hotkey is currently held
    pub fn is_active(&self) -> bool {
        match self {
            HoldListener::Combination(listener) => listener.is_active(),
            HoldListener::SingleKey(listener) => listener.is_held(),
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            HoldListener::Combination(_) => "combination",
            HoldListener::SingleKey(_) => "single_key",
        }
    }
}

/// Build the hold listener for `hotkey` on `platform`
///
/// An unset or empty hotkey selects the globe key on macOS and
/// [`DEFAULT_HOTKEY`] elsewhere. Any other value except [`GLOBE_TOKEN`] on
/// macOS is parsed as a combination. A combination containing a key the
/// platform's hook cannot report is rejected.
pub fn create_key_listener<R>(
    hotkey: Option<&str>,
    platform: Platform,
    recorder: R,
) -> Result<HoldListener, ParseError>
where
    R: Recorder + Clone + Send + 'static,
{
    let hotkey = hotkey.unwrap_or("");

    let on_activate = {
        let recorder = recorder.clone();
        move || recorder.start_recording()
    };
    let on_deactivate = move || recorder.stop_recording();

    if platform.has_globe_key() && (hotkey.is_empty() || hotkey == GLOBE_TOKEN) {
        info!(%platform, "using globe key toggle");
        return Ok(HoldListener::SingleKey(HoldSingleKey::new(
            on_activate,
            on_deactivate,
        )));
    }

    let hotkey = if hotkey.is_empty() { DEFAULT_HOTKEY } else { hotkey };
    let combination = Combination::parse(hotkey)?;
    if let Some(key) = combination.keys().iter().find(|key| !platform.observes(key)) {
        return Err(ParseError::UnsupportedKey(*key, platform.to_string()));
    }
    info!(%platform, %combination, "using key combination");

    Ok(HoldListener::Combination(HoldCombination::new(
        combination,
        on_activate,
        on_deactivate,
    )))
}
