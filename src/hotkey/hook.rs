//! Global keyboard hook
//!
//! Observes system-wide key presses, releases and modifier changes and feeds
//! them to a hold listener. Runs on a dedicated thread; the listener and its
//! callbacks run on that thread.
//!
//! - macOS: CGEventTap on the thread's own CFRunLoop
//! - Linux and Windows: `rdev::listen`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, warn};

use super::keycode::KeyEvent;
use super::listener::HoldListener;

/// Errors that can occur in the keyboard hook
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("keyboard hook is already running")]
    AlreadyRunning,

    #[error("failed to create event tap - check Accessibility permissions")]
    EventTapCreation,

    #[error("failed to create run loop source for event tap")]
    RunLoopSource,

    #[error("failed to spawn hook thread: {0}")]
    ThreadSpawn(String),

    #[error("keyboard listener failed: {0}")]
    Listen(String),

    #[error("keyboard hook is not supported on this platform")]
    UnsupportedPlatform,
}

/// System-wide keyboard hook driving one hold listener
pub struct KeyboardHook {
    running: Arc<AtomicBool>,
}

impl KeyboardHook {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start delivering key events to `listener`
    ///
    /// Spawns the hook thread and blocks until it reports readiness. On macOS
    /// that is after the event tap is installed, so a missing Accessibility
    /// permission is reported here rather than only in the logs. `rdev`
    /// gives no readiness signal, so its failures are only logged.
    pub fn start(&self, listener: HoldListener) -> Result<(), HookError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(HookError::AlreadyRunning);
        }

        let running = Arc::clone(&self.running);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        let spawned = thread::Builder::new()
            .name("keyboard-hook".to_string())
            .spawn(move || {
                info!(listener = listener.kind(), "keyboard hook thread started");

                if let Err(e) = run_event_loop(listener, Arc::clone(&running), ready_tx) {
                    error!(?e, "keyboard hook error");
                }

                running.store(false, Ordering::SeqCst);
                info!("keyboard hook thread stopped");
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(HookError::ThreadSpawn(e.to_string()));
        }

        match ready_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(HookError::ThreadSpawn(
                "hook thread exited before reporting readiness".to_string(),
            )),
        }
    }

    /// Stop the hook
    ///
    /// On macOS the thread exits within one run loop slice. `rdev::listen`
    /// cannot be interrupted, so there the thread stays parked and drops
    /// every further event.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for KeyboardHook {
    fn default() -> Self {
        Self::new()
    }
}

type ReadySender = std::sync::mpsc::Sender<Result<(), HookError>>;

/// What the event tap callback hands to the hook thread
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapMessage {
    Key(KeyEvent),
    /// macOS turned the tap off (callback timeout or user input)
    Disabled,
}

/// Apply one tap message; returns true when the tap must be re-enabled
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn dispatch(listener: &mut HoldListener, message: TapMessage) -> bool {
    match message {
        TapMessage::Key(key_event) => {
            debug!(?key_event, "key event");
            listener.handle(key_event);
            false
        }
        TapMessage::Disabled => {
            warn!("event tap disabled by the system, re-enabling");
            true
        }
    }
}

/// Run the CFRunLoop with the event tap
#[cfg(target_os = "macos")]
fn run_event_loop(
    mut listener: HoldListener,
    running: Arc<AtomicBool>,
    ready_tx: ReadySender,
) -> Result<(), HookError> {
    use core_foundation::runloop::{kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop};
    use core_graphics::event::{
        CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
        CGEventTapProxy, CGEventType, EventField,
    };
    use super::keycode::{flags_changed, key_from_keycode};

    // The tap callback only translates; events are handled on this thread
    // after each run loop slice.
    let (callback_tx, callback_rx) = std::sync::mpsc::channel::<TapMessage>();

    let callback = move |_proxy: CGEventTapProxy,
                         event_type: CGEventType,
                         event: &CGEvent|
          -> Option<CGEvent> {
        let message = match event_type {
            CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                Some(TapMessage::Disabled)
            }
            CGEventType::KeyDown | CGEventType::KeyUp | CGEventType::FlagsChanged => {
                u16::try_from(event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE))
                    .ok()
                    .and_then(|code| match event_type {
                        CGEventType::KeyDown => Some(KeyEvent::Press(key_from_keycode(code))),
                        CGEventType::KeyUp => Some(KeyEvent::Release(key_from_keycode(code))),
                        _ => flags_changed(code, event.get_flags().bits()),
                    })
                    .map(TapMessage::Key)
            }
            _ => None,
        };
        if let Some(message) = message {
            let _ = callback_tx.send(message);
        }
        Some(event.clone())
    };

    let tap = match CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::ListenOnly,
        vec![
            CGEventType::KeyDown,
            CGEventType::KeyUp,
            CGEventType::FlagsChanged,
        ],
        callback,
    ) {
        Ok(tap) => tap,
        Err(()) => {
            error!("failed to create event tap - is Accessibility permission granted?");
            let _ = ready_tx.send(Err(HookError::EventTapCreation));
            return Err(HookError::EventTapCreation);
        }
    };

    let run_loop_source = match tap.mach_port.create_runloop_source(0) {
        Ok(source) => source,
        Err(()) => {
            let _ = ready_tx.send(Err(HookError::RunLoopSource));
            return Err(HookError::RunLoopSource);
        }
    };

    let run_loop = CFRunLoop::get_current();
    unsafe {
        run_loop.add_source(&run_loop_source, kCFRunLoopCommonModes);
    }
    tap.enable();

    info!("event tap created and enabled");
    let _ = ready_tx.send(Ok(()));

    while running.load(Ordering::SeqCst) {
        unsafe {
            CFRunLoop::run_in_mode(
                kCFRunLoopDefaultMode,
                std::time::Duration::from_millis(100),
                true,
            );
        }

        while let Ok(message) = callback_rx.try_recv() {
            // Edges that arrived while the tap was off are lost; see the
            // desync note in `single_key`.
            if dispatch(&mut listener, message) {
                tap.enable();
            }
        }
    }

    Ok(())
}

/// Run `rdev::listen`, handling events directly in its callback
#[cfg(any(target_os = "linux", target_os = "windows"))]
fn run_event_loop(
    mut listener: HoldListener,
    running: Arc<AtomicBool>,
    ready_tx: ReadySender,
) -> Result<(), HookError> {
    use rdev::{listen, Event, EventType};

    use super::rdev_keys::key_from_rdev;

    let callback = move |event: Event| {
        if !running.load(Ordering::SeqCst) {
            return;
        }

        let key_event = match event.event_type {
            EventType::KeyPress(key) => KeyEvent::Press(key_from_rdev(key)),
            EventType::KeyRelease(key) => KeyEvent::Release(key_from_rdev(key)),
            _ => return,
        };
        dispatch(&mut listener, TapMessage::Key(key_event));
    };

    info!("starting rdev keyboard listener");
    let _ = ready_tx.send(Ok(()));

    listen(callback).map_err(|e| HookError::Listen(format!("{:?}", e)))
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn run_event_loop(
    _listener: HoldListener,
    _running: Arc<AtomicBool>,
    ready_tx: ReadySender,
) -> Result<(), HookError> {
    let _ = ready_tx.send(Err(HookError::UnsupportedPlatform));
    Err(HookError::UnsupportedPlatform)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::hotkey::keys::{Combination, Key, Modifier, DEFAULT_HOTKEY};
    use crate::hotkey::HoldCombination;

    fn create_listener() -> (HoldListener, Arc<Mutex<Vec<&'static str>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let on_activate = {
            let calls = Arc::clone(&calls);
            move || calls.lock().unwrap().push("activate")
        };
        let on_deactivate = {
            let calls = Arc::clone(&calls);
            move || calls.lock().unwrap().push("deactivate")
        };
        let combination = Combination::parse(DEFAULT_HOTKEY).unwrap();
        let listener =
            HoldListener::Combination(HoldCombination::new(combination, on_activate, on_deactivate));
        (listener, calls)
    }

    #[test]
    fn test_hook_creation() {
        let hook = KeyboardHook::new();
        assert!(!hook.is_running());
    }

    #[test]
    fn test_dispatch_forwards_key_events() {
        let (mut listener, calls) = create_listener();
        for key in [
            Key::Modifier(Modifier::Ctrl),
            Key::Modifier(Modifier::Alt),
            Key::Char('v'),
        ] {
            assert!(!dispatch(&mut listener, TapMessage::Key(KeyEvent::Press(key))));
        }
        assert!(!dispatch(
            &mut listener,
            TapMessage::Key(KeyEvent::Release(Key::Char('v')))
        ));
        assert_eq!(*calls.lock().unwrap(), vec!["activate", "deactivate"]);
    }

    #[test]
    fn test_dispatch_requests_reenable_when_disabled() {
        let (mut listener, calls) = create_listener();
        assert!(dispatch(&mut listener, TapMessage::Disabled));
        assert!(calls.lock().unwrap().is_empty());
        assert!(!listener.is_active());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let hook = KeyboardHook::new();
        hook.running.store(true, Ordering::SeqCst);
        let (listener, _) = create_listener();
        assert!(matches!(hook.start(listener), Err(HookError::AlreadyRunning)));
    }
}
