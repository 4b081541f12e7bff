//! Hold-to-activate detection for a multi-key combination
//!
//! Turns individual press/release events into one activate/deactivate
//! pair per hold of the combination.

use std::collections::HashSet;

use tracing::debug;

use super::keys::{Combination, Key};
use super::Callback;

/// Tracks a combination and fires once when it is fully held and once when
/// it stops being fully held
pub struct HoldCombination {
    combination: Combination,
    /// Members of the combination currently held down
    pressed: HashSet<Key>,
    /// True between an activation and the matching deactivation
    active: bool,
    on_activate: Callback,
    on_deactivate: Callback,
}

impl HoldCombination {
    /// Create a listener for `combination`
    pub fn new<A, D>(combination: Combination, on_activate: A, on_deactivate: D) -> Self
    where
        A: FnMut() + Send + 'static,
        D: FnMut() + Send + 'static,
    {
        Self {
            combination,
            pressed: HashSet::new(),
            active: false,
            on_activate: Box::new(on_activate),
            on_deactivate: Box::new(on_deactivate),
        }
    }

    /// Handle a key press
    pub fn press(&mut self, key: Key) {
        let key = key.normalized();
        if self.combination.contains(&key) {
            self.pressed.insert(key);
        }

        if self.is_fully_pressed() {
            self.activate();
        }
    }

    /// Handle a key release
    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key.normalized());

        if self.active && !self.is_fully_pressed() {
            self.deactivate();
        }
    }

    /// Whether the combination is currently considered held
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Members of the combination currently recorded as pressed
    pub fn pressed(&self) -> &HashSet<Key> {
        &self.pressed
    }

    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    fn is_fully_pressed(&self) -> bool {
        &self.pressed == self.combination.keys()
    }

    fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        debug!(combination = %self.combination, "combination activated");
        (self.on_activate)();
    }

    fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        debug!(combination = %self.combination, "combination deactivated");
        (self.on_deactivate)();
        // Forget every member, not just the released one, so a modifier
        // still physically held cannot complete the combination again.
        self.pressed.clear();
    }
}

impl std::fmt::Debug for HoldCombination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoldCombination")
            .field("combination", &self.combination)
            .field("pressed", &self.pressed)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::hotkey::keys::{Modifier, NamedKey};

    const CTRL: Key = Key::Modifier(Modifier::Ctrl);
    const ALT: Key = Key::Modifier(Modifier::Alt);
    const V: Key = Key::Char('v');

    type Calls = Arc<Mutex<Vec<&'static str>>>;

    fn create_listener(hotkey: &str) -> (HoldCombination, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let on_activate = {
            let calls = Arc::clone(&calls);
            move || calls.lock().unwrap().push("activate")
        };
        let on_deactivate = {
            let calls = Arc::clone(&calls);
            move || calls.lock().unwrap().push("deactivate")
        };
        let combo = Combination::parse(hotkey).unwrap();
        (HoldCombination::new(combo, on_activate, on_deactivate), calls)
    }

    fn calls(calls: &Calls) -> Vec<&'static str> {
        calls.lock().unwrap().clone()
    }

    #[test]
    fn test_full_hold_cycle() {
        let (mut listener, log) = create_listener("<ctrl>+<alt>+v");

        listener.press(CTRL);
        assert!(calls(&log).is_empty());
        listener.press(ALT);
        assert!(calls(&log).is_empty());

        listener.press(V);
        assert_eq!(calls(&log), vec!["activate"]);
        assert!(listener.is_active());

        listener.release(V);
        assert_eq!(calls(&log), vec!["activate", "deactivate"]);
        assert!(!listener.is_active());
        assert!(listener.pressed().is_empty());

        listener.release(CTRL);
        listener.release(ALT);
        assert_eq!(calls(&log), vec!["activate", "deactivate"]);
    }

    #[test]
    fn test_activation_is_order_independent() {
        let orders = [
            [CTRL, ALT, V],
            [CTRL, V, ALT],
            [ALT, CTRL, V],
            [ALT, V, CTRL],
            [V, CTRL, ALT],
            [V, ALT, CTRL],
        ];

        for order in orders {
            let (mut listener, log) = create_listener("<ctrl>+<alt>+v");
            for key in order {
                listener.press(key);
            }
            assert_eq!(calls(&log), vec!["activate"], "order {:?}", order);
        }
    }

    #[test]
    fn test_releasing_any_member_deactivates_once() {
        for released in [CTRL, ALT, V] {
            let (mut listener, log) = create_listener("<ctrl>+<alt>+v");
            listener.press(CTRL);
            listener.press(ALT);
            listener.press(V);

            listener.release(released);
            assert_eq!(calls(&log), vec!["activate", "deactivate"]);

            for key in [CTRL, ALT, V] {
                listener.release(key);
            }
            assert_eq!(calls(&log), vec!["activate", "deactivate"]);
        }
    }

    #[test]
    fn test_leftover_modifier_does_not_retrigger() {
        let (mut listener, log) = create_listener("<ctrl>+<alt>+v");
        listener.press(CTRL);
        listener.press(ALT);
        listener.press(V);
        listener.release(V);

        // ctrl and alt are still physically down; pressing alt again must not
        // complete the combination from stale state
        listener.press(ALT);
        listener.release(CTRL);
        listener.press(CTRL);
        assert_eq!(calls(&log), vec!["activate", "deactivate"]);
        assert!(!listener.is_active());
    }

    #[test]
    fn test_repeated_presses_fire_once() {
        let (mut listener, log) = create_listener("<ctrl>+<alt>+v");
        listener.press(CTRL);
        listener.press(ALT);
        listener.press(V);
        // Auto-repeat delivers the letter again while held
        listener.press(V);
        listener.press(V);
        assert_eq!(calls(&log), vec!["activate"]);
    }

    #[test]
    fn test_non_member_keys_are_ignored() {
        let (mut listener, log) = create_listener("<ctrl>+<alt>+v");
        listener.press(Key::Char('x'));
        listener.release(Key::Char('x'));
        listener.press(CTRL);
        listener.press(Key::Named(NamedKey::Space));
        listener.press(ALT);
        listener.press(V);
        assert_eq!(calls(&log), vec!["activate"]);

        listener.release(Key::Named(NamedKey::Space));
        listener.release(Key::Vk(999));
        assert_eq!(calls(&log), vec!["activate"]);
        assert!(listener.is_active());
    }

    #[test]
    fn test_uppercase_char_matches() {
        let (mut listener, log) = create_listener("<ctrl>+v");
        listener.press(CTRL);
        listener.press(Key::Char('V'));
        assert_eq!(calls(&log), vec!["activate"]);
        listener.release(Key::Char('V'));
        assert_eq!(calls(&log), vec!["activate", "deactivate"]);
    }

    #[test]
    fn test_second_hold_cycle_activates_again() {
        let (mut listener, log) = create_listener("<ctrl>+<alt>+v");
        for _ in 0..2 {
            listener.press(CTRL);
            listener.press(ALT);
            listener.press(V);
            listener.release(V);
            listener.release(ALT);
            listener.release(CTRL);
        }
        assert_eq!(
            calls(&log),
            vec!["activate", "deactivate", "activate", "deactivate"]
        );
    }

    #[test]
    fn test_release_without_activation_is_silent() {
        let (mut listener, log) = create_listener("<ctrl>+<alt>+v");
        listener.press(CTRL);
        listener.press(ALT);
        listener.release(ALT);
        listener.release(CTRL);
        assert!(calls(&log).is_empty());
        assert!(listener.pressed().is_empty());
    }
}
