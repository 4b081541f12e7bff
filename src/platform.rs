//! Host platform detection

use std::fmt;

use crate::hotkey::{Key, Modifier, NamedKey};

/// Operating system the daemon is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    /// Whether the platform has a globe key that needs toggle handling
    pub fn has_globe_key(self) -> bool {
        self == Platform::MacOs
    }

    /// Whether the platform's keyboard hook can report holding `key`
    ///
    /// macOS has no scroll lock, num lock, pause, print screen or AltGr
    /// keycodes, and only reports the caps lock state, not the key.
    /// The rdev hook on Linux and Windows has no F13 and up and no menu key.
    pub fn observes(self, key: &Key) -> bool {
        match (self, key) {
            (Platform::MacOs, Key::Modifier(Modifier::AltGr)) => false,
            (Platform::MacOs, Key::Named(named)) => !matches!(
                named,
                NamedKey::CapsLock
                    | NamedKey::NumLock
                    | NamedKey::Pause
                    | NamedKey::PrintScreen
                    | NamedKey::ScrollLock
            ),
            (Platform::Windows | Platform::Linux, Key::Named(named)) => match named {
                NamedKey::F(n) => *n <= 12,
                NamedKey::Menu => false,
                _ => true,
            },
            _ => true,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
            Platform::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_macos_has_globe_key() {
        assert!(Platform::MacOs.has_globe_key());
        assert!(!Platform::Windows.has_globe_key());
        assert!(!Platform::Linux.has_globe_key());
        assert!(!Platform::Other.has_globe_key());
    }

    #[test]
    fn test_observes() {
        let caps = Key::Named(NamedKey::CapsLock);
        assert!(!Platform::MacOs.observes(&caps));
        assert!(Platform::Linux.observes(&caps));

        let f17 = Key::Named(NamedKey::F(17));
        assert!(Platform::MacOs.observes(&f17));
        assert!(!Platform::Windows.observes(&f17));
        assert!(Platform::Windows.observes(&Key::Named(NamedKey::F(12))));

        assert!(!Platform::MacOs.observes(&Key::Modifier(Modifier::AltGr)));
        assert!(Platform::Linux.observes(&Key::Modifier(Modifier::AltGr)));

        for platform in [Platform::MacOs, Platform::Linux, Platform::Other] {
            assert!(platform.observes(&Key::Char('v')));
            assert!(platform.observes(&Key::Vk(63)));
        }
    }

    #[test]
    fn test_current_matches_target() {
        let platform = Platform::current();
        assert_eq!(platform.has_globe_key(), cfg!(target_os = "macos"));
    }
}
