//! Configuration loading and management

use anyhow::Result;

use crate::platform::Platform;

/// Environment variable holding the record hotkey
pub const HOTKEY_ENV_VAR: &str = "HOLDKEY_RECORD_HOTKEYS";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Hotkey string, `None` when unset or empty (platform default)
    pub hotkey: Option<String>,

    /// Platform the daemon runs on
    pub platform: Platform,
}

impl Config {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        Self::from_env_var(HOTKEY_ENV_VAR)
    }

    /// Load configuration reading the hotkey from `name`
    pub fn from_env_var(name: &str) -> Result<Self> {
        let hotkey = match std::env::var(name) {
            Ok(value) if value.is_empty() => None,
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(e) => return Err(anyhow::anyhow!("invalid {}: {}", name, e)),
        };

        Ok(Self {
            hotkey,
            platform: Platform::current(),
        })
    }
}
