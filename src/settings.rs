//! Player preferences
//!
//! Persisted separately from progression: LocalStorage on the web, a JSON
//! file next to the progress file on native.

use serde::{Deserialize, Serialize};

/// When to show the on-screen movement/jump/power buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TouchControls {
    /// Only on touch devices
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchControls {
    pub fn as_str(&self) -> &'static str {
        match self {
            TouchControls::Auto => "Auto",
            TouchControls::Always => "Always",
            TouchControls::Never => "Never",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(TouchControls::Auto),
            "always" | "on" => Some(TouchControls::Always),
            "never" | "off" => Some(TouchControls::Never),
            _ => None,
        }
    }

    /// Whether the overlay is shown on this device
    pub fn visible(&self, touch_device: bool) -> bool {
        match self {
            TouchControls::Auto => touch_device,
            TouchControls::Always => true,
            TouchControls::Never => false,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// On-screen controls
    pub touch_controls: TouchControls,

    // === HUD ===
    /// Pulse the power bar while it is full
    pub power_pulse: bool,
    /// Show the boss health bar while the boss is engaged
    pub boss_bar: bool,

    // === Accessibility ===
    /// Reduced motion (no HUD pulsing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            touch_controls: TouchControls::Auto,
            power_pulse: true,
            boss_bar: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective power pulse (respects reduced_motion)
    pub fn effective_power_pulse(&self) -> bool {
        self.power_pulse && !self.reduced_motion
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gucci_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), crate::StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| crate::StoreError::Unavailable("no LocalStorage".to_string()))?;
        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| crate::StoreError::Unavailable(format!("{e:?}")))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
