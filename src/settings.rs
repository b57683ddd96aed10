//! Player preferences
//!
//! Stored as JSON in LocalStorage. Game progress is never persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when the tab loses focus
    pub mute_on_blur: bool,

    // === Visuals ===
    /// Screen shake when the player is hit
    pub screen_shake: bool,
    /// Draw collision outlines over sprites
    pub show_hitboxes: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no blast flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,

            screen_shake: true,
            show_hitboxes: false,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "nebula_strike_settings";

    /// Volume actually applied to effects
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Flip the preference bound to a hotkey. Returns false for unbound keys.
    ///
    /// H: hitboxes, F: FPS counter, K: screen shake, M: reduced motion
    pub fn toggle_hotkey(&mut self, key: &str) -> bool {
        let flag = match key {
            "h" | "H" => &mut self.show_hitboxes,
            "f" | "F" => &mut self.show_fps,
            "k" | "K" => &mut self.screen_shake,
            "m" | "M" => &mut self.reduced_motion,
            _ => return false,
        };
        *flag = !*flag;
        log::debug!("Settings hotkey '{}' -> {}", key, flag);
        true
    }

    /// Screen shake, unless reduced motion is on
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Parse stored JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
                settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
                settings
            }
            Err(e) => {
                log::warn!("Discarding stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            log::info!("Loaded settings from LocalStorage");
            return Self::from_json(&json);
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                log::warn!("Could not write settings to LocalStorage");
            } else {
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage on native, using defaults ({})", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"show_fps": true}"#);
        assert!(settings.show_fps);
        assert_eq!(settings.master_volume, 0.8);
        assert!(settings.mute_on_blur);
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(Settings::from_json("{nope"), Settings::default());
    }

    #[test]
    fn test_volume_clamped() {
        let settings = Settings::from_json(r#"{"master_volume": 3.0, "sfx_volume": 0.5}"#);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.effective_volume(), 0.5);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_hotkeys_flip_flags() {
        let mut settings = Settings::default();
        assert!(settings.toggle_hotkey("h"));
        assert!(settings.show_hitboxes);
        assert!(settings.toggle_hotkey("H"));
        assert!(!settings.show_hitboxes);

        assert!(settings.toggle_hotkey("k"));
        assert!(!settings.screen_shake);
        assert!(!settings.toggle_hotkey("x"));

        // Survives a storage round trip
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }
}
