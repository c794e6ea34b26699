//! Application configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/bo-overlay/config.json`.  Every section is
//! optional; a minimal `{}` file is valid and all sections fall back to
//! their compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "overlay": { "font_size": 14, "opacity": 0.7 },
//!   "hotkeys": {
//!     "show_hide": "ctrl+alt+h",
//!     "cycle": "ctrl+alt+c",
//!     "previous_step": "ctrl+alt+left",
//!     "next_step": "ctrl+alt+right"
//!   },
//!   "build_orders": [
//!     { "name": "Fast castle", "text": "{\"build_order\": [{\"notes\": [\"6 on sheep\"]}]}" }
//!   ]
//! }
//! ```

use crate::build_order::BuildOrder;
use crate::command::Action;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest and largest overlay font size, in points.
pub const MIN_FONT_SIZE: u32 = 1;
pub const MAX_FONT_SIZE: u32 = 49;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overlay appearance and placement.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Hotkey chords per action.
    #[serde(default)]
    pub hotkeys: HotkeyConfig,

    /// Build orders to start with, in list order.
    #[serde(default)]
    pub build_orders: Vec<BuildOrder>,
}

/// Overlay appearance and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Note font size in points.
    pub font_size: u32,
    /// Window opacity, `0.0` (invisible) to `1.0` (opaque).
    pub opacity: f64,
    /// Background colour as `[r, g, b]`.
    pub background_color: [u8; 3],
    /// Note text colour as `[r, g, b]`.
    pub text_color: [u8; 3],
    /// Distance from the top edge of the screen (px).
    pub margin_top: i32,
    /// Distance from the left edge of the screen (px).
    pub margin_left: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_size: 12,
            opacity: 0.8,
            background_color: [0, 0, 0],
            text_color: [255, 255, 255],
            margin_top: 20,
            margin_left: 20,
        }
    }
}

/// Chord strings per action.  An empty string means unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub show_hide: String,
    pub cycle: String,
    pub previous_step: String,
    pub next_step: String,
}

impl HotkeyConfig {
    pub fn get(&self, action: Action) -> &str {
        match action {
            Action::ShowHide => &self.show_hide,
            Action::Cycle => &self.cycle,
            Action::PreviousStep => &self.previous_step,
            Action::NextStep => &self.next_step,
        }
    }

    pub fn set(&mut self, action: Action, chord: impl Into<String>) {
        let slot = match action {
            Action::ShowHide => &mut self.show_hide,
            Action::Cycle => &mut self.cycle,
            Action::PreviousStep => &mut self.previous_step,
            Action::NextStep => &mut self.next_step,
        };
        *slot = chord.into();
    }
}

/// Clamp a font size into `MIN_FONT_SIZE..=MAX_FONT_SIZE`.
pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Write the configuration to `path` as pretty-printed JSON.
    ///
    /// The parent directory is created if needed.  The file is written
    /// next to `path` first and then renamed over it, so a crash never
    /// leaves a truncated config behind.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| ConfigError(format!("failed to create {}: {}", dir.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError(format!("failed to serialise config: {}", e)))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| ConfigError(format!("failed to write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| ConfigError(format!("failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "overlay": {
                "font_size": 18,
                "opacity": 0.5,
                "background_color": [10, 20, 30],
                "text_color": [200, 200, 0],
                "margin_top": 100,
                "margin_left": 40
            },
            "hotkeys": {
                "show_hide": "ctrl+alt+h",
                "cycle": "ctrl+alt+c",
                "previous_step": "ctrl+alt+left",
                "next_step": "ctrl+alt+right"
            },
            "build_orders": [
                { "name": "A", "text": "hello" },
                { "name": "B" }
            ]
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.overlay.font_size, 18);
        assert_eq!(cfg.overlay.opacity, 0.5);
        assert_eq!(cfg.overlay.background_color, [10, 20, 30]);
        assert_eq!(cfg.overlay.margin_left, 40);
        assert_eq!(cfg.hotkeys.get(Action::NextStep), "ctrl+alt+right");
        assert_eq!(cfg.build_orders.len(), 2);
        assert_eq!(cfg.build_orders[1].text, "");
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.overlay, OverlayConfig::default());
        assert_eq!(cfg.hotkeys, HotkeyConfig::default());
        assert!(cfg.build_orders.is_empty());
    }

    #[test]
    fn deserialize_partial_overlay() {
        let cfg: Config = serde_json::from_str(r#"{ "overlay": { "opacity": 0.3 } }"#).unwrap();
        assert_eq!(cfg.overlay.opacity, 0.3);
        assert_eq!(cfg.overlay.font_size, OverlayConfig::default().font_size);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "overlay": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn hotkey_config_get_set() {
        let mut hk = HotkeyConfig::default();
        for action in Action::ALL {
            assert_eq!(hk.get(action), "");
        }
        hk.set(Action::Cycle, "f2");
        assert_eq!(hk.get(Action::Cycle), "f2");
        assert_eq!(hk.cycle, "f2");
    }

    #[test]
    fn font_size_is_clamped() {
        assert_eq!(clamp_font_size(0), 1);
        assert_eq!(clamp_font_size(12), 12);
        assert_eq!(clamp_font_size(120), 49);
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join(format!("bo-overlay-missing-{}.json", std::process::id()));
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("bo-overlay-save-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");

        let mut cfg = Config::default();
        cfg.overlay.font_size = 30;
        cfg.overlay.opacity = 0.4;
        cfg.hotkeys.set(Action::NextStep, "ctrl+alt+right");
        cfg.build_orders = vec![
            BuildOrder::new("Fast castle", r#"{"build_order":[{"notes":["6 on sheep"]}]}"#),
            BuildOrder::new("Drush", "free text"),
        ];
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.overlay, cfg.overlay);
        assert_eq!(loaded.hotkeys, cfg.hotkeys);
        assert_eq!(loaded.build_orders, cfg.build_orders);
        assert!(!path.with_extension("json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
