// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings only cover presentation. The surface size and the correction
//! constant are fixed and deliberately absent here.

use crate::io::serialization;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "RANGEFINDER_CONFIG";

/// Files looked for in the working directory when no explicit path is given.
const DEFAULT_FILES: &[&str] = &["rangefinder.yaml", "rangefinder.yml", "rangefinder.json"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 960.0,
            min_width: 800.0,
            min_height: 600.0,
        }
    }
}

/// Stroke used for the calibration line and its end caps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub line_width: f32,
    pub end_cap_length: f32,
    pub color: [u8; 4],
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            end_cap_length: 10.0,
            color: [255, 255, 255, 255],
        }
    }
}

/// Measurement marker appearance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    pub radius: f32,
    pub start_color: [u8; 4],
    pub end_color: [u8; 4],
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            radius: 6.0,
            start_color: [0x86, 0xb6, 0xfe, 0xff],
            end_color: [0xed, 0x6b, 0x6b, 0xff],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub overlay: OverlaySettings,
    pub markers: MarkerSettings,
    /// Text placed in the reference length field at startup.
    pub initial_reference_length: String,
}

impl Settings {
    /// Load settings from `path`, format chosen by extension.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        serialization::import(path)
    }

    /// Resolve and load settings, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::locate(std::env::var_os(CONFIG_ENV).map(PathBuf::from)) else {
            log::debug!("No settings file found, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::error!("Ignoring settings file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    /// An explicit path always wins; otherwise the first default file present.
    fn locate(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| {
            DEFAULT_FILES
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.is_file())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = "overlay:\n  end_cap_length: 16\nmarkers:\n  radius: 4\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.overlay.end_cap_length, 16.0);
        assert_eq!(settings.overlay.line_width, 2.0);
        assert_eq!(settings.markers.radius, 4.0);
        assert_eq!(settings.window, WindowSettings::default());
        assert!(settings.initial_reference_length.is_empty());
    }

    #[test]
    fn test_json_settings() {
        let json = r#"{"initial_reference_length": "125", "overlay": {"color": [0, 0, 0, 255]}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.initial_reference_length, "125");
        assert_eq!(settings.overlay.color, [0, 0, 0, 255]);
        assert_eq!(settings.overlay.end_cap_length, 10.0);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("rangefinder_config_test.yml");
        std::fs::write(&path, "window:\n  width: 1024\n").unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.window.width, 1024.0);
        assert_eq!(settings.window.height, 960.0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/nonexistent/custom.yaml");
        assert_eq!(Settings::locate(Some(explicit.clone())), Some(explicit));
    }
}
