// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Log level
//! - `[loader]` - Loading overlay timings (fade-out, dots, frame rate)
//! - `[gallery]` - Thumbnail grid, hover effect and rich mode
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `ICED_GALLERY_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_gallery::config;
//!
//! let (mut config, _warning) = config::load();
//! config.gallery.rich = Some(true);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// Tracing filter directive (e.g. "info", "iced_gallery=debug").
    /// `RUST_LOG` takes precedence when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Loading overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoaderConfig {
    /// Fade-out duration after every asset settled (milliseconds).
    #[serde(default = "default_fade_out_ms", skip_serializing_if = "Option::is_none")]
    pub fade_out_ms: Option<u64>,

    /// Interval between "Now Loading" dot steps (milliseconds).
    #[serde(
        default = "default_dots_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub dots_interval_ms: Option<u64>,

    /// Frame rate for fade and hover animations.
    #[serde(default = "default_frame_rate", skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: default_fade_out_ms(),
            dots_interval_ms: default_dots_interval_ms(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl LoaderConfig {
    /// Fade-out duration, clamped to the supported range.
    #[must_use]
    pub fn fade_out(&self) -> Duration {
        let ms = self
            .fade_out_ms
            .unwrap_or(DEFAULT_FADE_OUT_MS)
            .clamp(MIN_FADE_OUT_MS, MAX_FADE_OUT_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn dots_interval(&self) -> Duration {
        let ms = self.dots_interval_ms.unwrap_or(DEFAULT_DOTS_INTERVAL_MS).max(1);
        Duration::from_millis(ms)
    }

    /// Delay between two animation frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        let rate = self
            .frame_rate
            .unwrap_or(DEFAULT_FRAME_RATE)
            .clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
        Duration::from_millis(1000 / u64::from(rate))
    }
}

/// Gallery grid and hover settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    /// Forces rich mode on or off regardless of the page's `rich` body class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich: Option<bool>,

    /// Token inserted before the extension of the rich thumbnail variant.
    #[serde(default = "default_rich_suffix", skip_serializing_if = "Option::is_none")]
    pub rich_suffix: Option<String>,

    /// Duration of the thumbnail hover animation (milliseconds).
    #[serde(
        default = "default_hover_duration_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub hover_duration_ms: Option<u64>,

    /// Resting thumbnail size relative to its declared size.
    #[serde(default = "default_rest_scale", skip_serializing_if = "Option::is_none")]
    pub rest_scale: Option<f32>,

    /// Thumbnails per grid row.
    #[serde(default = "default_columns", skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,

    /// Decoded lightbox previews kept in memory.
    #[serde(
        default = "default_preview_cache_entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub preview_cache_entries: Option<usize>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            rich: None,
            rich_suffix: default_rich_suffix(),
            hover_duration_ms: default_hover_duration_ms(),
            rest_scale: default_rest_scale(),
            columns: default_columns(),
            preview_cache_entries: default_preview_cache_entries(),
        }
    }
}

impl GalleryConfig {
    #[must_use]
    pub fn rich_suffix(&self) -> &str {
        match self.rich_suffix.as_deref() {
            Some(suffix) if !suffix.is_empty() => suffix,
            _ => DEFAULT_RICH_SUFFIX,
        }
    }

    #[must_use]
    pub fn hover_duration(&self) -> Duration {
        let ms = self
            .hover_duration_ms
            .unwrap_or(DEFAULT_HOVER_DURATION_MS)
            .min(MAX_HOVER_DURATION_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn rest_scale(&self) -> f32 {
        let scale = self.rest_scale.unwrap_or(DEFAULT_REST_SCALE);
        if scale.is_finite() {
            scale.clamp(MIN_REST_SCALE, MAX_REST_SCALE)
        } else {
            DEFAULT_REST_SCALE
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
            .unwrap_or(DEFAULT_GRID_COLUMNS)
            .clamp(MIN_GRID_COLUMNS, MAX_GRID_COLUMNS)
    }

    #[must_use]
    pub fn preview_cache_entries(&self) -> usize {
        self.preview_cache_entries
            .unwrap_or(DEFAULT_PREVIEW_CACHE_ENTRIES)
            .clamp(MIN_PREVIEW_CACHE_ENTRIES, MAX_PREVIEW_CACHE_ENTRIES)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub gallery: GalleryConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_fade_out_ms() -> Option<u64> {
    Some(DEFAULT_FADE_OUT_MS)
}

fn default_dots_interval_ms() -> Option<u64> {
    Some(DEFAULT_DOTS_INTERVAL_MS)
}

fn default_frame_rate() -> Option<u32> {
    Some(DEFAULT_FRAME_RATE)
}

fn default_rich_suffix() -> Option<String> {
    Some(DEFAULT_RICH_SUFFIX.to_string())
}

fn default_hover_duration_ms() -> Option<u64> {
    Some(DEFAULT_HOVER_DURATION_MS)
}

fn default_rest_scale() -> Option<f32> {
    Some(DEFAULT_REST_SCALE)
}

fn default_columns() -> Option<usize> {
    Some(DEFAULT_GRID_COLUMNS)
}

fn default_preview_cache_entries() -> Option<usize> {
    Some(DEFAULT_PREVIEW_CACHE_ENTRIES)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!("{} ignored: {}", path.display(), err)),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                log_level: Some("debug".to_string()),
            },
            loader: LoaderConfig {
                fade_out_ms: Some(800),
                dots_interval_ms: Some(300),
                frame_rate: Some(30),
            },
            gallery: GalleryConfig {
                rich: Some(true),
                rich_suffix: Some("_hd".to_string()),
                hover_duration_ms: Some(150),
                rest_scale: Some(0.8),
                columns: Some(5),
                preview_cache_entries: Some(8),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn load_with_override_reports_warning_for_invalid_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[loader\nfade_out_ms = ")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[gallery]\nrich = true\n").expect("failed to write config");

        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.gallery.rich, Some(true));
        assert_eq!(loaded.gallery.columns(), DEFAULT_GRID_COLUMNS);
        assert_eq!(loaded.loader, LoaderConfig::default());
    }

    #[test]
    fn accessors_clamp_out_of_range_values() {
        let loader = LoaderConfig {
            fade_out_ms: Some(60_000),
            dots_interval_ms: Some(0),
            frame_rate: Some(1_000),
        };
        assert_eq!(loader.fade_out(), Duration::from_millis(MAX_FADE_OUT_MS));
        assert_eq!(loader.dots_interval(), Duration::from_millis(1));
        assert_eq!(
            loader.frame_interval(),
            Duration::from_millis(1000 / u64::from(MAX_FRAME_RATE))
        );

        let gallery = GalleryConfig {
            rich_suffix: Some(String::new()),
            rest_scale: Some(f32::NAN),
            columns: Some(0),
            ..GalleryConfig::default()
        };
        assert_eq!(gallery.rich_suffix(), DEFAULT_RICH_SUFFIX);
        assert_eq!(gallery.rest_scale(), DEFAULT_REST_SCALE);
        assert_eq!(gallery.columns(), MIN_GRID_COLUMNS);
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("deep").join("path").join("settings.toml");

        save_to_path(&Config::default(), &config_path).expect("save should create directories");
        assert!(config_path.exists());
    }
}
