//! Configuration file support for imgmark.
//!
//! Settings are layered: built-in defaults, then the optional file at
//! `~/.config/imgmark/config.toml`, then environment variables. Command-line
//! flags are applied on top by the binary.
//!
//! If no config file exists, defaults are used.

pub mod keybindings;
pub mod types;

pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{DrawingConfig, OutputConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::draw::{FontDescriptor, RenderContext, WidgetScale};
use crate::util::SnapGrid;

/// Environment variable overriding the save path.
pub const ENV_OUTPUT_PATH: &str = "ANNOTATED";

/// Environment variable overriding the snap grid size.
pub const ENV_GRID_SIZE: &str = "GRID_SIZE";

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// grid_size = 10
/// large_widgets = false
/// font_family = "DejaVu Sans"
///
/// [output]
/// path = "~/Pictures/annotated.png"
/// copy_on_exit = true
///
/// [keybindings]
/// undo = ["Backspace", "Ctrl+Z"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Snap grid, widget size and label font
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Save path and clipboard behavior
    #[serde(default)]
    pub output: OutputConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps configuration values to acceptable ranges.
    ///
    /// Invalid values are replaced and a warning is logged for each.
    pub fn validate_and_clamp(&mut self) {
        if self.drawing.grid_size > types::MAX_GRID_SIZE {
            warn!(
                "Invalid grid_size {}, clamping to 0-{} range",
                self.drawing.grid_size,
                types::MAX_GRID_SIZE
            );
            self.drawing.grid_size = types::MAX_GRID_SIZE;
        }

        let valid_weight = matches!(
            self.drawing.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .drawing
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            warn!(
                "Invalid font_weight '{}', falling back to 'bold'",
                self.drawing.font_weight
            );
            self.drawing.font_weight = "bold".to_string();
        }

        if self.drawing.font_family.trim().is_empty() {
            warn!("Empty font_family, falling back to 'Sans'");
            self.drawing.font_family = "Sans".to_string();
        }

        if self.output.path.as_os_str().is_empty() {
            warn!(
                "Empty output path, falling back to {}",
                types::DEFAULT_OUTPUT_PATH
            );
            self.output.path = PathBuf::from(types::DEFAULT_OUTPUT_PATH);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("imgmark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Reads, parses and validates the config file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// `ANNOTATED` replaces the save path; `GRID_SIZE` replaces the snap grid.
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_OUTPUT_PATH).filter(|p| !p.trim().is_empty()) {
            debug!("{ENV_OUTPUT_PATH} overrides output path: {path}");
            self.output.path = expand_tilde(&path);
        }

        if let Some(raw) = lookup(ENV_GRID_SIZE) {
            match raw.trim().parse::<u32>() {
                Ok(size) => {
                    debug!("{ENV_GRID_SIZE} overrides grid size: {size}");
                    self.drawing.grid_size = size;
                }
                Err(err) => warn!("Ignoring {ENV_GRID_SIZE}='{raw}': {err}"),
            }
        }

        self.validate_and_clamp();
    }

    pub fn snap_grid(&self) -> SnapGrid {
        SnapGrid::new(self.drawing.grid_size)
    }

    pub fn font_descriptor(&self) -> FontDescriptor {
        FontDescriptor::new(
            self.drawing.font_family.clone(),
            self.drawing.font_weight.clone(),
        )
    }

    /// Initial render context (widget scale and label font).
    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(
            WidgetScale::from_large(self.drawing.large_widgets),
            self.font_descriptor(),
        )
    }

    /// Output path with a leading `~/` expanded.
    pub fn output_path(&self) -> PathBuf {
        match self.output.path.to_str() {
            Some(path) => expand_tilde(path),
            None => self.output.path.clone(),
        }
    }
}

/// Expands a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.drawing.grid_size, 8);
        assert!(!config.drawing.large_widgets);
        assert_eq!(config.output.path, PathBuf::from("/tmp/annotated.jpg"));
        assert!(config.output.copy_on_exit);
        assert_eq!(config.render_context().scale, WidgetScale::Normal);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [drawing]
            grid_size = 0

            [keybindings]
            save = ["Ctrl+S"]
            "#,
        )
        .unwrap();
        assert_eq!(config.drawing.grid_size, 0);
        assert_eq!(config.drawing.font_weight, "bold");
        assert_eq!(config.keybindings.save, vec!["Ctrl+S".to_string()]);
        assert_eq!(config.keybindings.undo, KeybindingsConfig::default().undo);
        assert!(!config.snap_grid().is_enabled());
    }

    #[test]
    fn validate_clamps_grid_and_weight() {
        let mut config = Config::default();
        config.drawing.grid_size = 10_000;
        config.drawing.font_weight = "chunky".to_string();
        config.validate_and_clamp();
        assert_eq!(config.drawing.grid_size, types::MAX_GRID_SIZE);
        assert_eq!(config.drawing.font_weight, "bold");

        config.drawing.font_weight = "600".to_string();
        config.validate_and_clamp();
        assert_eq!(config.drawing.font_weight, "600");
    }

    #[test]
    fn env_overrides_path_and_grid() {
        let mut config = Config::default();
        config.apply_env_with(env(&[
            (ENV_OUTPUT_PATH, "/tmp/out.png"),
            (ENV_GRID_SIZE, "16"),
        ]));
        assert_eq!(config.output.path, PathBuf::from("/tmp/out.png"));
        assert_eq!(config.snap_grid(), SnapGrid::new(16));
    }

    #[test]
    fn env_grid_zero_disables_snapping() {
        let mut config = Config::default();
        config.apply_env_with(env(&[(ENV_GRID_SIZE, "0")]));
        assert!(!config.snap_grid().is_enabled());
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env_with(env(&[(ENV_GRID_SIZE, "fine"), (ENV_OUTPUT_PATH, "  ")]));
        assert_eq!(config.drawing.grid_size, types::DEFAULT_GRID_SIZE);
        assert_eq!(
            config.output.path,
            PathBuf::from(types::DEFAULT_OUTPUT_PATH)
        );
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[drawing]\nlarge_widgets = true\ngrid_size = 999\n[output]\ncopy_on_exit = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.drawing.large_widgets);
        assert_eq!(config.drawing.grid_size, types::MAX_GRID_SIZE);
        assert!(!config.output.copy_on_exit);
        assert_eq!(config.render_context().scale, WidgetScale::Large);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[drawing\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/tmp/a.png"), PathBuf::from("/tmp/a.png"));
    }
}
