//! Configuration file support for scanprep
//!
//! Supports TOML configuration files with the following search order:
//! 1. `--config <path>` - explicitly specified path
//! 2. `./scanprep.toml` - current directory
//! 3. `~/.config/scanprep/config.toml` - user config
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [general]
//! verbose = 1
//!
//! [correction]
//! contrast = 10
//! margin_limit = 80
//! background = [255, 255, 255]
//! quality = "standard"
//! threshold_angle = 0.1
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::skew::{QualityMode, SkewOptions};

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// File not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// General configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Verbosity level (0-2)
    #[serde(default)]
    pub verbose: Option<u8>,
}

/// Correction configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Background contrast tolerance
    #[serde(default)]
    pub contrast: Option<u8>,

    /// Maximum detectable margin per side (pixels)
    #[serde(default)]
    pub margin_limit: Option<u32>,

    /// Background color as [r, g, b]
    #[serde(default)]
    pub background: Option<[u8; 3]>,

    /// Interpolation quality ("fast" or "standard")
    #[serde(default)]
    pub quality: Option<QualityMode>,

    /// Rotation skip threshold (degrees)
    #[serde(default)]
    pub threshold_angle: Option<f64>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Correction settings
    #[serde(default)]
    pub correction: CorrectionConfig,
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default search path
    ///
    /// Search order:
    /// 1. `./scanprep.toml`
    /// 2. `~/.config/scanprep/config.toml`
    /// 3. Default values (if no file found)
    pub fn load() -> Result<Self, ConfigError> {
        // Try current directory first
        let current_dir_config = PathBuf::from("scanprep.toml");
        if current_dir_config.exists() {
            return Self::load_from_path(&current_dir_config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("scanprep").join("config.toml");
            if user_config.exists() {
                return Self::load_from_path(&user_config);
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert to SkewOptions
    pub fn to_skew_options(&self) -> SkewOptions {
        let mut options = SkewOptions::default();

        if let Some(contrast) = self.correction.contrast {
            options.contrast = contrast;
        }
        if let Some(margin_limit) = self.correction.margin_limit {
            options.margin_limit = margin_limit;
        }
        if let Some(background) = self.correction.background {
            options.background = background;
        }
        if let Some(quality) = self.correction.quality {
            options.quality_mode = quality;
        }
        if let Some(threshold) = self.correction.threshold_angle {
            options.threshold_angle = threshold.abs();
        }

        options
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> SkewOptions {
        let mut options = self.to_skew_options();

        if let Some(contrast) = cli.contrast {
            options.contrast = contrast;
        }
        if let Some(margin_limit) = cli.margin_limit {
            options.margin_limit = margin_limit;
        }
        if let Some(background) = cli.background {
            options.background = background;
        }
        if let Some(quality) = cli.quality_mode {
            options.quality_mode = quality;
        }
        if let Some(threshold) = cli.threshold_angle {
            options.threshold_angle = threshold.abs();
        }

        options
    }

    /// Get config file search paths
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("scanprep.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("scanprep").join("config.toml"));
        }

        paths
    }
}

/// CLI override values for merging with config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub contrast: Option<u8>,
    pub margin_limit: Option<u32>,
    pub background: Option<[u8; 3]>,
    pub quality_mode: Option<QualityMode>,
    pub threshold_angle: Option<f64>,
}

impl CliOverrides {
    /// Create new empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Set contrast override
    pub fn with_contrast(mut self, contrast: u8) -> Self {
        self.contrast = Some(contrast);
        self
    }

    /// Set margin limit override
    pub fn with_margin_limit(mut self, margin_limit: u32) -> Self {
        self.margin_limit = Some(margin_limit);
        self
    }

    /// Set background color override
    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = Some(background);
        self
    }

    /// Set quality mode override
    pub fn with_quality_mode(mut self, quality_mode: QualityMode) -> Self {
        self.quality_mode = Some(quality_mode);
        self
    }

    /// Set threshold angle override
    pub fn with_threshold_angle(mut self, threshold_angle: f64) -> Self {
        self.threshold_angle = Some(threshold_angle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.general.verbose, None);
        assert!(config.correction.contrast.is_none());
        assert!(config.correction.margin_limit.is_none());
        assert!(config.correction.background.is_none());
    }

    #[test]
    fn test_config_load_from_path_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanprep.toml");
        std::fs::write(
            &path,
            "[correction]\ncontrast = 20\nmargin_limit = 120\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.correction.contrast, Some(20));
        assert_eq!(config.correction.margin_limit, Some(120));
    }

    #[test]
    fn test_config_load_from_path_missing() {
        let result = Config::load_from_path(Path::new("/nonexistent/scanprep.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_from_toml_invalid() {
        let result = Config::from_toml("correction = not toml");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_config_full_parse() {
        let config = Config::from_toml(
            r#"
            [general]
            verbose = 2

            [correction]
            contrast = 15
            margin_limit = 100
            background = [250, 250, 245]
            quality = "fast"
            threshold_angle = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.general.verbose, Some(2));
        let options = config.to_skew_options();
        assert_eq!(options.contrast, 15);
        assert_eq!(options.margin_limit, 100);
        assert_eq!(options.background, [250, 250, 245]);
        assert!(matches!(options.quality_mode, QualityMode::Fast));
        assert_eq!(options.threshold_angle, 0.2);
    }

    #[test]
    fn test_to_skew_options_defaults() {
        let options = Config::default().to_skew_options();
        let defaults = SkewOptions::default();
        assert_eq!(options.contrast, defaults.contrast);
        assert_eq!(options.margin_limit, defaults.margin_limit);
        assert_eq!(options.background, defaults.background);
    }

    #[test]
    fn test_merge_with_cli_precedence() {
        let config = Config::from_toml("[correction]\ncontrast = 15\nmargin_limit = 100\n").unwrap();
        let cli = CliOverrides::new().with_contrast(30);

        let options = config.merge_with_cli(&cli);
        // CLI wins for contrast, config wins for margin_limit.
        assert_eq!(options.contrast, 30);
        assert_eq!(options.margin_limit, 100);
    }

    #[test]
    fn test_merge_with_empty_cli() {
        let config = Config::from_toml("[correction]\nmargin_limit = 64\n").unwrap();
        let options = config.merge_with_cli(&CliOverrides::new());
        assert_eq!(options.margin_limit, 64);
    }

    #[test]
    fn test_cli_overrides_builders() {
        let cli = CliOverrides::new()
            .with_contrast(5)
            .with_margin_limit(40)
            .with_background([0, 0, 0])
            .with_quality_mode(QualityMode::Fast)
            .with_threshold_angle(1.0);

        assert_eq!(cli.contrast, Some(5));
        assert_eq!(cli.margin_limit, Some(40));
        assert_eq!(cli.background, Some([0, 0, 0]));
        assert!(matches!(cli.quality_mode, Some(QualityMode::Fast)));
        assert_eq!(cli.threshold_angle, Some(1.0));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let config = Config::from_toml("[correction]\ncontrast = 12\n").unwrap();
        let serialized = config.to_toml().unwrap();
        let reparsed = Config::from_toml(&serialized).unwrap();
        assert_eq!(reparsed.correction.contrast, Some(12));
    }

    #[test]
    fn test_search_paths() {
        let paths = Config::search_paths();
        assert!(!paths.is_empty());
        assert_eq!(paths[0], PathBuf::from("scanprep.toml"));
    }
}
