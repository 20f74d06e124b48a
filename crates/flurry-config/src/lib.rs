//! Configuration for the flurry snowfall.
//!
//! Settings live in a TOML file under the platform config directory
//! (`~/.config/flurry/config.toml` on Linux). A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use flurry_assets::SourceKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "FLURRY_CONFIG";

/// Environment variable forcing the reduced-motion preference.
pub const REDUCED_MOTION_ENV: &str = "FLURRY_REDUCED_MOTION";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where to find the icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetSettings {
    /// Directory or `http(s)://` URL holding the icons.
    pub location: String,
    /// Icon names to use before looking anywhere else.
    pub preset: Vec<String>,
    /// Discovery order.
    pub sources: Vec<SourceKind>,
    /// Manifest file name inside `location`.
    pub manifest: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            location: "assets/".to_string(),
            preset: Vec::new(),
            sources: SourceKind::DEFAULT_ORDER.to_vec(),
            manifest: "manifest.json".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Flake edge length in stage pixels (a terminal cell is 8x16).
    pub flake_size: f64,
    /// Slow the animation down.
    pub reduced_motion: bool,
    /// Seed for the shared generator; the wall clock when unset.
    pub seed: Option<i64>,
    /// Target time between frames.
    pub frame_interval_ms: u64,
    /// Log file; defaults to the platform cache directory.
    pub log_file: Option<PathBuf>,
    pub assets: AssetSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flake_size: 64.0,
            reduced_motion: false,
            seed: None,
            frame_interval_ms: 16,
            log_file: None,
            assets: AssetSettings::default(),
        }
    }
}

impl Config {
    /// Load the config file (if any), apply environment overrides and
    /// validate.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from the environment, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(REDUCED_MOTION_ENV) {
            self.reduced_motion = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.flake_size.is_finite() && self.flake_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "flake_size must be positive, got {}",
                self.flake_size
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.assets.sources.is_empty() {
            return Err(ConfigError::Invalid(
                "assets.sources must name at least one source".to_string(),
            ));
        }
        Ok(())
    }

    /// Log file to write to: the configured one or `<cache dir>/flurry.log`.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            project_dirs().map(|dirs| dirs.cache_dir().join("flurry.log"))
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "flurry")
}

/// Path of the config file: `$FLURRY_CONFIG` or the platform default.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.flake_size, 64.0);
        assert_eq!(config.frame_interval_ms, 16);
        assert_eq!(config.assets.location, "assets/");
        assert_eq!(config.assets.sources, SourceKind::DEFAULT_ORDER.to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::from_toml_str(
            r#"
            flake_size = 48.0
            reduced_motion = true
            seed = 12345
            frame_interval_ms = 33
            log_file = "/tmp/flurry.log"

            [assets]
            location = "https://example.com/icons/"
            preset = ["a.png", "b.png"]
            sources = ["manifest", "listing"]
            manifest = "icons.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.flake_size, 48.0);
        assert!(config.reduced_motion);
        assert_eq!(config.seed, Some(12345));
        assert_eq!(config.frame_interval_ms, 33);
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/flurry.log")));
        assert_eq!(config.assets.preset, vec!["a.png", "b.png"]);
        assert_eq!(
            config.assets.sources,
            vec![SourceKind::Manifest, SourceKind::Listing]
        );
        assert_eq!(config.assets.manifest, "icons.json");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str("[assets]\npreset = [\"x.png\"]\n").unwrap();
        assert_eq!(config.flake_size, 64.0);
        assert_eq!(config.assets.location, "assets/");
        assert_eq!(config.assets.preset, vec!["x.png"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(
            Config::from_toml_str("flake_sise = 3.0"),
            Err(ConfigError::Parse(_))
        ));
        assert!(Config::from_toml_str("[assets]\nsources = [\"ftp\"]").is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env(|key| (key == REDUCED_MOTION_ENV).then(|| "Yes".to_string()));
        assert!(config.reduced_motion);

        config.apply_env(|key| (key == REDUCED_MOTION_ENV).then(|| "0".to_string()));
        assert!(!config.reduced_motion);

        config.reduced_motion = true;
        config.apply_env(|_| None);
        assert!(config.reduced_motion);
    }

    #[test]
    fn test_validation() {
        let config = Config {
            flake_size: 0.0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config {
            frame_interval_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.assets.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
