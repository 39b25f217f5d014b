//! Scoring configuration.
//!
//! Selects the barrel wood scoring algorithm and the ageing threshold used by
//! the best-recipe search. Loaded from `brewery.toml`, falling back to
//! defaults when the file is missing or invalid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "brewery.toml";

/// How a wrong barrel wood is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialAlgorithm {
    /// Wood distance times recipe difficulty.
    #[default]
    Legacy,
    /// Nonlinear curve over wood distance, scaled by difficulty.
    Curve,
}

/// Parameters of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Wood scoring algorithm
    pub material_algorithm: MaterialAlgorithm,
    /// Brews aged longer than this are scored on age and wood even if the
    /// recipe does not need ageing
    pub age_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            material_algorithm: MaterialAlgorithm::Legacy,
            age_threshold: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Load configuration from `brewery.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Scoring config not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read scoring config: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded scoring config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse scoring config: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved scoring config to {}", path.display());
        Ok(())
    }

    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        if !self.age_threshold.is_finite() {
            warn!("age_threshold is not a number, resetting to default");
            self.age_threshold = Self::default().age_threshold;
        }
        self.age_threshold = self.age_threshold.clamp(0.0, 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.material_algorithm, MaterialAlgorithm::Legacy);
        assert_eq!(config.age_threshold, 0.5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScoringConfig {
            age_threshold: -3.0,
            ..ScoringConfig::default()
        };
        config.validate();
        assert_eq!(config.age_threshold, 0.0);

        config.age_threshold = f32::NAN;
        config.validate();
        assert_eq!(config.age_threshold, 0.5);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let config = ScoringConfig {
            material_algorithm: MaterialAlgorithm::Curve,
            age_threshold: 1.5,
        };
        config.save_to(&path).expect("save config");

        let loaded = ScoringConfig::load_from(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_without_local_file() {
        assert!(!Path::new(CONFIG_FILE).exists());
        assert_eq!(ScoringConfig::load(), ScoringConfig::default());
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = ScoringConfig::load_from("/nonexistent/path/brewery.toml");
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_config_partial_and_invalid_files() {
        let temp_dir = TempDir::new().expect("create temp dir");

        let partial = temp_dir.path().join("partial.toml");
        fs::write(&partial, "material_algorithm = \"curve\"\n").expect("write config");
        let config = ScoringConfig::load_from(&partial);
        assert_eq!(config.material_algorithm, MaterialAlgorithm::Curve);
        assert_eq!(config.age_threshold, 0.5);

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "material_algorithm = 7").expect("write config");
        assert_eq!(ScoringConfig::load_from(&broken), ScoringConfig::default());
    }
}
