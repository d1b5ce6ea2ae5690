//! Layered configuration: defaults → TOML file → environment → validation.

pub mod defaults;
pub mod extraction_config;
pub mod hypothesis_config;
pub mod observability_config;
pub mod prototype_config;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use extraction_config::{ClusterSelection, ExtractionConfig};
pub use hypothesis_config::HypothesisConfig;
pub use observability_config::ObservabilityConfig;
pub use prototype_config::{InitialStrategy, PrototypeConfig};

use crate::constants::ENV_PREFIX;
use crate::errors::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub extraction: ExtractionConfig,
    pub prototype: PrototypeConfig,
    pub hypothesis: HypothesisConfig,
    pub observability: ObservabilityConfig,
}

impl AtlasConfig {
    /// Load configuration, layering an optional TOML file and the process
    /// environment over the defaults, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `ATLAS_*` overrides. `lookup` resolves a variable name, which keeps
    /// this testable without touching the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(key) = var("OPENAI_API_KEY") {
            self.hypothesis.api_key = Some(key);
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(dir) = var("OUTPUT_DIR") {
            self.prototype.output_dir = PathBuf::from(dir);
        }
        if let Some(seed) = var("SEED") {
            let parsed = seed.parse().map_err(|_| ConfigError::UnsupportedValue {
                field: "prototype.seed".to_string(),
                value: seed.clone(),
            })?;
            self.prototype.seed = Some(parsed);
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ex = &self.extraction;
        if ex.min_cluster_size < 2 {
            return Err(invalid("extraction.min_cluster_size", "must be at least 2"));
        }
        if ex.min_samples < 1 {
            return Err(invalid("extraction.min_samples", "must be at least 1"));
        }
        if ex.cluster_selection == ClusterSelection::Leaf {
            return Err(ConfigError::UnsupportedValue {
                field: "extraction.cluster_selection".to_string(),
                value: ex.cluster_selection.to_string(),
            });
        }
        if !ex.fidelity_threshold.is_finite() {
            return Err(invalid("extraction.fidelity_threshold", "must be finite"));
        }

        let pr = &self.prototype;
        if pr.initial_population_size < 1 {
            return Err(invalid("prototype.initial_population_size", "must be at least 1"));
        }
        if pr.population_size < 1 {
            return Err(invalid("prototype.population_size", "must be at least 1"));
        }
        if pr.num_epochs < 1 {
            return Err(invalid("prototype.num_epochs", "must be at least 1"));
        }
        if pr.tournament_size < 1 {
            return Err(invalid("prototype.tournament_size", "must be at least 1"));
        }
        if pr.violation_radius.is_nan() || pr.violation_radius < 0.0 {
            return Err(invalid("prototype.violation_radius", "must be non-negative"));
        }
        for (field, value) in [
            ("prototype.elite_fraction", pr.elite_fraction),
            ("prototype.refresh_fraction", pr.refresh_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        if pr.elite_fraction + pr.refresh_fraction > 1.0 {
            return Err(invalid(
                "prototype.refresh_fraction",
                "elite and refresh fractions must sum to at most 1.0",
            ));
        }
        if pr.size_weight.is_nan() || pr.size_weight < 0.0 {
            return Err(invalid("prototype.size_weight", "must be non-negative"));
        }
        if pr.width == 0 || pr.height == 0 {
            return Err(invalid("prototype.width", "image dimensions must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
