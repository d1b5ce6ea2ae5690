use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// How the search is seeded from concept members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialStrategy {
    /// Uniform sample without replacement.
    Random,
    /// Members closest to the centroid (cosine), ascending.
    #[default]
    Centroid,
}

impl fmt::Display for InitialStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::Centroid => "centroid",
        })
    }
}

impl FromStr for InitialStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "centroid" => Ok(Self::Centroid),
            other => Err(ConfigError::UnsupportedValue {
                field: "initial_strategy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Prototype optimization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrototypeConfig {
    /// Concept members taken as seeds (capped by concept size).
    pub initial_population_size: usize,
    pub initial_strategy: InitialStrategy,
    /// Max cosine distance to the centroid before the penalty applies.
    pub violation_radius: f64,
    pub population_size: usize,
    pub num_epochs: usize,
    pub elite_fraction: f64,
    /// Share of each generation re-sampled from the seeds.
    pub refresh_fraction: f64,
    pub tournament_size: usize,
    /// Fitness weight per node.
    pub size_weight: f64,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Directory receiving `prototype_<index>.png`.
    pub output_dir: PathBuf,
}

impl Default for PrototypeConfig {
    fn default() -> Self {
        Self {
            initial_population_size: defaults::DEFAULT_INITIAL_POPULATION_SIZE,
            initial_strategy: InitialStrategy::default(),
            violation_radius: defaults::DEFAULT_VIOLATION_RADIUS,
            population_size: defaults::DEFAULT_POPULATION_SIZE,
            num_epochs: defaults::DEFAULT_NUM_EPOCHS,
            elite_fraction: defaults::DEFAULT_ELITE_FRACTION,
            refresh_fraction: defaults::DEFAULT_REFRESH_FRACTION,
            tournament_size: defaults::DEFAULT_TOURNAMENT_SIZE,
            size_weight: defaults::DEFAULT_SIZE_WEIGHT,
            width: defaults::DEFAULT_IMAGE_WIDTH,
            height: defaults::DEFAULT_IMAGE_HEIGHT,
            seed: None,
            output_dir: PathBuf::from(defaults::DEFAULT_OUTPUT_DIR),
        }
    }
}
