use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::distance::DistanceMetric;
use crate::errors::ConfigError;
use crate::models::{ChannelInfo, DatasetType};

/// How HDBSCAN picks flat clusters from the condensed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSelection {
    /// Excess of mass.
    #[default]
    Eom,
    /// Leaves of the condensed tree.
    Leaf,
}

impl fmt::Display for ClusterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eom => "eom",
            Self::Leaf => "leaf",
        })
    }
}

impl FromStr for ClusterSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eom" => Ok(Self::Eom),
            "leaf" => Ok(Self::Leaf),
            other => Err(ConfigError::UnsupportedValue {
                field: "cluster_selection".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Concept extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub dataset_type: DatasetType,
    /// Members need channel fidelity strictly above this value.
    pub fidelity_threshold: f64,
    /// HDBSCAN `min_samples`; larger is more conservative.
    pub min_samples: usize,
    /// Smallest concept that may be emitted.
    pub min_cluster_size: usize,
    pub cluster_metric: DistanceMetric,
    pub cluster_selection: ClusterSelection,
    /// Chain concepts of a channel by nearest centroid.
    pub sort_similarity: bool,
    pub channel_infos: Vec<ChannelInfo>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dataset_type: DatasetType::default(),
            fidelity_threshold: defaults::DEFAULT_FIDELITY_THRESHOLD,
            min_samples: defaults::DEFAULT_MIN_SAMPLES,
            min_cluster_size: defaults::DEFAULT_MIN_CLUSTER_SIZE,
            cluster_metric: DistanceMetric::default(),
            cluster_selection: ClusterSelection::default(),
            sort_similarity: defaults::DEFAULT_SORT_SIMILARITY,
            channel_infos: ChannelInfo::defaults(),
        }
    }
}
