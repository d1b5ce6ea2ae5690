use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Prediction task of the model. Drives how prediction, fidelity and
/// contribution are derived from raw outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    #[default]
    Regression,
    Classification,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regression => "regression",
            Self::Classification => "classification",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regression" => Ok(Self::Regression),
            "classification" => Ok(Self::Classification),
            other => Err(ConfigError::UnsupportedValue {
                field: "dataset_type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Model prediction derived from the raw output vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Prediction {
    /// First output entry.
    Regression(f64),
    /// Index of the largest output entry.
    Classification(usize),
}

impl Prediction {
    /// Derive a prediction from a raw output vector. `None` for an empty output.
    pub fn from_output(output: &[f32], dataset_type: DatasetType) -> Option<Self> {
        let first = *output.first()?;
        Some(match dataset_type {
            DatasetType::Regression => Self::Regression(first as f64),
            DatasetType::Classification => {
                let (argmax, _) = output.iter().enumerate().fold(
                    (0usize, f32::NEG_INFINITY),
                    |(best_i, best_v), (i, &v)| if v > best_v { (i, v) } else { (best_i, best_v) },
                );
                Self::Classification(argmax)
            }
        })
    }

    pub fn value(&self) -> f64 {
        match self {
            Self::Regression(v) => *v,
            Self::Classification(c) => *c as f64,
        }
    }
}
