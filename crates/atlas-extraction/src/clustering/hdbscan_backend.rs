//! HDBSCAN backend for concept clustering.

use atlas_core::config::{ClusterSelection, ExtractionConfig};
use atlas_core::distance::DistanceMetric;
use atlas_core::errors::{ClusteringError, ConfigError};
use hdbscan::{Hdbscan, HdbscanHyperParams};

use super::ConceptClusterer;

/// HDBSCAN with excess-of-mass cluster selection.
#[derive(Debug, Clone)]
pub struct HdbscanClusterer {
    min_samples: usize,
    min_cluster_size: usize,
    metric: DistanceMetric,
}

impl HdbscanClusterer {
    /// Fails for settings the backend cannot honour (cosine metric, leaf selection).
    pub fn new(
        min_samples: usize,
        min_cluster_size: usize,
        metric: DistanceMetric,
        selection: ClusterSelection,
    ) -> Result<Self, ConfigError> {
        if metric == DistanceMetric::Cosine {
            return Err(ConfigError::UnsupportedValue {
                field: "extraction.cluster_metric".to_string(),
                value: metric.to_string(),
            });
        }
        if selection != ClusterSelection::Eom {
            return Err(ConfigError::UnsupportedValue {
                field: "extraction.cluster_selection".to_string(),
                value: selection.to_string(),
            });
        }
        Ok(Self {
            min_samples,
            min_cluster_size,
            metric,
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.min_samples,
            config.min_cluster_size,
            config.cluster_metric,
            config.cluster_selection,
        )
    }

    fn backend_metric(&self) -> hdbscan::DistanceMetric {
        match self.metric {
            DistanceMetric::Euclidean => hdbscan::DistanceMetric::Euclidean,
            // Cosine is rejected in `new`.
            DistanceMetric::Manhattan | DistanceMetric::Cosine => {
                hdbscan::DistanceMetric::Manhattan
            }
        }
    }
}

impl ConceptClusterer for HdbscanClusterer {
    fn fit_predict(&self, rows: &[Vec<f32>]) -> Result<Vec<i32>, ClusteringError> {
        // Too few rows to form a single cluster: everything is noise.
        if rows.len() < self.min_cluster_size.max(self.min_samples + 1) {
            return Ok(vec![-1; rows.len()]);
        }

        let dim = rows[0].len();
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(ClusteringError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }
        if let Some(row) = rows.iter().position(|r| r.iter().any(|v| !v.is_finite())) {
            return Err(ClusteringError::NonFinite { row });
        }

        let hyper_params = HdbscanHyperParams::builder()
            .min_cluster_size(self.min_cluster_size)
            .min_samples(self.min_samples)
            .dist_metric(self.backend_metric())
            .build();

        let data: Vec<Vec<f32>> = rows.to_vec();
        let clusterer = Hdbscan::new(&data, hyper_params);
        clusterer
            .cluster()
            .map_err(|e| ClusteringError::BackendFailed {
                reason: format!("{e:?}"),
            })
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn name(&self) -> &str {
        "hdbscan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusterer(min_cluster_size: usize) -> HdbscanClusterer {
        HdbscanClusterer::new(
            1,
            min_cluster_size,
            DistanceMetric::Manhattan,
            ClusterSelection::Eom,
        )
        .unwrap()
    }

    #[test]
    fn too_few_rows_are_all_noise() {
        let labels = clusterer(3).fit_predict(&[vec![1.0], vec![1.1]]).unwrap();
        assert_eq!(labels, vec![-1, -1]);
    }

    #[test]
    fn separated_blobs_get_distinct_labels() {
        let rows = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.0],
            vec![10.0, 10.1],
            vec![10.1, 10.1],
        ];
        let labels = clusterer(3).fit_predict(&rows).unwrap();
        assert_eq!(labels.len(), 8);
        assert!(labels[0] >= 0 && labels[4] >= 0);
        assert!(labels[..4].iter().all(|&l| l == labels[0]));
        assert!(labels[4..].iter().all(|&l| l == labels[4]));
        assert_ne!(labels[0], labels[4]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![0.0, 0.0], vec![1.0], vec![0.5, 0.5]];
        assert!(matches!(
            clusterer(2).fit_predict(&rows),
            Err(ClusteringError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn nan_row_is_rejected() {
        let mut rows: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32 * 0.1, 0.0]).collect();
        rows.push(vec![f32::NAN, 0.0]);
        assert!(matches!(
            clusterer(3).fit_predict(&rows),
            Err(ClusteringError::NonFinite { row: 8 })
        ));
    }

    #[test]
    fn unsupported_settings_are_config_errors() {
        assert!(HdbscanClusterer::new(1, 2, DistanceMetric::Cosine, ClusterSelection::Eom).is_err());
        assert!(HdbscanClusterer::new(1, 2, DistanceMetric::Manhattan, ClusterSelection::Leaf).is_err());
    }
}
