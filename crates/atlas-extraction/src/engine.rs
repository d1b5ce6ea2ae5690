//! ConceptExtractor: annotate, then cluster, then order.

use atlas_core::config::ExtractionConfig;
use atlas_core::errors::AtlasResult;
use atlas_core::models::{Concept, Dataset};
use atlas_core::traits::GraphModel;
use atlas_observability::events;
use rayon::prelude::*;
use tracing::info;

use crate::clustering::{build_concepts, cluster_channel, ChannelClusters, ConceptClusterer};
use crate::counter::IndexCounter;
use crate::extractor::annotate_dataset;
use crate::ordering::order_by_similarity;
use crate::HdbscanClusterer;

/// Concept extraction engine.
pub struct ConceptExtractor {
    config: ExtractionConfig,
    clusterer: Box<dyn ConceptClusterer>,
}

impl ConceptExtractor {
    /// Build an extractor backed by HDBSCAN.
    pub fn new(config: ExtractionConfig) -> AtlasResult<Self> {
        let clusterer = HdbscanClusterer::from_config(&config)?;
        Ok(Self::with_clusterer(config, Box::new(clusterer)))
    }

    pub fn with_clusterer(config: ExtractionConfig, clusterer: Box<dyn ConceptClusterer>) -> Self {
        Self { config, clusterer }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Annotate the dataset with model outputs, then cluster and order concepts.
    pub fn extract(&self, model: &dyn GraphModel, dataset: &mut Dataset) -> AtlasResult<Vec<Concept>> {
        annotate_dataset(model, dataset, self.config.dataset_type)?;
        self.cluster(dataset, model.num_channels())
    }

    /// Cluster an already annotated dataset.
    ///
    /// Channels are clustered in parallel; a backend failure skips only that
    /// channel. Concept indices are assigned afterwards in channel order.
    pub fn cluster(&self, dataset: &Dataset, num_channels: usize) -> AtlasResult<Vec<Concept>> {
        if dataset.is_empty() {
            events::concepts_extracted(0, num_channels, 0);
            return Ok(Vec::new());
        }

        let results: Vec<AtlasResult<ChannelClusters>> = (0..num_channels)
            .into_par_iter()
            .map(|channel| {
                cluster_channel(
                    dataset,
                    channel,
                    self.config.fidelity_threshold,
                    self.clusterer.as_ref(),
                )
            })
            .collect();

        let mut channels = Vec::with_capacity(num_channels);
        for (channel, result) in results.into_iter().enumerate() {
            match result {
                Ok(clusters) => channels.push(clusters),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => events::channel_skipped(channel, &e.to_string()),
            }
        }

        let mut counter = IndexCounter::new();
        let mut concepts = build_concepts(
            dataset,
            &channels,
            self.config.dataset_type,
            &self.config.channel_infos,
            &mut counter,
        )?;

        if self.config.sort_similarity {
            concepts = order_by_similarity(concepts, self.clusterer.metric());
            info!(concepts = concepts.len(), "concepts ordered by similarity");
        }

        events::concepts_extracted(concepts.len(), num_channels, dataset.len());
        Ok(concepts)
    }
}
