//! Concept clustering per channel: fidelity filter, density clustering, and concept assembly.
//!
//! Noise labels (< 0) are discarded. Labels are visited in ascending order so
//! that concept numbering is deterministic.

pub mod hdbscan_backend;

use std::collections::BTreeMap;

use atlas_core::distance::DistanceMetric;
use atlas_core::errors::{AtlasResult, ClusteringError, ModelError};
use atlas_core::models::{ChannelInfo, Concept, Dataset, DatasetType};
use atlas_observability::events;
use tracing::info;

use crate::counter::IndexCounter;

pub use hdbscan_backend::HdbscanClusterer;

/// Pluggable density-based clustering backend.
///
/// Must be deterministic for a fixed row order. Returns one label per row;
/// negative labels mark noise.
pub trait ConceptClusterer: Send + Sync {
    fn fit_predict(&self, rows: &[Vec<f32>]) -> Result<Vec<i32>, ClusteringError>;

    /// Metric used for density estimates; the orderer reuses it.
    fn metric(&self) -> DistanceMetric;

    fn name(&self) -> &str;
}

/// One non-noise cluster of a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroup {
    pub label: i32,
    /// Dataset indices of the members.
    pub members: Vec<usize>,
    /// Channel embeddings, parallel to `members`.
    pub embeddings: Vec<Vec<f32>>,
}

/// Clustering result for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelClusters {
    pub channel: usize,
    pub groups: Vec<ClusterGroup>,
}

impl ChannelClusters {
    fn empty(channel: usize) -> Self {
        Self {
            channel,
            groups: Vec::new(),
        }
    }
}

/// Dataset indices whose fidelity on `channel` is strictly above `threshold`.
pub fn filter_by_fidelity(
    dataset: &Dataset,
    channel: usize,
    threshold: f64,
) -> Result<Vec<usize>, ModelError> {
    let mut indices = Vec::new();
    for (&index, element) in dataset {
        let fidelity =
            element
                .graph
                .fidelity(channel)
                .ok_or_else(|| ModelError::MissingAnnotation {
                    index,
                    field: "graph_fidelity".to_string(),
                })?;
        if fidelity > threshold {
            indices.push(index);
        }
    }
    Ok(indices)
}

/// Filter and cluster one channel.
pub fn cluster_channel(
    dataset: &Dataset,
    channel: usize,
    fidelity_threshold: f64,
    clusterer: &dyn ConceptClusterer,
) -> AtlasResult<ChannelClusters> {
    let indices = filter_by_fidelity(dataset, channel, fidelity_threshold)?;
    if indices.is_empty() {
        events::channel_skipped(channel, "no elements above fidelity threshold");
        return Ok(ChannelClusters::empty(channel));
    }

    let mut rows = Vec::with_capacity(indices.len());
    for &index in &indices {
        let embedding = dataset
            .get(&index)
            .and_then(|e| e.graph.embedding(channel))
            .ok_or_else(|| ModelError::MissingAnnotation {
                index,
                field: "graph_embeddings".to_string(),
            })?;
        rows.push(embedding);
    }

    let labels = clusterer.fit_predict(&rows)?;
    if labels.len() != rows.len() {
        return Err(ClusteringError::LabelCountMismatch {
            expected: rows.len(),
            actual: labels.len(),
        }
        .into());
    }

    let mut grouped: BTreeMap<i32, ClusterGroup> = BTreeMap::new();
    let mut noise = 0;
    for ((index, row), label) in indices.iter().zip(rows).zip(labels) {
        if label < 0 {
            noise += 1;
            continue;
        }
        let group = grouped.entry(label).or_insert_with(|| ClusterGroup {
            label,
            members: Vec::new(),
            embeddings: Vec::new(),
        });
        group.members.push(*index);
        group.embeddings.push(row);
    }

    let groups: Vec<ClusterGroup> = grouped.into_values().collect();
    info!(
        channel,
        clusters = groups.len(),
        embeddings = indices.len(),
        noise,
        backend = clusterer.name(),
        "channel clustered"
    );

    Ok(ChannelClusters { channel, groups })
}

/// Turn per-channel clusters into concepts, numbering them with `counter`
/// in channel-then-cluster order.
pub fn build_concepts(
    dataset: &Dataset,
    channels: &[ChannelClusters],
    dataset_type: DatasetType,
    channel_infos: &[ChannelInfo],
    counter: &mut IndexCounter,
) -> AtlasResult<Vec<Concept>> {
    let mut concepts = Vec::new();
    for channel_clusters in channels {
        let channel = channel_clusters.channel;
        let info = ChannelInfo::lookup(channel_infos, channel);

        for group in &channel_clusters.groups {
            let mut members = Vec::with_capacity(group.members.len());
            let mut contribution_sum = 0.0;
            for &index in &group.members {
                let element = dataset.get(&index).ok_or_else(|| ModelError::MissingAnnotation {
                    index,
                    field: "dataset element".to_string(),
                })?;
                contribution_sum += element
                    .graph
                    .contribution(channel, dataset_type)
                    .ok_or_else(|| ModelError::MissingAnnotation {
                        index,
                        field: "graph_deviation".to_string(),
                    })?;
                members.push((index, element.clone()));
            }
            let contribution = contribution_sum / group.members.len() as f64;

            let concept = Concept::from_members(
                counter.next_index(),
                channel,
                members,
                group.embeddings.clone(),
                contribution,
                &info,
            );
            info!(
                concept = concept.index,
                channel,
                members = concept.len(),
                "concept created"
            );
            concepts.push(concept);
        }
    }
    Ok(concepts)
}
