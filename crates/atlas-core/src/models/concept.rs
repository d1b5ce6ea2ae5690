//! Concepts: dense clusters of subgraph embeddings within one explanation channel.

use serde::{Deserialize, Serialize};

use super::{DatasetElement, Prototype};
use crate::distance::mean_vector;

/// Display information for an explanation channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
    pub color: String,
}

impl ChannelInfo {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// Two-channel default: negative evidence first, positive second.
    pub fn defaults() -> Vec<ChannelInfo> {
        vec![
            ChannelInfo::new("negative", "skyblue"),
            ChannelInfo::new("positive", "coral"),
        ]
    }

    /// Info for `channel`, or a generic fallback when the table has no entry.
    pub fn lookup(infos: &[ChannelInfo], channel: usize) -> ChannelInfo {
        infos
            .get(channel)
            .cloned()
            .unwrap_or_else(|| ChannelInfo::new(format!("channel {channel}"), "gray"))
    }
}

/// One concept explanation.
///
/// `channel_index` is fixed at construction. `index` is reassigned by the
/// orderer; `prototypes` and `hypothesis` are filled by later stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub index: usize,
    channel_index: usize,
    /// `(dataset_index, channel_index)` per member.
    pub index_tuples: Vec<(usize, usize)>,
    /// Member embeddings for this channel, parallel to `elements`.
    pub embeddings: Vec<Vec<f32>>,
    pub centroid: Vec<f32>,
    /// Mean channel deviation over members.
    pub contribution: f64,
    pub elements: Vec<DatasetElement>,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototypes: Option<Vec<Prototype>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,
}

impl Concept {
    /// Build a concept from its members, keyed by their dataset index, and
    /// their channel embeddings. The centroid is the mean of `embeddings`.
    pub fn from_members(
        index: usize,
        channel_index: usize,
        members: Vec<(usize, DatasetElement)>,
        embeddings: Vec<Vec<f32>>,
        contribution: f64,
        info: &ChannelInfo,
    ) -> Self {
        let (dataset_indices, elements): (Vec<usize>, Vec<DatasetElement>) =
            members.into_iter().unzip();
        let index_tuples = dataset_indices
            .into_iter()
            .map(|key| (key, channel_index))
            .collect();
        let centroid = mean_vector(&embeddings);
        Self {
            index,
            channel_index,
            index_tuples,
            embeddings,
            centroid,
            contribution,
            elements,
            name: info.name.clone(),
            color: info.color.clone(),
            prototypes: None,
            hypothesis: None,
        }
    }

    pub fn channel_index(&self) -> usize {
        self.channel_index
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a prototype, creating the list on first use.
    pub fn push_prototype(&mut self, prototype: Prototype) {
        self.prototypes.get_or_insert_with(Vec::new).push(prototype);
    }

    pub fn prototypes(&self) -> &[Prototype] {
        self.prototypes.as_deref().unwrap_or(&[])
    }

    pub fn has_prototypes(&self) -> bool {
        !self.prototypes().is_empty()
    }
}
