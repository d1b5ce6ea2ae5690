//! Graph record: topology plus the model annotations attached during extraction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{DatasetType, Matrix, Prediction};
use crate::errors::ModelError;
use crate::traits::ForwardOutput;

/// One graph of the dataset.
///
/// Topology is always present. The `Option` fields are filled by
/// [`GraphRecord::apply_forward`] and [`GraphRecord::apply_deviation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub node_indices: Vec<usize>,
    pub node_attributes: Vec<Vec<f32>>,
    pub edge_indices: Vec<[usize; 2]>,
    #[serde(default)]
    pub edge_attributes: Vec<Vec<f32>>,
    #[serde(default)]
    pub graph_labels: Vec<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_output: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_prediction: Option<Prediction>,
    /// `embedding_dim × num_channels`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_embeddings: Option<Matrix>,
    /// `num_nodes × num_channels`, normalized to `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_importances: Option<Matrix>,
    /// `num_edges × num_channels`, normalized to `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_importances: Option<Matrix>,
    /// `num_outputs × num_channels`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_deviation: Option<Matrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_fidelity: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_positions: Option<Vec<[f32; 2]>>,
}

impl GraphRecord {
    /// Build a bare graph from node attributes and edges. Edge attributes
    /// default to a single `1.0` per edge.
    pub fn new(node_attributes: Vec<Vec<f32>>, edge_indices: Vec<[usize; 2]>) -> Self {
        let edge_attributes = vec![vec![1.0]; edge_indices.len()];
        Self {
            node_indices: (0..node_attributes.len()).collect(),
            node_attributes,
            edge_indices,
            edge_attributes,
            ..Default::default()
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.node_indices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_indices.len()
    }

    /// Number of distinct neighbours of `node`. An undirected edge may be
    /// stored once or once per direction; both count as one neighbour.
    pub fn degree(&self, node: usize) -> usize {
        let neighbours: BTreeSet<usize> = self
            .edge_indices
            .iter()
            .filter_map(|&[a, b]| match (a == node, b == node) {
                (true, false) => Some(b),
                (false, true) => Some(a),
                _ => None,
            })
            .collect();
        neighbours.len()
    }

    /// Embedding column of one explanation channel.
    pub fn embedding(&self, channel: usize) -> Option<Vec<f32>> {
        self.graph_embeddings.as_ref()?.column(channel)
    }

    pub fn fidelity(&self, channel: usize) -> Option<f64> {
        self.graph_fidelity.as_ref()?.get(channel).copied()
    }

    /// Attach the outputs of one forward pass: raw output, prediction,
    /// embeddings, and normalized importance masks.
    pub fn apply_forward(
        &mut self,
        output: &ForwardOutput,
        dataset_type: DatasetType,
    ) -> Result<(), ModelError> {
        let prediction = Prediction::from_output(&output.graph_output, dataset_type).ok_or(
            ModelError::ForwardFailed {
                reason: "empty graph output".to_string(),
            },
        )?;
        self.graph_output = Some(output.graph_output.clone());
        self.graph_prediction = Some(prediction);
        self.graph_embeddings = Some(output.graph_embedding.clone());
        self.node_importances = Some(output.node_importance.normalized());
        self.edge_importances = Some(output.edge_importance.normalized());
        Ok(())
    }

    /// Attach the leave-one-out deviation matrix and derive per-channel fidelity.
    ///
    /// Regression: `[-dev[0,0], +dev[0,1]]`. Classification: diagonal of `dev`.
    pub fn apply_deviation(
        &mut self,
        deviation: Matrix,
        dataset_type: DatasetType,
    ) -> Result<(), ModelError> {
        let fidelity = match dataset_type {
            DatasetType::Regression => vec![
                -(deviation.at(0, 0)? as f64),
                deviation.at(0, 1)? as f64,
            ],
            DatasetType::Classification => {
                deviation.diagonal().into_iter().map(f64::from).collect()
            }
        };
        self.graph_fidelity = Some(fidelity);
        self.graph_deviation = Some(deviation);
        Ok(())
    }

    /// Deviation entry used as the channel's contribution:
    /// `dev[0, channel]` for regression, `dev[channel, channel]` for classification.
    pub fn contribution(&self, channel: usize, dataset_type: DatasetType) -> Option<f64> {
        let deviation = self.graph_deviation.as_ref()?;
        let row = match dataset_type {
            DatasetType::Regression => 0,
            DatasetType::Classification => channel,
        };
        deviation.get(row, channel).map(f64::from)
    }

    /// Drop importance masks. They go stale as soon as the topology is mutated.
    pub fn strip_importances(&mut self) {
        self.node_importances = None;
        self.edge_importances = None;
    }
}
