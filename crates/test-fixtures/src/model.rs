//! Deterministic stand-in for a trained two-channel graph model.

use atlas_core::errors::{AtlasResult, ModelError};
use atlas_core::models::{DatasetType, GraphRecord, Matrix};
use atlas_core::traits::{ForwardOutput, GraphModel};

/// Mock model.
///
/// * embedding of channel `c` = mean node attribute vector (padded or
///   truncated to `dim`) shifted by `c * channel_shift`
/// * fidelity of channel `c` = `graph_labels[c]` (default `1.0`)
/// * node importance = first node attribute, edge importance = edge position
pub struct MockModel {
    dim: usize,
    num_channels: usize,
    dataset_type: DatasetType,
    channel_shift: f32,
}

impl MockModel {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            num_channels: 2,
            dataset_type: DatasetType::Regression,
            channel_shift: 0.0,
        }
    }

    pub fn classification(dim: usize, num_channels: usize) -> Self {
        Self {
            dim,
            num_channels,
            dataset_type: DatasetType::Classification,
            channel_shift: 0.0,
        }
    }

    pub fn with_channel_shift(mut self, shift: f32) -> Self {
        self.channel_shift = shift;
        self
    }

    pub fn with_channels(mut self, num_channels: usize) -> Self {
        self.num_channels = num_channels;
        self
    }

    /// Channel embedding the model produces for `graph`.
    pub fn embed(&self, graph: &GraphRecord, channel: usize) -> Vec<f32> {
        let mut mean = vec![0.0f32; self.dim];
        let n = graph.node_attributes.len();
        if n > 0 {
            for attributes in &graph.node_attributes {
                for (slot, value) in mean.iter_mut().zip(attributes) {
                    *slot += value;
                }
            }
            for slot in &mut mean {
                *slot /= n as f32;
            }
        }
        let shift = channel as f32 * self.channel_shift;
        mean.into_iter().map(|v| v + shift).collect()
    }

    fn fidelity(&self, graph: &GraphRecord, channel: usize) -> f32 {
        graph.graph_labels.get(channel).copied().unwrap_or(1.0)
    }

    fn forward_one(&self, graph: &GraphRecord) -> Result<ForwardOutput, ModelError> {
        let columns: Vec<Vec<f32>> = (0..self.num_channels)
            .map(|c| self.embed(graph, c))
            .collect();
        let mut embedding = Vec::with_capacity(self.dim * self.num_channels);
        for row in 0..self.dim {
            for column in &columns {
                embedding.push(column[row]);
            }
        }
        let graph_embedding = Matrix::new(self.dim, self.num_channels, embedding)?;

        let node_values: Vec<f32> = graph
            .node_attributes
            .iter()
            .flat_map(|a| {
                let v = a.first().copied().unwrap_or(0.0);
                std::iter::repeat(v).take(self.num_channels)
            })
            .collect();
        let node_importance = Matrix::new(graph.num_nodes(), self.num_channels, node_values)?;

        let edge_values: Vec<f32> = (0..graph.num_edges())
            .flat_map(|e| std::iter::repeat(e as f32).take(self.num_channels))
            .collect();
        let edge_importance = Matrix::new(graph.num_edges(), self.num_channels, edge_values)?;

        let graph_output = match self.dataset_type {
            DatasetType::Regression => {
                vec![columns.first().map(|c| c.iter().sum()).unwrap_or(0.0)]
            }
            DatasetType::Classification => (0..self.num_channels)
                .map(|c| self.fidelity(graph, c))
                .collect(),
        };

        Ok(ForwardOutput {
            graph_output,
            graph_embedding,
            node_importance,
            edge_importance,
        })
    }
}

impl GraphModel for MockModel {
    fn forward_graphs(&self, graphs: &[GraphRecord]) -> AtlasResult<Vec<ForwardOutput>> {
        graphs
            .iter()
            .map(|g| self.forward_one(g).map_err(Into::into))
            .collect()
    }

    fn leave_one_out_deviations(&self, graphs: &[GraphRecord]) -> AtlasResult<Vec<Matrix>> {
        graphs
            .iter()
            .map(|graph| -> AtlasResult<Matrix> {
                let matrix = match self.dataset_type {
                    DatasetType::Regression => {
                        let data = (0..self.num_channels)
                            .map(|c| {
                                let f = self.fidelity(graph, c);
                                if c == 0 {
                                    -f
                                } else {
                                    f
                                }
                            })
                            .collect();
                        Matrix::new(1, self.num_channels, data)?
                    }
                    DatasetType::Classification => {
                        let mut m = vec![0.0; self.num_channels * self.num_channels];
                        for c in 0..self.num_channels {
                            m[c * self.num_channels + c] = self.fidelity(graph, c);
                        }
                        Matrix::new(self.num_channels, self.num_channels, m)?
                    }
                };
                Ok(matrix)
            })
            .collect()
    }

    fn num_channels(&self) -> usize {
        self.num_channels
    }
}
