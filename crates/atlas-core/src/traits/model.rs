use crate::errors::AtlasResult;
use crate::models::{GraphRecord, Matrix};

/// Per-graph result of one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardOutput {
    /// Raw output vector (one entry per regression target or class).
    pub graph_output: Vec<f32>,
    /// `embedding_dim × num_channels`.
    pub graph_embedding: Matrix,
    /// `num_nodes × num_channels`, unnormalized.
    pub node_importance: Matrix,
    /// `num_edges × num_channels`, unnormalized.
    pub edge_importance: Matrix,
}

/// Trained multi-channel explanation model, used as a black box.
pub trait GraphModel: Send + Sync {
    /// Run the model over a batch. Returns one output per input graph, in order.
    fn forward_graphs(&self, graphs: &[GraphRecord]) -> AtlasResult<Vec<ForwardOutput>>;

    /// Leave-one-channel-out deviation matrices (`num_outputs × num_channels`), one per graph.
    fn leave_one_out_deviations(&self, graphs: &[GraphRecord]) -> AtlasResult<Vec<Matrix>>;

    /// Number of explanation channels.
    fn num_channels(&self) -> usize;
}
