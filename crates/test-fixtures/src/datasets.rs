//! Synthetic datasets.

use atlas_core::models::{Dataset, DatasetElement, GraphRecord};

use crate::domain::JsonGraphProcessing;

/// Path graph `0 - 1 - ... - n-1` with the given node attributes.
pub fn chain_graph(node_attributes: Vec<Vec<f32>>) -> GraphRecord {
    let edges = (1..node_attributes.len()).map(|i| [i - 1, i]).collect();
    GraphRecord::new(node_attributes, edges)
}

/// Star graph: node 0 connected to every other node.
pub fn star_graph(node_attributes: Vec<Vec<f32>>) -> GraphRecord {
    let edges = (1..node_attributes.len()).map(|i| [0, i]).collect();
    GraphRecord::new(node_attributes, edges)
}

/// One blob of elements around `center`.
#[derive(Debug, Clone)]
pub struct BlobSpec {
    pub center: Vec<f32>,
    pub count: usize,
    /// Fidelity of each channel, stored as the graph labels.
    pub fidelity: Vec<f32>,
}

impl BlobSpec {
    pub fn new(center: Vec<f32>, count: usize) -> Self {
        Self {
            center,
            count,
            fidelity: vec![1.0, 1.0],
        }
    }

    pub fn with_fidelity(mut self, fidelity: Vec<f32>) -> Self {
        self.fidelity = fidelity;
        self
    }
}

/// Dataset of three-node chains whose mean attributes sit close to each
/// blob's center. Indices are consecutive from 0 in blob order.
pub fn blob_dataset(blobs: &[BlobSpec]) -> Dataset {
    let mut dataset = Dataset::new();
    let mut index = 0;
    for blob in blobs {
        for i in 0..blob.count {
            let jitter = 0.01 * i as f32;
            let attributes: Vec<Vec<f32>> = (0..3)
                .map(|_| blob.center.iter().map(|c| c + jitter).collect())
                .collect();
            let mut graph = chain_graph(attributes);
            graph.graph_labels = blob.fidelity.clone();
            let value = JsonGraphProcessing::encode(&graph.node_attributes, &graph.edge_indices);
            dataset.insert(index, DatasetElement::new(index, value, graph));
            index += 1;
        }
    }
    dataset
}
