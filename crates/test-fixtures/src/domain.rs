//! JSON graph domain: `{"node_attributes": [[..]], "edge_indices": [[a, b]]}`.

use atlas_core::errors::{AtlasResult, DomainError};
use atlas_core::models::GraphRecord;
use atlas_core::traits::{DomainProcessing, RenderedGraph};
use serde::{Deserialize, Serialize};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Serialize, Deserialize)]
struct JsonGraph {
    node_attributes: Vec<Vec<f32>>,
    edge_indices: Vec<[usize; 2]>,
}

/// Domain layer whose strings are compact JSON graphs. Rendering produces a
/// circular layout and a PNG signature followed by the value bytes.
#[derive(Debug, Default, Clone)]
pub struct JsonGraphProcessing;

impl JsonGraphProcessing {
    pub fn new() -> Self {
        Self
    }

    /// Encode a bare graph as a domain string.
    pub fn encode(node_attributes: &[Vec<f32>], edge_indices: &[[usize; 2]]) -> String {
        serde_json::json!({
            "node_attributes": node_attributes,
            "edge_indices": edge_indices,
        })
        .to_string()
    }
}

impl DomainProcessing for JsonGraphProcessing {
    fn process(&self, value: &str) -> AtlasResult<GraphRecord> {
        let parsed: JsonGraph =
            serde_json::from_str(value).map_err(|e| DomainError::InvalidValue {
                value: value.to_string(),
                reason: e.to_string(),
            })?;
        let n = parsed.node_attributes.len();
        if let Some([a, b]) = parsed.edge_indices.iter().find(|[a, b]| *a >= n || *b >= n) {
            return Err(DomainError::InvalidValue {
                value: value.to_string(),
                reason: format!("edge ({a}, {b}) out of range for {n} nodes"),
            }
            .into());
        }
        Ok(GraphRecord::new(parsed.node_attributes, parsed.edge_indices))
    }

    fn unprocess(&self, graph: &GraphRecord) -> AtlasResult<String> {
        Ok(Self::encode(&graph.node_attributes, &graph.edge_indices))
    }

    fn visualize(
        &self,
        value: &str,
        graph: &GraphRecord,
        width: u32,
        height: u32,
    ) -> AtlasResult<RenderedGraph> {
        if width == 0 || height == 0 {
            return Err(DomainError::RenderFailed {
                reason: format!("invalid canvas {width}x{height}"),
            }
            .into());
        }
        let n = graph.num_nodes().max(1) as f32;
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        let radius = cx.min(cy) * 0.8;
        let node_positions = (0..graph.num_nodes())
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / n;
                [cx + radius * angle.cos(), cy + radius * angle.sin()]
            })
            .collect();

        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(value.as_bytes());
        Ok(RenderedGraph {
            png,
            node_positions,
        })
    }
}
