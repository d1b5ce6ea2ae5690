use crate::errors::AtlasResult;
use crate::models::GraphRecord;

/// A rendered graph visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGraph {
    /// Encoded PNG image.
    pub png: Vec<u8>,
    /// 2D layout coordinate per node.
    pub node_positions: Vec<[f32; 2]>,
}

/// Conversion between domain strings and graph records, plus rendering.
pub trait DomainProcessing: Send + Sync {
    /// Domain string → graph.
    fn process(&self, value: &str) -> AtlasResult<GraphRecord>;

    /// Graph → domain string.
    fn unprocess(&self, graph: &GraphRecord) -> AtlasResult<String>;

    fn visualize(
        &self,
        value: &str,
        graph: &GraphRecord,
        width: u32,
        height: u32,
    ) -> AtlasResult<RenderedGraph>;
}
