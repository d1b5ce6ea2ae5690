use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::GraphRecord;

/// Graph and domain string of a prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeMetadata {
    pub graph: GraphRecord,
    pub repr: String,
}

/// Minimal example graph synthesized for one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    pub image_path: PathBuf,
    pub node_positions: Vec<[f32; 2]>,
    pub metadata: PrototypeMetadata,
}

impl Prototype {
    pub fn graph(&self) -> &GraphRecord {
        &self.metadata.graph
    }

    pub fn repr(&self) -> &str {
        &self.metadata.repr
    }
}
