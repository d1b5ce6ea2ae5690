use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::GraphRecord;

/// One dataset entry: its domain-string value and its graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetElement {
    pub index: usize,
    /// Domain representation, e.g. a SMILES string.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    pub graph: GraphRecord,
}

impl DatasetElement {
    pub fn new(index: usize, value: impl Into<String>, graph: GraphRecord) -> Self {
        Self {
            index,
            value: value.into(),
            image_path: None,
            graph,
        }
    }
}

/// Dataset index → element. Ordered so every pass visits elements identically.
pub type Dataset = BTreeMap<usize, DatasetElement>;
