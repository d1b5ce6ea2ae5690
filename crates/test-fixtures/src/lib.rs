//! Shared test doubles and datasets for the Atlas crates.
//!
//! Provides a deterministic mock model, a JSON graph domain, synthetic blob
//! datasets, a scripted language model, and loaders for the JSON fixtures
//! under `data/`.

pub mod datasets;
pub mod domain;
pub mod language_model;
pub mod model;

use std::path::PathBuf;

use serde::de::DeserializeOwned;

pub use datasets::{blob_dataset, chain_graph, star_graph, BlobSpec};
pub use domain::JsonGraphProcessing;
pub use language_model::{ScriptedLanguageModel, ScriptedReply};
pub use model::MockModel;

/// Directory holding the JSON fixtures.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Absolute path of a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Domain strings of the small molecule-like graphs in `data/graphs.json`.
pub fn fixture_graph_values() -> Vec<String> {
    let values: Vec<serde_json::Value> = load_fixture("graphs.json");
    values.iter().map(|v| v.to_string()).collect()
}
