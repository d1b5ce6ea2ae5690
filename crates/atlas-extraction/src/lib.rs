//! # atlas-extraction
//!
//! Concept extraction pipeline: annotate → cluster (HDBSCAN per channel) → order.
//! Concepts are dense clusters of channel embeddings among elements whose
//! explanations pass the fidelity threshold.

pub mod clustering;
pub mod counter;
pub mod engine;
pub mod extractor;
pub mod ordering;

pub use clustering::{ConceptClusterer, HdbscanClusterer};
pub use counter::IndexCounter;
pub use engine::ConceptExtractor;
pub use extractor::{annotate_dataset, refresh_graph};
pub use ordering::order_by_similarity;
