//! Data model: graph records, datasets, concepts, prototypes.

pub mod concept;
pub mod dataset;
pub mod graph_record;
pub mod matrix;
pub mod prototype;
pub mod task;

pub use concept::{ChannelInfo, Concept};
pub use dataset::{Dataset, DatasetElement};
pub use graph_record::GraphRecord;
pub use matrix::Matrix;
pub use prototype::{Prototype, PrototypeMetadata};
pub use task::{DatasetType, Prediction};
