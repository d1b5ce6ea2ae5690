//! # atlas-prototype
//!
//! Per-concept prototype search. Members closest to the concept are shrunk by
//! a genetic search over deletion mutations while the embedding is kept
//! within a radius of the concept centroid.

pub mod fitness;
pub mod genetic;
pub mod mutation;
pub mod optimizer;
pub mod population;

pub use fitness::{EmbeddingDistanceFitness, Evaluation, Fitness};
pub use genetic::{EpochStats, GeneticSearch, SearchOutcome};
pub use mutation::{default_mutations, Mutation, RemoveEdge, RemoveNode};
pub use optimizer::{PrototypeOptimizer, PrototypeOutcome, PrototypeReport};
pub use population::{initial_elements, select_members, PopulationElement};
