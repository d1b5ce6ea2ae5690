//! PrototypeOptimizer: seeds, runs, and materializes the search for each concept.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use atlas_core::config::PrototypeConfig;
use atlas_core::constants::prototype_image_name;
use atlas_core::errors::{AtlasError, AtlasResult};
use atlas_core::models::{Concept, DatasetType, Prototype, PrototypeMetadata};
use atlas_core::traits::{DomainProcessing, GraphModel};
use atlas_extraction::refresh_graph;
use atlas_observability::events;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::fitness::EmbeddingDistanceFitness;
use crate::genetic::{EpochStats, GeneticSearch};
use crate::mutation::{default_mutations, Mutation};
use crate::population::initial_elements;

/// Summary of one finished prototype search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrototypeReport {
    pub concept_index: usize,
    pub node_count: usize,
    pub distance: f64,
    pub fitness: f64,
    /// Whether the final distance is within the violation radius.
    pub within_radius: bool,
    pub image_path: PathBuf,
    pub history: Vec<EpochStats>,
}

/// Per-concept result of [`PrototypeOptimizer::optimize_all`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrototypeOutcome {
    Generated(PrototypeReport),
    Failed { concept_index: usize, reason: String },
}

impl PrototypeOutcome {
    pub fn concept_index(&self) -> usize {
        match self {
            Self::Generated(report) => report.concept_index,
            Self::Failed { concept_index, .. } => *concept_index,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Prototype optimizer.
pub struct PrototypeOptimizer {
    config: PrototypeConfig,
    dataset_type: DatasetType,
    model: Arc<dyn GraphModel>,
    domain: Arc<dyn DomainProcessing>,
    mutations: Vec<Box<dyn Mutation>>,
}

impl PrototypeOptimizer {
    /// Optimizer using the built-in deletion operators.
    pub fn new(
        config: PrototypeConfig,
        dataset_type: DatasetType,
        model: Arc<dyn GraphModel>,
        domain: Arc<dyn DomainProcessing>,
    ) -> Self {
        let mutations = default_mutations(Arc::clone(&domain));
        Self {
            config,
            dataset_type,
            model,
            domain,
            mutations,
        }
    }

    /// Replace the mutation operators. Order matters for reproducibility.
    pub fn with_mutations(mut self, mutations: Vec<Box<dyn Mutation>>) -> Self {
        self.mutations = mutations;
        self
    }

    pub fn config(&self) -> &PrototypeConfig {
        &self.config
    }

    /// Run every concept with one RNG seeded from the configuration.
    /// A failing concept is logged and reported; the rest still run.
    pub fn optimize_all(&self, concepts: &mut [Concept]) -> Vec<PrototypeOutcome> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        concepts
            .iter_mut()
            .map(|concept| match self.optimize(concept, &mut rng) {
                Ok(report) => PrototypeOutcome::Generated(report),
                Err(e) => {
                    events::prototype_failed(concept.index, &e.to_string());
                    PrototypeOutcome::Failed {
                        concept_index: concept.index,
                        reason: e.to_string(),
                    }
                }
            })
            .collect()
    }

    /// Search a prototype for `concept`, render it, and append it to the
    /// concept's prototypes.
    pub fn optimize(&self, concept: &mut Concept, rng: &mut dyn RngCore) -> AtlasResult<PrototypeReport> {
        let initial = initial_elements(
            concept,
            self.config.initial_population_size,
            self.config.initial_strategy,
            rng,
        )?;
        info!(
            concept = concept.index,
            channel = concept.channel_index(),
            members = concept.len(),
            initial = initial.len(),
            strategy = %self.config.initial_strategy,
            "optimizing prototype"
        );

        let fitness = EmbeddingDistanceFitness::new(
            self.model.as_ref(),
            concept.channel_index(),
            vec![concept.centroid.clone()],
            self.config.violation_radius,
            self.config.size_weight,
        );
        let outcome =
            GeneticSearch::from_config(&self.config).run(&initial, &self.mutations, &fitness, rng)?;

        let mut graph = outcome.best.graph;
        let value = outcome.best.value;
        refresh_graph(self.model.as_ref(), &mut graph, self.dataset_type)?;

        let rendered = self
            .domain
            .visualize(&value, &graph, self.config.width, self.config.height)?;
        let image_path = write_image(&self.config.output_dir, concept.index, &rendered.png)?;
        graph.node_positions = Some(rendered.node_positions.clone());

        let report = PrototypeReport {
            concept_index: concept.index,
            node_count: graph.num_nodes(),
            distance: outcome.evaluation.distance,
            fitness: outcome.evaluation.fitness,
            within_radius: outcome.evaluation.distance <= self.config.violation_radius,
            image_path: image_path.clone(),
            history: outcome.history,
        };
        concept.push_prototype(Prototype {
            image_path,
            node_positions: rendered.node_positions,
            metadata: PrototypeMetadata { graph, repr: value },
        });

        events::prototype_generated(
            report.concept_index,
            report.node_count,
            report.distance,
            report.within_radius,
        );
        Ok(report)
    }
}

fn write_image(output_dir: &Path, concept_index: usize, png: &[u8]) -> AtlasResult<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| io_error(output_dir, e))?;
    let path = output_dir.join(prototype_image_name(concept_index));
    fs::write(&path, png).map_err(|e| io_error(&path, e))?;
    Ok(path)
}

fn io_error(path: &Path, e: std::io::Error) -> AtlasError {
    AtlasError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
