//! Population elements and initial-population selection.

use std::cmp::Ordering;

use atlas_core::config::InitialStrategy;
use atlas_core::distance::cosine_distance;
use atlas_core::errors::PrototypeError;
use atlas_core::models::{Concept, DatasetElement, GraphRecord};
use rand::seq::index;
use rand::RngCore;

/// A candidate of the search: domain string plus the graph derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationElement {
    pub value: String,
    pub graph: GraphRecord,
}

impl PopulationElement {
    pub fn new(value: impl Into<String>, graph: GraphRecord) -> Self {
        Self {
            value: value.into(),
            graph,
        }
    }

    /// Copy a dataset element, dropping its importance masks.
    pub fn from_dataset_element(element: &DatasetElement) -> Self {
        let mut graph = element.graph.clone();
        graph.strip_importances();
        Self::new(element.value.clone(), graph)
    }

    pub fn node_count(&self) -> usize {
        self.graph.num_nodes()
    }
}

/// Positions (into `concept.elements`) of the members that seed the search.
///
/// Picks `min(count, |members|)` members. `Centroid` returns them by ascending
/// cosine distance to the centroid, keeping member order on ties.
pub fn select_members(
    concept: &Concept,
    count: usize,
    strategy: InitialStrategy,
    rng: &mut dyn RngCore,
) -> Vec<usize> {
    let available = concept.len().min(concept.embeddings.len());
    let count = count.min(available);
    match strategy {
        InitialStrategy::Random => index::sample(rng, available, count).into_vec(),
        InitialStrategy::Centroid => {
            let mut ranked: Vec<(usize, f64)> = concept
                .embeddings
                .iter()
                .take(available)
                .enumerate()
                .map(|(i, e)| (i, cosine_distance(e, &concept.centroid)))
                .collect();
            ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
            ranked.into_iter().take(count).map(|(i, _)| i).collect()
        }
    }
}

/// Build the initial elements of the search for `concept`.
pub fn initial_elements(
    concept: &Concept,
    count: usize,
    strategy: InitialStrategy,
    rng: &mut dyn RngCore,
) -> Result<Vec<PopulationElement>, PrototypeError> {
    if concept.is_empty() {
        return Err(PrototypeError::EmptyConcept {
            concept_index: concept.index,
        });
    }
    let elements = select_members(concept, count, strategy, rng)
        .into_iter()
        .map(|i| PopulationElement::from_dataset_element(&concept.elements[i]))
        .collect();
    Ok(elements)
}
