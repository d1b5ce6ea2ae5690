//! Fitness of search candidates. Lower is better.

use atlas_core::constants::VIOLATION_PENALTY;
use atlas_core::distance::cosine_distance;
use atlas_core::errors::{AtlasResult, PrototypeError};
use atlas_core::models::GraphRecord;
use atlas_core::traits::GraphModel;
use serde::Serialize;

use crate::population::PopulationElement;

/// Score of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    /// Value minimized by the search.
    pub fitness: f64,
    /// Distance of the candidate's embedding to the nearest anchor.
    pub distance: f64,
}

/// Scores a whole population at once, one evaluation per element in order.
pub trait Fitness {
    fn evaluate(&self, population: &[PopulationElement]) -> AtlasResult<Vec<Evaluation>>;
}

/// Cosine distance of the channel embedding to the nearest anchor, plus a
/// size term, plus [`VIOLATION_PENALTY`] outside the violation radius.
pub struct EmbeddingDistanceFitness<'a> {
    model: &'a dyn GraphModel,
    channel: usize,
    anchors: Vec<Vec<f32>>,
    violation_radius: f64,
    size_weight: f64,
}

impl<'a> EmbeddingDistanceFitness<'a> {
    pub fn new(
        model: &'a dyn GraphModel,
        channel: usize,
        anchors: Vec<Vec<f32>>,
        violation_radius: f64,
        size_weight: f64,
    ) -> Self {
        Self {
            model,
            channel,
            anchors,
            violation_radius,
            size_weight,
        }
    }

    /// Distance of `embedding` to the closest anchor.
    pub fn anchor_distance(&self, embedding: &[f32]) -> f64 {
        self.anchors
            .iter()
            .map(|anchor| cosine_distance(embedding, anchor))
            .fold(f64::INFINITY, f64::min)
    }

    /// Combine a distance and a node count into a fitness value.
    pub fn score(&self, distance: f64, node_count: usize) -> f64 {
        let mut fitness = distance + self.size_weight * node_count as f64;
        if distance > self.violation_radius {
            fitness += VIOLATION_PENALTY;
        }
        fitness
    }
}

impl Fitness for EmbeddingDistanceFitness<'_> {
    fn evaluate(&self, population: &[PopulationElement]) -> AtlasResult<Vec<Evaluation>> {
        let graphs: Vec<GraphRecord> = population.iter().map(|e| e.graph.clone()).collect();
        let outputs = self.model.forward_graphs(&graphs)?;
        if outputs.len() != graphs.len() {
            return Err(PrototypeError::FitnessCountMismatch {
                expected: graphs.len(),
                actual: outputs.len(),
            }
            .into());
        }

        outputs
            .iter()
            .zip(&graphs)
            .map(|(output, graph)| -> AtlasResult<Evaluation> {
                let embedding = output
                    .graph_embedding
                    .column(self.channel)
                    .ok_or(PrototypeError::MissingEmbedding {
                        channel: self.channel,
                    })?;
                let distance = self.anchor_distance(&embedding);
                Ok(Evaluation {
                    fitness: self.score(distance, graph.num_nodes()),
                    distance,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::{chain_graph, MockModel};

    fn element(attributes: Vec<Vec<f32>>) -> PopulationElement {
        PopulationElement::new("", chain_graph(attributes))
    }

    #[test]
    fn nearby_candidates_are_not_penalized() {
        let model = MockModel::new(2);
        let fitness = EmbeddingDistanceFitness::new(&model, 0, vec![vec![1.0, 0.0]], 0.2, 0.01);
        let scores = fitness
            .evaluate(&[element(vec![vec![1.0, 0.0], vec![1.0, 0.0]])])
            .unwrap();
        assert!(scores[0].distance < 1e-6);
        assert!((scores[0].fitness - 0.02).abs() < 1e-6);
    }

    #[test]
    fn distant_candidates_carry_the_penalty() {
        let model = MockModel::new(2);
        let fitness = EmbeddingDistanceFitness::new(&model, 0, vec![vec![1.0, 0.0]], 0.2, 0.0);
        let scores = fitness.evaluate(&[element(vec![vec![0.0, 1.0]])]).unwrap();
        assert!((scores[0].distance - 1.0).abs() < 1e-6);
        assert!(scores[0].fitness >= VIOLATION_PENALTY);
    }

    #[test]
    fn nearest_anchor_wins() {
        let model = MockModel::new(2);
        let fitness = EmbeddingDistanceFitness::new(
            &model,
            1,
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            0.2,
            0.0,
        );
        assert!(fitness.anchor_distance(&[1.0, 0.0]) < 1e-9);
    }

    #[test]
    fn missing_channel_is_an_error() {
        let model = MockModel::new(2);
        let fitness = EmbeddingDistanceFitness::new(&model, 5, vec![vec![1.0, 0.0]], 0.2, 0.0);
        assert!(fitness.evaluate(&[element(vec![vec![1.0, 0.0]])]).is_err());
    }
}
