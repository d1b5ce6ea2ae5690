//! Genetic search over mutation operators.

use std::cmp::Ordering;

use atlas_core::config::PrototypeConfig;
use atlas_core::errors::{AtlasResult, PrototypeError};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::{debug, info};

use crate::fitness::{Evaluation, Fitness};
use crate::mutation::Mutation;
use crate::population::PopulationElement;

/// Statistics of one evaluated epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochStats {
    pub epoch: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_distance: f64,
}

/// Best candidate seen over the whole run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: PopulationElement,
    pub evaluation: Evaluation,
    pub history: Vec<EpochStats>,
}

/// Fixed-budget genetic search with elitism, reinsertion of initial
/// elements, and tournament selection.
#[derive(Debug, Clone)]
pub struct GeneticSearch {
    population_size: usize,
    num_epochs: usize,
    elite_fraction: f64,
    refresh_fraction: f64,
    tournament_size: usize,
}

impl GeneticSearch {
    pub fn new(
        population_size: usize,
        num_epochs: usize,
        elite_fraction: f64,
        refresh_fraction: f64,
        tournament_size: usize,
    ) -> Self {
        Self {
            population_size: population_size.max(1),
            num_epochs,
            elite_fraction,
            refresh_fraction,
            tournament_size: tournament_size.max(1),
        }
    }

    pub fn from_config(config: &PrototypeConfig) -> Self {
        Self::new(
            config.population_size,
            config.num_epochs,
            config.elite_fraction,
            config.refresh_fraction,
            config.tournament_size,
        )
    }

    /// Run `num_epochs` epochs, always to completion.
    ///
    /// The starting population samples `initial` with replacement. Each epoch
    /// is evaluated, then replaced by elites, fresh samples of `initial`, and
    /// mutated tournament winners. A parent whose mutation fails is carried
    /// over unchanged.
    pub fn run(
        &self,
        initial: &[PopulationElement],
        mutations: &[Box<dyn Mutation>],
        fitness: &dyn Fitness,
        rng: &mut dyn RngCore,
    ) -> AtlasResult<SearchOutcome> {
        if initial.is_empty() {
            return Err(PrototypeError::EmptyPopulation.into());
        }
        if mutations.is_empty() {
            return Err(PrototypeError::NoMutations.into());
        }

        info!(
            population = self.population_size,
            epochs = self.num_epochs,
            initial = initial.len(),
            operators = mutations.len(),
            "starting prototype search"
        );

        let mut population: Vec<PopulationElement> = (0..self.population_size)
            .map(|_| sample(initial, rng))
            .collect();
        let mut best: Option<(PopulationElement, Evaluation)> = None;
        let mut history = Vec::with_capacity(self.num_epochs);

        for epoch in 0..self.num_epochs.max(1) {
            let scores = fitness.evaluate(&population)?;
            if scores.len() != population.len() {
                return Err(PrototypeError::FitnessCountMismatch {
                    expected: population.len(),
                    actual: scores.len(),
                }
                .into());
            }

            let ranking = rank(&scores);
            let leader = ranking[0];
            let leader_score = scores[leader];
            let improved = best
                .as_ref()
                .map_or(true, |(_, b)| leader_score.fitness < b.fitness);
            if improved {
                best = Some((population[leader].clone(), leader_score));
            }

            let stats = EpochStats {
                epoch,
                best_fitness: leader_score.fitness,
                mean_fitness: scores.iter().map(|s| s.fitness).sum::<f64>() / scores.len() as f64,
                best_distance: leader_score.distance,
            };
            debug!(
                epoch = stats.epoch,
                best_fitness = stats.best_fitness,
                mean_fitness = stats.mean_fitness,
                best_distance = stats.best_distance,
                best_nodes = population[leader].node_count(),
                "epoch evaluated"
            );
            history.push(stats);

            if epoch + 1 < self.num_epochs {
                population = self.next_generation(&population, &scores, &ranking, initial, mutations, rng);
            }
        }

        let (best, evaluation) = best.ok_or(PrototypeError::EmptyPopulation)?;
        info!(
            fitness = evaluation.fitness,
            distance = evaluation.distance,
            nodes = best.node_count(),
            "prototype search complete"
        );
        Ok(SearchOutcome {
            best,
            evaluation,
            history,
        })
    }

    fn next_generation(
        &self,
        population: &[PopulationElement],
        scores: &[Evaluation],
        ranking: &[usize],
        initial: &[PopulationElement],
        mutations: &[Box<dyn Mutation>],
        rng: &mut dyn RngCore,
    ) -> Vec<PopulationElement> {
        let size = self.population_size;
        let elites = fraction_of(size, self.elite_fraction);
        let refreshed = fraction_of(size, self.refresh_fraction).min(size - elites);

        let mut next = Vec::with_capacity(size);
        next.extend(ranking.iter().take(elites).map(|&i| population[i].clone()));
        next.extend((0..refreshed).map(|_| sample(initial, rng)));

        while next.len() < size {
            let parent = &population[self.tournament(scores, rng)];
            let child = mutations
                .choose(rng)
                .and_then(|operator| operator.mutate(parent, rng))
                .unwrap_or_else(|| parent.clone());
            next.push(child);
        }
        next
    }

    /// Index of the fittest of `tournament_size` uniformly drawn contestants.
    fn tournament(&self, scores: &[Evaluation], rng: &mut dyn RngCore) -> usize {
        let mut winner = rng.gen_range(0..scores.len());
        for _ in 1..self.tournament_size {
            let challenger = rng.gen_range(0..scores.len());
            if scores[challenger].fitness < scores[winner].fitness {
                winner = challenger;
            }
        }
        winner
    }
}

fn sample(initial: &[PopulationElement], rng: &mut dyn RngCore) -> PopulationElement {
    initial[rng.gen_range(0..initial.len())].clone()
}

/// Population indices by ascending fitness, stable on ties.
fn rank(scores: &[Evaluation]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .fitness
            .partial_cmp(&scores[b].fitness)
            .unwrap_or(Ordering::Equal)
    });
    order
}

fn fraction_of(size: usize, fraction: f64) -> usize {
    ((size as f64 * fraction).round() as usize).min(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::models::GraphRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Fitness = node count.
    struct NodeCount;

    impl Fitness for NodeCount {
        fn evaluate(&self, population: &[PopulationElement]) -> AtlasResult<Vec<Evaluation>> {
            Ok(population
                .iter()
                .map(|e| Evaluation {
                    fitness: e.node_count() as f64,
                    distance: 0.0,
                })
                .collect())
        }
    }

    /// Drops the last node, keeps no edges.
    struct DropLast;

    impl Mutation for DropLast {
        fn name(&self) -> &str {
            "drop_last"
        }

        fn mutate(&self, element: &PopulationElement, _rng: &mut dyn RngCore) -> Option<PopulationElement> {
            let n = element.node_count();
            if n <= 1 {
                return None;
            }
            let attributes = element.graph.node_attributes[..n - 1].to_vec();
            Some(PopulationElement::new(format!("{}", n - 1), GraphRecord::new(attributes, Vec::new())))
        }
    }

    struct Never;

    impl Mutation for Never {
        fn name(&self) -> &str {
            "never"
        }

        fn mutate(&self, _element: &PopulationElement, _rng: &mut dyn RngCore) -> Option<PopulationElement> {
            None
        }
    }

    fn seed_element(nodes: usize) -> PopulationElement {
        PopulationElement::new(nodes.to_string(), GraphRecord::new(vec![vec![1.0]; nodes], Vec::new()))
    }

    #[test]
    fn search_shrinks_towards_the_minimum() {
        let search = GeneticSearch::new(20, 10, 0.1, 0.05, 3);
        let mutations: Vec<Box<dyn Mutation>> = vec![Box::new(DropLast)];
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = search
            .run(&[seed_element(6)], &mutations, &NodeCount, &mut rng)
            .unwrap();
        assert_eq!(outcome.best.node_count(), 1);
        assert_eq!(outcome.history.len(), 10);
        assert!(outcome.history.windows(2).all(|w| w[1].best_fitness <= w[0].best_fitness));
    }

    #[test]
    fn failing_operators_still_finish_every_epoch() {
        let search = GeneticSearch::new(8, 4, 0.25, 0.5, 2);
        let mutations: Vec<Box<dyn Mutation>> = vec![Box::new(Never)];
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = search
            .run(&[seed_element(3), seed_element(5)], &mutations, &NodeCount, &mut rng)
            .unwrap();
        assert_eq!(outcome.history.len(), 4);
        assert_eq!(outcome.best.node_count(), 3);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let search = GeneticSearch::new(4, 2, 0.1, 0.1, 2);
        let mut rng = StdRng::seed_from_u64(0);
        let mutations: Vec<Box<dyn Mutation>> = vec![Box::new(Never)];
        assert!(search.run(&[], &mutations, &NodeCount, &mut rng).is_err());
        assert!(search.run(&[seed_element(2)], &[], &NodeCount, &mut rng).is_err());
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let search = GeneticSearch::new(16, 6, 0.1, 0.1, 3);
        let mutations: Vec<Box<dyn Mutation>> = vec![Box::new(DropLast), Box::new(Never)];
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            search
                .run(&[seed_element(9), seed_element(7)], &mutations, &NodeCount, &mut rng)
                .unwrap()
        };
        let (a, b) = (run(9), run(9));
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn fractions_round_and_cap() {
        assert_eq!(fraction_of(500, 0.1), 50);
        assert_eq!(fraction_of(500, 0.05), 25);
        assert_eq!(fraction_of(3, 2.0), 3);
    }
}
