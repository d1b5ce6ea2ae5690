//! Mutation operators of the prototype search.
//!
//! Operators shrink a graph and re-derive the domain string and graph through
//! the domain layer, so every candidate stays representable as a value.

use std::collections::BTreeSet;
use std::sync::Arc;

use atlas_core::errors::AtlasResult;
use atlas_core::models::GraphRecord;
use atlas_core::traits::DomainProcessing;
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::debug;

use crate::population::PopulationElement;

/// Graph mutation operator.
///
/// Returns `None` when the operator cannot be applied to `element`; the
/// search then keeps the parent unchanged.
pub trait Mutation: Send + Sync {
    fn name(&self) -> &str;

    fn mutate(&self, element: &PopulationElement, rng: &mut dyn RngCore) -> Option<PopulationElement>;
}

/// The built-in deletion operators, node removal first.
pub fn default_mutations(domain: Arc<dyn DomainProcessing>) -> Vec<Box<dyn Mutation>> {
    vec![
        Box::new(RemoveNode::new(Arc::clone(&domain))),
        Box::new(RemoveEdge::new(domain)),
    ]
}

/// Deletes a random node of degree ≤ 1.
pub struct RemoveNode {
    domain: Arc<dyn DomainProcessing>,
}

impl RemoveNode {
    pub fn new(domain: Arc<dyn DomainProcessing>) -> Self {
        Self { domain }
    }
}

impl Mutation for RemoveNode {
    fn name(&self) -> &str {
        "remove_node"
    }

    fn mutate(&self, element: &PopulationElement, rng: &mut dyn RngCore) -> Option<PopulationElement> {
        let graph = &element.graph;
        if graph.num_nodes() <= 1 {
            return None;
        }
        let candidates: Vec<usize> = (0..graph.num_nodes())
            .filter(|&node| graph.degree(node) <= 1)
            .collect();
        let node = *candidates.choose(rng)?;
        rederive(self.domain.as_ref(), &without_node(graph, node), self.name())
    }
}

/// Deletes a random edge whose endpoints both keep another neighbour. Both
/// directions of the edge are removed.
pub struct RemoveEdge {
    domain: Arc<dyn DomainProcessing>,
}

impl RemoveEdge {
    pub fn new(domain: Arc<dyn DomainProcessing>) -> Self {
        Self { domain }
    }
}

impl Mutation for RemoveEdge {
    fn name(&self) -> &str {
        "remove_edge"
    }

    fn mutate(&self, element: &PopulationElement, rng: &mut dyn RngCore) -> Option<PopulationElement> {
        let graph = &element.graph;
        let candidates: Vec<[usize; 2]> = graph
            .edge_indices
            .iter()
            .filter(|[a, b]| a != b && graph.degree(*a) > 1 && graph.degree(*b) > 1)
            .map(|&[a, b]| [a.min(b), a.max(b)])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let pair = *candidates.choose(rng)?;
        rederive(self.domain.as_ref(), &without_edge(graph, pair), self.name())
    }
}

/// Copy of `graph` without `node`; edges touching it are dropped and the
/// remaining endpoints re-indexed.
fn without_node(graph: &GraphRecord, node: usize) -> GraphRecord {
    let node_attributes: Vec<Vec<f32>> = graph
        .node_attributes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != node)
        .map(|(_, a)| a.clone())
        .collect();

    let shift = |i: usize| if i > node { i - 1 } else { i };
    let mut edge_indices = Vec::new();
    let mut edge_attributes = Vec::new();
    for (e, [a, b]) in graph.edge_indices.iter().enumerate() {
        if *a == node || *b == node {
            continue;
        }
        edge_indices.push([shift(*a), shift(*b)]);
        if let Some(attributes) = graph.edge_attributes.get(e) {
            edge_attributes.push(attributes.clone());
        }
    }

    let mut reduced = GraphRecord::new(node_attributes, edge_indices);
    if edge_attributes.len() == reduced.num_edges() {
        reduced.edge_attributes = edge_attributes;
    }
    reduced.graph_labels = graph.graph_labels.clone();
    reduced
}

/// Copy of `graph` without any edge entry joining the two nodes of `pair`.
fn without_edge(graph: &GraphRecord, pair: [usize; 2]) -> GraphRecord {
    let joins = |[a, b]: [usize; 2]| [a.min(b), a.max(b)] == pair;
    let mut edge_indices = Vec::new();
    let mut edge_attributes = Vec::new();
    for (e, &edge) in graph.edge_indices.iter().enumerate() {
        if joins(edge) {
            continue;
        }
        edge_indices.push(edge);
        if let Some(attributes) = graph.edge_attributes.get(e) {
            edge_attributes.push(attributes.clone());
        }
    }

    let mut reduced = GraphRecord::new(graph.node_attributes.clone(), edge_indices);
    if edge_attributes.len() == reduced.num_edges() {
        reduced.edge_attributes = edge_attributes;
    }
    reduced.graph_labels = graph.graph_labels.clone();
    reduced
}

fn rederive(
    domain: &dyn DomainProcessing,
    graph: &GraphRecord,
    operator: &str,
) -> Option<PopulationElement> {
    let derived: AtlasResult<PopulationElement> = domain.unprocess(graph).and_then(|value| {
        let graph = domain.process(&value)?;
        Ok(PopulationElement::new(value, graph))
    });
    match derived {
        Ok(element) => Some(element),
        Err(e) => {
            debug!(operator, error = %e, "mutant rejected by domain layer");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_fixtures::{chain_graph, star_graph, JsonGraphProcessing};

    fn element(graph: GraphRecord) -> PopulationElement {
        let value = JsonGraphProcessing::encode(&graph.node_attributes, &graph.edge_indices);
        PopulationElement::new(value, graph)
    }

    fn domain() -> Arc<dyn DomainProcessing> {
        Arc::new(JsonGraphProcessing::new())
    }

    #[test]
    fn remove_node_drops_a_leaf_and_reindexes() {
        let graph = chain_graph(vec![vec![0.0], vec![1.0], vec![2.0]]);
        let mut rng = StdRng::seed_from_u64(3);
        let mutant = RemoveNode::new(domain())
            .mutate(&element(graph), &mut rng)
            .unwrap();
        assert_eq!(mutant.graph.num_nodes(), 2);
        assert_eq!(mutant.graph.edge_indices, vec![[0, 1]]);
        assert_eq!(mutant.value, JsonGraphProcessing::encode(&mutant.graph.node_attributes, &mutant.graph.edge_indices));
    }

    #[test]
    fn remove_node_fails_on_single_node() {
        let graph = GraphRecord::new(vec![vec![1.0]], Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(RemoveNode::new(domain()).mutate(&element(graph), &mut rng).is_none());
    }

    #[test]
    fn remove_node_never_picks_an_inner_node() {
        let graph = star_graph(vec![vec![9.0], vec![1.0], vec![2.0], vec![3.0]]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mutant = RemoveNode::new(domain())
                .mutate(&element(graph.clone()), &mut rng)
                .unwrap();
            assert_eq!(mutant.graph.node_attributes[0], vec![9.0]);
            assert_eq!(mutant.graph.num_edges(), 2);
        }
    }

    #[test]
    fn remove_edge_keeps_endpoints_attached() {
        let cycle = GraphRecord::new(
            vec![vec![0.0], vec![1.0], vec![2.0]],
            vec![[0, 1], [1, 2], [2, 0]],
        );
        let mut rng = StdRng::seed_from_u64(5);
        let mutant = RemoveEdge::new(domain())
            .mutate(&element(cycle), &mut rng)
            .unwrap();
        assert_eq!(mutant.graph.num_edges(), 2);
        assert!((0..3).all(|n| mutant.graph.degree(n) >= 1));
    }

    #[test]
    fn bidirectional_edges_count_as_one_neighbour() {
        let chain = GraphRecord::new(
            vec![vec![0.0], vec![1.0], vec![2.0]],
            vec![[0, 1], [1, 0], [1, 2], [2, 1]],
        );
        let mut rng = StdRng::seed_from_u64(7);
        let mutant = RemoveNode::new(domain())
            .mutate(&element(chain), &mut rng)
            .unwrap();
        assert_eq!(mutant.graph.num_nodes(), 2);
        assert_eq!(mutant.graph.edge_indices, vec![[0, 1], [1, 0]]);

        let cycle = GraphRecord::new(
            vec![vec![0.0], vec![1.0], vec![2.0]],
            vec![[0, 1], [1, 0], [1, 2], [2, 1], [2, 0], [0, 2]],
        );
        let mutant = RemoveEdge::new(domain())
            .mutate(&element(cycle), &mut rng)
            .unwrap();
        assert_eq!(mutant.graph.num_edges(), 4);
        assert!((0..3).all(|n| mutant.graph.degree(n) == 1 || mutant.graph.degree(n) == 2));
    }

    #[test]
    fn remove_edge_fails_on_a_tree() {
        let graph = chain_graph(vec![vec![0.0], vec![1.0], vec![2.0]]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(RemoveEdge::new(domain()).mutate(&element(graph), &mut rng).is_none());
    }

    #[test]
    fn default_operators_are_ordered() {
        let names: Vec<String> = default_mutations(domain())
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["remove_node", "remove_edge"]);
    }
}
