//! Prototype optimizer tests against the mock model and JSON graph domain.

use std::sync::Arc;

use atlas_core::config::{ExtractionConfig, InitialStrategy, PrototypeConfig};
use atlas_core::distance::cosine_distance;
use atlas_core::models::{ChannelInfo, Concept, DatasetElement, DatasetType};
use atlas_core::traits::{DomainProcessing, GraphModel};
use atlas_extraction::{annotate_dataset, refresh_graph, ConceptExtractor};
use atlas_prototype::{
    initial_elements, Mutation, PopulationElement, PrototypeOptimizer, PrototypeOutcome,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use test_fixtures::{blob_dataset, chain_graph, BlobSpec, JsonGraphProcessing, MockModel};

struct IdentityMutation;

impl Mutation for IdentityMutation {
    fn name(&self) -> &str {
        "identity"
    }

    fn mutate(&self, element: &PopulationElement, _rng: &mut dyn RngCore) -> Option<PopulationElement> {
        Some(element.clone())
    }
}

struct NeverMutation;

impl Mutation for NeverMutation {
    fn name(&self) -> &str {
        "never"
    }

    fn mutate(&self, _element: &PopulationElement, _rng: &mut dyn RngCore) -> Option<PopulationElement> {
        None
    }
}

fn model() -> Arc<dyn GraphModel> {
    Arc::new(MockModel::new(2))
}

fn domain() -> Arc<dyn DomainProcessing> {
    Arc::new(JsonGraphProcessing::new())
}

fn small_config(output_dir: &std::path::Path) -> PrototypeConfig {
    PrototypeConfig {
        initial_population_size: 3,
        population_size: 30,
        num_epochs: 6,
        seed: Some(7),
        output_dir: output_dir.to_path_buf(),
        width: 200,
        height: 200,
        ..Default::default()
    }
}

fn extracted_concepts() -> Vec<Concept> {
    let model = MockModel::new(2);
    let mut dataset = blob_dataset(&[
        BlobSpec::new(vec![4.0, 1.0], 6),
        BlobSpec::new(vec![1.0, 4.0], 6),
    ]);
    let extractor = ConceptExtractor::new(ExtractionConfig {
        min_cluster_size: 3,
        ..Default::default()
    })
    .unwrap();
    extractor.extract(&model, &mut dataset).unwrap()
}

#[test]
fn optimize_writes_image_and_appends_prototype() {
    let dir = tempfile::tempdir().unwrap();
    let mut concepts = extracted_concepts();
    assert!(!concepts.is_empty());
    let optimizer = PrototypeOptimizer::new(small_config(dir.path()), DatasetType::Regression, model(), domain());

    let outcomes = optimizer.optimize_all(&mut concepts[..1]);

    let PrototypeOutcome::Generated(report) = &outcomes[0] else {
        panic!("expected a generated prototype, got {:?}", outcomes[0]);
    };
    let expected_path = dir.path().join(format!("prototype_{}.png", concepts[0].index));
    assert_eq!(report.image_path, expected_path);
    assert!(expected_path.exists());
    assert!(report.within_radius);
    assert_eq!(report.node_count, 1);
    assert_eq!(report.history.len(), 6);

    let prototypes = concepts[0].prototypes();
    assert_eq!(prototypes.len(), 1);
    let graph = prototypes[0].graph();
    assert_eq!(graph.node_positions.as_ref().unwrap().len(), graph.num_nodes());
    assert!(graph.graph_embeddings.is_some());
    assert!(graph.node_importances.is_some());
    assert_eq!(
        domain().process(prototypes[0].repr()).unwrap().num_nodes(),
        graph.num_nodes()
    );
}

#[test]
fn centroid_strategy_picks_the_three_closest_members() {
    let embeddings = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![1.0, 0.8],
        vec![0.9, 1.0],
    ];
    let elements: Vec<(usize, DatasetElement)> = (0..5)
        .map(|i| (i, DatasetElement::new(i, format!("m{i}"), chain_graph(vec![vec![i as f32]]))))
        .collect();
    let concept = Concept::from_members(0, 1, elements, embeddings.clone(), 0.0, &ChannelInfo::new("p", "coral"));

    let mut ranked: Vec<(usize, f64)> = embeddings
        .iter()
        .enumerate()
        .map(|(i, e)| (i, cosine_distance(e, &concept.centroid)))
        .collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    let expected: Vec<String> = ranked.iter().take(3).map(|(i, _)| format!("m{i}")).collect();

    let mut rng = StdRng::seed_from_u64(0);
    let initial = initial_elements(&concept, 3, InitialStrategy::Centroid, &mut rng).unwrap();
    let values: Vec<String> = initial.iter().map(|e| e.value.clone()).collect();
    assert_eq!(values, expected);
}

#[test]
fn fixed_seed_reproduces_the_prototype() {
    let dir = tempfile::tempdir().unwrap();
    let optimizer = PrototypeOptimizer::new(small_config(dir.path()), DatasetType::Regression, model(), domain());
    let mut first = extracted_concepts();
    let mut second = extracted_concepts();

    let a = optimizer.optimize_all(&mut first);
    let b = optimizer.optimize_all(&mut second);

    assert_eq!(a, b);
    assert_eq!(first, second);
}

#[test]
fn failing_mutation_keeps_parents_and_terminates() {
    let dir = tempfile::tempdir().unwrap();
    let mut concepts = extracted_concepts();
    let optimizer = PrototypeOptimizer::new(small_config(dir.path()), DatasetType::Regression, model(), domain())
        .with_mutations(vec![Box::new(NeverMutation)]);

    let outcomes = optimizer.optimize_all(&mut concepts[..1]);

    match &outcomes[0] {
        PrototypeOutcome::Generated(report) => {
            assert_eq!(report.node_count, 3);
            assert_eq!(report.history.len(), 6);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn far_centroid_returns_best_effort_outside_radius() {
    let dir = tempfile::tempdir().unwrap();
    let mut concepts = extracted_concepts();
    concepts[0].centroid = vec![-1.0, 0.0];
    let optimizer = PrototypeOptimizer::new(small_config(dir.path()), DatasetType::Regression, model(), domain());

    let outcomes = optimizer.optimize_all(&mut concepts[..1]);

    let PrototypeOutcome::Generated(report) = &outcomes[0] else {
        panic!("expected a generated prototype");
    };
    assert!(!report.within_radius);
    assert!(report.fitness >= atlas_core::constants::VIOLATION_PENALTY);
    assert!(concepts[0].has_prototypes());
}

#[test]
fn one_failing_concept_does_not_stop_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let mut concepts = extracted_concepts();
    let empty = Concept::from_members(99, 0, Vec::new(), Vec::new(), 0.0, &ChannelInfo::new("n", "skyblue"));
    concepts.insert(0, empty);
    let optimizer = PrototypeOptimizer::new(small_config(dir.path()), DatasetType::Regression, model(), domain());

    let outcomes = optimizer.optimize_all(&mut concepts[..2]);

    assert!(matches!(
        &outcomes[0],
        PrototypeOutcome::Failed { concept_index: 99, .. }
    ));
    assert!(outcomes[1].is_generated());
    assert!(!concepts[0].has_prototypes());
    assert!(concepts[1].has_prototypes());
}

#[test]
fn identity_mutation_round_trips_importances() {
    let model = MockModel::new(2);
    let mut dataset = blob_dataset(&[BlobSpec::new(vec![2.0, 1.0], 1)]);
    annotate_dataset(&model, &mut dataset, DatasetType::Regression).unwrap();
    let original = dataset[&0].graph.clone();

    let element = PopulationElement::from_dataset_element(&dataset[&0]);
    assert!(element.graph.node_importances.is_none());
    let mut rng = StdRng::seed_from_u64(0);
    let mut mutant = IdentityMutation.mutate(&element, &mut rng).unwrap();
    refresh_graph(&model, &mut mutant.graph, DatasetType::Regression).unwrap();

    assert_eq!(mutant.graph.node_importances, original.node_importances);
    assert_eq!(mutant.graph.edge_importances, original.edge_importances);
    assert_eq!(mutant.graph.graph_embeddings, original.graph_embeddings);
}

#[test]
fn fixture_graphs_shrink_to_a_single_node() {
    let domain = domain();
    let mutations = atlas_prototype::default_mutations(Arc::clone(&domain));
    let mut rng = StdRng::seed_from_u64(13);

    for value in test_fixtures::fixture_graph_values() {
        let graph = domain.process(&value).unwrap();
        let mut element = PopulationElement::new(value, graph);
        loop {
            let next = mutations
                .iter()
                .find_map(|m| m.mutate(&element, &mut rng));
            match next {
                Some(mutant) => {
                    assert!(mutant.graph.num_nodes() + mutant.graph.num_edges()
                        < element.graph.num_nodes() + element.graph.num_edges());
                    element = mutant;
                }
                None => break,
            }
        }
        assert_eq!(element.graph.num_nodes(), 1);
    }
}
