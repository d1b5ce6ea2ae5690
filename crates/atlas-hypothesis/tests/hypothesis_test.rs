//! Hypothesis generation against a scripted language model.

use std::path::PathBuf;
use std::sync::Arc;

use atlas_core::config::HypothesisConfig;
use atlas_core::models::{ChannelInfo, Concept, DatasetElement, Prototype, PrototypeMetadata};
use atlas_hypothesis::{HypothesisGenerator, HypothesisOutcome, PromptTemplates};
use test_fixtures::{chain_graph, ScriptedLanguageModel, ScriptedReply};

fn concept(index: usize, channel: usize, with_prototype: bool) -> Concept {
    let graph = chain_graph(vec![vec![1.0], vec![0.0]]);
    let element = DatasetElement::new(index, "CCO", graph.clone());
    let mut concept = Concept::from_members(
        index,
        channel,
        vec![(index, element)],
        vec![vec![1.0, 0.0]],
        -0.734,
        &ChannelInfo::lookup(&ChannelInfo::defaults(), channel),
    );
    if with_prototype {
        concept.push_prototype(Prototype {
            image_path: PathBuf::from(format!("out/prototype_{index}.png")),
            node_positions: vec![[0.0, 0.0], [1.0, 1.0]],
            metadata: PrototypeMetadata {
                graph,
                repr: "CO".to_string(),
            },
        });
    }
    concept
}

fn generator(model: Arc<ScriptedLanguageModel>) -> HypothesisGenerator {
    HypothesisGenerator::new(
        PromptTemplates::new().unwrap(),
        model,
        "solubility",
        "Water solubility in log mol/L.",
    )
}

#[test]
fn concept_with_prototype_receives_the_hypothesis() {
    let model = Arc::new(ScriptedLanguageModel::always("H"));
    let mut concepts = vec![concept(0, 0, true)];

    let outcomes = generator(Arc::clone(&model)).generate(&mut concepts).unwrap();

    assert_eq!(
        outcomes,
        vec![HypothesisOutcome::Generated {
            concept_index: 0,
            chars: 1
        }]
    );
    assert_eq!(concepts[0].hypothesis.as_deref(), Some("H"));

    let calls = model.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("Water solubility in log mol/L."));
    assert!(calls[0].1.contains("solubility"));
    assert!(calls[0].1.contains("-0.73"));
    assert!(calls[0].1.contains("CO"));
    assert!(calls[0].1.contains("out/prototype_0.png"));
}

#[test]
fn concept_without_prototypes_is_skipped() {
    let model = Arc::new(ScriptedLanguageModel::always("H"));
    let mut concepts = vec![concept(0, 0, false)];

    let outcomes = generator(Arc::clone(&model)).generate(&mut concepts).unwrap();

    assert!(matches!(outcomes[0], HypothesisOutcome::Skipped { concept_index: 0, .. }));
    assert!(concepts[0].hypothesis.is_none());
    assert!(model.calls().is_empty());
}

#[test]
fn failed_query_is_recorded_and_processing_continues() {
    let model = Arc::new(ScriptedLanguageModel::new(vec![
        ScriptedReply::Fail("rate limited".to_string()),
        ScriptedReply::Text("second".to_string()),
    ]));
    let mut concepts = vec![concept(0, 0, true), concept(1, 1, true)];

    let outcomes = generator(model).generate(&mut concepts).unwrap();

    match &outcomes[0] {
        HypothesisOutcome::Failed { concept_index, reason } => {
            assert_eq!(*concept_index, 0);
            assert!(reason.contains("rate limited"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(concepts[0].hypothesis.is_none());
    assert_eq!(concepts[1].hypothesis.as_deref(), Some("second"));
    assert_eq!(outcomes[1].concept_index(), 1);
}

#[test]
fn custom_contribution_formatter_is_used() {
    let model = Arc::new(ScriptedLanguageModel::always("H"));
    let mut concepts = vec![concept(0, 1, true)];
    let generator = generator(Arc::clone(&model)).with_contribution_formatter(|channel, value| {
        if value < 0.0 {
            format!("lowers (channel {channel})")
        } else {
            "raises".to_string()
        }
    });

    generator.generate(&mut concepts).unwrap();

    assert!(model.calls()[0].1.contains("lowers (channel 1)"));
}

#[test]
fn template_overrides_are_read_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let system_path = dir.path().join("system.hbs");
    let user_path = dir.path().join("user.hbs");
    std::fs::write(&system_path, "SYS {{description}}").unwrap();
    std::fs::write(&user_path, "USR {{name}} {{contribution}}{{#each prototypes}} {{this.repr}}{{/each}}").unwrap();
    let config = HypothesisConfig {
        task_name: "toxicity".to_string(),
        task_description: "desc".to_string(),
        system_template: Some(system_path),
        user_template: Some(user_path),
        ..Default::default()
    };
    let model = Arc::new(ScriptedLanguageModel::always("H"));
    let generator = HypothesisGenerator::from_config(&config, Arc::clone(&model) as _).unwrap();
    let mut concepts = vec![concept(3, 0, true)];

    generator.generate(&mut concepts).unwrap();

    let calls = model.calls();
    assert_eq!(calls[0].0, "SYS desc");
    assert_eq!(calls[0].1, "USR toxicity -0.73 CO");
}

#[test]
fn missing_template_file_is_an_error() {
    let config = HypothesisConfig {
        system_template: Some(PathBuf::from("/nonexistent/system.hbs")),
        ..Default::default()
    };
    let model = Arc::new(ScriptedLanguageModel::always("H"));
    assert!(HypothesisGenerator::from_config(&config, model).is_err());
}
