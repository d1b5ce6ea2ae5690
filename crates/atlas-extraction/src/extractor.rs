//! Embedding extractor: runs the model over the dataset and attaches
//! outputs, embeddings, importances, deviations, and fidelity to every graph.

use atlas_core::errors::{AtlasResult, ModelError};
use atlas_core::models::{Dataset, DatasetType, GraphRecord};
use atlas_core::traits::GraphModel;
use tracing::{debug, info};

/// Channels the regression fidelity formula is defined for.
const REGRESSION_CHANNELS: usize = 2;

/// Annotate every graph of `dataset` in place. An empty dataset is a no-op.
pub fn annotate_dataset(
    model: &dyn GraphModel,
    dataset: &mut Dataset,
    dataset_type: DatasetType,
) -> AtlasResult<()> {
    if dataset.is_empty() {
        debug!("empty dataset, nothing to annotate");
        return Ok(());
    }
    check_channels(model.num_channels(), dataset_type)?;

    let graphs: Vec<GraphRecord> = dataset.values().map(|e| e.graph.clone()).collect();
    info!(
        elements = graphs.len(),
        "running model forward pass for the dataset"
    );
    let outputs = model.forward_graphs(&graphs)?;
    ensure_batch(graphs.len(), outputs.len())?;
    let deviations = model.leave_one_out_deviations(&graphs)?;
    ensure_batch(graphs.len(), deviations.len())?;

    for ((element, output), deviation) in dataset.values_mut().zip(&outputs).zip(deviations) {
        element.graph.apply_forward(output, dataset_type)?;
        element.graph.apply_deviation(deviation, dataset_type)?;
    }
    Ok(())
}

/// Re-run one (possibly mutated) graph through the model and refresh its
/// output, prediction, embeddings, and importances.
pub fn refresh_graph(
    model: &dyn GraphModel,
    graph: &mut GraphRecord,
    dataset_type: DatasetType,
) -> AtlasResult<()> {
    let outputs = model.forward_graphs(std::slice::from_ref(graph))?;
    ensure_batch(1, outputs.len())?;
    graph.apply_forward(&outputs[0], dataset_type)?;
    Ok(())
}

fn check_channels(num_channels: usize, dataset_type: DatasetType) -> Result<(), ModelError> {
    if dataset_type == DatasetType::Regression && num_channels != REGRESSION_CHANNELS {
        return Err(ModelError::ChannelMismatch {
            dataset_type: dataset_type.to_string(),
            expected: REGRESSION_CHANNELS,
            actual: num_channels,
        });
    }
    Ok(())
}

fn ensure_batch(expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected != actual {
        return Err(ModelError::BatchSizeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regression_requires_two_channels() {
        assert!(check_channels(2, DatasetType::Regression).is_ok());
        assert!(check_channels(3, DatasetType::Regression).is_err());
        assert!(check_channels(3, DatasetType::Classification).is_ok());
    }

    #[test]
    fn batch_mismatch_is_reported() {
        assert!(matches!(
            ensure_batch(3, 2),
            Err(ModelError::BatchSizeMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }
}
