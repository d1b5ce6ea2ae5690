//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log the end of concept extraction.
pub fn concepts_extracted(concepts: usize, channels: usize, elements: usize) {
    tracing::info!(
        event = "concepts_extracted",
        concepts = concepts,
        channels = channels,
        elements = elements,
        "concept extraction completed"
    );
}

/// Log a channel that produced no concepts.
pub fn channel_skipped(channel: usize, reason: &str) {
    tracing::warn!(
        event = "channel_skipped",
        channel = channel,
        reason = %reason,
        "channel skipped"
    );
}

/// Log a finished prototype search.
pub fn prototype_generated(concept: usize, nodes: usize, distance: f64, within_radius: bool) {
    tracing::info!(
        event = "prototype_generated",
        concept = concept,
        nodes = nodes,
        distance = distance,
        within_radius = within_radius,
        "prototype generated"
    );
}

/// Log a prototype search that could not complete.
pub fn prototype_failed(concept: usize, error: &str) {
    tracing::warn!(
        event = "prototype_failed",
        concept = concept,
        error = %error,
        "prototype generation failed"
    );
}

/// Log an attached hypothesis.
pub fn hypothesis_generated(concept: usize, chars: usize) {
    tracing::info!(
        event = "hypothesis_generated",
        concept = concept,
        chars = chars,
        "hypothesis generated"
    );
}

/// Log a concept skipped by the hypothesis stage.
pub fn hypothesis_skipped(concept: usize, reason: &str) {
    tracing::info!(
        event = "hypothesis_skipped",
        concept = concept,
        reason = %reason,
        "hypothesis skipped"
    );
}

/// Log a failed language model dispatch.
pub fn hypothesis_failed(concept: usize, error: &str) {
    tracing::warn!(
        event = "hypothesis_failed",
        concept = concept,
        error = %error,
        "hypothesis generation failed"
    );
}
