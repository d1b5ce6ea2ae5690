//! Concept ordering: nearest-centroid chaining within each channel.

use std::collections::BTreeMap;

use atlas_core::distance::{argmin, DistanceMetric};
use atlas_core::models::Concept;
use tracing::debug;

use crate::counter::IndexCounter;

/// Reorder concepts channel by channel.
///
/// Each channel's chain starts at its first concept in input order, then
/// repeatedly takes the remaining concept with the closest centroid to the
/// current one (ties go to the earliest remaining). Indices are reassigned
/// from 0, channels in ascending order.
pub fn order_by_similarity(concepts: Vec<Concept>, metric: DistanceMetric) -> Vec<Concept> {
    let mut by_channel: BTreeMap<usize, Vec<Concept>> = BTreeMap::new();
    for concept in concepts {
        by_channel
            .entry(concept.channel_index())
            .or_default()
            .push(concept);
    }

    let mut counter = IndexCounter::new();
    let mut ordered = Vec::new();
    for (channel, remaining) in by_channel {
        let chain = chain_channel(remaining, metric);
        debug!(channel, concepts = chain.len(), "channel ordered");
        for mut concept in chain {
            concept.index = counter.next_index();
            ordered.push(concept);
        }
    }
    ordered
}

fn chain_channel(mut remaining: Vec<Concept>, metric: DistanceMetric) -> Vec<Concept> {
    if remaining.is_empty() {
        return remaining;
    }
    let mut chain = Vec::with_capacity(remaining.len());
    chain.push(remaining.remove(0));

    while !remaining.is_empty() {
        let current = match chain.last() {
            Some(c) => &c.centroid,
            None => break,
        };
        let distances: Vec<f64> = remaining
            .iter()
            .map(|candidate| metric.distance(current, &candidate.centroid))
            .collect();
        let Some(next) = argmin(&distances) else {
            break;
        };
        chain.push(remaining.remove(next));
    }
    chain
}
