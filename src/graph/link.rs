//! Applying links between nodes

use super::backend::AudioGraph;
use crate::models::NodeId;
use log::{debug, warn};

/// Counts of a [`link_all`] run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub linked: usize,
    pub failed: usize,
}

impl LinkReport {
    pub fn all_failed(&self) -> bool {
        self.linked == 0 && self.failed > 0
    }
}

/// Link every `(source, destination)` pair.
///
/// A failing pair is logged and skipped; the rest are still attempted.
pub fn link_all<G: AudioGraph + ?Sized>(graph: &G, pairs: &[(NodeId, NodeId)]) -> LinkReport {
    let mut report = LinkReport::default();

    for (source, destination) in pairs {
        match graph.link(source, destination) {
            Ok(()) => {
                debug!("Linked {} -> {}", source, destination);
                report.linked += 1;
            }
            Err(e) => {
                warn!("Could not link {} -> {}: {}", source, destination, e);
                report.failed += 1;
            }
        }
    }

    report
}

/// Pairs linking each of `sources` into `destination`
pub fn into_destination(sources: &[NodeId], destination: &NodeId) -> Vec<(NodeId, NodeId)> {
    sources
        .iter()
        .map(|source| (source.clone(), destination.clone()))
        .collect()
}
