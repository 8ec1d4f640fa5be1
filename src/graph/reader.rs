//! Snapshot reader over an [`AudioGraph`]

use super::backend::{AudioGraph, GraphError};
use super::snapshot;
use crate::models::{NamedNodeSet, Snapshot};
use log::{debug, warn};

/// Default cap on trailing lines trimmed while repairing a dump
pub const DEFAULT_MAX_TRIMS: usize = 4096;

/// Takes graph snapshots and looks nodes up by name
pub struct GraphReader<G> {
    graph: G,
    max_trims: usize,
}

impl<G: AudioGraph> GraphReader<G> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            max_trims: DEFAULT_MAX_TRIMS,
        }
    }

    pub fn with_max_trims(mut self, max_trims: usize) -> Self {
        self.max_trims = max_trims;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Dump and decode the graph.
    ///
    /// Undecodable output never fails the call: it is logged and read as an
    /// empty graph. Only failures of the dump command itself are returned.
    pub fn snapshot(&self) -> Result<Snapshot, GraphError> {
        let text = self.graph.dump()?;
        match snapshot::repair(&text, self.max_trims) {
            Ok(repaired) => Ok(repaired.snapshot),
            Err(e) => {
                warn!("Ignoring unreadable graph dump: {}", e);
                Ok(Snapshot::default())
            }
        }
    }

    /// Ids of all nodes named `name`, in snapshot order
    pub fn nodes_by_name(&self, name: &str) -> Result<NamedNodeSet, GraphError> {
        let ids = self.snapshot()?.nodes_named(name);
        debug!("{} node(s) named {:?}: {:?}", ids.len(), name, ids);
        Ok(ids)
    }
}
