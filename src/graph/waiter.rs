//! Polling for a node that was not in a baseline set
//!
//! The audio server offers no event we can cheaply subscribe to from the
//! command-line tools, so a new node is detected by polling snapshots.
//! A poll reports a node only when the named set grew and contains an id
//! missing from the baseline. A node disappearing while another appears
//! leaves the set size unchanged and goes unnoticed.

use super::backend::AudioGraph;
use super::reader::GraphReader;
use crate::models::NodeId;
use log::{debug, warn};
use std::fmt;
use std::time::Duration;

/// Polling cadence and bound for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    /// `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            timeout: Some(Duration::from_millis(4000)),
        }
    }
}

/// The awaited node did not show up in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitError {
    pub name: String,
    pub after: Duration,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no new {} node appeared within {}ms",
            self.name,
            self.after.as_millis()
        )
    }
}

impl std::error::Error for WaitError {}

/// Poll every `interval` until a node named `name` that is not in
/// `baseline` appears. Among several new nodes the first one in snapshot
/// order wins.
pub async fn wait_for_new_node<G: AudioGraph>(
    reader: &GraphReader<G>,
    name: &str,
    baseline: &[NodeId],
    interval: Duration,
) -> NodeId {
    let mut polls: u64 = 0;
    loop {
        tokio::time::sleep(interval).await;
        polls += 1;

        let current = match reader.nodes_by_name(name) {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Poll {} for {} failed: {}", polls, name, e);
                continue;
            }
        };

        if current.len() > baseline.len() {
            if let Some(id) = current.into_iter().find(|id| !baseline.contains(id)) {
                debug!("New {} node {} after {} poll(s)", name, id, polls);
                return id;
            }
        }
    }
}

/// [`wait_for_new_node`] bounded by `config.timeout`
pub async fn wait_with_timeout<G: AudioGraph>(
    reader: &GraphReader<G>,
    name: &str,
    baseline: &[NodeId],
    config: PollConfig,
) -> Result<NodeId, WaitError> {
    let wait = wait_for_new_node(reader, name, baseline, config.interval);
    match config.timeout {
        None => Ok(wait.await),
        Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| WaitError {
            name: name.to_string(),
            after: limit,
        }),
    }
}
