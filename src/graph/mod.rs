//! Audio graph queries and linking
//!
//! This module provides:
//! - Snapshot decoding with truncation repair
//! - Node lookup by name
//! - Polling for newly created nodes
//! - Link application that tolerates per-pair failures

mod backend;
mod link;
mod reader;
mod snapshot;
mod waiter;

pub use backend::{AudioGraph, GraphError, PwCli};
pub use link::{into_destination, link_all};
pub use reader::GraphReader;
pub use waiter::{wait_with_timeout, PollConfig, WaitError};

#[cfg(test)]
pub mod testing {
    //! Scripted [`AudioGraph`] for tests

    use super::{AudioGraph, GraphError};
    use crate::models::{NodeId, NODE_KIND};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Pretty-printed dump holding one node per `(id, name)`
    pub fn dump_of(nodes: &[(u32, &str)]) -> String {
        let objects: Vec<_> = nodes
            .iter()
            .map(|(id, name)| {
                json!({
                    "id": id,
                    "type": NODE_KIND,
                    "info": { "props": { "node.name": name } }
                })
            })
            .collect();
        serde_json::to_string_pretty(&objects).unwrap()
    }

    /// Replays dumps in order; the last one repeats forever
    pub struct ScriptedGraph {
        dumps: Mutex<VecDeque<String>>,
        failing_dumps: Mutex<usize>,
        dump_count: Mutex<usize>,
        rejected_sources: Vec<String>,
        link_attempts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedGraph {
        pub fn new(dumps: Vec<String>) -> Self {
            Self {
                dumps: Mutex::new(dumps.into()),
                failing_dumps: Mutex::new(0),
                dump_count: Mutex::new(0),
                rejected_sources: Vec::new(),
                link_attempts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing_dump() -> Self {
            Self::new(Vec::new()).fail_first_dumps(usize::MAX)
        }

        pub fn fail_first_dumps(self, count: usize) -> Self {
            *self.failing_dumps.lock().unwrap() = count;
            self
        }

        pub fn reject_link_from(mut self, source: &str) -> Self {
            self.rejected_sources.push(source.to_string());
            self
        }

        pub fn dump_count(&self) -> usize {
            *self.dump_count.lock().unwrap()
        }

        pub fn link_attempts(&self) -> Vec<(String, String)> {
            self.link_attempts.lock().unwrap().clone()
        }
    }

    impl AudioGraph for ScriptedGraph {
        fn dump(&self) -> Result<String, GraphError> {
            *self.dump_count.lock().unwrap() += 1;

            let mut failing = self.failing_dumps.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(GraphError::Failed {
                    command: "pw-dump".to_string(),
                    status: Some(1),
                    stderr: "can't connect: Host is down".to_string(),
                });
            }

            let mut dumps = self.dumps.lock().unwrap();
            let dump = if dumps.len() > 1 {
                dumps.pop_front()
            } else {
                dumps.front().cloned()
            };
            Ok(dump.unwrap_or_else(|| "[]".to_string()))
        }

        fn link(&self, source: &NodeId, destination: &NodeId) -> Result<(), GraphError> {
            self.link_attempts
                .lock()
                .unwrap()
                .push((source.to_string(), destination.to_string()));

            if self.rejected_sources.iter().any(|s| s == source.as_str()) {
                return Err(GraphError::Failed {
                    command: "pw-link".to_string(),
                    status: Some(1),
                    stderr: "failed to link ports: No such file or directory".to_string(),
                });
            }
            Ok(())
        }
    }
}
