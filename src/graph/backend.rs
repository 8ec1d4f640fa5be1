//! Access to the PipeWire graph through its command-line tools

use crate::models::NodeId;
use log::trace;
use std::fmt;
use std::process::{Command, Output, Stdio};

/// Failure of a graph command
#[derive(Debug)]
pub enum GraphError {
    /// The command could not be started
    Spawn { command: String, source: std::io::Error },
    /// The command ran but reported failure
    Failed { command: String, status: Option<i32>, stderr: String },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Spawn { command, source } => {
                write!(f, "failed to run {}: {}", command, source)
            }
            GraphError::Failed { command, status, stderr } => {
                match status {
                    Some(code) => write!(f, "{} exited with status {}", command, code)?,
                    None => write!(f, "{} was terminated by a signal", command)?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Spawn { source, .. } => Some(source),
            GraphError::Failed { .. } => None,
        }
    }
}

/// Operations the bridge needs from the audio graph
pub trait AudioGraph {
    /// Raw text of a full graph dump
    fn dump(&self) -> Result<String, GraphError>;

    /// Connect `source` to `destination`
    fn link(&self, source: &NodeId, destination: &NodeId) -> Result<(), GraphError>;
}

/// [`AudioGraph`] backed by `pw-dump` and `pw-link`
#[derive(Debug, Clone)]
pub struct PwCli {
    dump_command: String,
    link_command: String,
}

impl PwCli {
    pub fn new(dump_command: impl Into<String>, link_command: impl Into<String>) -> Self {
        Self {
            dump_command: dump_command.into(),
            link_command: link_command.into(),
        }
    }

    fn run(&self, mut command: Command, name: &str) -> Result<Output, GraphError> {
        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(|e| GraphError::Spawn {
                command: name.to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(GraphError::Failed {
                command: name.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for PwCli {
    fn default() -> Self {
        Self::new("pw-dump", "pw-link")
    }
}

impl AudioGraph for PwCli {
    fn dump(&self) -> Result<String, GraphError> {
        let output = self.run(Command::new(&self.dump_command), &self.dump_command)?;
        trace!("{} returned {} bytes", self.dump_command, output.stdout.len());
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn link(&self, source: &NodeId, destination: &NodeId) -> Result<(), GraphError> {
        let mut command = Command::new(&self.link_command);
        command.arg(source.as_str()).arg(destination.as_str());
        self.run(command, &self.link_command)?;
        Ok(())
    }
}
