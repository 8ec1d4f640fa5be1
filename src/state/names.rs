//! Remembered source node names
//!
//! Stored one per line in ~/.cache/discord_bridge/previous_src_node_names,
//! most recently used first.

use std::fs;
use std::path::PathBuf;

/// File-backed list of previously bridged source names
pub struct RememberedNames {
    path: PathBuf,
}

impl RememberedNames {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_dir(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create cache directory: {}", e))?;
        }
        Ok(())
    }

    /// Load stored names. A missing file is an empty list.
    pub fn load(&self) -> Result<Vec<String>, String> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {}", self.path.display(), e))?;

        Ok(contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Write `names`, one per line
    pub fn save(&self, names: &[String]) -> Result<(), String> {
        self.ensure_dir()?;

        let mut contents = names.join("\n");
        contents.push('\n');

        fs::write(&self.path, contents)
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }

    /// Put `used` in front of the stored names and save the result
    pub fn remember(&self, used: &[String]) -> Result<Vec<String>, String> {
        let existing = self.load()?;
        let merged = merge_names(used, &existing);
        self.save(&merged)?;
        Ok(merged)
    }
}

/// `used` first, then `existing`, keeping the first occurrence of each name
pub fn merge_names(used: &[String], existing: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(used.len() + existing.len());
    for name in used.iter().chain(existing) {
        if !name.is_empty() && !merged.contains(name) {
            merged.push(name.clone());
        }
    }
    merged
}
