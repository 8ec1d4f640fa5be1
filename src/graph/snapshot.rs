//! Typed decoding of pw-dump output
//!
//! pw-dump is expected to print a single JSON array, but the text we get back
//! can be cut short or carry trailing output. [`repair`] drops trailing output
//! after a syntax error, and reads a cut-short dump as an empty graph.

use crate::models::{GraphObject, Snapshot};
use log::{debug, trace};
use serde_json::error::Category;
use std::fmt;

/// Why a dump could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended in the middle of a value
    Truncated { line: usize, column: usize },
    /// Syntax error or trailing characters after the array
    Malformed { line: usize, column: usize, message: String },
    /// Valid JSON that is not an array of objects
    Schema { message: String },
    /// Gave up after trimming this many lines
    RepairExhausted { trims: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { line, column } => {
                write!(f, "dump truncated at line {} column {}", line, column)
            }
            DecodeError::Malformed { line, column, message } => {
                write!(f, "malformed dump at line {} column {}: {}", line, column, message)
            }
            DecodeError::Schema { message } => write!(f, "unexpected dump layout: {}", message),
            DecodeError::RepairExhausted { trims } => {
                write!(f, "dump still unreadable after trimming {} lines", trims)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Eof => DecodeError::Truncated {
                line: e.line(),
                column: e.column(),
            },
            Category::Syntax | Category::Io => DecodeError::Malformed {
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            },
            Category::Data => DecodeError::Schema {
                message: e.to_string(),
            },
        }
    }
}

/// Outcome of a successful [`repair`]
#[derive(Debug, Clone)]
pub struct Repaired {
    pub snapshot: Snapshot,
    /// Number of trailing lines removed to reach decodable text
    pub trimmed_lines: usize,
}

/// Decode a full dump. Blank text is an empty snapshot.
pub fn decode(text: &str) -> Result<Snapshot, DecodeError> {
    if text.trim().is_empty() {
        return Ok(Snapshot::default());
    }
    let objects: Vec<GraphObject> = serde_json::from_str(text)?;
    Ok(Snapshot::new(objects))
}

/// Decode `text`, removing trailing lines after each failure.
///
/// A truncated dump has no decodable prefix, so it reads as an empty snapshot
/// without any trimming. Malformed text is cut back to the line before the
/// syntax error. `max_trims` caps the number of lines removed.
pub fn repair(text: &str, max_trims: usize) -> Result<Repaired, DecodeError> {
    let mut current = text;
    let mut trimmed_lines = 0;

    loop {
        let next = match decode(current) {
            Ok(snapshot) => {
                if trimmed_lines > 0 {
                    debug!(
                        "Recovered dump after trimming {} lines ({} objects)",
                        trimmed_lines,
                        snapshot.len()
                    );
                }
                return Ok(Repaired {
                    snapshot,
                    trimmed_lines,
                });
            }
            Err(DecodeError::Truncated { line, column }) => {
                debug!(
                    "Dump truncated at line {} column {}, reading it as empty",
                    line, column
                );
                return Ok(Repaired {
                    snapshot: Snapshot::default(),
                    trimmed_lines,
                });
            }
            Err(e @ DecodeError::Malformed { line, .. }) => {
                trace!("Dump not decodable yet: {}", e);
                let kept = keep_lines(current, line.saturating_sub(1));
                if kept.len() < current.len() {
                    kept
                } else {
                    drop_last_line(current)
                }
            }
            Err(e) => {
                trace!("Dump not decodable yet: {}", e);
                drop_last_line(current)
            }
        };

        let removed = line_count(current) - line_count(next);
        if trimmed_lines + removed > max_trims {
            return Err(DecodeError::RepairExhausted {
                trims: trimmed_lines,
            });
        }
        trimmed_lines += removed;
        current = next;
    }
}

fn drop_last_line(text: &str) -> &str {
    match text.rfind('\n') {
        Some(idx) => &text[..idx],
        None => "",
    }
}

/// The first `count` lines of `text`, without the final newline
fn keep_lines(text: &str, count: usize) -> &str {
    if count == 0 {
        return "";
    }
    match text.match_indices('\n').nth(count - 1) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.matches('\n').count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::reader::DEFAULT_MAX_TRIMS;

    const DUMP: &str = r#"[
  {
    "id": 0,
    "type": "PipeWire:Interface:Core",
    "info": { "props": { "core.name": "pipewire-0" } }
  },
  {
    "id": 41,
    "type": "PipeWire:Interface:Node",
    "info": { "props": { "node.name": "alsa_playback.osu!" } }
  },
  {
    "id": 77,
    "type": "PipeWire:Interface:Node",
    "info": { "props": { "node.name": "alsa_playback.osu!" } }
  }
]"#;

    #[test]
    fn test_decode_full_dump() {
        let snapshot = decode(DUMP).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.nodes_named("alsa_playback.osu!").len(), 2);
    }

    #[test]
    fn test_decode_classifies_errors() {
        assert!(matches!(decode("[{\"id\": 1"), Err(DecodeError::Truncated { .. })));
        assert!(matches!(decode("[] trailing"), Err(DecodeError::Malformed { .. })));
        assert!(matches!(decode("{\"id\": 1}"), Err(DecodeError::Schema { .. })));
        assert!(decode("   \n").unwrap().is_empty());
    }

    #[test]
    fn test_repair_strips_trailing_output() {
        let text = format!("{}\nremote error: connection reset\n", DUMP);
        let repaired = repair(&text, 16).unwrap();
        assert_eq!(repaired.trimmed_lines, 2);
        assert_eq!(repaired.snapshot.len(), 3);
    }

    #[test]
    fn test_repair_never_fails_on_truncated_prefixes() {
        let full = decode(DUMP).unwrap().nodes_named("alsa_playback.osu!");
        let lines: Vec<&str> = DUMP.lines().collect();

        for keep in 0..=lines.len() {
            let text = lines[..keep].join("\n");
            let repaired = repair(&text, usize::MAX).unwrap();
            let found = repaired.snapshot.nodes_named("alsa_playback.osu!");
            assert!(found.iter().all(|id| full.contains(id)), "keep={}", keep);
        }
    }

    #[test]
    fn test_repair_empty_text() {
        let repaired = repair("", 0).unwrap();
        assert!(repaired.snapshot.is_empty());
        assert_eq!(repaired.trimmed_lines, 0);
    }

    #[test]
    fn test_repair_is_bounded() {
        let text = "[]\nnot json\nmore\n";
        assert_eq!(repair(text, 2).unwrap_err(), DecodeError::RepairExhausted { trims: 0 });

        let repaired = repair(text, 3).unwrap();
        assert_eq!(repaired.trimmed_lines, 3);
        assert!(repaired.snapshot.is_empty());
    }

    fn large_dump(nodes: u32) -> String {
        let objects: Vec<_> = (0..nodes)
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "type": crate::models::NODE_KIND,
                    "info": { "props": { "node.name": format!("node-{}", id) } }
                })
            })
            .collect();
        serde_json::to_string_pretty(&objects).unwrap()
    }

    #[test]
    fn test_truncated_dump_reads_empty_without_trimming() {
        let full = large_dump(3000);
        let text = &full[..full.len() - 200];

        let repaired = repair(text, DEFAULT_MAX_TRIMS).unwrap();
        assert_eq!(repaired.trimmed_lines, 0);
        assert!(repaired.snapshot.is_empty());
    }

    #[test]
    fn test_garbage_after_large_dump_is_cut_in_one_step() {
        let full = large_dump(3000);
        let text = format!("{}\nerror: lost connection\n{{\n\"id\": 1,\n", full);

        let repaired = repair(&text, DEFAULT_MAX_TRIMS).unwrap();
        assert_eq!(repaired.trimmed_lines, 4);
        assert_eq!(repaired.snapshot.len(), 3000);
    }
}
