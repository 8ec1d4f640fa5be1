//! Sound effects played into the capture node

use log::{debug, warn};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

/// Background player for sound files.
///
/// Started players are kept until they have exited and been reaped.
#[derive(Debug)]
pub struct SoundPlayer {
    program: PathBuf,
    playing: Mutex<Vec<Child>>,
}

impl SoundPlayer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            playing: Mutex::new(Vec::new()),
        }
    }

    /// Start playing `file` in the background.
    ///
    /// Errors are logged and otherwise ignored; returns whether the player
    /// process started.
    pub fn play(&self, file: &Path) -> bool {
        self.reap();

        let spawned = Command::new(&self.program)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn();

        match spawned {
            Ok(child) => {
                debug!("Playing {} (pid {})", file.display(), child.id());
                if let Ok(mut playing) = self.playing.lock() {
                    playing.push(child);
                }
                true
            }
            Err(e) => {
                warn!("Could not play {} with {}: {}", file.display(), self.program.display(), e);
                false
            }
        }
    }

    /// Reap players that have exited. Returns how many are still running.
    pub fn reap(&self) -> usize {
        let Ok(mut playing) = self.playing.lock() else {
            return 0;
        };

        playing.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Player {} exited: {}", child.id(), status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("Failed to check player {}: {}", child.id(), e);
                false
            }
        });
        playing.len()
    }
}

impl Default for SoundPlayer {
    fn default() -> Self {
        Self::new("play")
    }
}
