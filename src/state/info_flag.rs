//! One-time hint marker
//!
//! The hint about passing several source names is printed on the first run
//! only. A flag file records that it was shown.

use log::debug;
use std::fs;
use std::path::PathBuf;

const FLAG_CONTENTS: &str = "INFO_DISPLAYED";

pub struct InfoFlag {
    path: PathBuf,
}

impl InfoFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_set(&self) -> bool {
        self.path.exists()
    }

    /// Run `show` unless the flag is already set, then set it.
    ///
    /// Returns whether `show` ran. Failing to write the flag only means the
    /// hint shows again next time.
    pub fn show_once(&self, show: impl FnOnce()) -> bool {
        if self.is_set() {
            return false;
        }

        show();

        if let Err(e) = fs::write(&self.path, FLAG_CONTENTS) {
            debug!("Could not write info flag {}: {}", self.path.display(), e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_only_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let flag = InfoFlag::new(dir.path().join("info_flag"));
        let mut shown = 0;

        assert!(flag.show_once(|| shown += 1));
        assert!(!flag.show_once(|| shown += 1));
        assert_eq!(shown, 1);
        assert!(flag.is_set());
    }

    #[test]
    fn test_unwritable_flag_still_shows() {
        let dir = tempfile::TempDir::new().unwrap();
        let flag = InfoFlag::new(dir.path().join("missing_dir").join("info_flag"));

        assert!(flag.show_once(|| {}));
        assert!(flag.show_once(|| {}));
    }
}
