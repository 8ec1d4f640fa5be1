//! Headless browser that makes the capture node appear
//!
//! The voice-chat client only creates its capture node while some other
//! application plays audio. A headless browser looping a silent page does
//! that without being heard.

use log::{debug, info, warn};
use std::fs;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use uuid::Uuid;

/// HTML page autoplaying `audio` in a loop
pub fn page_html(audio: &Path) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
	<title>Audio Bridge</title>
</head>
<body>
	<audio id="audio" autoplay loop>
		<source src="file://{}" type="audio/wav">
	</audio>
</body>
</html>
"#,
        audio.display()
    )
}

/// The page written for one run; removed on drop
pub struct BridgePage {
    path: PathBuf,
}

impl BridgePage {
    /// Write a uniquely named page into `dir`
    pub fn write(dir: &Path, audio: &Path) -> Result<Self, String> {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

        let path = dir.join(format!("bridge-{}.html", Uuid::new_v4()));
        fs::write(&path, page_html(audio))
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

        debug!("Wrote bridge page {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }
}

impl Drop for BridgePage {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("Could not remove {}: {}", self.path.display(), e);
        }
    }
}

/// A running headless browser, killed on drop
pub struct BrowserProcess {
    child: Option<Child>,
}

impl BrowserProcess {
    /// Start `browser` headless on `url`.
    ///
    /// The browser gets its own process group so the terminal's Ctrl+C does
    /// not reach it before teardown is done with it.
    pub fn spawn(browser: &Path, url: &str) -> Result<Self, String> {
        let child = Command::new(browser)
            .arg("--headless")
            .arg("--autoplay-policy=no-user-gesture-required")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|e| format!("Failed to start {}: {}", browser.display(), e))?;

        info!("Started {} (pid {})", browser.display(), child.id());
        Ok(Self { child: Some(child) })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Kill and reap the browser. Later calls do nothing.
    pub fn kill(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Err(e) = child.kill() {
            warn!("Failed to kill browser (pid {}): {}", child.id(), e);
        }
        match child.wait() {
            Ok(status) => debug!("Browser exited: {}", status),
            Err(e) => warn!("Failed to reap browser: {}", e),
        }
    }
}

impl Drop for BrowserProcess {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_loops_audio() {
        let html = page_html(Path::new("/home/me/.cache/discord_bridge/empty.wav"));
        assert!(html.contains("autoplay loop"));
        assert!(html.contains(r#"src="file:///home/me/.cache/discord_bridge/empty.wav""#));
    }

    #[test]
    fn test_page_is_removed_on_drop() {
        let dir = tempfile::TempDir::new().unwrap();
        let page = BridgePage::write(dir.path(), Path::new("/tmp/empty.wav")).unwrap();
        let path = page.path().to_path_buf();

        assert!(path.exists());
        assert!(page.url().starts_with("file://"));
        drop(page);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_browser_fails_to_spawn() {
        let result = BrowserProcess::spawn(Path::new("/nonexistent/chromium"), "file:///tmp/x.html");
        assert!(result.is_err());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut browser = BrowserProcess::spawn(Path::new("sleep"), "30").unwrap();
        assert!(browser.id().is_some());
        browser.kill();
        browser.kill();
        assert!(browser.id().is_none());
    }

    #[test]
    fn test_drop_kills_running_browser() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let fake = dir.path().join("fake-browser");
        fs::write(&fake, "#!/bin/sh\nexec sleep 30\n").unwrap();
        fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();

        let browser = BrowserProcess::spawn(&fake, "file:///tmp/x.html").unwrap();
        let pid = browser.id().unwrap();
        assert!(Path::new(&format!("/proc/{}", pid)).exists());

        drop(browser);
        assert!(!Path::new(&format!("/proc/{}", pid)).exists());
    }
}
