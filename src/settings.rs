//! Runtime settings resolved from the command line
//!
//! Persistent files live under `~/.cache/discord_bridge/`; the one-time
//! info flag lives in the temp directory.

use crate::cli::Args;
use crate::graph::PollConfig;
use std::path::PathBuf;
use std::time::Duration;

const CACHE_DIR_NAME: &str = "discord_bridge";

/// File names inside the cache directory
mod files {
    pub const NAMES: &str = "previous_src_node_names";
    pub const KEEPALIVE_WAV: &str = "empty.wav";
    pub const INFO_FLAG: &str = "discord_bridge_info_flag";
}

const DEFAULT_JOIN_SOUND: &str = "/usr/share/sounds/freedesktop/stereo/device-added.oga";
const DEFAULT_LEAVE_SOUND: &str = "/usr/share/sounds/freedesktop/stereo/device-removed.oga";

#[derive(Debug, Clone)]
pub struct Settings {
    pub source_names: Vec<String>,
    pub capture_node: String,
    pub sfx_node: String,
    pub capture_poll: PollConfig,
    pub sfx_poll: PollConfig,
    /// Delay between the leave sound and killing the browser
    pub settle: Duration,
    pub browser: PathBuf,
    pub player: PathBuf,
    pub join_sound: PathBuf,
    pub leave_sound: PathBuf,
    pub dump_command: String,
    pub link_command: String,
    pub max_dump_trims: usize,
    pub cache_dir: PathBuf,
    pub names_file: PathBuf,
    pub info_flag: PathBuf,
    pub keepalive_wav: PathBuf,
}

impl Settings {
    pub fn from_args(args: &Args) -> Self {
        let cache_dir = default_cache_dir();
        let interval = Duration::from_millis(args.poll_interval_ms.max(1));

        Self {
            source_names: args.names.clone(),
            capture_node: args.capture_node.clone(),
            sfx_node: args.sfx_node.clone(),
            capture_poll: PollConfig {
                interval,
                timeout: timeout_from_ms(args.capture_timeout_ms),
            },
            sfx_poll: PollConfig {
                interval,
                timeout: timeout_from_ms(args.sfx_timeout_ms),
            },
            settle: Duration::from_millis(args.settle_ms),
            browser: args.browser.clone(),
            player: args.player.clone(),
            join_sound: args
                .join_sound
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_JOIN_SOUND)),
            leave_sound: args
                .leave_sound
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEAVE_SOUND)),
            dump_command: args.dump_command.clone(),
            link_command: args.link_command.clone(),
            max_dump_trims: args.max_dump_trims,
            names_file: args
                .names_file
                .clone()
                .unwrap_or_else(|| cache_dir.join(files::NAMES)),
            info_flag: std::env::temp_dir().join(files::INFO_FLAG),
            keepalive_wav: cache_dir.join(files::KEEPALIVE_WAV),
            cache_dir,
        }
    }
}

/// `~/.cache/discord_bridge`, or `./discord_bridge` without a cache dir
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

/// Zero means no timeout
fn timeout_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
