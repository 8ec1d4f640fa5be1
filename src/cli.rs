//! Command-line interface for discord-bridge
//!
//! Handles argument parsing and logging configuration.

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Bridge application audio into the Discord screen-share capture node
#[derive(Parser, Debug)]
#[command(name = "discord-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source node names to bridge (node.name, e.g. "alsa_playback.osu!").
    /// Without names, pick one of the previously used ones.
    pub names: Vec<String>,

    /// Name of the capture node to link into
    #[arg(long, default_value = "discord_capture")]
    pub capture_node: String,

    /// Name of the node created by the sound player
    #[arg(long, default_value = "alsa_playback.sox")]
    pub sfx_node: String,

    /// Interval between graph polls, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub poll_interval_ms: u64,

    /// How long to wait for the capture node (0 waits forever)
    #[arg(long, default_value_t = 4000)]
    pub capture_timeout_ms: u64,

    /// How long to wait for a sound effect node (0 waits forever)
    #[arg(long, default_value_t = 4000)]
    pub sfx_timeout_ms: u64,

    /// Delay between the leave sound and stopping the browser
    #[arg(long, default_value_t = 4000)]
    pub settle_ms: u64,

    /// Browser executable used to open the capture stream
    #[arg(long, default_value = "chromium")]
    pub browser: PathBuf,

    /// Program used to play sound effects
    #[arg(long, default_value = "play")]
    pub player: PathBuf,

    /// Sound played once the sources are linked
    #[arg(long)]
    pub join_sound: Option<PathBuf>,

    /// Sound played on Ctrl+C before tearing down
    #[arg(long)]
    pub leave_sound: Option<PathBuf>,

    /// Trailing lines dropped at most while repairing a malformed dump
    #[arg(long, default_value_t = 4096)]
    pub max_dump_trims: usize,

    /// Graph dump command
    #[arg(long, default_value = "pw-dump")]
    pub dump_command: String,

    /// Graph link command
    #[arg(long, default_value = "pw-link")]
    pub link_command: String,

    /// File holding previously used source names
    #[arg(long)]
    pub names_file: Option<PathBuf>,

    /// Increase logging verbosity
    /// -v = info, -vv = debug, -vvv = trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get the log level filter based on verbosity flags
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else {
            match self.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}

/// Initialize the logging system based on CLI arguments
pub fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Base level for all modules - keep at warn to suppress noisy deps
    builder.filter_level(LevelFilter::Warn);

    builder.filter_module("discord_bridge", args.log_level());

    builder.format_timestamp_millis().init();
}
