//! discord-bridge - route application audio into the Discord capture node
//!
//! This is the main entry point for discord-bridge.

mod bridge;
mod cli;
mod console;
mod graph;
mod models;
mod prompt;
mod settings;
mod shutdown;
mod state;
mod tokio_runtime;
mod trigger;

use clap::Parser;
use log::info;
use settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command-line arguments and initialize logging
    let args = cli::Args::parse();
    cli::init_logging(&args);

    let settings = Settings::from_args(&args);
    info!("Starting discord-bridge for {:?}", settings.source_names);

    match tokio_runtime::block_on(bridge::run(settings)) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            console::error(&e.to_string());
            if let Some(hint) = e.hint() {
                console::hint(hint);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            console::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
