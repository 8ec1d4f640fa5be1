//! Tokio runtime for the bridging run
//!
//! Everything runs on one foreground task; the only other task is the
//! Ctrl+C listener. A current-thread runtime is all that needs.

use anyhow::Context;
use std::future::Future;
use tokio::runtime::Runtime;

/// Build the runtime: current thread, with timers and signal handling
pub fn build() -> anyhow::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")
}

/// Drive `future` to completion on a fresh runtime
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    Ok(build()?.block_on(future))
}
