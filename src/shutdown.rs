//! Run-once shutdown signalling
//!
//! Ctrl+C only triggers the token. The teardown itself runs on the
//! foreground task, so a second interrupt cannot start it twice.

use log::{debug, info};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    triggered: AtomicBool,
    notify: Notify,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger shutdown. Returns `true` only for the first call.
    pub fn trigger(&self) -> bool {
        let first = self
            .inner
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Resolve once [`trigger`](Self::trigger) has been called
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

/// Trigger `token` on every Ctrl+C. Only the first one has an effect.
///
/// The handler is registered before this returns, so an interrupt arriving
/// right after the call already reaches the token.
pub fn listen_for_interrupt(token: ShutdownToken) -> io::Result<JoinHandle<()>> {
    let mut interrupts = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        while interrupts.recv().await.is_some() {
            if token.trigger() {
                info!("Interrupt received, shutting down");
            } else {
                debug!("Already shutting down, ignoring interrupt");
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_fires_once() {
        let token = ShutdownToken::new();
        assert!(!token.is_triggered());
        assert!(token.trigger());
        assert!(!token.trigger());
        assert!(token.clone().is_triggered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_resolves_after_trigger() {
        let token = ShutdownToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), token.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_after_trigger_returns_immediately() {
        let token = ShutdownToken::new();
        token.trigger();
        token.wait().await;
    }

    #[tokio::test]
    async fn test_interrupt_triggers_token() {
        let token = ShutdownToken::new();
        let _listener = listen_for_interrupt(token.clone()).unwrap();

        let status = std::process::Command::new("kill")
            .arg("-INT")
            .arg(std::process::id().to_string())
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), token.wait())
            .await
            .unwrap();
    }
}
