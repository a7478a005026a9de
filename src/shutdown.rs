//! Cooperative shutdown signalling.
//!
//! The generation loop only looks at the signal between iterations and while
//! pacing, so an in-flight batch always completes or fails on its own.

use tokio::sync::watch;
use tracing::{info, warn};

/// Receiving side, held by the generation loop.
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

/// Sending side.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl ShutdownSignal {
    pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, ShutdownSignal { rx })
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested. Never resolves if the
    /// trigger is dropped without firing.
    pub async fn triggered(&mut self) {
        let result = self.rx.wait_for(|requested| *requested).await.map(|_| ());
        if result.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Sets up the process signal handler (Ctrl+C, and SIGTERM on unix).
pub fn setup_shutdown_handler() -> ShutdownSignal {
    let (trigger, signal) = ShutdownSignal::channel();

    tokio::spawn(async move {
        if wait_for_signal().await {
            info!("Received interrupt signal");
            trigger.trigger();
        }
    });

    signal
}

/// Returns `false` if no handler could be installed.
#[cfg(unix)]
async fn wait_for_signal() -> bool {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                result = tokio::signal::ctrl_c() => log_ctrl_c(result),
                _ = terminate.recv() => true,
            }
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            log_ctrl_c(tokio::signal::ctrl_c().await)
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> bool {
    log_ctrl_c(tokio::signal::ctrl_c().await)
}

fn log_ctrl_c(result: std::io::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to install Ctrl+C handler: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_is_observed() {
        let (trigger, mut signal) = ShutdownSignal::channel();
        assert!(!signal.is_triggered());

        trigger.trigger();

        assert!(signal.is_triggered());
        tokio::time::timeout(Duration::from_secs(1), signal.triggered())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_trigger_never_fires() {
        let (trigger, mut signal) = ShutdownSignal::channel();
        drop(trigger);

        assert!(!signal.is_triggered());
        let waited = tokio::time::timeout(Duration::from_millis(20), signal.triggered()).await;
        assert!(waited.is_err());
    }
}
