//! Graceful shutdown handling.
//!
//! A [`ShutdownTrigger`] / [`ShutdownListener`] pair carries the single outcome
//! that ends the process: a clean request from the termination-signal task, or
//! an error from startup or the serving task. The first outcome posted wins.

use tokio::signal;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::app::AppError;

/// What ended the process: `Ok(())` for a requested shutdown.
pub type ShutdownOutcome = Result<(), AppError>;

/// Create a connected trigger/listener pair.
pub fn channel() -> (ShutdownTrigger, ShutdownListener) {
    let (tx, rx) = mpsc::channel(1);
    (ShutdownTrigger { tx }, ShutdownListener { rx })
}

/// Sending half. Cheap to clone; one clone per producer task.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: mpsc::Sender<ShutdownOutcome>,
}

impl ShutdownTrigger {
    /// Post an outcome without blocking.
    ///
    /// Returns `false` when another outcome was already posted or the listener
    /// is gone; the outcome is dropped in that case.
    pub fn fire(&self, outcome: ShutdownOutcome) -> bool {
        match self.tx.try_send(outcome) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                tracing::debug!(outcome = ?dropped, "Shutdown already requested, dropping outcome");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Receiving half, consumed by the single owner that waits for shutdown.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: mpsc::Receiver<ShutdownOutcome>,
}

impl ShutdownListener {
    /// Block until the first outcome arrives, then close the channel.
    ///
    /// Resolves to `Ok(())` if every trigger is dropped without firing.
    pub async fn wait(mut self) -> ShutdownOutcome {
        let outcome = self.rx.recv().await.unwrap_or(Ok(()));
        self.rx.close();
        outcome
    }
}

/// Spawn the task that turns the first Ctrl+C or SIGTERM into a clean
/// shutdown request. The task exits after posting once.
pub fn listen_for_termination(trigger: ShutdownTrigger) -> JoinHandle<()> {
    tokio::spawn(async move {
        match termination_signal().await {
            Ok(name) => {
                tracing::info!(signal = name, "Received termination signal, initiating shutdown");
                trigger.fire(Ok(()));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handlers");
                trigger.fire(Err(AppError::Signal(e)));
            }
        }
    })
}

#[cfg(unix)]
async fn termination_signal() -> std::io::Result<&'static str> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::select! {
        result = signal::ctrl_c() => result.map(|_| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn termination_signal() -> std::io::Result<&'static str> {
    signal::ctrl_c().await.map(|_| "ctrl-c")
}
