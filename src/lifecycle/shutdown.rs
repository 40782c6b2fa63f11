//! Shutdown coordination between the watcher and the HTTP server.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Broadcasts a single stop notification to every long-running task.
///
/// Tasks subscribe before they are spawned; a task subscribing after
/// [`Shutdown::trigger`] would never hear it.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify all subscribers. Returns how many tasks were listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a background task after shutdown was triggered.
///
/// A task that panicked or was cancelled is logged and yields `None`.
pub async fn join_task<T>(name: &'static str, handle: JoinHandle<T>) -> Option<T> {
    match handle.await {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::error!(task = name, error = %e, "Background task did not finish cleanly");
            None
        }
    }
}
