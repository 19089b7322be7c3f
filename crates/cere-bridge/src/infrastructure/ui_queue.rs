//! Serial task queue standing in for the platform UI thread.
//!
//! Web views only accept calls from, and deliver callbacks on, one thread.
//! [`UiQueue`] models that context: a single tokio task drains an unbounded
//! channel of boxed closures and runs them strictly in posting order.  Posting
//! never blocks, so requests stay fire-and-forget for the caller.
//!
//! ```text
//! post(task A) ─┐
//! post(task B) ─┼─▶ mpsc ─▶ [ui task] runs A, then B, then C
//! post(task C) ─┘
//! ```

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// A unit of work for the UI context.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// The UI task has stopped, so nothing more can be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ui queue is closed")]
pub struct UiQueueClosed;

/// Handle for posting work onto the serial UI context.
///
/// Cloning the handle is cheap; the UI task stops once every handle has been
/// dropped and the queue is drained.
#[derive(Clone)]
pub struct UiQueue {
    tx: mpsc::UnboundedSender<UiTask>,
}

impl UiQueue {
    /// Spawns the UI task on the current tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiTask>();
        let worker = tokio::spawn(async move {
            debug!("ui queue started");
            while let Some(task) = rx.recv().await {
                task();
            }
            debug!("ui queue stopped");
        });
        (Self { tx }, worker)
    }

    /// Posts `task` to run after everything posted before it.
    ///
    /// # Errors
    ///
    /// Returns [`UiQueueClosed`] if the UI task has stopped.
    pub fn post<F>(&self, task: F) -> Result<(), UiQueueClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx.send(Box::new(task)).map_err(|_| UiQueueClosed)
    }

    /// Waits until every task posted before this call has run.
    ///
    /// Tasks posted *by* those tasks land behind the flush marker; flush
    /// again to wait for them too.
    ///
    /// # Errors
    ///
    /// Returns [`UiQueueClosed`] if the UI task stopped first.
    pub async fn flush(&self) -> Result<(), UiQueueClosed> {
        let (done_tx, done_rx) = oneshot::channel();
        self.post(move || {
            let _ = done_tx.send(());
        })?;
        done_rx.await.map_err(|_| UiQueueClosed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
