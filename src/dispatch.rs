//! Fire-and-forget execution of host actions.
//!
//! DESIGN
//! ======
//! Actions triggered by gestures are queued on a bounded channel and a single
//! worker task hands each one to the blocking pool, so a slow action never
//! delays touch handling and a burst of taps cannot spawn unbounded work.
//! The caller only learns whether the action was queued, and successive
//! actions may finish in any order.
//!
//! ERROR HANDLING
//! ==============
//! A full or closed queue drops the action with a warning. A panicking action
//! is contained by its blocking task and logged; the worker keeps running.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

/// A host callback. Actions may run many times, each on a background thread.
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// Wrap a closure as an [`Action`].
pub fn action<F>(f: F) -> Action
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("action queue full (capacity {capacity})")]
    QueueFull { capacity: usize },
    #[error("action queue closed")]
    Closed,
}

/// Sender side of the action queue.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<Action>,
    capacity: usize,
}

impl Dispatcher {
    /// Start the worker on `runtime` with a queue of `capacity` actions.
    #[must_use]
    pub fn spawn(runtime: &Handle, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, mut rx) = mpsc::channel::<Action>(capacity);
        info!(capacity, "action dispatcher started");

        runtime.spawn(async move {
            while let Some(action) = rx.recv().await {
                let task = tokio::task::spawn_blocking(move || action());
                tokio::spawn(async move {
                    if let Err(e) = task.await {
                        error!(error = %e, "dispatched action failed");
                    }
                });
            }
            debug!("action dispatcher stopped");
        });

        Self { tx, capacity }
    }

    /// Queue `action` without waiting.
    pub fn submit(&self, action: Action) -> Result<(), DispatchError> {
        match self.tx.try_send(action) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(capacity = self.capacity, "action queue full; dropping action");
                Err(DispatchError::QueueFull { capacity: self.capacity })
            }
            Err(TrySendError::Closed(_)) => {
                warn!("action queue closed; dropping action");
                Err(DispatchError::Closed)
            }
        }
    }

    /// Queue `action` if there is one. Returns whether an action was accepted;
    /// failures are already logged by [`Dispatcher::submit`].
    pub fn dispatch(&self, action: Option<&Action>) -> bool {
        match action {
            Some(action) => self.submit(Arc::clone(action)).is_ok(),
            None => false,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("capacity", &self.capacity).finish_non_exhaustive()
    }
}
