//! # Scheduler Error Types
//!
//! Errors here cover lifecycle operations only. Hot-path operations
//! (`enqueue` and the policy queue primitives) are deliberately infallible:
//! per-call validation would add unacceptable cost, so misordered lifecycle
//! calls are a caller error rather than a reported one.

use thiserror::Error;

/// Errors surfaced by scheduler lifecycle operations.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// `start()` was called on a scheduler whose pool already exists.
    ///
    /// Startup is irreversible; the pool is allocated exactly once.
    #[error("scheduler already started")]
    AlreadyStarted,

    /// The operating system refused to spawn a worker thread.
    #[error("failed to spawn thread for worker {worker_id}")]
    ThreadSpawn {
        worker_id: usize,
        #[source]
        source: std::io::Error,
    },

    /// Catch-all for host-specific failures raised from [`SchedulerHost`]
    /// implementations.
    ///
    /// [`SchedulerHost`]: crate::host::SchedulerHost
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
