//! # Dispatch Policies
//!
//! A policy defines the queue shapes and the dispatch, steal, and drain
//! operations of the scheduler; the coordinator and its workers are generic
//! over one. Policies themselves are cheap, cloneable configuration values:
//! every worker carries its own instance, and all mutable state lives in the
//! associated data types.
//!
//! Two policies ship with the crate: [`WorkStealing`] (per-worker deques with
//! opportunistic stealing) and [`WorkSharing`] (one central blocking queue).

pub mod work_sharing;
pub mod work_stealing;

pub use work_sharing::WorkSharing;
pub use work_stealing::WorkStealing;

use spindle_api::ResumableRef;

use crate::coordinator::Coordinator;
use crate::worker::Worker;

/// Strategy defining how resumables flow through the pool.
///
/// # Thread Safety
/// `central_enqueue` and `external_enqueue` must tolerate arbitrary
/// concurrent callers, concurrently with workers draining their queues. The
/// coordinator does not add any locking of its own around policy operations.
///
/// # Liveness Contract
/// Every job handed to `central_enqueue` or `external_enqueue` on a worker
/// whose run loop is still alive must eventually be returned from some live
/// worker's `dequeue`, even when steal operations relocate it. The
/// coordinator's shutdown protocol depends on this and cannot detect a
/// violation: a policy that strands a job causes `stop()` to block forever.
pub trait Policy: Clone + Default + Send + Sync + Sized + 'static {
    /// Coordinator-level shared state, e.g. a central queue.
    type CoordinatorData: Default + Send + Sync;

    /// Worker-local state, e.g. a local queue plus its steal handle.
    type WorkerData: Default + Send + Sync;

    /// Places externally submitted work where some worker will eventually
    /// discover it.
    fn central_enqueue(&self, coordinator: &Coordinator<Self>, job: ResumableRef);

    /// Thread-safe insertion targeting one specific worker.
    fn external_enqueue(&self, worker: &Worker<Self>, job: ResumableRef);

    /// Insertion from the worker's own thread (requeues, follow-up work).
    fn internal_enqueue(&self, worker: &Worker<Self>, job: ResumableRef);

    /// Blocks the calling worker thread until a job is available, covering
    /// local dequeue, central-queue drain, and stealing from siblings.
    fn dequeue(&self, worker: &Worker<Self>) -> ResumableRef;

    /// Drains every currently-queued, unexecuted resumable of `worker` into
    /// `f`. Shutdown-cleanup only, never on the hot path.
    fn foreach_resumable(&self, worker: &Worker<Self>, f: &mut dyn FnMut(ResumableRef));

    /// Drains every resumable still in coordinator-level queues into `f`.
    /// Shutdown-cleanup only.
    fn foreach_central_resumable(
        &self,
        coordinator: &Coordinator<Self>,
        f: &mut dyn FnMut(ResumableRef),
    );
}
