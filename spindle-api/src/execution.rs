//! Execution-unit view handed to a running job.

use crate::resumable::ResumableRef;

/// The executing worker as seen from inside [`Resumable::resume`].
///
/// [`Resumable::resume`]: crate::resumable::Resumable::resume
pub trait ExecutionUnit {
    /// Index of this unit within the pool, in `[0, num_workers)`.
    fn id(&self) -> usize;

    /// Schedules follow-up work on this unit's local queue.
    fn enqueue(&self, job: ResumableRef);
}
