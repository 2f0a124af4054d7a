//! # Resumable Work Units
//!
//! A `Resumable` is the unit of work the scheduler moves between threads.
//! Ownership is shared: whichever queue currently holds the job and whichever
//! thread is currently executing it each hold a strong reference, and the job
//! lives as long as its longest holder. A job is present in at most one queue
//! at any instant, even while a steal operation relocates it.

use std::sync::Arc;

use crate::execution::ExecutionUnit;

/// Outcome of a single `resume` invocation.
///
/// The executing worker inspects this value to decide what happens to the job
/// and to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeResult {
    /// The job has finished and must not be scheduled again.
    Done,

    /// The job used up its step budget but has more work pending; the worker
    /// requeues it locally and moves on.
    ResumeLater,

    /// The job is blocked until new input arrives; whoever produces that
    /// input is responsible for rescheduling it.
    AwaitingMoreWork,

    /// The executing worker must terminate its run loop immediately after
    /// this resume returns. This is the only termination primitive in the
    /// system; it shuts down the worker, never a specific job.
    ShutdownExecutionUnit,
}

/// A schedulable unit of work.
///
/// Implementations are shared between queues and executing threads via
/// [`ResumableRef`], so any mutable state must use interior mutability.
pub trait Resumable: Send + Sync {
    /// Executes up to `max_steps` units of work on the calling worker thread.
    ///
    /// `unit` identifies the executing worker and lets the job schedule
    /// follow-up work on it.
    fn resume(&self, unit: &dyn ExecutionUnit, max_steps: usize) -> ResumeResult;

    /// Invoked exactly once for a job that is still sitting in a queue when
    /// the scheduler shuts down. Such a job is never resumed; this hook is
    /// its only notification. The default does nothing.
    fn cleanup(&self) {}
}

/// Shared-ownership handle to a [`Resumable`].
pub type ResumableRef = Arc<dyn Resumable>;
