//! # Worker Thread Implementation
//!
//! Each worker owns exactly one OS thread and runs a loop that fetches
//! resumables through the scheduler's policy and executes them. Where a job
//! comes from — the worker's own queue, the central queue, or a sibling's
//! queue via stealing — is entirely the policy's business; the loop only
//! interprets the result of each resume.
//!
//! ## Run Loop
//! 1. Block in `Policy::dequeue` until a job is available
//! 2. Resume the job with the configured step budget
//! 3. `Done` / `AwaitingMoreWork`: drop this thread's reference
//! 4. `ResumeLater`: requeue the job locally and continue
//! 5. `ShutdownExecutionUnit`: terminate the loop, ending the thread

use std::sync::{Arc, Mutex, Weak};
use std::thread;

use tracing::{trace, warn};

use spindle_api::{ExecutionUnit, ResumableRef, ResumeResult, SchedulerError};

use crate::coordinator::Coordinator;
use crate::policy::Policy;

/// One thread-owning execution unit of the pool.
pub struct Worker<P: Policy> {
    /// Index of this worker, in `[0, num_workers)`.
    id: usize,

    /// Back-reference for sibling lookup during stealing. Weak, because the
    /// coordinator owns the workers.
    coordinator: Weak<Coordinator<P>>,

    /// Step budget handed to every resume invocation.
    max_throughput: usize,

    /// This worker's own policy instance; policy state lives in `data`.
    policy: P,

    /// Worker-local policy state (queues, counters, ...).
    data: P::WorkerData,

    /// Handle of the owning thread, present between `start` and `join`.
    thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl<P: Policy> Worker<P> {
    pub(crate) fn new(
        id: usize,
        coordinator: Weak<Coordinator<P>>,
        policy: P,
        max_throughput: usize,
    ) -> Self {
        Self {
            id,
            coordinator,
            max_throughput,
            policy,
            data: P::WorkerData::default(),
            thread: Mutex::new(None),
        }
    }

    /// Index of this worker within the pool.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Worker-local policy state, mutated only through the policy's own
    /// operations.
    pub fn data(&self) -> &P::WorkerData {
        &self.data
    }

    /// The owning coordinator.
    ///
    /// The coordinator joins this worker's thread before it is dropped, so a
    /// failed upgrade means the caller broke the lifecycle contract.
    pub fn coordinator(&self) -> Arc<Coordinator<P>> {
        self.coordinator
            .upgrade()
            .expect("coordinator dropped while worker still in use")
    }

    /// Thread-safe insertion of a job into this worker's queue, callable
    /// from any thread. This is the single hook both stealing and shutdown
    /// rely on.
    pub fn external_enqueue(&self, job: ResumableRef) {
        self.policy.external_enqueue(self, job);
    }

    /// Spawns the owning thread and begins the run loop.
    pub(crate) fn start(self: Arc<Self>) -> Result<(), SchedulerError> {
        let worker = Arc::clone(&self);
        let handle = thread::Builder::new()
            .name(format!("spindle-worker-{}", self.id))
            .spawn(move || worker.run())
            .map_err(|source| SchedulerError::ThreadSpawn {
                worker_id: self.id,
                source,
            })?;
        *self.thread.lock().unwrap() = Some(handle);
        Ok(())
    }

    /// Joins the owning thread. Safe to call after the worker has executed
    /// the shutdown sentinel; the thread self-terminates right after.
    pub(crate) fn join(&self) {
        if let Some(handle) = self.thread.lock().unwrap().take() {
            if handle.join().is_err() {
                warn!(worker_id = self.id, "worker thread panicked");
            }
        }
    }

    fn run(&self) {
        trace!(worker_id = self.id, "worker loop started");
        loop {
            let job = self.policy.dequeue(self);
            match job.resume(self, self.max_throughput) {
                ResumeResult::Done | ResumeResult::AwaitingMoreWork => {}
                ResumeResult::ResumeLater => self.policy.internal_enqueue(self, job),
                ResumeResult::ShutdownExecutionUnit => break,
            }
        }
        trace!(worker_id = self.id, "worker loop terminated");
    }
}

impl<P: Policy> ExecutionUnit for Worker<P> {
    fn id(&self) -> usize {
        self.id
    }

    fn enqueue(&self, job: ResumableRef) {
        self.policy.internal_enqueue(self, job);
    }
}
