//! Work-sharing dispatch policy.
//!
//! The simplest correct strategy: one central queue guarded by a mutex and a
//! condition variable. Every enqueue path feeds the central queue and idle
//! workers block on the condvar, so there is nothing to steal and no
//! per-worker state at all. Throughput is bounded by contention on the one
//! lock, which makes this policy a good baseline and a poor default.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use spindle_api::ResumableRef;

use crate::coordinator::Coordinator;
use crate::policy::Policy;
use crate::worker::Worker;

/// Central job queue shared by the whole pool.
pub struct SharedJobQueue {
    jobs: Mutex<VecDeque<ResumableRef>>,
    available: Condvar,
}

impl Default for SharedJobQueue {
    fn default() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }
}

impl SharedJobQueue {
    fn push(&self, job: ResumableRef) {
        self.jobs.lock().unwrap().push_back(job);
        self.available.notify_one();
    }

    fn pop_blocking(&self) -> ResumableRef {
        let mut jobs = self.jobs.lock().unwrap();
        loop {
            if let Some(job) = jobs.pop_front() {
                return job;
            }
            jobs = self.available.wait(jobs).unwrap();
        }
    }

    fn drain_into(&self, f: &mut dyn FnMut(ResumableRef)) {
        // Take everything under one lock, invoke callbacks outside it.
        let drained: Vec<ResumableRef> = self.jobs.lock().unwrap().drain(..).collect();
        for job in drained {
            f(job);
        }
    }

    /// Number of queued jobs; a snapshot that may be stale immediately.
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dispatch policy routing all work through one central blocking queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkSharing;

impl Policy for WorkSharing {
    type CoordinatorData = SharedJobQueue;
    type WorkerData = ();

    fn central_enqueue(&self, coordinator: &Coordinator<Self>, job: ResumableRef) {
        coordinator.data().push(job);
    }

    fn external_enqueue(&self, worker: &Worker<Self>, job: ResumableRef) {
        // Per-worker targeting degenerates to the central queue; any worker
        // picking the job up satisfies the delivery contract.
        worker.coordinator().data().push(job);
    }

    fn internal_enqueue(&self, worker: &Worker<Self>, job: ResumableRef) {
        worker.coordinator().data().push(job);
    }

    fn dequeue(&self, worker: &Worker<Self>) -> ResumableRef {
        worker.coordinator().data().pop_blocking()
    }

    fn foreach_resumable(&self, _worker: &Worker<Self>, _f: &mut dyn FnMut(ResumableRef)) {
        // No worker-local queues.
    }

    fn foreach_central_resumable(
        &self,
        coordinator: &Coordinator<Self>,
        f: &mut dyn FnMut(ResumableRef),
    ) {
        coordinator.data().drain_into(f);
    }
}
