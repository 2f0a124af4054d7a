//! Work-stealing dispatch policy.
//!
//! Each worker owns a FIFO deque plus a lock-free external inbox; externally
//! submitted work lands in the coordinator's central injector. An idle worker
//! polls local deque, inbox, injector, then a pseudo-randomly chosen victim's
//! deque, backing off through three phases (spin, short sleep, long sleep) so
//! an empty pool does not burn CPU.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crossbeam_deque::{Injector, Steal, Stealer, Worker as Deque};
use crossbeam_queue::SegQueue;

use spindle_api::ResumableRef;

use crate::coordinator::Coordinator;
use crate::policy::Policy;
use crate::worker::Worker;

/// Dispatch policy with per-worker deques and opportunistic stealing.
#[derive(Debug, Clone)]
pub struct WorkStealing {
    /// Poll attempts spent spinning before the first sleep.
    aggressive_poll_attempts: u64,

    /// Poll attempts (including the aggressive phase) before switching to
    /// the relaxed sleep interval.
    moderate_poll_attempts: u64,

    /// Sleep between polls in the moderate phase.
    moderate_sleep: Duration,

    /// Sleep between polls once the worker is fully relaxed.
    relaxed_sleep: Duration,
}

impl Default for WorkStealing {
    fn default() -> Self {
        Self {
            aggressive_poll_attempts: 100,
            moderate_poll_attempts: 500,
            moderate_sleep: Duration::from_micros(50),
            relaxed_sleep: Duration::from_millis(10),
        }
    }
}

impl WorkStealing {
    /// Creates a policy with custom backoff intervals.
    pub fn new(
        aggressive_poll_attempts: u64,
        moderate_poll_attempts: u64,
        moderate_sleep: Duration,
        relaxed_sleep: Duration,
    ) -> Self {
        Self {
            aggressive_poll_attempts,
            moderate_poll_attempts,
            moderate_sleep,
            relaxed_sleep,
        }
    }

    fn try_dequeue(
        &self,
        coordinator: &Coordinator<Self>,
        worker: &Worker<Self>,
    ) -> Option<ResumableRef> {
        let data = worker.data();

        if let Some(job) = data.local.lock().unwrap().pop() {
            return Some(job);
        }

        // Stealing victims and the shutdown sentinel both arrive here, so
        // this queue must be polled on every round.
        if let Some(job) = data.external.pop() {
            return Some(job);
        }

        {
            let local = data.local.lock().unwrap();
            loop {
                match coordinator.data().injector.steal_batch_and_pop(&local) {
                    Steal::Success(job) => return Some(job),
                    Steal::Empty => break,
                    Steal::Retry => {}
                }
            }
        }

        let num_workers = coordinator.num_workers();
        if num_workers > 1 {
            let victim = self.next_victim(worker, num_workers);
            if victim != worker.id() {
                loop {
                    match coordinator.worker_by_id(victim).data().stealer.steal() {
                        Steal::Success(job) => return Some(job),
                        Steal::Empty => break,
                        Steal::Retry => {}
                    }
                }
            }
        }

        None
    }

    /// Xorshift-based victim selection, seeded per worker on first use.
    fn next_victim(&self, worker: &Worker<Self>, num_workers: usize) -> usize {
        let data = worker.data();
        let mut state = data.rng_state.load(Ordering::Relaxed);
        if state == 0 {
            state = 0x9E37_79B9_7F4A_7C15 ^ ((worker.id() as u64 + 1) << 17);
        }
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.rng_state.store(state, Ordering::Relaxed);
        (state as usize) % num_workers
    }
}

/// Coordinator-level state: the central injector all producers feed.
pub struct StealingCoordinatorData {
    injector: Injector<ResumableRef>,
}

impl Default for StealingCoordinatorData {
    fn default() -> Self {
        Self {
            injector: Injector::new(),
        }
    }
}

/// Worker-local state: FIFO deque, steal handle, external inbox.
pub struct StealingWorkerData {
    /// Thread-safe inbox for jobs pushed at this worker from other threads.
    external: SegQueue<ResumableRef>,

    /// Local run queue. Only the owning thread ever locks this mutex; it
    /// exists to satisfy `Sync`, thieves go through `stealer` instead.
    local: Mutex<Deque<ResumableRef>>,

    /// Lock-free steal handle onto `local`, used by sibling workers.
    stealer: Stealer<ResumableRef>,

    /// Xorshift state for victim selection; 0 means "not yet seeded".
    rng_state: AtomicU64,
}

impl Default for StealingWorkerData {
    fn default() -> Self {
        let local = Deque::new_fifo();
        let stealer = local.stealer();
        Self {
            external: SegQueue::new(),
            local: Mutex::new(local),
            stealer,
            rng_state: AtomicU64::new(0),
        }
    }
}

impl Policy for WorkStealing {
    type CoordinatorData = StealingCoordinatorData;
    type WorkerData = StealingWorkerData;

    fn central_enqueue(&self, coordinator: &Coordinator<Self>, job: ResumableRef) {
        coordinator.data().injector.push(job);
    }

    fn external_enqueue(&self, worker: &Worker<Self>, job: ResumableRef) {
        worker.data().external.push(job);
    }

    fn internal_enqueue(&self, worker: &Worker<Self>, job: ResumableRef) {
        worker.data().local.lock().unwrap().push(job);
    }

    fn dequeue(&self, worker: &Worker<Self>) -> ResumableRef {
        let coordinator = worker.coordinator();
        let mut attempts: u64 = 0;
        loop {
            if let Some(job) = self.try_dequeue(&coordinator, worker) {
                return job;
            }
            attempts += 1;
            if attempts < self.aggressive_poll_attempts {
                std::hint::spin_loop();
            } else if attempts < self.moderate_poll_attempts {
                thread::sleep(self.moderate_sleep);
            } else {
                thread::sleep(self.relaxed_sleep);
            }
        }
    }

    fn foreach_resumable(&self, worker: &Worker<Self>, f: &mut dyn FnMut(ResumableRef)) {
        let data = worker.data();
        while let Some(job) = data.external.pop() {
            f(job);
        }
        let local = data.local.lock().unwrap();
        while let Some(job) = local.pop() {
            f(job);
        }
    }

    fn foreach_central_resumable(
        &self,
        coordinator: &Coordinator<Self>,
        f: &mut dyn FnMut(ResumableRef),
    ) {
        loop {
            match coordinator.data().injector.steal() {
                Steal::Success(job) => f(job),
                Steal::Empty => break,
                Steal::Retry => {}
            }
        }
    }
}
