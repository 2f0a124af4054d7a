//! # Scheduler Coordinator
//!
//! The coordinator owns the fixed-size worker pool and one policy instance,
//! routes externally submitted work through the policy, and drives the
//! shutdown protocol.
//!
//! ## Shutdown Protocol
//!
//! Terminating the pool cannot assume which worker executes which submission:
//! a stealing policy may relocate any job, including the shutdown signal
//! itself. The protocol therefore tracks *execution* identity instead of
//! submission targets:
//!
//! 1. Build one shared sentinel whose `resume` records the identity of
//!    whichever worker executes it, signals the draining thread, and returns
//!    `ShutdownExecutionUnit` so that worker terminates immediately after.
//! 2. Keep a set of alive worker indices. Submit the sentinel to any member,
//!    block until the sentinel reports *some* executing worker, and remove
//!    the reported identity — not the submission target — from the set.
//! 3. Repeat until the set is empty. A reported worker is guaranteed dead, so
//!    it is never resubmitted to; a relocated sentinel merely drains a
//!    different member first.
//! 4. Stop utility actors via the host, join every worker thread (each has
//!    self-terminated already), then drain all remaining queued resumables
//!    through their cleanup hook so nothing is leaked or executed twice.
//!
//! The sentinel's mutable state is one `Mutex<Option<usize>>` plus condvar;
//! the take-and-reset read consumes exactly one report per submission and the
//! lock provides the happens-before edge between executor and drainer.

use std::collections::BTreeSet;
use std::sync::{Arc, Condvar, Mutex, OnceLock, Weak};

use tracing::{debug, trace};

use spindle_api::{
    ExecutionUnit, NoopHost, Resumable, ResumableRef, ResumeResult, SchedulerError, SchedulerHost,
};

use crate::config::SchedulerConfig;
use crate::policy::Policy;
use crate::worker::Worker;

/// Pool owner and startup/shutdown orchestrator, generic over the dispatch
/// policy.
///
/// # Lifecycle
/// `start()` allocates and launches the pool exactly once; `enqueue()` is
/// valid only while running; `stop()` performs a one-time drain-and-join.
/// Calling `enqueue()` after `stop()` returns, or `stop()` twice, is a caller
/// error that is deliberately not defended at runtime.
pub struct Coordinator<P: Policy> {
    config: SchedulerConfig,

    /// The coordinator's own policy instance; workers carry clones.
    policy: P,

    /// Policy-defined coordinator-level shared state.
    data: P::CoordinatorData,

    /// Write-once worker pool. Fully populated before any thread starts, and
    /// never mutated again, so concurrent sibling lookups need no locks.
    workers: OnceLock<Vec<Arc<Worker<P>>>>,

    /// Weak handle to ourselves, installed at construction; workers keep
    /// clones of it for sibling lookup.
    self_ref: Weak<Self>,

    host: Arc<dyn SchedulerHost>,
}

impl<P: Policy> Coordinator<P> {
    /// Creates a coordinator bound to `host` with a default-constructed
    /// policy. Workers do not exist until `start()`.
    pub fn new(config: SchedulerConfig, host: Arc<dyn SchedulerHost>) -> Arc<Self> {
        Self::with_policy(P::default(), config, host)
    }

    /// Creates a coordinator around a pre-configured policy value.
    pub fn with_policy(policy: P, config: SchedulerConfig, host: Arc<dyn SchedulerHost>) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            config,
            policy,
            data: P::CoordinatorData::default(),
            workers: OnceLock::new(),
            self_ref: self_ref.clone(),
            host,
        })
    }

    /// Standalone coordinator with default configuration and no host hooks.
    pub fn with_defaults() -> Arc<Self> {
        Self::new(SchedulerConfig::default(), Arc::new(NoopHost))
    }

    /// Allocates and launches the worker pool; irreversible.
    ///
    /// All workers are constructed before any thread starts, which makes
    /// sibling lookups race-free from the first executed instruction of any
    /// worker. Generic startup of the host system runs last.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let num_workers = self.config.num_workers.max(1);
        let mut pool = Vec::with_capacity(num_workers);
        for id in 0..num_workers {
            pool.push(Arc::new(Worker::new(
                id,
                self.self_ref.clone(),
                self.policy.clone(),
                self.config.max_throughput,
            )));
        }
        self.workers
            .set(pool)
            .map_err(|_| SchedulerError::AlreadyStarted)?;
        for worker in self.workers() {
            Arc::clone(worker).start()?;
        }
        debug!(num_workers, "scheduler started");
        self.host.on_start();
        Ok(())
    }

    /// Thread-safe submission of external work; delegates to the policy's
    /// central enqueue. Valid only between `start()` and `stop()`.
    pub fn enqueue(&self, job: ResumableRef) {
        self.policy.central_enqueue(self, job);
    }

    /// Drains and terminates every worker exactly once, then releases all
    /// still-queued resumables. Callable at most once; always terminates
    /// under a policy honoring the liveness contract.
    pub fn stop(&self) {
        let sentinel = Arc::new(ShutdownSentinel::default());
        let mut alive: BTreeSet<usize> = (0..self.num_workers()).collect();
        debug!(workers = alive.len(), "draining worker pool");
        while let Some(&target) = alive.iter().next() {
            let job: ResumableRef = Arc::clone(&sentinel) as ResumableRef;
            self.worker_by_id(target).external_enqueue(job);
            // Stealing may have relocated the sentinel, so the reporting
            // worker is not necessarily the submission target.
            let executed_by = sentinel.await_report();
            alive.remove(&executed_by);
            trace!(
                submitted_to = target,
                executed_by,
                remaining = alive.len(),
                "sentinel executed"
            );
        }
        // Utility actors go down after the pool stops executing jobs and
        // before threads are reaped.
        self.host.on_stop();
        for worker in self.workers() {
            worker.join();
        }
        let mut release = |job: ResumableRef| job.cleanup();
        for worker in self.workers() {
            self.policy.foreach_resumable(worker, &mut release);
        }
        self.policy.foreach_central_resumable(self, &mut release);
        debug!("scheduler stopped");
    }

    /// Non-owning access to worker `id`.
    ///
    /// Panics if called before `start()` or with `id >= num_workers`; both
    /// are caller errors per the lifecycle contract.
    pub fn worker_by_id(&self, id: usize) -> &Arc<Worker<P>> {
        &self.workers()[id]
    }

    /// The policy's coordinator-level shared state.
    pub fn data(&self) -> &P::CoordinatorData {
        &self.data
    }

    /// The coordinator's policy instance.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Size of the pool; fixed after `start()`.
    pub fn num_workers(&self) -> usize {
        self.workers().len()
    }

    /// Step budget handed to every resume invocation.
    pub fn max_throughput(&self) -> usize {
        self.config.max_throughput
    }

    fn workers(&self) -> &[Arc<Worker<P>>] {
        self.workers.get().expect("scheduler not started")
    }
}

/// Reusable control resumable driving orderly shutdown; exempt from the
/// ordinary release rules (its `cleanup` is the default no-op and it is never
/// left in a queue once `stop()` returns).
#[derive(Default)]
struct ShutdownSentinel {
    /// Identity of the most recent executor; `None` between a take and the
    /// next execution.
    last_worker: Mutex<Option<usize>>,
    reported: Condvar,
}

impl ShutdownSentinel {
    /// Blocks until some worker has executed the sentinel, consuming the
    /// report so each submission yields exactly one observation.
    fn await_report(&self) -> usize {
        let guard = self.last_worker.lock().unwrap();
        let mut guard = self
            .reported
            .wait_while(guard, |last| last.is_none())
            .unwrap();
        guard.take().expect("sentinel report consumed while held")
    }
}

impl Resumable for ShutdownSentinel {
    fn resume(&self, unit: &dyn ExecutionUnit, _max_steps: usize) -> ResumeResult {
        trace!(worker_id = unit.id(), "shutdown sentinel executed");
        let mut last = self.last_worker.lock().unwrap();
        *last = Some(unit.id());
        self.reported.notify_all();
        ResumeResult::ShutdownExecutionUnit
    }
}
