use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use spindle::{ExecutionUnit, Resumable, ResumableRef, ResumeResult, SchedulerHost};

/// Default timeout for waiting on scheduler-side effects in milliseconds
pub const DEFAULT_WAIT_TIME: u64 = 5000;

/// Polls `cond` until it holds or `timeout` elapses; returns the final value.
pub fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}

/// Job that counts how often it is executed and how often it is released
/// unexecuted, plus a shared execution total across a whole batch.
pub struct CountingJob {
    pub executions: AtomicUsize,
    pub cleanups: AtomicUsize,
    total_executed: Arc<AtomicUsize>,
}

impl CountingJob {
    pub fn new(total_executed: Arc<AtomicUsize>) -> Arc<Self> {
        Arc::new(Self {
            executions: AtomicUsize::new(0),
            cleanups: AtomicUsize::new(0),
            total_executed,
        })
    }

    pub fn batch(count: usize, total_executed: &Arc<AtomicUsize>) -> Vec<Arc<Self>> {
        (0..count)
            .map(|_| Self::new(Arc::clone(total_executed)))
            .collect()
    }

    /// Coerces the job to the trait object the scheduler consumes.
    pub fn as_job(job: &Arc<Self>) -> ResumableRef {
        Arc::clone(job) as ResumableRef
    }
}

impl Resumable for CountingJob {
    fn resume(&self, _unit: &dyn ExecutionUnit, _max_steps: usize) -> ResumeResult {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.total_executed.fetch_add(1, Ordering::SeqCst);
        ResumeResult::Done
    }

    fn cleanup(&self) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

/// Host that records how often its lifecycle hooks fire.
#[derive(Default)]
pub struct RecordingHost {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
}

impl SchedulerHost for RecordingHost {
    fn on_start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
