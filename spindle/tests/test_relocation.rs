// Shutdown correctness under a policy that relocates targeted submissions.
//
// The policy below hands every job submitted at worker 0 to a shared board
// that worker 1 polls far more eagerly than worker 0 does. While worker 1 is
// alive it therefore executes jobs addressed to worker 0, which is exactly
// the race the coordinator's shutdown protocol has to survive: the shutdown
// signal sent towards worker 0 terminates worker 1 instead, and the protocol
// must notice that and keep worker 0 on its list.

mod test_helpers;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use spindle::{
    Coordinator, ExecutionUnit, NoopHost, Policy, Resumable, ResumableRef, ResumeResult,
    SchedulerConfig, Worker,
};

use test_helpers::{wait_until, CountingJob, DEFAULT_WAIT_TIME};

/// Shared board receiving everything submitted at worker 0.
#[derive(Default)]
struct RelocationBoard {
    jobs: Mutex<VecDeque<ResumableRef>>,
}

impl RelocationBoard {
    fn push(&self, job: ResumableRef) {
        self.jobs.lock().unwrap().push_back(job);
    }

    fn pop(&self) -> Option<ResumableRef> {
        self.jobs.lock().unwrap().pop_front()
    }

    fn is_empty(&self) -> bool {
        self.jobs.lock().unwrap().is_empty()
    }
}

#[derive(Default)]
struct LocalInbox {
    jobs: Mutex<VecDeque<ResumableRef>>,
}

/// Policy that reroutes worker 0's submissions through the shared board.
///
/// Worker 1 polls the board every millisecond; worker 0 only falls back to it
/// after a long sleep, so worker 1 wins the race whenever it is alive, while
/// worker 0 still makes progress once worker 1 is gone.
#[derive(Clone, Copy, Default)]
struct StealFromZero;

impl Policy for StealFromZero {
    type CoordinatorData = RelocationBoard;
    type WorkerData = LocalInbox;

    fn central_enqueue(&self, coordinator: &Coordinator<Self>, job: ResumableRef) {
        coordinator.data().push(job);
    }

    fn external_enqueue(&self, worker: &Worker<Self>, job: ResumableRef) {
        if worker.id() == 0 {
            worker.coordinator().data().push(job);
        } else {
            worker.data().jobs.lock().unwrap().push_back(job);
        }
    }

    fn internal_enqueue(&self, worker: &Worker<Self>, job: ResumableRef) {
        worker.data().jobs.lock().unwrap().push_back(job);
    }

    fn dequeue(&self, worker: &Worker<Self>) -> ResumableRef {
        let coordinator = worker.coordinator();
        // Worker 0 claims a board job only after seeing it waiting across two
        // of its slow polls, so worker 1 always outraces it while alive.
        let mut seen_waiting = false;
        loop {
            if let Some(job) = worker.data().jobs.lock().unwrap().pop_front() {
                return job;
            }
            if worker.id() == 0 {
                thread::sleep(Duration::from_millis(25));
                let waiting = !coordinator.data().is_empty();
                if waiting && seen_waiting {
                    if let Some(job) = coordinator.data().pop() {
                        return job;
                    }
                }
                seen_waiting = waiting;
            } else {
                if let Some(job) = coordinator.data().pop() {
                    return job;
                }
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    fn foreach_resumable(&self, worker: &Worker<Self>, f: &mut dyn FnMut(ResumableRef)) {
        let drained: Vec<_> = worker.data().jobs.lock().unwrap().drain(..).collect();
        for job in drained {
            f(job);
        }
    }

    fn foreach_central_resumable(
        &self,
        coordinator: &Coordinator<Self>,
        f: &mut dyn FnMut(ResumableRef),
    ) {
        while let Some(job) = coordinator.data().pop() {
            f(job);
        }
    }
}

struct ExecutorProbe {
    executed_by: AtomicUsize,
    executed: AtomicUsize,
}

impl Resumable for ExecutorProbe {
    fn resume(&self, unit: &dyn ExecutionUnit, _max_steps: usize) -> ResumeResult {
        self.executed_by.store(unit.id(), Ordering::SeqCst);
        self.executed.fetch_add(1, Ordering::SeqCst);
        ResumeResult::Done
    }
}

#[test]
fn relocated_submission_executes_on_the_other_worker() {
    spindle::logging::init_test();
    let coordinator = Coordinator::<StealFromZero>::new(
        SchedulerConfig {
            num_workers: 2,
            ..Default::default()
        },
        Arc::new(NoopHost),
    );
    coordinator.start().unwrap();

    let probe = Arc::new(ExecutorProbe {
        executed_by: AtomicUsize::new(usize::MAX),
        executed: AtomicUsize::new(0),
    });
    coordinator
        .worker_by_id(0)
        .external_enqueue(Arc::clone(&probe) as ResumableRef);

    assert!(wait_until(Duration::from_millis(DEFAULT_WAIT_TIME), || {
        probe.executed.load(Ordering::SeqCst) == 1
    }));
    assert_eq!(probe.executed_by.load(Ordering::SeqCst), 1);

    coordinator.stop();
}

#[test]
fn stop_terminates_despite_relocation() {
    // The first shutdown signal is addressed to worker 0 but executed by
    // worker 1; stop() must resubmit until worker 0 itself reports in.
    let coordinator = Coordinator::<StealFromZero>::new(
        SchedulerConfig {
            num_workers: 2,
            ..Default::default()
        },
        Arc::new(NoopHost),
    );
    coordinator.start().unwrap();

    let total = Arc::new(AtomicUsize::new(0));
    let jobs = CountingJob::batch(10, &total);
    for job in &jobs {
        coordinator.enqueue(CountingJob::as_job(job));
    }
    coordinator.stop();

    for job in &jobs {
        let executions = job.executions.load(Ordering::SeqCst);
        let cleanups = job.cleanups.load(Ordering::SeqCst);
        assert_eq!(executions + cleanups, 1);
    }
}
