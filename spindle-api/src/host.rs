//! Hooks into the system that owns the scheduler.

/// Lifecycle hooks the coordinator invokes on the owning system.
///
/// The scheduler itself only runs worker threads; anything else the host
/// system needs around the pool's lifetime (utility actors, registries,
/// timers) is started and stopped through this trait.
pub trait SchedulerHost: Send + Sync {
    /// Invoked by `start()` after every worker thread is running.
    fn on_start(&self) {}

    /// Invoked by `stop()` after every worker has executed the shutdown
    /// sentinel but strictly before any worker thread is joined. This is
    /// where utility actors must be stopped.
    fn on_stop(&self) {}
}

/// Host that does nothing; for standalone schedulers and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl SchedulerHost for NoopHost {}
