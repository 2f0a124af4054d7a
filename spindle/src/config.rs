/// Configuration for the scheduler coordinator.
///
/// Consumed once by `Coordinator::start`; the pool geometry is fixed from
/// that point on.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Number of worker threads. Must be at least 1; values of 0 are
    /// clamped to 1 at startup.
    pub num_workers: usize,

    /// Maximum units of work a resumable may process in a single resume
    /// invocation before it has to report back to its worker.
    pub max_throughput: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            max_throughput: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_all_cores() {
        let config = SchedulerConfig::default();
        assert_eq!(config.num_workers, num_cpus::get());
        assert!(config.max_throughput > 0);
    }
}
