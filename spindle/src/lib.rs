// Spindle Scheduler Runtime
//
// This crate provides the multi-threaded runtime behind the Spindle scheduler
// API: a policy-parameterized coordinator, its worker pool, and the two
// dispatch policies that ship with it.

pub mod config;
pub mod coordinator;
pub mod logging;
pub mod policy;
pub mod worker;

// Re-export commonly used types
pub use config::SchedulerConfig;
pub use coordinator::Coordinator;
pub use policy::{Policy, WorkSharing, WorkStealing};
pub use worker::Worker;

pub use spindle_api::{
    ExecutionUnit, NoopHost, Resumable, ResumableRef, ResumeResult, SchedulerError, SchedulerHost,
};
