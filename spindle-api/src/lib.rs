//! # Spindle Scheduler API
//!
//! Contract layer for the spindle task scheduler. It defines the small set of
//! traits that connect schedulable work, the threads executing it, and the
//! system hosting the scheduler, without committing to any concrete queueing
//! or dispatch strategy.
//!
//! ## Core Components
//!
//! - **Resumable**: a reference-counted unit of schedulable work with a
//!   step-bounded execution entry point
//! - **ExecutionUnit**: the executing worker as seen from inside a job
//! - **SchedulerHost**: lifecycle hooks for the system owning the scheduler
//! - **Errors**: error types shared across scheduler implementations
//!
//! ## Module Organization
//!
//! - [`resumable`]: the `Resumable` trait, resume results, and the shared
//!   ownership handle
//! - [`execution`]: the `ExecutionUnit` trait
//! - [`host`]: the `SchedulerHost` trait and the no-op default host
//! - [`errors`]: error types

pub mod errors;
pub mod execution;
pub mod host;
pub mod resumable;

pub use errors::SchedulerError;
pub use execution::ExecutionUnit;
pub use host::{NoopHost, SchedulerHost};
pub use resumable::{Resumable, ResumableRef, ResumeResult};
