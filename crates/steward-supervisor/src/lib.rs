//! # steward-supervisor
//!
//! The supervisor core: configuration loading plus the lifecycle operations
//! (`start`, `stop`, `restart`, `status`, `logs`, `pull`) for one managed
//! network service.
//!
//! Every CLI invocation builds a fresh [`Supervisor`] from the loaded
//! [`SupervisorConfig`]; nothing lives in memory between invocations. The
//! only durable state is the pid record owned by `steward-state`, so
//! stateless invocations coordinate through the filesystem. One operator at
//! a time is assumed; the record file is not locked.

pub mod config;
pub mod state;
pub mod supervisor;

pub use config::{ListenConfig, ServiceConfig, SupervisorConfig, SupervisorOptions};
pub use state::ServiceState;
pub use supervisor::{StartOutcome, Supervisor};
