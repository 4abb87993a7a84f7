//! # steward-process
//!
//! OS process primitives for the steward supervisor:
//!
//! - **Spawning**: launch a service detached from the supervisor, with
//!   stdout and stderr redirected into a log file
//! - **Liveness**: check whether a pid refers to a running process
//! - **Termination**: forcefully kill a process by pid
//!
//! All functions here operate on bare pids. Tracking which pid belongs
//! to the managed service is the job of `steward-state`.

pub mod check;
pub mod spawn;
pub mod terminate;

pub use check::is_alive;
pub use spawn::{spawn_detached, SpawnCommand};
pub use terminate::kill;
