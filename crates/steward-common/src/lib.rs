//! # steward-common
//!
//! Shared error taxonomy for the steward supervisor.
//!
//! Every fallible operation across the workspace returns
//! [`SupervisorResult`], so the CLI layer can pattern-match on the
//! variant to pick its wording and exit code.

pub mod errors;

pub use errors::{SupervisorError, SupervisorResult};
