//! Detached process spawning.
//!
//! Launches the managed service so that it survives the supervisor process:
//! the supervisor is a short-lived CLI and the service must keep running
//! after it exits.

use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use steward_common::{SupervisorError, SupervisorResult};
use tracing::debug;

/// Everything needed to launch the managed service.
#[derive(Debug, Clone)]
pub struct SpawnCommand {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: HashMap<String, String>,
}

/// Spawn a detached child process with stdout and stderr combined into
/// `log_file`.
///
/// The child is placed in its own process group so that terminal signals
/// aimed at the supervisor never reach the service. Stdin is closed.
///
/// Returns the [`Child`] handle without waiting on it. The caller may poll
/// it (e.g. to detect an early exit) and then drop it; dropping does not
/// kill the process, it merely detaches, and once the supervisor exits the
/// child is inherited by the system.
pub fn spawn_detached(spec: &SpawnCommand, log_file: File) -> SupervisorResult<Child> {
    let stdout_sink = log_file.try_clone().map_err(|e| {
        SupervisorError::spawn_failed(
            spec.executable.display().to_string(),
            format!("failed to clone log file handle: {}", e),
        )
    })?;

    let mut command = Command::new(&spec.executable);
    command
        .args(&spec.args)
        .current_dir(&spec.working_dir)
        .envs(&spec.env)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_sink))
        .stderr(Stdio::from(log_file));

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // New process group: Ctrl+C in the operator's terminal must not
        // take the service down with the CLI
        command.process_group(0);
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;
        command.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }

    let child = command.spawn().map_err(|e| {
        SupervisorError::spawn_failed(spec.executable.display().to_string(), e.to_string())
    })?;

    debug!(
        pid = child.id(),
        executable = %spec.executable.display(),
        "spawned detached process"
    );
    Ok(child)
}
