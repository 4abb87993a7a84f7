//! Process termination primitives.

use steward_common::{SupervisorError, SupervisorResult};
use tracing::debug;

/// Force-kill a process (SIGKILL on Unix, TerminateProcess on Windows).
///
/// A pid that no longer exists counts as success: the goal is "this process
/// is not running afterwards", and a process that already exited satisfies
/// it. Errors are reserved for signals that could not be delivered at all,
/// such as a permission failure.
pub fn kill(pid: u32) -> SupervisorResult<()> {
    #[cfg(unix)]
    {
        kill_unix(pid)
    }

    #[cfg(windows)]
    {
        kill_windows(pid)
    }
}

#[cfg(unix)]
fn kill_unix(pid: u32) -> SupervisorResult<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let nix_pid = Pid::from_raw(pid as i32);

    match kill(nix_pid, Signal::SIGKILL) {
        Ok(_) => Ok(()),
        Err(nix::errno::Errno::ESRCH) => {
            debug!(pid, "process already gone, nothing to kill");
            Ok(())
        }
        Err(e) => Err(SupervisorError::termination_failed(pid, e.to_string())),
    }
}

#[cfg(windows)]
fn kill_windows(pid: u32) -> SupervisorResult<()> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{OpenProcess, TerminateProcess, PROCESS_TERMINATE};

    unsafe {
        let handle = match OpenProcess(PROCESS_TERMINATE, false, pid) {
            Ok(h) if !h.is_invalid() => h,
            _ => {
                // An unopenable pid is treated as already terminated
                debug!(pid, "process already gone, nothing to kill");
                return Ok(());
            }
        };

        let result = TerminateProcess(handle, 1);
        let _ = CloseHandle(handle);

        result.map_err(|e| {
            SupervisorError::termination_failed(pid, format!("TerminateProcess failed: {}", e))
        })
    }
}
