//! Process liveness checking.
//!
//! Provides a cross-platform check for whether a pid refers to a running
//! process.

use steward_common::{SupervisorError, SupervisorResult};

/// Check whether a process with the given pid is currently running.
///
/// This is a non-destructive probe. On Unix it uses `kill(pid, 0)`, which
/// delivers no signal but reports whether the process exists. On Windows it
/// uses `OpenProcess`.
///
/// A recycled pid makes this return `true` for an unrelated process, so the
/// answer is an approximation of "the managed service is alive", not a
/// guarantee.
///
/// # Returns
///
/// * `Ok(true)` - a process with this pid is running
/// * `Ok(false)` - no such process
/// * `Err(_)` - the query itself failed
pub fn is_alive(pid: u32) -> SupervisorResult<bool> {
    #[cfg(unix)]
    {
        is_alive_unix(pid)
    }

    #[cfg(windows)]
    {
        is_alive_windows(pid)
    }
}

#[cfg(unix)]
fn is_alive_unix(pid: u32) -> SupervisorResult<bool> {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let nix_pid = Pid::from_raw(pid as i32);

    match kill(nix_pid, None) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::ESRCH) => Ok(false), // No such process
        Err(nix::errno::Errno::EPERM) => Ok(true),  // Exists, owned by someone else
        Err(e) => Err(SupervisorError::liveness(pid, e.to_string())),
    }
}

#[cfg(windows)]
fn is_alive_windows(pid: u32) -> SupervisorResult<bool> {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

    unsafe {
        let handle: HANDLE = match OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) {
            Ok(h) => h,
            Err(e) => {
                // ERROR_INVALID_PARAMETER or ERROR_ACCESS_DENIED usually means the pid is gone
                let error_code = e.code().0 as u32;
                const ERROR_INVALID_PARAMETER: u32 = 0x80070057;
                const ERROR_ACCESS_DENIED: u32 = 0x80070005;

                if error_code == ERROR_INVALID_PARAMETER || error_code == ERROR_ACCESS_DENIED {
                    return Ok(false);
                }
                return Err(SupervisorError::liveness(pid, e.to_string()));
            }
        };

        let _ = CloseHandle(handle);
        Ok(true)
    }
}
