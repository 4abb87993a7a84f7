//! # steward-logs
//!
//! Captured-output handling for the steward supervisor.
//!
//! The managed service writes its combined stdout and stderr into a single
//! log file, opened fresh (truncated) on every launch. This crate owns that
//! file from both ends: producing the write handle the spawner redirects
//! into, and tailing the file for the `logs` command.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use steward_common::{SupervisorError, SupervisorResult};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to the captured-output file for one managed service.
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    /// Create a sink backed by the given file path. No I/O happens until
    /// the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the log file currently exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Open the log file for writing, truncating any previous run's output.
    ///
    /// Returns a plain [`std::fs::File`] so the caller can hand it straight
    /// to the process spawner as a stdio redirection target.
    pub fn create(&self) -> SupervisorResult<std::fs::File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SupervisorError::log_sink(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| {
                SupervisorError::log_sink(format!(
                    "Failed to create log file {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }

    /// Tail the log file into `out` until `cancel` fires.
    ///
    /// Replays everything already in the file, then polls every
    /// `poll_interval` and forwards newly appended bytes as they arrive.
    /// Bytes are forwarded verbatim, in file order. If the file shrinks
    /// underneath us (a fresh launch truncated it) the cursor resets to the
    /// beginning, like `tail -f` on truncation. A consumer that hangs up
    /// (a downstream `head` exiting, say) ends the follow cleanly rather
    /// than erroring.
    pub async fn follow<W>(
        &self,
        out: &mut W,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> SupervisorResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut file = tokio::fs::File::open(&self.path).await.map_err(|e| {
            SupervisorError::log_sink(format!(
                "Failed to open log file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut offset: u64 = 0;
        let mut buf = vec![0u8; 8192];

        loop {
            // Forward everything currently past the cursor
            loop {
                let n = file.read(&mut buf).await.map_err(|e| {
                    SupervisorError::log_sink(format!(
                        "Failed to read log file {}: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                if n == 0 {
                    break;
                }
                offset += n as u64;
                if let Err(e) = out.write_all(&buf[..n]).await {
                    return self.forward_failed(e);
                }
            }
            if let Err(e) = out.flush().await {
                return self.forward_failed(e);
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(path = %self.path.display(), "log follow cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }

            if let Ok(metadata) = tokio::fs::metadata(&self.path).await {
                if metadata.len() < offset {
                    debug!(path = %self.path.display(), "log file truncated, rewinding");
                    file.seek(SeekFrom::Start(0)).await.map_err(|e| {
                        SupervisorError::log_sink(format!(
                            "Failed to rewind log file {}: {}",
                            self.path.display(),
                            e
                        ))
                    })?;
                    offset = 0;
                }
            }
        }
    }

    /// A consumer that hung up ends the follow; any other write failure is
    /// a sink error.
    fn forward_failed(&self, e: std::io::Error) -> SupervisorResult<()> {
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            debug!(path = %self.path.display(), "log consumer closed, ending follow");
            Ok(())
        } else {
            Err(SupervisorError::log_sink(format!(
                "Failed to forward log output: {}",
                e
            )))
        }
    }
}
