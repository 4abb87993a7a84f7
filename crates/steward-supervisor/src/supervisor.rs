//! Lifecycle operations for the managed service.

use steward_common::{SupervisorError, SupervisorResult};
use steward_logs::LogSink;
use steward_process::{is_alive, kill, spawn_detached, SpawnCommand};
use steward_state::StateStore;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SupervisorConfig;
use crate::state::ServiceState;

/// Result of a successful `start` (or the start half of `restart`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOutcome {
    /// Pid of the newly launched process
    pub pid: u32,
    /// Pid of a previously running process that is now orphaned
    pub orphaned: Option<u32>,
}

/// Stateless orchestrator for the managed service's lifecycle.
///
/// Constructed fresh for every invocation; all coordination with past and
/// future invocations goes through the pid record on disk.
pub struct Supervisor {
    config: SupervisorConfig,
    store: StateStore,
    log_sink: LogSink,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let store = StateStore::new(config.pid_file_path());
        let log_sink = LogSink::new(config.log_file_path());
        Self {
            config,
            store,
            log_sink,
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Rebuild the lifecycle state from the pid record plus a liveness
    /// probe. Does not modify anything.
    pub async fn current_state(&self) -> SupervisorResult<ServiceState> {
        let record = self.store.read().await?;
        let alive = match record {
            Some(pid) => is_alive(pid)?,
            None => false,
        };
        Ok(ServiceState::classify(record, alive))
    }

    /// Launch the managed service detached and record its pid.
    ///
    /// The record is committed only after the process survives the
    /// configured grace interval; a launch that dies earlier surfaces as
    /// [`SupervisorError::SpawnFailed`] with no record written.
    ///
    /// Starting while a recorded process is still alive is allowed: the old
    /// process keeps running unmanaged (orphaned) and the record moves to
    /// the new pid. The orphan's pid is reported in the outcome.
    pub async fn start(&self) -> SupervisorResult<StartOutcome> {
        let name = &self.config.service.name;

        let orphaned = match self.current_state().await? {
            ServiceState::Running { pid } => {
                warn!(
                    pid,
                    "'{}' is already running; the old process will be orphaned", name
                );
                Some(pid)
            }
            ServiceState::Stale { pid } => {
                debug!(pid, "overwriting stale record");
                None
            }
            ServiceState::Absent => None,
        };

        let spec = self.spawn_command();
        let log_file = self.log_sink.create()?;

        info!(
            executable = %spec.executable.display(),
            log_file = %self.log_sink.path().display(),
            "starting '{}'",
            name
        );
        let mut child = spawn_detached(&spec, log_file)?;
        let pid = child.id();

        tokio::time::sleep(self.config.supervisor.start_grace).await;

        match child.try_wait() {
            Ok(None) => {
                // Survived the grace interval: commit the record
                self.store.write(pid).await?;
                info!(pid, "'{}' started", name);
                Ok(StartOutcome { pid, orphaned })
            }
            Ok(Some(status)) => Err(SupervisorError::spawn_failed(
                name,
                format!("process exited during the startup grace interval ({})", status),
            )),
            Err(e) => Err(SupervisorError::spawn_failed(
                name,
                format!("could not determine process status: {}", e),
            )),
        }
    }

    /// Terminate the recorded process and clear the record.
    ///
    /// Returns the pid that was stopped. A recorded pid that already died
    /// still counts as stopped; [`SupervisorError::MissingState`] means
    /// there was no record at all. If the kill signal cannot be delivered
    /// the record is left in place for the operator to inspect.
    pub async fn stop(&self) -> SupervisorResult<u32> {
        let pid = match self.store.read().await? {
            Some(pid) => pid,
            None => return Err(SupervisorError::missing_state(&self.config.service.name)),
        };

        kill(pid)?;
        self.store.clear().await?;
        info!(pid, "'{}' stopped", self.config.service.name);
        Ok(pid)
    }

    /// Stop (tolerating an absent record), pause `restart_delay`, start.
    pub async fn restart(&self) -> SupervisorResult<StartOutcome> {
        match self.stop().await {
            Ok(pid) => debug!(pid, "stopped for restart"),
            Err(SupervisorError::MissingState { .. }) => {
                debug!("nothing recorded, restart degrades to a plain start")
            }
            Err(e) => return Err(e),
        }

        tokio::time::sleep(self.config.supervisor.restart_delay).await;
        self.start().await
    }

    /// Report the current state, clearing a stale record as a side effect.
    pub async fn status(&self) -> SupervisorResult<ServiceState> {
        let state = self.current_state().await?;
        if let ServiceState::Stale { pid } = state {
            info!(pid, "record is stale, clearing it");
            self.store.clear().await?;
        }
        Ok(state)
    }

    /// Stream the captured output into `out` until `cancel` fires.
    ///
    /// Replays the whole log from the beginning, then follows appends at
    /// the configured poll cadence.
    pub async fn logs<W>(&self, out: &mut W, cancel: CancellationToken) -> SupervisorResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        if !self.log_sink.exists() {
            return Err(SupervisorError::log_sink(format!(
                "no log file at {} (was '{}' ever started?)",
                self.log_sink.path().display(),
                self.config.service.name
            )));
        }

        self.log_sink
            .follow(out, self.config.supervisor.log_poll_interval, cancel)
            .await
    }

    /// Update the service's source checkout with `git pull`.
    ///
    /// Runs in the configured working directory and inherits the
    /// supervisor's stdio, so the operator sees git's own output. The pid
    /// record is untouched; applying the update is a separate `restart`.
    pub async fn pull(&self) -> SupervisorResult<()> {
        let working_dir = &self.config.service.working_directory;
        info!(working_directory = %working_dir.display(), "running git pull");

        let status = tokio::process::Command::new("git")
            .arg("pull")
            .current_dir(working_dir)
            .status()
            .await
            .map_err(|e| SupervisorError::update_failed(format!("failed to run git: {}", e)))?;

        if !status.success() {
            return Err(SupervisorError::update_failed(format!(
                "git pull exited with {}",
                status
            )));
        }

        info!("source checkout updated");
        Ok(())
    }

    /// The full command line handed to the spawner: configured args, then
    /// the listen endpoint as `--host`/`--port`.
    fn spawn_command(&self) -> SpawnCommand {
        let service = &self.config.service;
        let mut args = service.args.clone();
        args.push("--host".to_string());
        args.push(service.listen.host.clone());
        args.push("--port".to_string());
        args.push(service.listen.port.to_string());

        SpawnCommand {
            executable: service.executable.clone(),
            args,
            working_dir: service.working_directory.clone(),
            env: service.environment.clone(),
        }
    }
}
