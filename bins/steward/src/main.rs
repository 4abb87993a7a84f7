use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use steward_common::SupervisorError;
use steward_supervisor::{ServiceState, StartOutcome, Supervisor, SupervisorConfig};

/// Steward - single-instance supervisor for one long-running service
#[derive(Parser, Debug)]
#[command(name = "steward", version, about, long_about = None)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, global = true, value_name = "FILE", default_value = "steward.yaml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the managed service detached and record its pid
    Start,
    /// Terminate the recorded process and clear the record
    Stop,
    /// Stop the service, pause briefly, and start it again
    Restart,
    /// Report whether the managed service is running
    Status,
    /// Stream the captured service output until interrupted
    Logs,
    /// Update the service's source checkout (git pull)
    #[command(alias = "git-pull")]
    Pull,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.debug)?;

    let config = match SupervisorConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };
    debug!(config = %args.config.display(), "configuration loaded");

    let supervisor = Supervisor::new(config);
    let exit_code = run_command(&supervisor, args.command).await;
    std::process::exit(exit_code);
}

/// Execute one verb and translate its outcome into an exit code.
///
/// `status` distinguishes "not running" (1) from real errors (2); all other
/// verbs use 0 for success and 2 for failure. A `stop` that finds nothing
/// to stop is informational, not a failure.
async fn run_command(supervisor: &Supervisor, command: Command) -> i32 {
    let name = supervisor.config().service.name.clone();

    match command {
        Command::Start => match supervisor.start().await {
            Ok(outcome) => {
                print_orphan_warning(&outcome);
                println!("started '{}' (pid {})", name, outcome.pid);
                0
            }
            Err(e) => command_failed(e),
        },
        Command::Stop => match supervisor.stop().await {
            Ok(pid) => {
                println!("stopped '{}' (pid {})", name, pid);
                0
            }
            Err(e @ SupervisorError::MissingState { .. }) => {
                println!("{}", e);
                0
            }
            Err(e) => command_failed(e),
        },
        Command::Restart => match supervisor.restart().await {
            Ok(outcome) => {
                print_orphan_warning(&outcome);
                println!("restarted '{}' (pid {})", name, outcome.pid);
                0
            }
            Err(e) => command_failed(e),
        },
        Command::Status => match supervisor.status().await {
            Ok(ServiceState::Running { pid }) => {
                println!("running (pid {})", pid);
                0
            }
            Ok(ServiceState::Stale { pid }) => {
                println!("not running (stale record for pid {} removed)", pid);
                1
            }
            Ok(ServiceState::Absent) => {
                println!("not running");
                1
            }
            Err(e) => command_failed(e),
        },
        Command::Logs => {
            let cancel = CancellationToken::new();
            spawn_cancel_on_signal(cancel.clone());

            let mut stdout = tokio::io::stdout();
            match supervisor.logs(&mut stdout, cancel).await {
                Ok(()) => 0,
                Err(e) => command_failed(e),
            }
        }
        Command::Pull => match supervisor.pull().await {
            Ok(()) => {
                println!("source updated; run `steward restart` to apply it");
                0
            }
            Err(e) => command_failed(e),
        },
    }
}

fn command_failed(e: SupervisorError) -> i32 {
    eprintln!("Error: {}", e);
    2
}

fn print_orphan_warning(outcome: &StartOutcome) {
    if let Some(pid) = outcome.orphaned {
        println!(
            "warning: previous process (pid {}) was still running and is now orphaned",
            pid
        );
    }
}

fn initialize_logging(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };

    // Diagnostics go to stderr; stdout is reserved for command output and
    // the raw byte stream of `logs`
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Cancel the token once the operator interrupts the invocation.
fn spawn_cancel_on_signal(cancel: CancellationToken) {
    tokio::spawn(async move {
        wait_for_interrupt().await;
        info!("interrupted, stopping log stream");
        cancel.cancel();
    });
}

async fn wait_for_interrupt() {
    use tokio::signal;

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to create SIGTERM handler");
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .expect("Failed to create SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }

    #[cfg(windows)]
    {
        let _ = signal::ctrl_c().await;
    }
}
