use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::time::{interval, sleep};

/// Controllable stand-in for a managed network service.
///
/// Accepts the `--host`/`--port` pair the supervisor appends at spawn time,
/// prints `ready` as the first line of its output once operational, then
/// emits a tick line every second until it is signalled or its run duration
/// elapses. Everything a test needs to provoke (slow startup, instant
/// crash, self-termination) is an argument.
#[derive(Parser, Debug)]
#[command(name = "testexe")]
#[command(about = "Test executable for steward e2e testing", long_about = None)]
struct Args {
    /// Host to pretend to listen on (supplied by the supervisor)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to pretend to listen on (supplied by the supervisor)
    #[arg(long, default_value = "0")]
    port: u16,

    /// Seconds to wait before reporting ready
    #[arg(long, default_value = "0")]
    startup_delay: u64,

    /// Duration in seconds to run before exiting (0 = run until signalled)
    #[arg(long, default_value = "0")]
    run_duration: u64,

    /// Exit code to return on shutdown (for testing failure scenarios)
    #[arg(long, default_value = "0")]
    exit_code: i32,

    /// Exit immediately with a failure instead of coming up
    #[arg(long)]
    crash_on_start: bool,

    /// If provided, write this file once the program is fully operational.
    /// The file will be removed on shutdown (best-effort).
    #[arg(long)]
    ready_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.crash_on_start {
        eprintln!("testexe: simulated startup failure");
        std::process::exit(1);
    }

    if args.startup_delay > 0 {
        sleep(Duration::from_secs(args.startup_delay)).await;
    }

    // The readiness marker must be the first line of output; nothing may be
    // printed before it
    println!("ready");
    println!("listening on {}:{}", args.host, args.port);

    if let Some(path) = &args.ready_file {
        if let Err(e) = atomic_write_text(path, "ready\n") {
            eprintln!(
                "testexe: failed to write ready file {}: {}",
                path.display(),
                e
            );
            std::process::exit(1);
        }
    }

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    let mut ticker = interval(Duration::from_secs(1));
    ticker.tick().await; // the first tick completes immediately
    let start_time = std::time::Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed = start_time.elapsed().as_secs();
                if args.run_duration > 0 && elapsed >= args.run_duration {
                    println!("run duration ({} seconds) reached, exiting", args.run_duration);
                    break;
                }
                println!("tick {}", elapsed);
            }
            _ = &mut shutdown => {
                println!("shutting down");
                break;
            }
        }
    }

    // Clean up ready file (best-effort)
    if let Some(path) = &args.ready_file {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                eprintln!(
                    "testexe: failed to remove ready file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    std::process::exit(args.exit_code);
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }

    #[cfg(windows)]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn atomic_write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "ready".to_string());

    let tmp_path = path.with_file_name(format!("{}.tmp-{}-{}", file_name, pid, nanos));

    std::fs::write(&tmp_path, contents)?;

    // `rename` is atomic when source+dest are on the same filesystem.
    // On Windows, rename over an existing file can fail, so we remove first.
    #[cfg(windows)]
    {
        let _ = std::fs::remove_file(path);
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
