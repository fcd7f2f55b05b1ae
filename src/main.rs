//! hostsnap - one-shot host resource snapshot.
//!
//! Collects OS identity, CPU count and load, memory/swap usage, and
//! drive capacity once, prints the result, and exits.
//!
//! Usage:
//!   hostsnap                          # text output
//!   hostsnap --json                   # JSON output
//!   hostsnap --proc-path ./fixtures   # read pseudo-files elsewhere

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use hostsnap::model::SystemSnapshot;
use hostsnap::render;

/// One-shot host resource snapshot.
#[derive(Parser)]
#[command(name = "hostsnap", about = "Host resource snapshot", version)]
struct Args {
    /// Path to the proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Emit the snapshot as pretty-printed JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Logs go to stderr so they never mix with the rendered snapshot.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("hostsnap={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(target_os = "windows")]
fn collect(_args: &Args) -> SystemSnapshot {
    hostsnap::collector::win::collect_snapshot()
}

#[cfg(not(target_os = "windows"))]
fn collect(args: &Args) -> SystemSnapshot {
    use hostsnap::collector::{Collector, RealFs};
    Collector::new(RealFs::new(), &args.proc_path).collect()
}

/// Exit-code policy: 0 for any completed run, even with degraded fields;
/// 1 only when the essential memory figures could not be collected.
fn exit_status(snapshot: &SystemSnapshot) -> u8 {
    if snapshot.memory.is_some() { 0 } else { 1 }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let snapshot = collect(&args);

    if args.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                tracing::error!("JSON serialization failed: {}", err);
                print!("{}", render::render(&snapshot));
            }
        }
    } else {
        print!("{}", render::render(&snapshot));
    }

    ExitCode::from(exit_status(&snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostsnap::model::MemoryInfo;

    fn snapshot(memory: Option<MemoryInfo>) -> SystemSnapshot {
        SystemSnapshot {
            captured_at: 0,
            os_name: "Unknown".to_string(),
            kernel_version: "Unknown".to_string(),
            architecture: "x86_64".to_string(),
            hostname: "host".to_string(),
            username: "user".to_string(),
            cpu_count: 1,
            load_average: None,
            memory,
            drives: Vec::new(),
        }
    }

    #[test]
    fn test_exit_zero_even_with_degraded_identity_and_drives() {
        let snap = snapshot(Some(MemoryInfo {
            total_ram_mb: 16_000,
            available_ram_mb: 8_000,
            ..Default::default()
        }));
        assert_eq!(exit_status(&snap), 0);
    }

    #[test]
    fn test_exit_nonzero_when_memory_missing() {
        assert_eq!(exit_status(&snapshot(None)), 1);
    }
}
