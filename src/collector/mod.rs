//! Snapshot collection: platform readers and the assembler.
//!
//! The assembler orchestrates one reader per resource class and tolerates
//! the independent failure of any one class. No error ever escapes
//! [`Collector::collect`]; a failed source degrades only its own field.

pub mod mock;
pub mod procfs;
pub mod traits;

#[cfg(target_os = "windows")]
pub mod win;

pub use procfs::SystemCollector;
pub use traits::{FileSystem, RealFs, VolumeStats};

use crate::model::SystemSnapshot;

/// Label used wherever a text field could not be collected.
pub const UNKNOWN: &str = "Unknown";

/// Error type for collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// Source file missing or unreadable.
    Io(std::io::Error),
    /// Source content did not contain the expected fields.
    Parse(String),
    /// A structured platform query failed with the given status code.
    Api { call: &'static str, status: i32 },
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
            CollectError::Api { call, status } => {
                write!(f, "{} failed with status {}", call, status)
            }
        }
    }
}

impl std::error::Error for CollectError {}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

/// Assembles one [`SystemSnapshot`] from the per-resource-class readers.
///
/// Single-use by construction: [`collect`](Self::collect) consumes the
/// assembler, so a fresh `Collector` must be built for every capture and
/// no partial reader state can leak between runs.
pub struct Collector<F: FileSystem> {
    system: SystemCollector<F>,
}

impl<F: FileSystem> Collector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            system: SystemCollector::new(fs, proc_path),
        }
    }

    /// Collects every resource class, tolerating independent failures.
    ///
    /// Degradation policy: identity fields fall back to `"Unknown"`; a
    /// failed memory source is carried as `memory: None` (it is the one
    /// class considered essential, so the caller can see and act on it);
    /// a failed drive enumeration yields an empty list; load averages are
    /// simply absent when unreadable.
    pub fn collect(self) -> SystemSnapshot {
        let sys = &self.system;

        let os_name = match sys.collect_os_identity() {
            Ok(name) => name,
            Err(err) => {
                tracing::warn!("os identity unavailable: {}", err);
                UNKNOWN.to_string()
            }
        };

        let kernel_version = match sys.collect_kernel() {
            Ok(kernel) => kernel,
            Err(err) => {
                tracing::warn!("kernel identity unavailable: {}", err);
                UNKNOWN.to_string()
            }
        };

        let hostname = match sys.collect_hostname() {
            Ok(name) => name,
            Err(err) => {
                tracing::debug!("hostname unavailable: {}", err);
                UNKNOWN.to_string()
            }
        };

        let username = match sys.collect_username() {
            Ok(name) => name,
            Err(err) => {
                tracing::debug!("username unavailable: {}", err);
                UNKNOWN.to_string()
            }
        };

        let load_average = match sys.collect_load_average() {
            Ok(load) => Some(load),
            Err(err) => {
                tracing::debug!("load average unavailable: {}", err);
                None
            }
        };

        let memory = match sys.collect_memory() {
            Ok(mem) => Some(mem),
            Err(err) => {
                tracing::warn!("memory figures unavailable: {}", err);
                None
            }
        };

        let drives = match sys.collect_drives() {
            Ok(drives) => drives,
            Err(err) => {
                tracing::warn!("drive enumeration unavailable: {}", err);
                Vec::new()
            }
        };

        SystemSnapshot {
            captured_at: chrono::Utc::now().timestamp(),
            os_name,
            kernel_version,
            architecture: std::env::consts::ARCH.to_string(),
            hostname,
            username,
            cpu_count: sys.collect_cpu_count(),
            load_average,
            memory,
            drives,
        }
    }
}
