//! Snapshot data model.
//!
//! One [`SystemSnapshot`] is one complete point-in-time capture of host
//! resource state. It is assembled once per run and never mutated after
//! assembly. A field a platform cannot supply is `None`, never a zero
//! that could be mistaken for a real reading.

use serde::Serialize;

use crate::units;

/// Load averages over the standard 1/5/15 minute windows.
///
/// Source: `/proc/loadavg` fields 1-3. Absent on platforms without the
/// concept (Windows).
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Default)]
pub struct LoadAverage {
    /// 1-minute load average.
    pub one: f64,
    /// 5-minute load average.
    pub five: f64,
    /// 15-minute load average.
    pub fifteen: f64,
}

/// Memory figures, normalized to megabytes.
///
/// Swap, pagefile (commit charge) and virtual address space are distinct
/// concepts; each platform fills only the fields it actually has.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Default)]
pub struct MemoryInfo {
    /// Total usable RAM (MB).
    /// Linux: `MemTotal` in `/proc/meminfo`. Windows: `ullTotalPhys`.
    pub total_ram_mb: u64,

    /// RAM available for starting new applications (MB).
    /// Linux: `MemAvailable` in `/proc/meminfo`. Windows: `ullAvailPhys`.
    pub available_ram_mb: u64,

    /// Total swap space (MB).
    /// Linux: `SwapTotal` in `/proc/meminfo`. Windows: none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_swap_mb: Option<u64>,

    /// Free swap space (MB).
    /// Linux: `SwapFree` in `/proc/meminfo`. Windows: none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_swap_mb: Option<u64>,

    /// Virtual memory size (MB).
    /// Linux: `VmallocTotal` in `/proc/meminfo`. Windows: `ullTotalVirtual`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_memory_mb: Option<u64>,

    /// Physical memory in use, percent.
    /// Windows: `dwMemoryLoad`. Linux: none (the source has no such field).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_load_percent: Option<u8>,

    /// Pagefile commit charge currently in use (MB).
    /// Windows: `CommitTotal` pages. Linux: none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagefile_used_mb: Option<u64>,

    /// Pagefile commit limit (MB).
    /// Windows: `CommitLimit` pages. Linux: none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagefile_total_mb: Option<u64>,
}

/// One mounted (Linux) or logical (Windows) drive, capacities in GB.
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
pub struct DriveInfo {
    /// Mountpoint path (Linux) or drive letter root (Windows).
    pub mountpoint: String,

    /// Filesystem type, when the enumeration source reports one.
    /// Linux: third field of `/proc/mounts`. Windows: not queried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesystem: Option<String>,

    /// Total capacity (GB, binary prefix).
    pub total_gb: f64,

    /// Free capacity (GB, binary prefix). Never exceeds `total_gb`.
    pub free_gb: f64,
}

impl DriveInfo {
    /// Used capacity in GB, derived.
    pub fn used_gb(&self) -> f64 {
        self.total_gb - self.free_gb
    }

    /// Used capacity as a percentage of total; 0 for a zero-sized volume.
    pub fn usage_percent(&self) -> f64 {
        units::usage_percent(self.used_gb(), self.total_gb)
    }
}

/// One complete capture of host resource state.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct SystemSnapshot {
    /// Unix timestamp (seconds) of the capture.
    pub captured_at: i64,

    /// OS name and version, or `"Unknown"` when the identity source failed.
    /// Linux: `NAME` + `VERSION` from `/etc/os-release`.
    /// Windows: major/minor/build from `RtlGetVersion`.
    pub os_name: String,

    /// Kernel name and release.
    /// Linux: `/proc/sys/kernel/ostype` + `osrelease`.
    pub kernel_version: String,

    /// CPU architecture.
    pub architecture: String,

    /// Host name.
    pub hostname: String,

    /// Name of the invoking user.
    pub username: String,

    /// Number of logical processors.
    pub cpu_count: usize,

    /// Load averages; absent on platforms without the concept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_average: Option<LoadAverage>,

    /// Memory figures; `None` when the memory source itself failed.
    pub memory: Option<MemoryInfo>,

    /// Drives in platform enumeration order, each mountpoint listed once.
    pub drives: Vec<DriveInfo>,
}
