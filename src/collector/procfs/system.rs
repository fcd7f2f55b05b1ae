//! Linux readers: one collect method per resource class.
//!
//! Every method performs a single pass over its source and returns either
//! a fully typed value or a [`CollectError`]. Degradation decisions (what
//! a failure means for the snapshot) belong to the assembler, not here.

use std::collections::HashSet;
use std::path::Path;

use crate::collector::CollectError;
use crate::collector::procfs::parser::{
    parse_keyed_values, parse_loadavg, parse_mounts, parse_os_release,
};
use crate::collector::traits::FileSystem;
use crate::model::{DriveInfo, LoadAverage, MemoryInfo};
use crate::units;

#[cfg(unix)]
use crate::collector::procfs::parser::parse_passwd;

/// Collects host state from `/proc` pseudo-files and `/etc` identity files.
pub struct SystemCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    fn read_proc(&self, rel: &str) -> Result<String, CollectError> {
        let path = format!("{}/{}", self.proc_path, rel);
        Ok(self.fs.read_to_string(Path::new(&path))?)
    }

    /// Collects memory figures from `/proc/meminfo`, normalized to MB.
    ///
    /// `MemTotal` is required; an old kernel without `MemAvailable` gets
    /// the classic free+buffers+cached estimate. Swap totals map straight
    /// from their keys. `VmallocTotal` fills the virtual memory field.
    pub fn collect_memory(&self) -> Result<MemoryInfo, CollectError> {
        let content = self.read_proc("meminfo")?;
        let scan = parse_keyed_values(&content);
        if scan.skipped_lines > 0 {
            tracing::debug!("meminfo: dropped {} malformed lines", scan.skipped_lines);
        }

        let total_kb = scan
            .get("MemTotal")
            .ok_or_else(|| CollectError::Parse("meminfo has no MemTotal".to_string()))?;
        let available_kb = scan.get("MemAvailable").unwrap_or_else(|| {
            scan.get("MemFree").unwrap_or(0)
                + scan.get("Buffers").unwrap_or(0)
                + scan.get("Cached").unwrap_or(0)
        });

        Ok(MemoryInfo {
            total_ram_mb: units::kb_to_mb(total_kb),
            // a corrupt source can claim more available than total; clamp
            available_ram_mb: units::kb_to_mb(available_kb.min(total_kb)),
            total_swap_mb: scan.get("SwapTotal").map(units::kb_to_mb),
            free_swap_mb: scan.get("SwapFree").map(units::kb_to_mb),
            virtual_memory_mb: scan.get("VmallocTotal").map(units::kb_to_mb),
            memory_load_percent: None,
            pagefile_used_mb: None,
            pagefile_total_mb: None,
        })
    }

    /// Collects the OS name and version from `/etc/os-release`.
    pub fn collect_os_identity(&self) -> Result<String, CollectError> {
        let content = self.fs.read_to_string(Path::new("/etc/os-release"))?;
        let fields = parse_os_release(&content);

        let name = fields.get("NAME").map(String::as_str).unwrap_or("");
        let version = fields.get("VERSION").map(String::as_str).unwrap_or("");
        let identity = format!("{} {}", name, version).trim().to_string();
        if identity.is_empty() {
            return Err(CollectError::Parse(
                "os-release has no NAME or VERSION".to_string(),
            ));
        }
        Ok(identity)
    }

    /// Collects kernel name and release from `/proc/sys/kernel/`.
    pub fn collect_kernel(&self) -> Result<String, CollectError> {
        let ostype = self.read_proc("sys/kernel/ostype")?;
        let osrelease = self.read_proc("sys/kernel/osrelease")?;
        Ok(format!("{} {}", ostype.trim(), osrelease.trim()))
    }

    /// Collects the host name, falling back to the HOSTNAME variable.
    pub fn collect_hostname(&self) -> Result<String, CollectError> {
        if let Ok(name) = self.read_proc("sys/kernel/hostname")
            && !name.trim().is_empty()
        {
            return Ok(name.trim().to_string());
        }
        match std::env::var("HOSTNAME") {
            Ok(name) if !name.is_empty() => Ok(name),
            _ => Err(CollectError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no hostname source",
            ))),
        }
    }

    /// Resolves the invoking user's name.
    ///
    /// Primary path is the current UID looked up in `/etc/passwd`; the
    /// USER/LOGNAME variables are the fallback.
    pub fn collect_username(&self) -> Result<String, CollectError> {
        #[cfg(unix)]
        {
            // SAFETY: getuid has no failure modes and touches no memory.
            let uid = unsafe { libc::getuid() } as u32;
            if let Ok(content) = self.fs.read_to_string(Path::new("/etc/passwd"))
                && let Some(name) = parse_passwd(&content).get(&uid)
            {
                return Ok(name.clone());
            }
        }
        for var in ["USER", "LOGNAME"] {
            if let Ok(name) = std::env::var(var)
                && !name.is_empty()
            {
                return Ok(name);
            }
        }
        Err(CollectError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no username source",
        )))
    }

    /// Collects load averages from `/proc/loadavg`.
    pub fn collect_load_average(&self) -> Result<LoadAverage, CollectError> {
        let content = self.read_proc("loadavg")?;
        let (one, five, fifteen) =
            parse_loadavg(&content).map_err(|e| CollectError::Parse(e.message))?;
        Ok(LoadAverage { one, five, fifteen })
    }

    /// Counts logical processors.
    pub fn collect_cpu_count(&self) -> usize {
        #[cfg(unix)]
        {
            // SAFETY: sysconf with a valid name constant.
            let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
            if n > 0 {
                return n as usize;
            }
        }
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    }

    /// Enumerates `/dev/`-backed mounts and their capacity.
    ///
    /// Order matches `/proc/mounts`; a mountpoint is listed once (first
    /// occurrence wins). A volume whose capacity query fails is skipped
    /// and the rest are still returned.
    pub fn collect_drives(&self) -> Result<Vec<DriveInfo>, CollectError> {
        let content = self.read_proc("mounts")?;

        let mut seen = HashSet::new();
        let mut drives = Vec::new();
        for entry in parse_mounts(&content) {
            if !entry.device.starts_with("/dev/") {
                continue;
            }
            if !seen.insert(entry.mountpoint.clone()) {
                continue;
            }
            let stats = match self.fs.volume_stats(Path::new(&entry.mountpoint)) {
                Ok(stats) => stats,
                Err(err) => {
                    tracing::debug!("skipping volume {}: {}", entry.mountpoint, err);
                    continue;
                }
            };
            drives.push(DriveInfo {
                mountpoint: entry.mountpoint,
                filesystem: Some(entry.fstype),
                total_gb: units::bytes_to_gb(stats.total_bytes),
                free_gb: units::bytes_to_gb(stats.free_bytes.min(stats.total_bytes)),
            });
        }

        Ok(drives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_collect_memory_normalizes_to_mb() {
        let fs = MockFs::typical_system();
        let collector = SystemCollector::new(fs, "/proc");

        let mem = collector.collect_memory().unwrap();

        assert_eq!(mem.total_ram_mb, 16_000);
        assert_eq!(mem.available_ram_mb, 8_000);
        assert_eq!(mem.total_swap_mb, Some(4_000));
        assert_eq!(mem.free_swap_mb, Some(4_000));
        assert_eq!(mem.virtual_memory_mb, Some(33_554_431));
        assert_eq!(mem.memory_load_percent, None);
        assert_eq!(mem.pagefile_total_mb, None);
    }

    #[test]
    fn test_collect_memory_invariant_on_synthetic_fixtures() {
        let fixtures = [
            "MemTotal: 16384000 kB\nMemAvailable: 8192000 kB\n",
            "MemTotal: 1024 kB\nMemAvailable: 1024 kB\n",
            "MemTotal: 2048 kB\nMemAvailable: 0 kB\n",
            // corrupt source claiming more available than total
            "MemTotal: 1024 kB\nMemAvailable: 4096 kB\n",
            // no MemAvailable at all: falls back to free+buffers+cached
            "MemTotal: 8192000 kB\nMemFree: 1000000 kB\nBuffers: 500000 kB\nCached: 500000 kB\n",
        ];

        for fixture in fixtures {
            let mut fs = MockFs::new();
            fs.add_file("/proc/meminfo", fixture);
            let collector = SystemCollector::new(fs, "/proc");

            let mem = collector.collect_memory().unwrap();
            assert!(
                mem.available_ram_mb <= mem.total_ram_mb,
                "invariant violated for fixture: {}",
                fixture
            );
        }
    }

    #[test]
    fn test_collect_memory_tolerates_malformed_lines() {
        let mut fs = MockFs::new();
        fs.add_file(
            "/proc/meminfo",
            "MemTotal: 16384000 kB\nthis line has no separator\n",
        );
        let collector = SystemCollector::new(fs, "/proc");

        let mem = collector.collect_memory().unwrap();
        assert_eq!(mem.total_ram_mb, 16_000);
    }

    #[test]
    fn test_collect_memory_requires_mem_total() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "MemAvailable: 8192000 kB\n");
        let collector = SystemCollector::new(fs, "/proc");

        assert!(matches!(
            collector.collect_memory(),
            Err(CollectError::Parse(_))
        ));
    }

    #[test]
    fn test_collect_memory_no_swap_host_reports_zero_not_none() {
        let fs = MockFs::no_swap_host();
        let collector = SystemCollector::new(fs, "/proc");

        let mem = collector.collect_memory().unwrap();
        // swap lines are present with value 0: the concept exists, the
        // host just has none configured.
        assert_eq!(mem.total_swap_mb, Some(0));
        assert_eq!(mem.free_swap_mb, Some(0));
    }

    #[test]
    fn test_collect_os_identity() {
        let fs = MockFs::typical_system();
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(
            collector.collect_os_identity().unwrap(),
            "Ubuntu 24.04.1 LTS (Noble Numbat)"
        );
    }

    #[test]
    fn test_collect_os_identity_missing_file() {
        let collector = SystemCollector::new(MockFs::new(), "/proc");
        assert!(matches!(
            collector.collect_os_identity(),
            Err(CollectError::Io(_))
        ));
    }

    #[test]
    fn test_collect_kernel() {
        let fs = MockFs::typical_system();
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(
            collector.collect_kernel().unwrap(),
            "Linux 6.8.0-45-generic"
        );
    }

    #[test]
    fn test_collect_hostname_from_proc() {
        let fs = MockFs::typical_system();
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(collector.collect_hostname().unwrap(), "buildhost");
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_username_resolves_current_uid() {
        let uid = unsafe { libc::getuid() } as u32;
        let mut fs = MockFs::new();
        fs.add_file(
            "/etc/passwd",
            format!("snapuser:x:{}:{}:Snap User:/home/snapuser:/bin/bash\n", uid, uid),
        );
        let collector = SystemCollector::new(fs, "/proc");

        assert_eq!(collector.collect_username().unwrap(), "snapuser");
    }

    #[test]
    fn test_collect_load_average() {
        let fs = MockFs::typical_system();
        let collector = SystemCollector::new(fs, "/proc");

        let load = collector.collect_load_average().unwrap();
        assert!((load.one - 0.15).abs() < 1e-9);
        assert!((load.five - 0.10).abs() < 1e-9);
        assert!((load.fifteen - 0.05).abs() < 1e-9);
        assert!(load.one >= 0.0 && load.five >= 0.0 && load.fifteen >= 0.0);
    }

    #[test]
    fn test_collect_cpu_count_positive() {
        let collector = SystemCollector::new(MockFs::new(), "/proc");
        assert!(collector.collect_cpu_count() >= 1);
    }

    #[test]
    fn test_collect_drives_dev_backed_only_in_mount_order() {
        let fs = MockFs::typical_system();
        let collector = SystemCollector::new(fs, "/proc");

        let drives = collector.collect_drives().unwrap();

        let mountpoints: Vec<&str> = drives.iter().map(|d| d.mountpoint.as_str()).collect();
        assert_eq!(mountpoints, ["/", "/boot/efi", "/home"]);

        assert_eq!(drives[0].filesystem.as_deref(), Some("ext4"));
        assert!((drives[0].total_gb - 100.0).abs() < 1e-9);
        assert!((drives[0].free_gb - 25.0).abs() < 1e-9);
        assert!((drives[0].used_gb() - 75.0).abs() < 1e-9);
        assert!((drives[0].usage_percent() - 75.0).abs() < 1e-9);

        for drive in &drives {
            assert!(drive.free_gb <= drive.total_gb);
        }
    }

    #[test]
    fn test_collect_drives_duplicate_mountpoint_first_wins() {
        let mut fs = MockFs::new();
        fs.add_file(
            "/proc/mounts",
            "\
/dev/sda1 /data ext4 rw 0 0
/dev/sdb1 /data ext4 rw 0 0
",
        );
        fs.add_volume("/data", 1_073_741_824, 536_870_912);
        let collector = SystemCollector::new(fs, "/proc");

        let drives = collector.collect_drives().unwrap();
        assert_eq!(drives.len(), 1);
        assert_eq!(drives[0].mountpoint, "/data");
    }

    #[test]
    fn test_collect_drives_skips_volume_with_failed_capacity_query() {
        let mut fs = MockFs::new();
        fs.add_file(
            "/proc/mounts",
            "\
/dev/sda1 / ext4 rw 0 0
/dev/sdb1 /broken ext4 rw 0 0
",
        );
        fs.add_volume("/", 107_374_182_400, 26_843_545_600);
        // no volume registered for /broken: its statvfs fails
        let collector = SystemCollector::new(fs, "/proc");

        let drives = collector.collect_drives().unwrap();
        assert_eq!(drives.len(), 1);
        assert_eq!(drives[0].mountpoint, "/");
    }

    #[test]
    fn test_collect_drives_missing_mounts_source() {
        let collector = SystemCollector::new(MockFs::new(), "/proc");
        assert!(matches!(
            collector.collect_drives(),
            Err(CollectError::Io(_))
        ));
    }
}
