//! In-memory mock filesystem for testing collectors without a real `/proc`.
//!
//! `MockFs` stores file contents and volume capacities in memory, so the
//! collectors can be driven with fixture data on any host and in CI.

use crate::collector::traits::{FileSystem, VolumeStats};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Map from mountpoint to registered capacity.
    volumes: HashMap<PathBuf, VolumeStats>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Removes a file, simulating an absent or unreadable source.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }

    /// Registers capacity figures for the volume mounted at `mountpoint`.
    ///
    /// A mountpoint without a registered volume fails its capacity query,
    /// which is how tests simulate a stale or unreadable mount.
    pub fn add_volume(&mut self, mountpoint: impl AsRef<Path>, total_bytes: u64, free_bytes: u64) {
        self.volumes.insert(
            mountpoint.as_ref().to_path_buf(),
            VolumeStats {
                total_bytes,
                free_bytes,
            },
        );
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn volume_stats(&self, mountpoint: &Path) -> io::Result<VolumeStats> {
        self.volumes.get(mountpoint).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no volume mounted at {}", mountpoint.display()),
            )
        })
    }
}

impl MockFs {
    /// Creates a typical desktop host: 16 GB RAM, a bit of load, three
    /// `/dev/`-backed mounts among the usual pseudo-mount noise.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/etc/os-release",
            "\
NAME=\"Ubuntu\"
VERSION=\"24.04.1 LTS (Noble Numbat)\"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME=\"Ubuntu 24.04.1 LTS\"
VERSION_ID=\"24.04\"
",
        );

        fs.add_file(
            "/etc/passwd",
            "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
nobody:x:65534:65534:nobody:/nonexistent:/usr/sbin/nologin
user:x:1000:1000:User:/home/user:/bin/bash
",
        );

        fs.add_file("/proc/sys/kernel/ostype", "Linux\n");
        fs.add_file("/proc/sys/kernel/osrelease", "6.8.0-45-generic\n");
        fs.add_file("/proc/sys/kernel/hostname", "buildhost\n");
        fs.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         4096000 kB
MemAvailable:    8192000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
VmallocTotal:   34359738367 kB
",
        );

        fs.add_file(
            "/proc/mounts",
            "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev,size=1635996k 0 0
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
/dev/nvme0n1p1 /boot/efi vfat rw,relatime 0 0
/dev/sda1 /home ext4 rw,relatime 0 0
tmpfs /tmp tmpfs rw,nosuid,nodev 0 0
",
        );

        // 100 GiB root with 25 GiB free, 512 MiB EFI, 500 GiB home.
        fs.add_volume("/", 107_374_182_400, 26_843_545_600);
        fs.add_volume("/boot/efi", 536_870_912, 429_496_729);
        fs.add_volume("/home", 536_870_912_000, 214_748_364_800);

        fs
    }

    /// Host with no swap configured: swap lines report zero.
    pub fn no_swap_host() -> Self {
        let mut fs = Self::typical_system();
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:        8192000 kB
MemFree:         2048000 kB
MemAvailable:    4096000 kB
SwapTotal:             0 kB
SwapFree:              0 kB
VmallocTotal:   34359738367 kB
",
        );
        fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_read_and_exists() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/loadavg", "0.1 0.2 0.3 1/100 42\n");

        assert!(fs.exists(Path::new("/proc/loadavg")));
        assert!(!fs.exists(Path::new("/proc/meminfo")));
        assert_eq!(
            fs.read_to_string(Path::new("/proc/loadavg")).unwrap(),
            "0.1 0.2 0.3 1/100 42\n"
        );
    }

    #[test]
    fn test_mock_fs_missing_file_is_not_found() {
        let fs = MockFs::new();
        let err = fs.read_to_string(Path::new("/proc/meminfo")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_fs_volume_stats() {
        let mut fs = MockFs::new();
        fs.add_volume("/", 1000, 250);

        let stats = fs.volume_stats(Path::new("/")).unwrap();
        assert_eq!(stats.total_bytes, 1000);
        assert_eq!(stats.free_bytes, 250);

        assert!(fs.volume_stats(Path::new("/home")).is_err());
    }
}
