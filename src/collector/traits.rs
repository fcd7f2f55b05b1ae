//! Filesystem seam between the readers and the OS.
//!
//! Everything the Linux collectors touch — pseudo-file reads and the
//! per-mountpoint capacity query — goes through [`FileSystem`], so the
//! same collectors run against in-memory fixtures in tests.

use std::io;
use std::path::Path;

/// Capacity of one mounted volume, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeStats {
    /// Total size of the volume.
    pub total_bytes: u64,
    /// Free space on the volume.
    pub free_bytes: u64,
}

/// Abstraction for raw-source reads.
///
/// Implemented by [`RealFs`] for production and by
/// [`MockFs`](crate::collector::mock::MockFs) for tests.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Queries total/free capacity of the volume mounted at `mountpoint`.
    fn volume_stats(&self, mountpoint: &Path) -> io::Result<VolumeStats>;
}

/// Real filesystem implementation: `std::fs` reads plus `statvfs(3)` for
/// volume capacity.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    fn volume_stats(&self, mountpoint: &Path) -> io::Result<VolumeStats> {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(mountpoint.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "mountpoint contains NUL"))?;

        let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
        // SAFETY: c_path is NUL-terminated and stat is a properly sized
        // output record for this call.
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }

        // f_frsize is the fragment size capacities are counted in; some
        // filesystems report it as 0 and only fill f_bsize.
        let frsize = if stat.f_frsize > 0 {
            stat.f_frsize as u64
        } else {
            stat.f_bsize as u64
        };

        Ok(VolumeStats {
            total_bytes: (stat.f_blocks as u64).saturating_mul(frsize),
            free_bytes: (stat.f_bfree as u64).saturating_mul(frsize),
        })
    }

    #[cfg(not(unix))]
    fn volume_stats(&self, _mountpoint: &Path) -> io::Result<VolumeStats> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "volume_stats is only implemented for unix hosts",
        ))
    }
}
