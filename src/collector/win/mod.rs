//! Windows readers: structured system queries.
//!
//! Each query fills one fixed-layout record whose size field is set
//! before the call, and its fields are decoded into typed values right
//! here — raw layouts never leak past this module. One record is read
//! per call, so every decoded group of fields is internally consistent.

use std::collections::HashSet;

use crate::collector::{CollectError, UNKNOWN};
use crate::model::{DriveInfo, MemoryInfo, SystemSnapshot};
use crate::units;

use windows_sys::Wdk::System::SystemServices::RtlGetVersion;
use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::Storage::FileSystem::{GetDiskFreeSpaceExW, GetLogicalDriveStringsW};
use windows_sys::Win32::System::ProcessStatus::{GetPerformanceInfo, PERFORMANCE_INFORMATION};
use windows_sys::Win32::System::SystemInformation::{
    GetSystemInfo, GlobalMemoryStatusEx, MEMORYSTATUSEX, OSVERSIONINFOW,
    PROCESSOR_ARCHITECTURE_AMD64, PROCESSOR_ARCHITECTURE_ARM, PROCESSOR_ARCHITECTURE_ARM64,
    PROCESSOR_ARCHITECTURE_INTEL, SYSTEM_INFO,
};

fn api_error(call: &'static str) -> CollectError {
    // SAFETY: reads the calling thread's last-error value, nothing more.
    let status = unsafe { GetLastError() } as i32;
    CollectError::Api { call, status }
}

/// OS version triple from `RtlGetVersion`.
#[derive(Debug, Clone, Copy)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

/// Reads the OS version record.
pub fn read_os_version() -> Result<OsVersion, CollectError> {
    let mut info: OSVERSIONINFOW = unsafe { std::mem::zeroed() };
    info.dwOSVersionInfoSize = std::mem::size_of::<OSVERSIONINFOW>() as u32;

    // SAFETY: info is a writable record with its size field set.
    let status = unsafe { RtlGetVersion(&mut info) };
    if status != 0 {
        return Err(CollectError::Api {
            call: "RtlGetVersion",
            status,
        });
    }

    Ok(OsVersion {
        major: info.dwMajorVersion,
        minor: info.dwMinorVersion,
        build: info.dwBuildNumber,
    })
}

/// Processor count and architecture from `GetSystemInfo`.
#[derive(Debug, Clone)]
pub struct ProcessorInfo {
    pub count: u32,
    pub architecture: String,
}

/// Reads the system-info record.
pub fn read_processor_info() -> ProcessorInfo {
    let mut info: SYSTEM_INFO = unsafe { std::mem::zeroed() };
    // SAFETY: the call only writes into the record and cannot fail.
    unsafe { GetSystemInfo(&mut info) };

    // SAFETY: GetSystemInfo fills the struct arm of the OEM-id union.
    let code = unsafe { info.Anonymous.Anonymous.wProcessorArchitecture };
    let architecture = match code {
        PROCESSOR_ARCHITECTURE_INTEL => "x86".to_string(),
        PROCESSOR_ARCHITECTURE_ARM => "arm".to_string(),
        PROCESSOR_ARCHITECTURE_AMD64 => "x86_64".to_string(),
        PROCESSOR_ARCHITECTURE_ARM64 => "aarch64".to_string(),
        other => format!("unknown ({})", other),
    };

    ProcessorInfo {
        count: info.dwNumberOfProcessors,
        architecture,
    }
}

#[derive(Debug, Clone, Copy)]
struct PagefileUsage {
    used_mb: u64,
    total_mb: u64,
}

/// Reads pagefile commit charge from the performance-info record.
fn read_pagefile() -> Result<PagefileUsage, CollectError> {
    let mut perf: PERFORMANCE_INFORMATION = unsafe { std::mem::zeroed() };
    perf.cb = std::mem::size_of::<PERFORMANCE_INFORMATION>() as u32;

    // SAFETY: perf is a writable record with its size field set.
    if unsafe { GetPerformanceInfo(&mut perf, perf.cb) } == 0 {
        return Err(api_error("GetPerformanceInfo"));
    }

    let page_size = perf.PageSize as u64;
    Ok(PagefileUsage {
        used_mb: units::pages_to_mb(perf.CommitTotal as u64, page_size),
        total_mb: units::pages_to_mb(perf.CommitLimit as u64, page_size),
    })
}

/// Reads memory figures, normalized to MB.
///
/// RAM, load and virtual size come from one `GlobalMemoryStatusEx`
/// record; pagefile commit charge from one `GetPerformanceInfo` record.
/// Fields from the two calls are kept in separate groups and a pagefile
/// failure degrades only the pagefile fields. Windows has no swap in the
/// Unix sense, so the swap fields stay empty.
pub fn read_memory_status() -> Result<MemoryInfo, CollectError> {
    let mut status: MEMORYSTATUSEX = unsafe { std::mem::zeroed() };
    status.dwLength = std::mem::size_of::<MEMORYSTATUSEX>() as u32;

    // SAFETY: status is a writable record with its size field set.
    if unsafe { GlobalMemoryStatusEx(&mut status) } == 0 {
        return Err(api_error("GlobalMemoryStatusEx"));
    }

    let pagefile = match read_pagefile() {
        Ok(usage) => Some(usage),
        Err(err) => {
            tracing::debug!("pagefile figures unavailable: {}", err);
            None
        }
    };

    Ok(MemoryInfo {
        total_ram_mb: units::bytes_to_mb(status.ullTotalPhys),
        available_ram_mb: units::bytes_to_mb(status.ullAvailPhys.min(status.ullTotalPhys)),
        total_swap_mb: None,
        free_swap_mb: None,
        virtual_memory_mb: Some(units::bytes_to_mb(status.ullTotalVirtual)),
        memory_load_percent: Some(status.dwMemoryLoad.min(100) as u8),
        pagefile_used_mb: pagefile.map(|p| p.used_mb),
        pagefile_total_mb: pagefile.map(|p| p.total_mb),
    })
}

/// Enumerates logical drive roots (`C:\`, `D:\`, ...).
pub fn read_logical_drives() -> Result<Vec<String>, CollectError> {
    let mut buf = [0u16; 1024];

    // SAFETY: buf is a writable buffer of the stated length.
    let len = unsafe { GetLogicalDriveStringsW(buf.len() as u32, buf.as_mut_ptr()) };
    if len == 0 || len as usize > buf.len() {
        return Err(api_error("GetLogicalDriveStringsW"));
    }

    // The buffer holds NUL-separated strings with a final empty one.
    Ok(buf[..len as usize]
        .split(|&c| c == 0)
        .filter(|s| !s.is_empty())
        .map(String::from_utf16_lossy)
        .collect())
}

/// Queries total/free bytes for one drive root.
pub fn read_drive_space(root: &str) -> Result<(u64, u64), CollectError> {
    let wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
    let mut free_to_caller = 0u64;
    let mut total = 0u64;
    let mut free = 0u64;

    // SAFETY: wide is NUL-terminated and the out-params are writable.
    let ok = unsafe {
        GetDiskFreeSpaceExW(wide.as_ptr(), &mut free_to_caller, &mut total, &mut free)
    };
    if ok == 0 {
        return Err(api_error("GetDiskFreeSpaceExW"));
    }
    Ok((total, free))
}

/// Assembles a snapshot from the Windows queries, with the same
/// degradation policy as the Linux path: identity falls back to
/// `"Unknown"`, a failed memory query is carried as `None`, a drive whose
/// space query fails is skipped.
pub fn collect_snapshot() -> SystemSnapshot {
    let version = match read_os_version() {
        Ok(version) => Some(version),
        Err(err) => {
            tracing::warn!("os version unavailable: {}", err);
            None
        }
    };
    let os_name = version
        .map(|v| format!("Windows {}.{} (Build {})", v.major, v.minor, v.build))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let kernel_version = version
        .map(|v| format!("Windows NT {}.{}.{}", v.major, v.minor, v.build))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let processor = read_processor_info();

    let hostname = std::env::var("COMPUTERNAME").unwrap_or_else(|_| UNKNOWN.to_string());
    let username = std::env::var("USERNAME").unwrap_or_else(|_| UNKNOWN.to_string());

    let memory = match read_memory_status() {
        Ok(mem) => Some(mem),
        Err(err) => {
            tracing::warn!("memory figures unavailable: {}", err);
            None
        }
    };

    let drives = match read_logical_drives() {
        Ok(roots) => {
            let mut seen = HashSet::new();
            let mut drives = Vec::new();
            for root in roots {
                if !seen.insert(root.clone()) {
                    continue;
                }
                match read_drive_space(&root) {
                    Ok((total_bytes, free_bytes)) => drives.push(DriveInfo {
                        mountpoint: root,
                        filesystem: None,
                        total_gb: units::bytes_to_gb(total_bytes),
                        free_gb: units::bytes_to_gb(free_bytes.min(total_bytes)),
                    }),
                    Err(err) => {
                        tracing::debug!("skipping drive {}: {}", root, err);
                    }
                }
            }
            drives
        }
        Err(err) => {
            tracing::warn!("drive enumeration unavailable: {}", err);
            Vec::new()
        }
    };

    SystemSnapshot {
        captured_at: chrono::Utc::now().timestamp(),
        os_name,
        kernel_version,
        architecture: processor.architecture,
        hostname,
        username,
        cpu_count: processor.count as usize,
        load_average: None,
        memory,
        drives,
    }
}
