//! Plain-text presenter.
//!
//! Pure formatting over an assembled snapshot. Degraded fields print as
//! explicit `unknown` markers — never as zeros that could pass for real
//! readings. GB figures and percentages are rounded to one decimal place
//! here, at display time.

use std::fmt::Write;

use crate::model::SystemSnapshot;

/// Renders the snapshot in the classic one-line-per-field layout.
pub fn render(snapshot: &SystemSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "OS: {}", snapshot.os_name);
    let _ = writeln!(out, "Kernel: {}", snapshot.kernel_version);
    let _ = writeln!(out, "Architecture: {}", snapshot.architecture);
    let _ = writeln!(out, "Hostname: {}", snapshot.hostname);
    let _ = writeln!(out, "User: {}", snapshot.username);
    let _ = writeln!(out, "Processors: {}", snapshot.cpu_count);

    if let Some(load) = &snapshot.load_average {
        let _ = writeln!(
            out,
            "Load average: {:.2}, {:.2}, {:.2}",
            load.one, load.five, load.fifteen
        );
    }

    match &snapshot.memory {
        Some(mem) => {
            let _ = writeln!(
                out,
                "RAM: {}MB free / {}MB total",
                mem.available_ram_mb, mem.total_ram_mb
            );
            if let Some(load) = mem.memory_load_percent {
                let _ = writeln!(out, "Memory load: {}%", load);
            }
            if let (Some(free), Some(total)) = (mem.free_swap_mb, mem.total_swap_mb) {
                let _ = writeln!(out, "Swap: {}MB free / {}MB total", free, total);
            }
            if let (Some(used), Some(total)) = (mem.pagefile_used_mb, mem.pagefile_total_mb) {
                let _ = writeln!(out, "Pagefile: {}MB / {}MB", used, total);
            }
            match mem.virtual_memory_mb {
                Some(virt) => {
                    let _ = writeln!(out, "Virtual memory: {}MB", virt);
                }
                None => {
                    let _ = writeln!(out, "Virtual memory: unknown");
                }
            }
        }
        None => {
            let _ = writeln!(out, "RAM: unknown (memory source unavailable)");
        }
    }

    let _ = writeln!(out, "Drives:");
    if snapshot.drives.is_empty() {
        let _ = writeln!(out, "  (none detected)");
    }
    for drive in &snapshot.drives {
        let _ = writeln!(
            out,
            "  {:<12} {:<6} {:.1}GB free / {:.1}GB total ({:.1}% used)",
            drive.mountpoint,
            drive.filesystem.as_deref().unwrap_or("-"),
            drive.free_gb,
            drive.total_gb,
            drive.usage_percent()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DriveInfo, LoadAverage, MemoryInfo, SystemSnapshot};

    fn snapshot() -> SystemSnapshot {
        SystemSnapshot {
            captured_at: 1_700_000_000,
            os_name: "Ubuntu 24.04.1 LTS (Noble Numbat)".to_string(),
            kernel_version: "Linux 6.8.0-45-generic".to_string(),
            architecture: "x86_64".to_string(),
            hostname: "buildhost".to_string(),
            username: "user".to_string(),
            cpu_count: 8,
            load_average: Some(LoadAverage {
                one: 0.15,
                five: 0.10,
                fifteen: 0.05,
            }),
            memory: Some(MemoryInfo {
                total_ram_mb: 16_000,
                available_ram_mb: 8_000,
                total_swap_mb: Some(4_000),
                free_swap_mb: Some(4_000),
                virtual_memory_mb: Some(33_554_431),
                memory_load_percent: None,
                pagefile_used_mb: None,
                pagefile_total_mb: None,
            }),
            drives: vec![DriveInfo {
                mountpoint: "/".to_string(),
                filesystem: Some("ext4".to_string()),
                total_gb: 100.0,
                free_gb: 25.0,
            }],
        }
    }

    #[test]
    fn test_render_full_snapshot() {
        let text = render(&snapshot());

        assert!(text.contains("OS: Ubuntu 24.04.1 LTS (Noble Numbat)"));
        assert!(text.contains("Kernel: Linux 6.8.0-45-generic"));
        assert!(text.contains("Processors: 8"));
        assert!(text.contains("Load average: 0.15, 0.10, 0.05"));
        assert!(text.contains("RAM: 8000MB free / 16000MB total"));
        assert!(text.contains("Swap: 4000MB free / 4000MB total"));
        // one decimal place at display time
        assert!(text.contains("25.0GB free / 100.0GB total (75.0% used)"));
    }

    #[test]
    fn test_render_degraded_memory_shows_marker_not_zeros() {
        let mut snap = snapshot();
        snap.memory = None;

        let text = render(&snap);
        assert!(text.contains("RAM: unknown"));
        assert!(!text.contains("RAM: 0MB"));
    }

    #[test]
    fn test_render_no_drives_marker() {
        let mut snap = snapshot();
        snap.drives.clear();

        let text = render(&snap);
        assert!(text.contains("(none detected)"));
    }

    #[test]
    fn test_render_omits_absent_platform_concepts() {
        let mut snap = snapshot();
        // Windows-shaped snapshot: no load average, no swap, pagefile present
        snap.load_average = None;
        if let Some(mem) = snap.memory.as_mut() {
            mem.total_swap_mb = None;
            mem.free_swap_mb = None;
            mem.memory_load_percent = Some(41);
            mem.pagefile_used_mb = Some(9_000);
            mem.pagefile_total_mb = Some(20_000);
        }

        let text = render(&snap);
        assert!(!text.contains("Load average:"));
        assert!(!text.contains("Swap:"));
        assert!(text.contains("Memory load: 41%"));
        assert!(text.contains("Pagefile: 9000MB / 20000MB"));
    }
}
