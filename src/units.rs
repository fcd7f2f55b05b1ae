//! Unit normalization.
//!
//! Canonical units: memory amounts in megabytes, drive capacities in
//! gigabytes, binary prefixes throughout (1 GB = 1024³ bytes). Integer
//! conversions floor. Everything here keeps full precision; rounding for
//! display is the presenter's job.

const KB_PER_MB: u64 = 1024;
const BYTES_PER_MB: u64 = 1024 * 1024;
const BYTES_PER_GB: f64 = (1024u64 * 1024 * 1024) as f64;

/// Kilobytes to megabytes, flooring.
pub fn kb_to_mb(kb: u64) -> u64 {
    kb / KB_PER_MB
}

/// Bytes to megabytes, flooring.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

/// Page count to megabytes, given the page size in bytes.
pub fn pages_to_mb(pages: u64, page_size: u64) -> u64 {
    pages.saturating_mul(page_size) / BYTES_PER_MB
}

/// Bytes to gigabytes, full precision.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// `used` as a percentage of `total`; 0 when `total` is 0.
pub fn usage_percent(used: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        used / total * 100.0
    }
}
