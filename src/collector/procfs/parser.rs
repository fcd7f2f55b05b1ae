//! Parsers for Linux pseudo-file formats.
//!
//! Pure functions from file content to typed data, testable with string
//! fixtures. A malformed line never fails a whole parse: partial data
//! beats total failure, but drops are counted so callers can log them.

use std::collections::HashMap;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Result of a key/value scan: the parsed map plus how many lines were
/// dropped as malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedValues {
    pub values: HashMap<String, u64>,
    pub skipped_lines: usize,
}

impl KeyedValues {
    /// Looks up one key.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }
}

/// Parses `Key: value [unit]` files such as `/proc/meminfo`.
///
/// Each line is split on the first `:`; the first whitespace-separated
/// token of the value is parsed as an integer. Lines with no separator or
/// a non-numeric first token are dropped and counted. A repeated key keeps
/// the last occurrence.
pub fn parse_keyed_values(content: &str) -> KeyedValues {
    let mut scan = KeyedValues::default();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            scan.skipped_lines += 1;
            continue;
        };
        let Some(token) = value.split_whitespace().next() else {
            scan.skipped_lines += 1;
            continue;
        };
        match token.parse::<u64>() {
            Ok(v) => {
                scan.values.insert(key.trim().to_string(), v);
            }
            Err(_) => scan.skipped_lines += 1,
        }
    }

    scan
}

/// Parses `/etc/os-release` style `KEY=value` content.
///
/// Values may be double-quoted; surrounding quotes are stripped. The first
/// declaration of a key wins.
pub fn parse_os_release(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        values
            .entry(key.trim().to_string())
            .or_insert_with(|| value.to_string());
    }

    values
}

/// One line of `/proc/mounts`.
#[derive(Debug, Clone, PartialEq)]
pub struct MountEntry {
    /// Device the filesystem is mounted from (`/dev/sda1`, `tmpfs`, ...).
    pub device: String,
    /// Where it is mounted.
    pub mountpoint: String,
    /// Filesystem type (`ext4`, `vfat`, `proc`, ...).
    pub fstype: String,
}

/// Parses `/proc/mounts` content into entries in file order.
///
/// Format: `device mountpoint fstype options dump pass`. Lines with fewer
/// than three fields are skipped.
pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(device), Some(mountpoint), Some(fstype)) =
            (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        entries.push(MountEntry {
            device: device.to_string(),
            mountpoint: mountpoint.to_string(),
            fstype: fstype.to_string(),
        });
    }

    entries
}

/// Parses `/proc/loadavg` content: the three leading float fields.
pub fn parse_loadavg(content: &str) -> Result<(f64, f64, f64), ParseError> {
    let mut parts = content.split_whitespace();
    let mut next = |name: &str| -> Result<f64, ParseError> {
        parts
            .next()
            .ok_or_else(|| ParseError::new(format!("missing {}", name)))?
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))
    };
    Ok((next("load1")?, next("load5")?, next("load15")?))
}

/// Parses `/etc/passwd` content and returns a map of UID -> username.
///
/// Format: `username:password:uid:gid:gecos:home:shell`.
pub fn parse_passwd(content: &str) -> HashMap<u32, String> {
    let mut map = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() >= 3
            && let Ok(uid) = parts[2].parse::<u32>()
        {
            map.entry(uid).or_insert_with(|| parts[0].to_string());
        }
    }

    map
}
