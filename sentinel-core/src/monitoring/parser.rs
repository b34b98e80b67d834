//! Parsers for remote metric command output
//!
//! Each sub-probe runs one shell command and hands its output to a pure
//! parser here. Parsers never fail the probe: callers fall back to zero
//! values when a parse error is returned.

use crate::error::ParseError;

/// Reports the instantaneous CPU idle percentage as a bare number
pub const CPU_IDLE_COMMAND: &str =
    r"top -bn1 | grep 'Cpu(s)' | sed 's/.*, *\([0-9.]*\)%* id.*/\1/'";

/// Memory table in megabytes: line 2 is `Mem:`, line 3 is `Swap:`
pub const MEMORY_COMMAND: &str = "free -m";

/// Top five processes by memory share, plus the header line
pub const TOP_PROCESSES_COMMAND: &str = "ps -eo comm,pmem --sort=-pmem | head -n 6";

/// Drops the page cache; needs passwordless sudo on the target
pub const DEFAULT_MAINTENANCE_COMMAND: &str =
    "sudo /bin/sh -c 'echo 3 > /proc/sys/vm/drop_caches'";

/// Memory and swap figures in megabytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryReading {
    /// Total memory
    pub total_mb: u64,
    /// Used memory
    pub used_mb: u64,
    /// Free memory
    pub free_mb: u64,
    /// Total swap
    pub swap_total_mb: u64,
    /// Used swap
    pub swap_used_mb: u64,
}

/// Stateless parser for metric command output
pub struct MetricsParser;

impl MetricsParser {
    /// Parses [`CPU_IDLE_COMMAND`] output into a usage percentage
    /// (`100 - idle`).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the output is empty, not a number, or not
    /// a percentage.
    pub fn parse_cpu_usage(output: &str) -> Result<f64, ParseError> {
        let text = output.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        // Some locales print a decimal comma
        let idle: f64 = text
            .replace(',', ".")
            .parse()
            .map_err(|_| ParseError::InvalidValue {
                field: "cpu idle",
                value: text.to_string(),
            })?;

        if !idle.is_finite() || !(0.0..=100.0).contains(&idle) {
            return Err(ParseError::InvalidValue {
                field: "cpu idle",
                value: text.to_string(),
            });
        }

        Ok(100.0 - idle)
    }

    /// Parses [`MEMORY_COMMAND`] output.
    ///
    /// The second line yields memory `(total, used, free)` when it has at
    /// least four fields; the third yields swap `(total, used)` when it has
    /// at least three. Short lines and unparseable fields leave zeros.
    #[must_use]
    pub fn parse_memory(output: &str) -> MemoryReading {
        let lines: Vec<&str> = output.lines().collect();
        let mut reading = MemoryReading::default();

        if let Some(line) = lines.get(1) {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 4 {
                reading.total_mb = Self::parse_mb(parts[1]);
                reading.used_mb = Self::parse_mb(parts[2]);
                reading.free_mb = Self::parse_mb(parts[3]);
            }
        }

        if let Some(line) = lines.get(2) {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 3 {
                reading.swap_total_mb = Self::parse_mb(parts[1]);
                reading.swap_used_mb = Self::parse_mb(parts[2]);
            }
        }

        reading
    }

    /// Returns the [`TOP_PROCESSES_COMMAND`] output trimmed, verbatim
    #[must_use]
    pub fn parse_top_processes(output: &str) -> String {
        output.trim().to_string()
    }

    fn parse_mb(field: &str) -> u64 {
        field.parse().unwrap_or(0)
    }
}
