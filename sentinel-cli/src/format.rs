//! Terminal formatting helpers.

use std::fmt::Write as _;

use sentinel_core::{HealthReport, ProgressEvent, ProgressStatus, PublicHost};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Renders a progress line, colored by status when `color` is set
#[must_use]
pub fn progress_line(event: &ProgressEvent, color: bool) -> String {
    if !color {
        return event.to_string();
    }
    let tint = match event.status {
        ProgressStatus::Ok => GREEN,
        ProgressStatus::Warn => YELLOW,
        ProgressStatus::Fail => RED,
        ProgressStatus::Complete => BOLD,
        ProgressStatus::Info => return event.to_string(),
    };
    format!("{tint}{event}{RESET}")
}

/// Formats the public host view as a table
#[must_use]
pub fn hosts_table(hosts: &[PublicHost]) -> String {
    if hosts.is_empty() {
        return "No servers configured.".to_string();
    }

    let name_width = hosts.iter().map(|h| h.name.len()).max().unwrap_or(4).max(4);
    let host_width = hosts.iter().map(|h| h.host.len()).max().unwrap_or(4).max(4);
    let port_width = 5;

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<name_width$}  {:<host_width$}  {:<port_width$}  USER",
        "NAME", "HOST", "PORT"
    );
    let _ = writeln!(
        output,
        "{:-<name_width$}  {:-<host_width$}  {:-<port_width$}  ----",
        "", "", ""
    );
    for host in hosts {
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<host_width$}  {:<port_width$}  {}",
            host.name, host.host, host.port, host.user
        );
    }

    output.trim_end().to_string()
}

/// Formats health reports as a table
#[must_use]
pub fn reports_table(reports: &[HealthReport], color: bool) -> String {
    if reports.is_empty() {
        return "No servers probed.".to_string();
    }

    let name_width = reports
        .iter()
        .map(|r| r.server_name.len())
        .max()
        .unwrap_or(6)
        .max(6);
    let status_width = 7;

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<name_width$}  {:<status_width$}  CACHE  {:>6}  {:>13}  {:>13}  ERROR",
        "SERVER", "STATUS", "CPU%", "MEM USED/TOT", "SWAP USED/TOT"
    );
    for r in reports {
        let status = format!("{:<status_width$}", r.status_label());
        let status = match (color, r.is_healthy(), r.is_online) {
            (false, _, _) => status,
            (true, true, _) => format!("{GREEN}{status}{RESET}"),
            (true, false, true) => format!("{YELLOW}{status}{RESET}"),
            (true, false, false) => format!("{RED}{status}{RESET}"),
        };
        let _ = writeln!(
            output,
            "{:<name_width$}  {status}  {:<5}  {:>6.1}  {:>13}  {:>13}  {}",
            r.server_name,
            if r.cache_cleared { "yes" } else { "no" },
            r.cpu_usage_percent,
            format!("{}/{}", r.mem_used_mb, r.mem_total_mb),
            format!("{}/{}", r.swap_used_mb, r.swap_total_mb),
            r.error.as_deref().unwrap_or("")
        );
    }

    output.trim_end().to_string()
}
