//! Data model for one poll tick, and the collaborator traits that produce it.
//!
//! The loop never trusts a collaborator to succeed: both traits return
//! `Result`, and [`crate::dashboard`] applies a single default-substitution
//! policy on failure ([`MetricSample::fallback`], empty drive list).

use core::fmt::Write;
use std::path::PathBuf;

use heapless::String;

use crate::error::Result;

/// One snapshot of host statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSample {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub memory_used: u64,
    pub memory_total: u64,
    pub disk_percent: f32,
    pub disk_used: u64,
    pub disk_total: u64,
    /// `None` when no thermal sensor is readable.
    pub temperature_c: Option<f32>,
    /// Combined receive + transmit rate in kilobytes per second.
    pub net_rate_kbps: f32,
    pub ip_address: std::string::String,
}

impl MetricSample {
    /// Sample used when the provider fails: zero usage, no temperature, no IP.
    pub fn fallback() -> Self {
        Self {
            cpu_percent: 0.0,
            memory_percent: 0.0,
            memory_used: 0,
            memory_total: 0,
            disk_percent: 0.0,
            disk_used: 0,
            disk_total: 0,
            temperature_c: None,
            net_rate_kbps: 0.0,
            ip_address: "N/A".into(),
        }
    }
}

impl Default for MetricSample {
    fn default() -> Self { Self::fallback() }
}

/// One mounted USB volume.
#[derive(Clone, Debug, PartialEq)]
pub struct DriveInfo {
    pub mount_path: PathBuf,
    pub name: std::string::String,
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
    pub used_percent: f32,
    pub filesystem_type: std::string::String,
    pub is_shared: bool,
}

impl DriveInfo {
    /// Build from raw space figures, deriving used bytes and percent.
    ///
    /// The name is the last path component of the mount point.
    pub fn from_space(
        mount_path: PathBuf,
        total_bytes: u64,
        free_bytes: u64,
        filesystem_type: &str,
        is_shared: bool,
    ) -> Self {
        let name = mount_path
            .file_name()
            .map_or_else(|| mount_path.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned());
        let free_bytes = free_bytes.min(total_bytes);
        let used_bytes = total_bytes - free_bytes;
        let used_percent = if total_bytes == 0 {
            0.0
        } else {
            (used_bytes as f64 / total_bytes as f64 * 100.0) as f32
        };
        let filesystem_type = if filesystem_type.is_empty() { "unknown" } else { filesystem_type };
        Self {
            mount_path,
            name,
            total_bytes,
            free_bytes,
            used_bytes,
            used_percent,
            filesystem_type: filesystem_type.into(),
            is_shared,
        }
    }
}

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Source of host statistics.
pub trait MetricsProvider {
    /// Take one sample. Individual fields a provider cannot read should be
    /// defaulted inside the provider; `Err` means nothing usable was read.
    fn sample(&mut self) -> Result<MetricSample>;
}

/// Source of mounted drives and their share state.
pub trait DriveRegistry {
    /// Full list of drives, recomputed on every call.
    fn list(&mut self) -> Result<Vec<DriveInfo>>;

    /// Flip the share state of one drive.
    fn toggle_share(
        &mut self,
        drive: &DriveInfo,
    ) -> Result<()>;
}

// =============================================================================
// Formatting
// =============================================================================

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Human-readable size with one decimal: `1536` -> `"1.5KB"`.
pub fn format_bytes(bytes: u64) -> String<16> {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let mut out = String::new();
    write!(out, "{value:.1}{}", BYTE_UNITS[unit]).ok();
    out
}

/// Bytes to gigabytes for "used/total GB" labels.
#[inline]
pub fn bytes_to_gb(bytes: u64) -> f32 { (bytes as f64 / (1024.0 * 1024.0 * 1024.0)) as f32 }
