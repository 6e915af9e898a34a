//! Linux collaborators: metrics from `sysinfo`, USB drives under the mount
//! root, and the Samba share registry.
//!
//! These are thin adapters. Anything that can fail per field (temperature,
//! IP address) degrades to a default inside the provider; only a failure of
//! the whole sample is reported as an error.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::net::UdpSocket;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};
use tracing::{debug, info};

use crate::error::{AcquisitionError, Result};
use crate::metrics::{DriveInfo, DriveRegistry, MetricSample, MetricsProvider};

/// Preferred thermal zone on a Raspberry Pi.
const CPU_THERMAL_LABEL: &str = "cpu_thermal";

/// Routable address used to pick the outbound interface. Nothing is sent.
const ROUTE_PROBE: &str = "8.8.8.8:80";

// =============================================================================
// Metrics
// =============================================================================

/// System metrics via `sysinfo`.
///
/// Keeps the previous network byte counters so each sample reports a rate.
pub struct SysinfoMetrics {
    system: System,
    disks: Disks,
    networks: Networks,
    components: Components,
    last_net: Option<(u64, Instant)>,
}

impl SysinfoMetrics {
    pub fn new() -> Self {
        let mut system = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::new().with_cpu_usage())
                .with_memory(MemoryRefreshKind::new().with_ram()),
        );
        // CPU usage is a delta; prime it so the first sample is meaningful
        system.refresh_cpu_usage();
        Self {
            system,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
            last_net: None,
        }
    }

    fn root_disk(&self) -> (u64, u64) {
        self.disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == Path::new("/"))
            .map_or((0, 0), |disk| (disk.total_space(), disk.available_space()))
    }

    fn temperature(&mut self) -> Option<f32> {
        self.components.refresh();
        let components = self.components.list();
        components
            .iter()
            .find(|c| c.label().contains(CPU_THERMAL_LABEL))
            .or_else(|| components.first())
            .map(sysinfo::Component::temperature)
            .filter(|celsius| celsius.is_finite())
    }

    fn net_rate_kbps(
        &mut self,
        now: Instant,
    ) -> f32 {
        self.networks.refresh();
        let total: u64 = self
            .networks
            .iter()
            .map(|(_, data)| data.total_received() + data.total_transmitted())
            .sum();
        let rate = match self.last_net {
            Some((previous, at)) => {
                let seconds = now.duration_since(at).as_secs_f64();
                if seconds > 0.0 {
                    (total.saturating_sub(previous) as f64 / 1024.0 / seconds) as f32
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        self.last_net = Some((total, now));
        rate
    }
}

impl Default for SysinfoMetrics {
    fn default() -> Self { Self::new() }
}

impl MetricsProvider for SysinfoMetrics {
    fn sample(&mut self) -> Result<MetricSample> {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        self.disks.refresh();

        let memory_total = self.system.total_memory();
        if memory_total == 0 {
            return Err(AcquisitionError::Metrics("total memory reported as zero".into()));
        }
        let memory_used = self.system.used_memory();

        let (disk_total, disk_free) = self.root_disk();
        let disk_used = disk_total.saturating_sub(disk_free);

        Ok(MetricSample {
            cpu_percent: self.system.global_cpu_usage(),
            memory_percent: percent(memory_used, memory_total),
            memory_used,
            memory_total,
            disk_percent: percent(disk_used, disk_total),
            disk_used,
            disk_total,
            temperature_c: self.temperature(),
            net_rate_kbps: self.net_rate_kbps(Instant::now()),
            ip_address: local_ip().unwrap_or_else(|| "N/A".into()),
        })
    }
}

#[inline]
fn percent(
    used: u64,
    total: u64,
) -> f32 {
    if total == 0 { 0.0 } else { (used as f64 / total as f64 * 100.0) as f32 }
}

/// Address of the interface that routes to the internet.
///
/// A connected UDP socket resolves the route without sending anything.
pub fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(ROUTE_PROBE).ok()?;
    let address = socket.local_addr().ok()?.ip();
    if address.is_unspecified() { None } else { Some(address.to_string()) }
}

// =============================================================================
// Share Registry
// =============================================================================

/// Samba share list for USB drives.
///
/// A drive is shared when the registry file has a `[name]` section for it.
/// A missing file means nothing is shared.
#[derive(Clone, Debug)]
pub struct ShareRegistry {
    path: PathBuf,
}

impl ShareRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// Names of all shared drives.
    pub fn shared_names(&self) -> Result<HashSet<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(parse_sections(&text)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(HashSet::new()),
            Err(source) => Err(AcquisitionError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn is_shared(
        &self,
        name: &str,
    ) -> bool {
        self.shared_names().is_ok_and(|names| names.contains(name))
    }
}

fn parse_sections(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('[')?.strip_suffix(']'))
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .collect()
}

// =============================================================================
// Drives
// =============================================================================

/// USB volumes mounted directly under a mount root.
pub struct MountDriveRegistry {
    mount_root: PathBuf,
    shares: ShareRegistry,
    share_command: PathBuf,
    disks: Disks,
}

impl MountDriveRegistry {
    pub fn new(
        mount_root: impl Into<PathBuf>,
        shares: ShareRegistry,
        share_command: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mount_root: mount_root.into(),
            shares,
            share_command: share_command.into(),
            disks: Disks::new_with_refreshed_list(),
        }
    }
}

impl DriveRegistry for MountDriveRegistry {
    fn list(&mut self) -> Result<Vec<DriveInfo>> {
        // Drives come and go, so the disk list is rebuilt every poll
        self.disks.refresh_list();
        let shared = self.shares.shared_names().unwrap_or_else(|error| {
            debug!(%error, "share registry unreadable, treating all drives as private");
            HashSet::new()
        });

        let mut drives: Vec<DriveInfo> = self
            .disks
            .list()
            .iter()
            .filter(|disk| disk.mount_point().parent() == Some(self.mount_root.as_path()))
            .map(|disk| {
                let mut drive = DriveInfo::from_space(
                    disk.mount_point().to_path_buf(),
                    disk.total_space(),
                    disk.available_space(),
                    &disk.file_system().to_string_lossy(),
                    false,
                );
                drive.is_shared = shared.contains(&drive.name);
                drive
            })
            .collect();
        drives.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(drives)
    }

    fn toggle_share(
        &mut self,
        drive: &DriveInfo,
    ) -> Result<()> {
        let action = if self.shares.is_shared(&drive.name) { "remove" } else { "add" };
        let command = format!("{} {action} {}", self.share_command.display(), drive.name);
        info!(%command, "toggling share");

        let status = Command::new(&self.share_command)
            .arg(action)
            .arg(&drive.name)
            .status()
            .map_err(|error| AcquisitionError::ShareCommand {
                command: command.clone(),
                reason: error.to_string(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(AcquisitionError::ShareCommand {
                command,
                reason: status.to_string(),
            })
        }
    }
}
