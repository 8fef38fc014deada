//! Host resource sampling.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sysinfo::{CpuExt, DiskExt, System, SystemExt};

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_entity::stats::ResourceSample;

/// Gap between the two CPU refreshes needed for a usage figure.
const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Source of live CPU, memory and disk utilisation.
#[async_trait]
pub trait ResourceSampler: Send + Sync + std::fmt::Debug + 'static {
    async fn sample(&self) -> AppResult<ResourceSample>;
}

/// Samples the local host through `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoSampler;

#[async_trait]
impl ResourceSampler for SysinfoSampler {
    async fn sample(&self) -> AppResult<ResourceSample> {
        tokio::task::spawn_blocking(collect_sample)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Resource sampling failed", e))
    }
}

fn collect_sample() -> ResourceSample {
    let mut sys = System::new();
    sys.refresh_cpu();
    std::thread::sleep(CPU_SAMPLE_INTERVAL);
    sys.refresh_cpu();
    sys.refresh_memory();
    sys.refresh_disks_list();

    let (disk_total, disk_available) = sys.disks().iter().fold((0u64, 0u64), |(t, a), d| {
        (t + d.total_space(), a + d.available_space())
    });

    ResourceSample {
        cpu_percent: round2(f64::from(sys.global_cpu_info().cpu_usage())),
        memory_percent: percent(sys.used_memory(), sys.total_memory()),
        disk_percent: percent(disk_total.saturating_sub(disk_available), disk_total),
        memory_available_gb: gibibytes(sys.available_memory()),
        disk_free_gb: gibibytes(disk_available),
        boot_time: boot_time(sys.boot_time()),
    }
}

fn boot_time(secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(secs).ok().filter(|s| *s > 0)?;
    Utc.timestamp_opt(secs, 0).single()
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(used as f64 / total as f64 * 100.0)
}

fn gibibytes(bytes: u64) -> f64 {
    round2(bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Identity of the host the process runs on.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub hostname: String,
    pub os_version: String,
}

impl HostInfo {
    /// Reads hostname and OS version once.
    pub fn detect() -> Self {
        let sys = System::new();
        Self {
            hostname: sys.host_name().unwrap_or_else(|| "unknown".to_string()),
            os_version: sys
                .long_os_version()
                .or_else(|| sys.os_version())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}
