use sysinfo::{Components, Disks};

use crate::error::{SensorError, SensorResult};
use crate::system::disk::DiskIoSnapshot;
use crate::system::probe::{HardwareSensor, SensorKind};

pub trait PlatformExtensions {
    /// Name of the hardware-monitoring service this platform queries.
    const MONITOR_LABEL: &'static str;

    fn hardware_sensors(components: &mut Components) -> SensorResult<Vec<HardwareSensor>>;
    fn disk_io_counters(disks: &mut Disks) -> SensorResult<DiskIoSnapshot>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn hardware_monitor_label() -> &'static str {
    <platform_impl::Platform as PlatformExtensions>::MONITOR_LABEL
}

pub fn hardware_sensors(components: &mut Components) -> SensorResult<Vec<HardwareSensor>> {
    platform_impl::Platform::hardware_sensors(components)
}

pub fn disk_io_counters(disks: &mut Disks) -> SensorResult<DiskIoSnapshot> {
    platform_impl::Platform::disk_io_counters(disks)
}

/// Expose sysinfo components as temperature sensors, tagging the ones that
/// belong to the CPU or GPU so the fallback chains can find them by name.
#[cfg_attr(target_os = "windows", allow(dead_code))]
pub(crate) fn component_sensors(components: &mut Components) -> SensorResult<Vec<HardwareSensor>> {
    components.refresh(true);
    let sensors: Vec<HardwareSensor> = components
        .iter()
        .filter_map(|component| {
            let value = component.temperature()?;
            Some(HardwareSensor::new(
                SensorKind::Temperature,
                tag_component_label(component.label()),
                value,
            ))
        })
        .collect();
    if sensors.is_empty() {
        return Err(SensorError::unavailable("no temperature components"));
    }
    Ok(sensors)
}

#[cfg_attr(target_os = "windows", allow(dead_code))]
pub(crate) fn tag_component_label(label: &str) -> String {
    let lower = label.to_lowercase();
    let is_gpu = ["gpu", "nvidia", "radeon", "amdgpu", "nouveau"]
        .iter()
        .any(|needle| lower.contains(needle));
    let is_cpu = ["cpu", "coretemp", "k10temp", "tctl", "tdie", "package"]
        .iter()
        .any(|needle| lower.contains(needle));

    if is_gpu && !label.contains("GPU") {
        format!("GPU {label}")
    } else if is_cpu && !is_gpu && !label.contains("CPU") {
        format!("CPU {label}")
    } else {
        label.to_string()
    }
}

/// Sum cumulative transfer counters across all disks sysinfo reports.
/// Byte totals stand in for operation counts: only the delta's sign matters.
pub(crate) fn summed_disk_usage(disks: &mut Disks) -> SensorResult<DiskIoSnapshot> {
    disks.refresh(true);
    if disks.list().is_empty() {
        return Err(SensorError::unavailable("no disks listed"));
    }
    let snapshot = disks
        .list()
        .iter()
        .map(|disk| disk.usage())
        .fold(DiskIoSnapshot::default(), |acc, usage| {
            DiskIoSnapshot::new(
                acc.read_count.saturating_add(usage.total_read_bytes),
                acc.write_count.saturating_add(usage.total_written_bytes),
            )
        });
    Ok(snapshot)
}
