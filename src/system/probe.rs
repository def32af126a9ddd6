//! Capabilities the sampler consumes from the host.
//!
//! Each trait is a seam: the host implementations live next to the
//! platform code, tests plug in scripted ones.

use std::time::Duration;

use crate::error::SensorResult;
use crate::system::disk::DiskIoSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Load,
    Other,
}

impl SensorKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "Temperature" => SensorKind::Temperature,
            "Load" => SensorKind::Load,
            _ => SensorKind::Other,
        }
    }
}

/// A named, typed reading from a hardware-monitoring service.
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareSensor {
    pub kind: SensorKind,
    pub name: String,
    pub value: f32,
}

impl HardwareSensor {
    pub fn new(kind: SensorKind, name: impl Into<String>, value: f32) -> Self {
        Self {
            kind,
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryReading {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

/// Point-in-time CPU and memory utilization.
pub trait UtilizationReader: Send {
    /// Global CPU utilization in percent, measured over `window`. Blocks.
    fn cpu_percent(&mut self, window: Duration) -> f32;
    fn memory(&mut self) -> MemoryReading;
    fn logical_cores(&self) -> usize;
}

/// Enumerates hardware-monitoring sensors.
pub trait HardwareMonitor: Send {
    fn label(&self) -> &'static str;
    fn sensors(&mut self) -> SensorResult<Vec<HardwareSensor>>;
}

/// A single GPU exposed by a vendor device-query library.
pub trait GpuDevice {
    /// Current load in percent.
    fn current_usage(&self) -> SensorResult<f32>;
    /// Current temperature in milli-degrees Celsius.
    fn current_temperature_millis(&self) -> SensorResult<i64>;
}

/// Vendor device-query library.
pub trait GpuDeviceSource: Send {
    /// Label recorded on samples whose GPU load came from this source.
    fn vendor_label(&self) -> &'static str;
    fn devices(&mut self) -> SensorResult<Vec<Box<dyn GpuDevice + '_>>>;
}

/// Cumulative disk I/O counters plus the partition list used to size
/// the activity slots.
pub trait DiskCounterReader: Send {
    fn counters(&mut self) -> SensorResult<DiskIoSnapshot>;
    fn partition_count(&mut self) -> usize;
}

/// The full set of capabilities one sampler owns.
pub struct Probes {
    pub utilization: Box<dyn UtilizationReader>,
    pub hardware_monitor: Option<Box<dyn HardwareMonitor>>,
    pub gpu_sources: Vec<Box<dyn GpuDeviceSource>>,
    pub disks: Box<dyn DiskCounterReader>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_kind_from_wmi_type_names() {
        assert_eq!(
            SensorKind::from_type_name("Temperature"),
            SensorKind::Temperature
        );
        assert_eq!(SensorKind::from_type_name("Load"), SensorKind::Load);
        assert_eq!(SensorKind::from_type_name("Clock"), SensorKind::Other);
        assert_eq!(SensorKind::from_type_name("load"), SensorKind::Other);
    }
}
