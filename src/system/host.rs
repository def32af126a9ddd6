//! Probe implementations backed by the running host.

use std::time::Duration;

use sysinfo::{Components, Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};

use super::disk::DiskIoSnapshot;
use super::gpu;
use super::platform;
use super::probe::{
    DiskCounterReader, HardwareMonitor, HardwareSensor, MemoryReading, Probes, UtilizationReader,
};
use crate::config::SensorsConfig;
use crate::error::SensorResult;

pub struct SysinfoUtilization {
    sys: System,
}

impl Default for SysinfoUtilization {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoUtilization {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        SysinfoUtilization { sys }
    }
}

impl UtilizationReader for SysinfoUtilization {
    fn cpu_percent(&mut self, window: Duration) -> f32 {
        // sysinfo needs two refreshes at least MINIMUM_CPU_UPDATE_INTERVAL apart.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(window.max(MINIMUM_CPU_UPDATE_INTERVAL));
        self.sys.refresh_cpu_usage();
        self.sys.global_cpu_usage()
    }

    fn memory(&mut self) -> MemoryReading {
        self.sys.refresh_memory();
        MemoryReading {
            used_bytes: self.sys.used_memory(),
            total_bytes: self.sys.total_memory(),
        }
    }

    fn logical_cores(&self) -> usize {
        self.sys.cpus().len()
    }
}

pub struct HostHardwareMonitor {
    components: Components,
}

impl Default for HostHardwareMonitor {
    fn default() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }
}

impl HardwareMonitor for HostHardwareMonitor {
    fn label(&self) -> &'static str {
        platform::hardware_monitor_label()
    }

    fn sensors(&mut self) -> SensorResult<Vec<HardwareSensor>> {
        platform::hardware_sensors(&mut self.components)
    }
}

pub struct HostDiskCounters {
    disks: Disks,
}

impl Default for HostDiskCounters {
    fn default() -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
        }
    }
}

impl DiskCounterReader for HostDiskCounters {
    fn counters(&mut self) -> SensorResult<DiskIoSnapshot> {
        platform::disk_io_counters(&mut self.disks)
    }

    fn partition_count(&mut self) -> usize {
        self.disks.list().len()
    }
}

impl Probes {
    /// Probes for the local machine, with the optional strategies switched
    /// on or off per `sensors`.
    pub fn host(sensors: &SensorsConfig) -> Self {
        let hardware_monitor: Option<Box<dyn HardwareMonitor>> = if sensors.hardware_monitor {
            Some(Box::new(HostHardwareMonitor::default()))
        } else {
            None
        };
        let gpu_sources = if sensors.vendor_gpu {
            gpu::default_sources()
        } else {
            Vec::new()
        };

        Probes {
            utilization: Box::new(SysinfoUtilization::new()),
            hardware_monitor,
            gpu_sources,
            disks: Box::new(HostDiskCounters::default()),
        }
    }
}
