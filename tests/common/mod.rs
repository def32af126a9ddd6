#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hostpulse::error::{SensorError, SensorResult};
use hostpulse::system::disk::DiskIoSnapshot;
use hostpulse::system::probe::{
    DiskCounterReader, GpuDevice, GpuDeviceSource, HardwareMonitor, HardwareSensor,
    MemoryReading, Probes, SensorKind, UtilizationReader,
};

pub const GIB: u64 = 1024 * 1024 * 1024;

/// Fixed CPU/memory readings. Optionally panics on the listed call indices.
pub struct FakeUtilization {
    pub cpu: f32,
    pub memory: MemoryReading,
    pub cores: usize,
    pub panic_on: Vec<usize>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeUtilization {
    pub fn new(cpu: f32) -> Self {
        FakeUtilization {
            cpu,
            memory: MemoryReading {
                used_bytes: 4 * GIB,
                total_bytes: 16 * GIB,
            },
            cores: 8,
            panic_on: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl UtilizationReader for FakeUtilization {
    fn cpu_percent(&mut self, _window: Duration) -> f32 {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on.contains(&call) {
            panic!("probe blew up on call {call}");
        }
        self.cpu
    }

    fn memory(&mut self) -> MemoryReading {
        self.memory
    }

    fn logical_cores(&self) -> usize {
        self.cores
    }
}

pub struct FakeMonitor {
    pub sensors: SensorResult<Vec<HardwareSensor>>,
}

impl FakeMonitor {
    pub fn with(sensors: Vec<HardwareSensor>) -> Self {
        FakeMonitor {
            sensors: Ok(sensors),
        }
    }

    pub fn failing() -> Self {
        FakeMonitor {
            sensors: Err(SensorError::unavailable("service not running")),
        }
    }
}

impl HardwareMonitor for FakeMonitor {
    fn label(&self) -> &'static str {
        "FakeMonitor"
    }

    fn sensors(&mut self) -> SensorResult<Vec<HardwareSensor>> {
        self.sensors.clone()
    }
}

pub fn temperature(name: &str, value: f32) -> HardwareSensor {
    HardwareSensor::new(SensorKind::Temperature, name, value)
}

pub fn load(name: &str, value: f32) -> HardwareSensor {
    HardwareSensor::new(SensorKind::Load, name, value)
}

struct FakeGpu {
    usage: f32,
    millis: i64,
}

impl GpuDevice for FakeGpu {
    fn current_usage(&self) -> SensorResult<f32> {
        Ok(self.usage)
    }

    fn current_temperature_millis(&self) -> SensorResult<i64> {
        Ok(self.millis)
    }
}

/// Vendor source reporting one device, or none when `device` is `None`.
pub struct FakeVendor {
    pub label: &'static str,
    pub device: Option<(f32, i64)>,
}

impl GpuDeviceSource for FakeVendor {
    fn vendor_label(&self) -> &'static str {
        self.label
    }

    fn devices(&mut self) -> SensorResult<Vec<Box<dyn GpuDevice + '_>>> {
        let mut devices: Vec<Box<dyn GpuDevice + '_>> = Vec::new();
        if let Some((usage, millis)) = self.device {
            devices.push(Box::new(FakeGpu { usage, millis }));
        }
        Ok(devices)
    }
}

/// Replays scripted counter readings, repeating the last one when the
/// script runs out.
pub struct ScriptedDisks {
    pub readings: VecDeque<SensorResult<DiskIoSnapshot>>,
    pub last: SensorResult<DiskIoSnapshot>,
    pub partitions: usize,
}

impl ScriptedDisks {
    pub fn new(partitions: usize, readings: Vec<SensorResult<DiskIoSnapshot>>) -> Self {
        ScriptedDisks {
            readings: readings.into(),
            last: Ok(DiskIoSnapshot::new(0, 0)),
            partitions,
        }
    }

    pub fn idle(partitions: usize) -> Self {
        Self::new(partitions, Vec::new())
    }
}

impl DiskCounterReader for ScriptedDisks {
    fn counters(&mut self) -> SensorResult<DiskIoSnapshot> {
        if let Some(next) = self.readings.pop_front() {
            self.last = next;
        }
        self.last.clone()
    }

    fn partition_count(&mut self) -> usize {
        self.partitions
    }
}

pub fn probes(utilization: FakeUtilization) -> Probes {
    Probes {
        utilization: Box::new(utilization),
        hardware_monitor: None,
        gpu_sources: Vec::new(),
        disks: Box::new(ScriptedDisks::idle(2)),
    }
}
