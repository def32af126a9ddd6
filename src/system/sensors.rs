//! Fallback chains for CPU temperature and GPU load/temperature.
//!
//! Each strategy yields a `SensorResult`; the chains walk them in order and
//! always end in an estimate derived from CPU utilization, so resolution
//! itself cannot fail.

use crate::error::{SensorError, SensorResult};
use crate::system::probe::{GpuDeviceSource, HardwareSensor, SensorKind};
use crate::system::snapshot::ReadingSource;

pub const CPU_TEMP_BASE_CELSIUS: f32 = 30.0;
pub const CPU_TEMP_PER_PERCENT: f32 = 0.3;
pub const GPU_LOAD_PER_CPU_PERCENT: f32 = 0.7;
pub const GPU_TEMP_OFFSET_CELSIUS: f32 = 5.0;
pub const ESTIMATED_LABEL: &str = "Estimated";

/// Result of one hardware-monitor enumeration, shared by both chains
/// within a tick.
#[derive(Debug, Clone)]
pub struct SensorScan {
    pub label: &'static str,
    pub sensors: SensorResult<Vec<HardwareSensor>>,
}

impl SensorScan {
    pub fn new(label: &'static str, sensors: SensorResult<Vec<HardwareSensor>>) -> Self {
        Self { label, sensors }
    }

    /// Value of the first sensor of `kind` whose name contains `needle`.
    pub fn first_matching(&self, kind: SensorKind, needle: &str) -> SensorResult<f32> {
        let sensors = self.sensors.as_ref().map_err(|err| err.clone())?;
        sensors
            .iter()
            .find(|s| s.kind == kind && s.name.contains(needle))
            .map(|s| s.value)
            .ok_or(SensorError::NotFound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f32,
    pub source: ReadingSource,
}

impl Reading {
    fn new(value: f32, source: ReadingSource) -> Self {
        Self { value, source }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpuReading {
    pub load: Reading,
    pub temperature: Reading,
    pub vendor_label: String,
}

/// Rough CPU temperature derived from utilization. Linear, 30°C at idle,
/// 60°C at full load.
pub fn estimate_cpu_temperature(utilization_percent: f32) -> f32 {
    CPU_TEMP_BASE_CELSIUS + utilization_percent * CPU_TEMP_PER_PERCENT
}

pub fn estimate_gpu_load(cpu_utilization_percent: f32) -> f32 {
    GPU_LOAD_PER_CPU_PERCENT * cpu_utilization_percent
}

pub fn estimate_gpu_temperature(cpu_temperature: f32) -> f32 {
    cpu_temperature + GPU_TEMP_OFFSET_CELSIUS
}

/// Zero, negative or non-finite readings count as "no data".
fn usable(value: f32) -> SensorResult<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SensorError::NotFound)
    }
}

pub fn resolve_cpu_temperature(scan: Option<&SensorScan>, cpu_utilization: f32) -> Reading {
    if let Some(scan) = scan {
        match scan.first_matching(SensorKind::Temperature, "CPU") {
            Ok(value) => return Reading::new(value, ReadingSource::HardwareMonitor),
            Err(err) => {
                tracing::debug!(source = scan.label, error = %err, "cpu temperature: falling back")
            }
        }
    }
    Reading::new(
        estimate_cpu_temperature(cpu_utilization),
        ReadingSource::Estimated,
    )
}

pub fn resolve_gpu(
    scan: Option<&SensorScan>,
    vendors: &mut [Box<dyn GpuDeviceSource>],
    cpu_utilization: f32,
    cpu_temperature: f32,
) -> GpuReading {
    let mut load: Option<(f32, &'static str)> = None;
    let mut temperature: Option<Reading> = None;

    if let Some(scan) = scan {
        match scan
            .first_matching(SensorKind::Load, "GPU")
            .and_then(usable)
        {
            Ok(value) => load = Some((value, scan.label)),
            Err(err) => tracing::debug!(source = scan.label, error = %err, "gpu load: no sensor"),
        }
        match scan
            .first_matching(SensorKind::Temperature, "GPU")
            .and_then(usable)
        {
            Ok(value) => temperature = Some(Reading::new(value, ReadingSource::HardwareMonitor)),
            Err(err) => {
                tracing::debug!(source = scan.label, error = %err, "gpu temperature: no sensor")
            }
        }
    }

    let mut load_source = ReadingSource::HardwareMonitor;
    if load.is_none() {
        for vendor in vendors.iter_mut() {
            let label = vendor.vendor_label();
            let (usage, temp) = query_first_device(vendor.as_mut());
            if temperature.is_none()
                && let Ok(value) = temp
            {
                temperature = Some(Reading::new(value, ReadingSource::VendorDevice));
            }
            match usage {
                Ok(value) => {
                    load = Some((value, label));
                    load_source = ReadingSource::VendorDevice;
                    break;
                }
                Err(err) => tracing::debug!(vendor = label, error = %err, "gpu load: vendor query failed"),
            }
        }
    }

    let (load, vendor_label) = match load {
        Some((value, label)) => (Reading::new(value, load_source), label),
        None => (
            Reading::new(estimate_gpu_load(cpu_utilization), ReadingSource::Estimated),
            ESTIMATED_LABEL,
        ),
    };
    let temperature = temperature.unwrap_or_else(|| {
        Reading::new(
            estimate_gpu_temperature(cpu_temperature),
            ReadingSource::Estimated,
        )
    });

    GpuReading {
        load,
        temperature,
        vendor_label: vendor_label.to_string(),
    }
}

/// Usage and temperature (°C) of the first device a vendor source reports.
fn query_first_device(source: &mut dyn GpuDeviceSource) -> (SensorResult<f32>, SensorResult<f32>) {
    let devices = match source.devices() {
        Ok(devices) => devices,
        Err(err) => return (Err(err.clone()), Err(err)),
    };
    let Some(device) = devices.first() else {
        let err = SensorError::unavailable("no devices");
        return (Err(err.clone()), Err(err));
    };
    let usage = device.current_usage().and_then(usable);
    let temp = device
        .current_temperature_millis()
        .map(|millis| millis as f32 / 1000.0)
        .and_then(usable);
    (usage, temp)
}
