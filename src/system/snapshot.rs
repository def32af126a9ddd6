use chrono::{DateTime, Local};
use serde::Serialize;

/// Where a single reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingSource {
    HardwareMonitor,
    VendorDevice,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub cpu_temp: ReadingSource,
    pub gpu_load: ReadingSource,
    pub gpu_temp: ReadingSource,
}

/// One immutable sampling pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub cpu_percent: f32,
    pub cpu_cores: usize,
    pub ram_percent: f32,
    pub ram_used_bytes: u64,
    pub ram_total_bytes: u64,
    pub gpu_percent: f32,
    pub cpu_temp_celsius: f32,
    pub gpu_temp_celsius: f32,
    pub disk_active: Vec<bool>,
    pub gpu_vendor_label: String,
    pub provenance: Provenance,
}

impl Sample {
    /// Hottest of the CPU and GPU readings, used for the temperature gauge.
    pub fn max_temp_celsius(&self) -> f32 {
        self.cpu_temp_celsius.max(self.gpu_temp_celsius)
    }
}

/// Clamp a percentage into `[0, 100]`, mapping NaN to 0.
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
