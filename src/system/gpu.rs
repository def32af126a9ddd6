//! Vendor device-query sources for the GPU fallback chain.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SensorError, SensorResult};
use crate::system::probe::{GpuDevice, GpuDeviceSource};

const DRM_ROOT: &str = "/sys/class/drm";

/// AMD GPUs exposed by the amdgpu kernel driver under sysfs.
///
/// Load comes from `device/gpu_busy_percent`, temperature from the first
/// `device/hwmon/hwmon*/temp1_input` (milli-degrees).
pub struct SysfsGpuSource {
    root: PathBuf,
}

impl Default for SysfsGpuSource {
    fn default() -> Self {
        Self::new(DRM_ROOT)
    }
}

impl SysfsGpuSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn card_dirs(&self) -> SensorResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| SensorError::unavailable(format!("{}: {e}", self.root.display())))?;
        let mut cards: Vec<(u32, PathBuf)> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let index = name.to_str()?.strip_prefix("card")?.parse::<u32>().ok()?;
                let device = entry.path().join("device");
                device
                    .join("gpu_busy_percent")
                    .exists()
                    .then_some((index, device))
            })
            .collect();
        cards.sort_by_key(|(index, _)| *index);
        Ok(cards.into_iter().map(|(_, path)| path).collect())
    }
}

impl GpuDeviceSource for SysfsGpuSource {
    fn vendor_label(&self) -> &'static str {
        "AMD"
    }

    fn devices(&mut self) -> SensorResult<Vec<Box<dyn GpuDevice + '_>>> {
        let mut devices: Vec<Box<dyn GpuDevice + '_>> = Vec::new();
        for device_dir in self.card_dirs()? {
            devices.push(Box::new(SysfsGpu { device_dir }));
        }
        Ok(devices)
    }
}

struct SysfsGpu {
    device_dir: PathBuf,
}

fn read_trimmed(path: &Path) -> SensorResult<String> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| SensorError::backend(format!("{}: {e}", path.display())))
}

impl GpuDevice for SysfsGpu {
    fn current_usage(&self) -> SensorResult<f32> {
        let raw = read_trimmed(&self.device_dir.join("gpu_busy_percent"))?;
        raw.parse()
            .map_err(|_| SensorError::backend(format!("unparsable gpu_busy_percent {raw:?}")))
    }

    fn current_temperature_millis(&self) -> SensorResult<i64> {
        let hwmon_root = self.device_dir.join("hwmon");
        let mut hwmons: Vec<PathBuf> = fs::read_dir(&hwmon_root)
            .map_err(|e| SensorError::unavailable(format!("{}: {e}", hwmon_root.display())))?
            .flatten()
            .map(|entry| entry.path())
            .collect();
        hwmons.sort();

        let input = hwmons
            .iter()
            .map(|dir| dir.join("temp1_input"))
            .find(|path| path.exists())
            .ok_or(SensorError::NotFound)?;
        let raw = read_trimmed(&input)?;
        raw.parse()
            .map_err(|_| SensorError::backend(format!("unparsable temp1_input {raw:?}")))
    }
}

#[cfg(feature = "nvml")]
pub use nvml::NvmlGpuSource;

#[cfg(feature = "nvml")]
mod nvml {
    use nvml_wrapper::Nvml;
    use nvml_wrapper::enum_wrappers::device::TemperatureSensor;

    use crate::error::{SensorError, SensorResult};
    use crate::system::probe::{GpuDevice, GpuDeviceSource};

    /// NVIDIA GPUs through NVML. The library is loaded lazily on first use
    /// and a failed load is retried on the next tick.
    #[derive(Default)]
    pub struct NvmlGpuSource {
        nvml: Option<Nvml>,
    }

    impl NvmlGpuSource {
        fn nvml(&mut self) -> SensorResult<&Nvml> {
            if self.nvml.is_none() {
                let nvml = Nvml::init()
                    .map_err(|e| SensorError::unavailable(format!("NVML init failed: {e}")))?;
                self.nvml = Some(nvml);
            }
            self.nvml
                .as_ref()
                .ok_or_else(|| SensorError::unavailable("NVML not initialised"))
        }
    }

    impl GpuDeviceSource for NvmlGpuSource {
        fn vendor_label(&self) -> &'static str {
            "NVIDIA"
        }

        fn devices(&mut self) -> SensorResult<Vec<Box<dyn GpuDevice + '_>>> {
            let nvml = self.nvml()?;
            let count = nvml
                .device_count()
                .map_err(|e| SensorError::backend(format!("NVML device count: {e}")))?;
            let mut devices: Vec<Box<dyn GpuDevice + '_>> = Vec::with_capacity(count as usize);
            for index in 0..count {
                match nvml.device_by_index(index) {
                    Ok(device) => devices.push(Box::new(NvmlGpu { device })),
                    Err(e) => tracing::debug!(index, error = %e, "NVML device skipped"),
                }
            }
            Ok(devices)
        }
    }

    struct NvmlGpu<'nvml> {
        device: nvml_wrapper::Device<'nvml>,
    }

    impl GpuDevice for NvmlGpu<'_> {
        fn current_usage(&self) -> SensorResult<f32> {
            self.device
                .utilization_rates()
                .map(|u| u.gpu as f32)
                .map_err(|e| SensorError::backend(format!("NVML utilization: {e}")))
        }

        fn current_temperature_millis(&self) -> SensorResult<i64> {
            self.device
                .temperature(TemperatureSensor::Gpu)
                .map(|celsius| i64::from(celsius) * 1000)
                .map_err(|e| SensorError::backend(format!("NVML temperature: {e}")))
        }
    }
}

/// Vendor sources compiled into this build, in query order.
pub fn default_sources() -> Vec<Box<dyn GpuDeviceSource>> {
    let mut sources: Vec<Box<dyn GpuDeviceSource>> = vec![Box::new(SysfsGpuSource::default())];
    #[cfg(feature = "nvml")]
    sources.push(Box::new(NvmlGpuSource::default()));
    sources
}
