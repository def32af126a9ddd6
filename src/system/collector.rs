use std::time::Duration;

use chrono::Local;

use super::disk::DiskActivityTracker;
use super::probe::Probes;
use super::sensors::{SensorScan, resolve_cpu_temperature, resolve_gpu};
use super::snapshot::{Provenance, Sample, clamp_percent};
use crate::error::CollectionError;

/// Upper bound on `Sample::disk_active` length, whatever the config asks for.
pub const MAX_DISK_SLOTS: usize = 4;

/// Runs one full collection pass per call. Owns every piece of state that
/// carries over between ticks.
pub struct Collector {
    probes: Probes,
    tracker: DiskActivityTracker,
    cpu_window: Duration,
}

impl Collector {
    /// Sizes the disk activity slots from the partition list, capped at
    /// `max_disk_slots` and never above `MAX_DISK_SLOTS`. The slot count
    /// never changes afterwards.
    pub fn new(mut probes: Probes, cpu_window: Duration, max_disk_slots: usize) -> Self {
        let slots = probes
            .disks
            .partition_count()
            .min(max_disk_slots.min(MAX_DISK_SLOTS));
        Collector {
            probes,
            tracker: DiskActivityTracker::new(slots),
            cpu_window,
        }
    }

    pub fn disk_slots(&self) -> usize {
        self.tracker.slots()
    }

    pub fn collect(&mut self) -> Result<Sample, CollectionError> {
        let _span = tracing::debug_span!("collector.collect").entered();

        // One utilization window per tick; both GPU and temperature
        // estimates reuse it.
        let cpu_percent = clamp_percent(self.probes.utilization.cpu_percent(self.cpu_window));
        let memory = self.probes.utilization.memory();
        if memory.total_bytes == 0 {
            return Err(CollectionError::MemoryUnavailable);
        }
        let ram_used_bytes = memory.used_bytes.min(memory.total_bytes);
        let ram_percent =
            clamp_percent((ram_used_bytes as f64 / memory.total_bytes as f64 * 100.0) as f32);

        let scan = self
            .probes
            .hardware_monitor
            .as_mut()
            .map(|monitor| SensorScan::new(monitor.label(), monitor.sensors()));
        let cpu_temp = resolve_cpu_temperature(scan.as_ref(), cpu_percent);
        let gpu = resolve_gpu(
            scan.as_ref(),
            &mut self.probes.gpu_sources,
            cpu_percent,
            cpu_temp.value,
        );

        let disk_active = self.tracker.observe(self.probes.disks.counters());

        Ok(Sample {
            timestamp: Local::now(),
            cpu_percent,
            cpu_cores: self.probes.utilization.logical_cores(),
            ram_percent,
            ram_used_bytes,
            ram_total_bytes: memory.total_bytes,
            gpu_percent: clamp_percent(gpu.load.value),
            cpu_temp_celsius: cpu_temp.value,
            gpu_temp_celsius: gpu.temperature.value,
            disk_active,
            gpu_vendor_label: gpu.vendor_label,
            provenance: Provenance {
                cpu_temp: cpu_temp.source,
                gpu_load: gpu.load.source,
                gpu_temp: gpu.temperature.source,
            },
        })
    }
}
