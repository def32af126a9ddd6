use sysinfo::{Components, Disks};

use super::{PlatformExtensions, component_sensors, summed_disk_usage};
use crate::error::SensorResult;
use crate::system::disk::DiskIoSnapshot;
use crate::system::probe::HardwareSensor;

pub struct Platform;

impl PlatformExtensions for Platform {
    const MONITOR_LABEL: &'static str = "SMC";

    fn hardware_sensors(components: &mut Components) -> SensorResult<Vec<HardwareSensor>> {
        // SMC keys surface through sysinfo components.
        component_sensors(components)
    }

    fn disk_io_counters(disks: &mut Disks) -> SensorResult<DiskIoSnapshot> {
        summed_disk_usage(disks)
    }
}
