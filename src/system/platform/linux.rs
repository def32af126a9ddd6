use std::path::Path;

use sysinfo::{Components, Disks};

use super::{PlatformExtensions, component_sensors, summed_disk_usage};
use crate::error::{SensorError, SensorResult};
use crate::system::disk::DiskIoSnapshot;
use crate::system::probe::HardwareSensor;

pub struct Platform;

impl PlatformExtensions for Platform {
    const MONITOR_LABEL: &'static str = "hwmon";

    fn hardware_sensors(components: &mut Components) -> SensorResult<Vec<HardwareSensor>> {
        component_sensors(components)
    }

    fn disk_io_counters(disks: &mut Disks) -> SensorResult<DiskIoSnapshot> {
        match std::fs::read_to_string("/proc/diskstats") {
            Ok(contents) => {
                parse_diskstats(&contents, |name| Path::new("/sys/block").join(name).exists())
                    .ok_or_else(|| SensorError::backend("no whole-disk entries in /proc/diskstats"))
            }
            // Containers without procfs still get sysinfo's per-disk totals.
            Err(_) => summed_disk_usage(disks),
        }
    }
}

/// Sum completed reads and writes over whole disks. Partitions are skipped
/// so their I/O is not counted twice.
fn parse_diskstats(contents: &str, is_whole_disk: impl Fn(&str) -> bool) -> Option<DiskIoSnapshot> {
    let mut total: Option<DiskIoSnapshot> = None;
    for line in contents.lines() {
        // major minor name reads_completed reads_merged sectors_read ms_reading
        // writes_completed ...
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 || !is_whole_disk(fields[2]) {
            continue;
        }
        let (Ok(reads), Ok(writes)) = (fields[3].parse::<u64>(), fields[7].parse::<u64>()) else {
            continue;
        };
        let acc = total.get_or_insert_with(DiskIoSnapshot::default);
        acc.read_count = acc.read_count.saturating_add(reads);
        acc.write_count = acc.write_count.saturating_add(writes);
    }
    total
}
