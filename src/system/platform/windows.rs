use serde::Deserialize;
use sysinfo::{Components, Disks};
use wmi::WMIConnection;

use super::{PlatformExtensions, summed_disk_usage};
use crate::error::{SensorError, SensorResult};
use crate::system::disk::DiskIoSnapshot;
use crate::system::probe::{HardwareSensor, SensorKind};

const OHM_NAMESPACE: &str = "root\\OpenHardwareMonitor";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct OhmSensor {
    name: String,
    sensor_type: String,
    value: Option<f32>,
}

pub struct Platform;

impl PlatformExtensions for Platform {
    const MONITOR_LABEL: &'static str = "OpenHardwareMonitor";

    fn hardware_sensors(_components: &mut Components) -> SensorResult<Vec<HardwareSensor>> {
        // The OHM service publishes its sensors over WMI; it only answers
        // while the OpenHardwareMonitor application is running.
        let wmi_con = WMIConnection::with_namespace_path(OHM_NAMESPACE)
            .map_err(|e| SensorError::unavailable(format!("WMI {OHM_NAMESPACE}: {e}")))?;
        let rows: Vec<OhmSensor> = wmi_con
            .raw_query("SELECT Name, SensorType, Value FROM Sensor")
            .map_err(|e| SensorError::backend(format!("WMI query failed: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(HardwareSensor::new(
                    SensorKind::from_type_name(&row.sensor_type),
                    row.name,
                    row.value?,
                ))
            })
            .collect())
    }

    fn disk_io_counters(disks: &mut Disks) -> SensorResult<DiskIoSnapshot> {
        summed_disk_usage(disks)
    }
}
