//! Text and JSON renderings of drained queue items for the CLI consumer.

use serde::Serialize;

use crate::classify::{SampleSeverity, Severity, ThresholdConfig};
use crate::queue::QueueItem;
use crate::system::snapshot::Sample;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Serialize)]
struct SampleReport<'a> {
    kind: &'static str,
    #[serde(flatten)]
    sample: &'a Sample,
    severity: SampleSeverity,
    /// Worst of the four per-metric severities.
    level: Severity,
}

pub fn render_line(item: &QueueItem, thresholds: &ThresholdConfig) -> String {
    match item {
        QueueItem::Sample(sample) => render_sample(sample, &thresholds.classify_sample(sample)),
        QueueItem::Error { message } => format!("Error: {message}"),
    }
}

pub fn render_sample(sample: &Sample, severity: &SampleSeverity) -> String {
    let disks: String = sample
        .disk_active
        .iter()
        .map(|&active| if active { '#' } else { '.' })
        .collect();
    format!(
        "{time}  CPU {cpu:5.1}% [{cpu_sev}] {cores} cores | RAM {ram:5.1}% [{ram_sev}] {ram_gb} | GPU {gpu:5.1}% [{gpu_sev}] {vendor} | TEMP {max:.0}°C [{temp_sev}] CPU:{cpu_t:.0}° GPU:{gpu_t:.0}° | disk [{disks}]",
        time = sample.timestamp.format("%H:%M:%S"),
        cpu = sample.cpu_percent,
        cpu_sev = severity.cpu.label(),
        cores = sample.cpu_cores,
        ram = sample.ram_percent,
        ram_sev = severity.ram.label(),
        ram_gb = format_ram_gb(sample.ram_used_bytes, sample.ram_total_bytes),
        gpu = sample.gpu_percent,
        gpu_sev = severity.gpu.label(),
        vendor = sample.gpu_vendor_label,
        max = sample.max_temp_celsius(),
        temp_sev = severity.temp.label(),
        cpu_t = sample.cpu_temp_celsius,
        gpu_t = sample.gpu_temp_celsius,
    )
}

/// `"used/total GB"`, one decimal each.
pub fn format_ram_gb(used_bytes: u64, total_bytes: u64) -> String {
    format!(
        "{:.1}/{:.1} GB",
        used_bytes as f64 / GIB,
        total_bytes as f64 / GIB
    )
}

pub fn json_line(item: &QueueItem, thresholds: &ThresholdConfig) -> serde_json::Result<String> {
    match item {
        QueueItem::Sample(sample) => {
            let severity = thresholds.classify_sample(sample);
            serde_json::to_string(&SampleReport {
                kind: "sample",
                sample,
                severity,
                level: severity.worst(),
            })
        }
        QueueItem::Error { .. } => serde_json::to_string(item),
    }
}
