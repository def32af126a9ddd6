use chrono::{Local, TimeZone};
use hostpulse::classify::ThresholdConfig;
use hostpulse::queue::QueueItem;
use hostpulse::report::{json_line, render_line};
use hostpulse::system::snapshot::{Provenance, ReadingSource, Sample};
use insta::assert_snapshot;

const GIB: u64 = 1024 * 1024 * 1024;

fn fixed_sample() -> Sample {
    Sample {
        timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        cpu_percent: 42.0,
        cpu_cores: 8,
        ram_percent: 75.0,
        ram_used_bytes: 12 * GIB,
        ram_total_bytes: 16 * GIB,
        gpu_percent: 35.0,
        cpu_temp_celsius: 82.4,
        gpu_temp_celsius: 61.0,
        disk_active: vec![true, false],
        gpu_vendor_label: "NVIDIA".to_string(),
        provenance: Provenance {
            cpu_temp: ReadingSource::HardwareMonitor,
            gpu_load: ReadingSource::VendorDevice,
            gpu_temp: ReadingSource::VendorDevice,
        },
    }
}

#[test]
fn text_line_for_sample() {
    let line = render_line(
        &QueueItem::Sample(fixed_sample()),
        &ThresholdConfig::default(),
    );
    assert_snapshot!(line, @"14:05:07  CPU  42.0% [ok] 8 cores | RAM  75.0% [elevated] 12.0/16.0 GB | GPU  35.0% [ok] NVIDIA | TEMP 82°C [CRITICAL] CPU:82° GPU:61° | disk [#.]");
}

#[test]
fn text_line_for_error() {
    let line = render_line(
        &QueueItem::error("memory totals unavailable"),
        &ThresholdConfig::default(),
    );
    assert_eq!(line, "Error: memory totals unavailable");
}

#[test]
fn custom_thresholds_change_severity() {
    let thresholds = ThresholdConfig {
        cpu: 40.0,
        ..ThresholdConfig::default()
    };
    let line = render_line(&QueueItem::Sample(fixed_sample()), &thresholds);
    assert!(line.contains("CPU  42.0% [CRITICAL]"));
}

#[test]
fn json_line_carries_sample_and_severity() {
    let line = json_line(
        &QueueItem::Sample(fixed_sample()),
        &ThresholdConfig::default(),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();

    assert_eq!(value["kind"], "sample");
    assert_eq!(value["cpu_cores"], 8);
    assert_eq!(value["gpu_vendor_label"], "NVIDIA");
    assert_eq!(value["disk_active"], serde_json::json!([true, false]));
    assert_eq!(value["provenance"]["gpu_load"], "vendor_device");
    assert_eq!(value["severity"]["ram"], "elevated");
    assert_eq!(value["severity"]["temp"], "critical");
    assert_eq!(value["level"], "critical");
}

#[test]
fn json_line_for_error() {
    let line = json_line(&QueueItem::error("gpu query failed"), &ThresholdConfig::default()).unwrap();
    assert_eq!(line, r#"{"kind":"error","message":"gpu query failed"}"#);
}

#[test]
fn json_level_is_worst_metric() {
    let mut sample = fixed_sample();
    sample.cpu_temp_celsius = 40.0;
    sample.gpu_temp_celsius = 40.0;
    let line = json_line(&QueueItem::Sample(sample), &ThresholdConfig::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["severity"]["temp"], "normal");
    assert_eq!(value["level"], "elevated");
}
