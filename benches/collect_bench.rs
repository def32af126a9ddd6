use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use hostpulse::classify::ThresholdConfig;
use hostpulse::error::SensorResult;
use hostpulse::queue::QueueItem;
use hostpulse::report::render_line;
use hostpulse::system::collector::Collector;
use hostpulse::system::disk::DiskIoSnapshot;
use hostpulse::system::probe::{
    DiskCounterReader, HardwareMonitor, HardwareSensor, MemoryReading, Probes, SensorKind,
    UtilizationReader,
};

struct SteadyUtilization;

impl UtilizationReader for SteadyUtilization {
    fn cpu_percent(&mut self, _window: Duration) -> f32 {
        37.5
    }

    fn memory(&mut self) -> MemoryReading {
        MemoryReading {
            used_bytes: 6 << 30,
            total_bytes: 16 << 30,
        }
    }

    fn logical_cores(&self) -> usize {
        16
    }
}

struct ManySensors(Vec<HardwareSensor>);

impl HardwareMonitor for ManySensors {
    fn label(&self) -> &'static str {
        "bench"
    }

    fn sensors(&mut self) -> SensorResult<Vec<HardwareSensor>> {
        Ok(self.0.clone())
    }
}

struct CountingDisks(u64);

impl DiskCounterReader for CountingDisks {
    fn counters(&mut self) -> SensorResult<DiskIoSnapshot> {
        self.0 += 3;
        Ok(DiskIoSnapshot::new(self.0, self.0 / 2))
    }

    fn partition_count(&mut self) -> usize {
        4
    }
}

fn make_collector(sensor_count: usize) -> Collector {
    let mut sensors: Vec<HardwareSensor> = (0..sensor_count)
        .map(|i| HardwareSensor::new(SensorKind::Other, format!("Fan #{i}"), i as f32))
        .collect();
    sensors.push(HardwareSensor::new(SensorKind::Temperature, "CPU Package", 58.0));
    sensors.push(HardwareSensor::new(SensorKind::Load, "GPU Core", 21.0));
    let probes = Probes {
        utilization: Box::new(SteadyUtilization),
        hardware_monitor: Some(Box::new(ManySensors(sensors))),
        gpu_sources: Vec::new(),
        disks: Box::new(CountingDisks(0)),
    };
    Collector::new(probes, Duration::ZERO, 4)
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect");
    for sensor_count in [8, 64, 512] {
        let mut collector = make_collector(sensor_count);
        group.bench_function(format!("{sensor_count}_sensors"), |b| {
            b.iter(|| black_box(collector.collect()))
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let thresholds = ThresholdConfig::default();
    let item = match make_collector(8).collect() {
        Ok(sample) => QueueItem::Sample(sample),
        Err(err) => QueueItem::error(err.to_string()),
    };
    c.bench_function("render_line", |b| {
        b.iter(|| black_box(render_line(black_box(&item), &thresholds)))
    });
}

criterion_group!(benches, bench_collect, bench_render);
criterion_main!(benches);
