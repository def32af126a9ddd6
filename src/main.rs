mod logging;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use hostpulse::classify::ThresholdConfig;
use hostpulse::config::{Config, load_config, load_config_from_path};
use hostpulse::queue::QueueItem;
use hostpulse::report::{json_line, render_line};
use hostpulse::sampler::Sampler;
use hostpulse::system::collector::Collector;
use hostpulse::system::probe::Probes;
use tokio::time::MissedTickBehavior;

#[derive(Parser)]
#[command(
    name = "hostpulse",
    about = "Sample CPU, memory, GPU, temperatures and disk activity on a fixed cadence"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// How often the consumer drains the queue, in milliseconds
    #[arg(long)]
    drain_interval_ms: Option<u64>,

    /// CPU utilization measurement window in milliseconds
    #[arg(long)]
    cpu_window_ms: Option<u64>,

    /// Exit after this many samples
    #[arg(long)]
    count: Option<usize>,

    /// Emit one JSON object per line instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Write logs to stderr as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,

    /// Skip the hardware-monitoring sensor provider
    #[arg(long, default_value_t = false)]
    no_hardware_monitor: bool,

    /// Skip vendor GPU device queries
    #[arg(long, default_value_t = false)]
    no_vendor_gpu: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init_tracing(cli.log_json)?;
    let config = load_config_for_cli(&cli);

    run(config, &cli).await
}

async fn run(config: Config, cli: &Cli) -> Result<()> {
    let probes = Probes::host(&config.sensors);
    let collector = Collector::new(
        probes,
        config.sampler.cpu_window(),
        config.sampler.max_disk_slots,
    );
    tracing::debug!(disk_slots = collector.disk_slots(), "collector ready");

    let (mut sampler, mut queue) = Sampler::with_queue(collector, config.sampler.interval());
    sampler.start()?;

    let mut drain = tokio::time::interval(config.consumer.drain_interval());
    drain.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut samples_seen = 0usize;
    'consume: loop {
        tokio::select! {
            _ = drain.tick() => {
                for item in queue.drain() {
                    if matches!(item, QueueItem::Sample(_)) {
                        samples_seen += 1;
                    }
                    if let Err(err) = emit(&item, &config.thresholds, cli.json) {
                        tracing::warn!(error = %err, "failed to emit queue item");
                    }
                    if cli.count.is_some_and(|limit| samples_seen >= limit) {
                        break 'consume;
                    }
                }
                if queue.is_finished() {
                    tracing::warn!("sampler exited on its own");
                    break;
                }
            }
            result = &mut ctrl_c => {
                if let Err(err) = result {
                    tracing::warn!(error = %err, "ctrl-c handler failed");
                }
                break;
            }
        }
    }

    sampler.stop();
    sampler.join();
    Ok(())
}

fn emit(item: &QueueItem, thresholds: &ThresholdConfig, json: bool) -> Result<()> {
    let line = if json {
        json_line(item, thresholds)?
    } else {
        render_line(item, thresholds)
    };
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(interval) = cli.interval_ms {
        config.sampler.interval_ms = interval;
    }
    if let Some(drain) = cli.drain_interval_ms {
        config.consumer.drain_interval_ms = drain;
    }
    if let Some(window) = cli.cpu_window_ms {
        config.sampler.cpu_window_ms = window;
    }
    if cli.no_hardware_monitor {
        config.sensors.hardware_monitor = false;
    }
    if cli.no_vendor_gpu {
        config.sensors.vendor_gpu = false;
    }

    config
}
