use serde::{Deserialize, Serialize};

use crate::system::snapshot::Sample;

/// Fraction of a warning threshold above which a metric counts as elevated.
pub const ELEVATED_RATIO: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Elevated,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Normal => "ok",
            Severity::Elevated => "elevated",
            Severity::Critical => "CRITICAL",
        }
    }
}

pub fn classify(value: f32, warning_threshold: f32) -> Severity {
    if value > warning_threshold {
        Severity::Critical
    } else if value > warning_threshold * ELEVATED_RATIO {
        Severity::Elevated
    } else {
        Severity::Normal
    }
}

/// Warning thresholds for the four classified metrics.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub cpu: f32,
    pub ram: f32,
    pub gpu: f32,
    pub temp: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig {
            cpu: 80.0,
            ram: 85.0,
            gpu: 85.0,
            temp: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleSeverity {
    pub cpu: Severity,
    pub ram: Severity,
    pub gpu: Severity,
    pub temp: Severity,
}

impl SampleSeverity {
    pub fn worst(&self) -> Severity {
        self.cpu.max(self.ram).max(self.gpu).max(self.temp)
    }
}

impl ThresholdConfig {
    pub fn classify_sample(&self, sample: &Sample) -> SampleSeverity {
        SampleSeverity {
            cpu: classify(sample.cpu_percent, self.cpu),
            ram: classify(sample.ram_percent, self.ram),
            gpu: classify(sample.gpu_percent, self.gpu),
            temp: classify(sample.max_temp_celsius(), self.temp),
        }
    }
}
