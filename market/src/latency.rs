use serde::Serialize;

use crate::rolling_window::RollingWindow;

pub const DEFAULT_LATENCY_SAMPLES: usize = 1_000;

/// Summary of recent engine latencies, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub samples: usize,
}

/// Rolling record of per-tick processing latency.
pub struct LatencyTracker {
    samples: RollingWindow<f64>,
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY_SAMPLES)
    }
}

impl LatencyTracker {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: RollingWindow::new(max_samples),
        }
    }

    pub fn record(&mut self, latency_seconds: f64) {
        self.samples.push(latency_seconds);
    }

    /// `None` until the first sample arrives.
    pub fn stats(&self) -> Option<LatencyStats> {
        if self.samples.is_empty() {
            return None;
        }

        let (min, max, sum) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY, 0.0), |(lo, hi, sum), &v| {
                (lo.min(v), hi.max(v), sum + v)
            });

        let samples = self.samples.len();
        Some(LatencyStats {
            min,
            max,
            avg: sum / samples as f64,
            samples,
        })
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}
