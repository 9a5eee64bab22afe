//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use snapscribe::config::schema::{Config, DelayRange, LatencyConfig};
use snapscribe::upload::FileDescriptor;

/// Builder for creating `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Zero latency, seed 42, default failure rate.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.latency = LatencyConfig::none();
        config.poller.interval_ms = 0;
        config.seed = Some(42);
        Self { config }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn failure_rate(mut self, rate: f64) -> Self {
        self.config.ocr.failure_rate = rate;
        self
    }

    pub fn confidence(mut self, min: f64, max: f64) -> Self {
        self.config.ocr.confidence_min = min;
        self.config.ocr.confidence_max = max;
        self
    }

    pub fn max_files(mut self, max: usize) -> Self {
        self.config.upload.max_files = max;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poller.interval_ms = ms;
        self
    }

    pub fn max_polls(mut self, polls: usize) -> Self {
        self.config.poller.max_polls = Some(polls);
        self
    }

    /// Restores the production OCR delays.
    pub fn ocr_delays(mut self, upload: DelayRange, start: DelayRange, poll: DelayRange) -> Self {
        self.config.latency.ocr.upload = upload;
        self.config.latency.ocr.start = start;
        self.config.latency.ocr.poll = poll;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `n` small JPEG descriptors named `page_1.jpg` .. `page_n.jpg`.
pub fn descriptors(n: usize) -> Vec<FileDescriptor> {
    (1..=n)
        .map(|i| FileDescriptor::new(format!("page_{}.jpg", i), 200 * 1024))
        .collect()
}

/// Placeholder file ids for polling without an upload.
pub fn file_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("file_{}", i)).collect()
}
