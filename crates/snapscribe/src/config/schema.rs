use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub upload: UploadLimits,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub ocr: OcrSettings,
    #[serde(default)]
    pub poller: PollerSettings,
    /// Seed for every random draw. Unset means seeded from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            upload: UploadLimits::default(),
            latency: LatencyConfig::default(),
            ocr: OcrSettings::default(),
            poller: PollerSettings::default(),
            seed: None,
        }
    }
}

// ─── Upload limits ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLimits {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Maximum size of a single file, in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_accepted_formats")]
    pub accepted_formats: Vec<String>,
}

fn default_max_files() -> usize {
    10
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_accepted_formats() -> Vec<String> {
    ["image/jpeg", "image/jpg", "image/png", "image/webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

impl UploadLimits {
    /// Size limit as shown to users: whole megabytes when exact, otherwise
    /// rounded up to a tenth of a megabyte, or to kilobytes below 1 MB.
    pub fn max_file_size_label(&self) -> String {
        let bytes = self.max_file_size;
        if bytes >= MIB && bytes % MIB == 0 {
            format!("{}MB", bytes / MIB)
        } else if bytes >= MIB {
            let tenths = bytes.saturating_mul(10).div_ceil(MIB);
            format!("{}.{}MB", tenths / 10, tenths % 10)
        } else if bytes >= KIB {
            format!("{}KB", bytes.div_ceil(KIB))
        } else {
            format!("{} bytes", bytes)
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_size: default_max_file_size(),
            accepted_formats: default_accepted_formats(),
        }
    }
}

// ─── Latency ────────────────────────────────────────────────────────────────

/// Artificial delay window in milliseconds, sampled uniformly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    pub const fn between(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn none() -> Self {
        Self::fixed(0)
    }

    pub fn is_zero(&self) -> bool {
        self.max_ms == 0
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default)]
    pub ocr: OcrLatency,
    #[serde(default)]
    pub tiktok: TikTokLatency,
    #[serde(default)]
    pub instagram: InstagramLatency,
}

impl LatencyConfig {
    /// Every operation resolves immediately.
    pub fn none() -> Self {
        Self {
            ocr: OcrLatency {
                upload: DelayRange::none(),
                start: DelayRange::none(),
                poll: DelayRange::none(),
            },
            tiktok: TikTokLatency {
                download: DelayRange::none(),
                profile: DelayRange::none(),
                sound: DelayRange::none(),
            },
            instagram: InstagramLatency {
                post: DelayRange::none(),
                profile: DelayRange::none(),
                hashtag: DelayRange::none(),
            },
        }
    }

    pub(crate) fn ranges(&self) -> [(&'static str, DelayRange); 9] {
        [
            ("latency.ocr.upload", self.ocr.upload),
            ("latency.ocr.start", self.ocr.start),
            ("latency.ocr.poll", self.ocr.poll),
            ("latency.tiktok.download", self.tiktok.download),
            ("latency.tiktok.profile", self.tiktok.profile),
            ("latency.tiktok.sound", self.tiktok.sound),
            ("latency.instagram.post", self.instagram.post),
            ("latency.instagram.profile", self.instagram.profile),
            ("latency.instagram.hashtag", self.instagram.hashtag),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OcrLatency {
    #[serde(default = "default_ocr_upload")]
    pub upload: DelayRange,
    #[serde(default = "default_ocr_start")]
    pub start: DelayRange,
    #[serde(default = "default_ocr_poll")]
    pub poll: DelayRange,
}

fn default_ocr_upload() -> DelayRange {
    DelayRange::between(1000, 2000)
}

fn default_ocr_start() -> DelayRange {
    DelayRange::fixed(500)
}

fn default_ocr_poll() -> DelayRange {
    DelayRange::fixed(1500)
}

impl Default for OcrLatency {
    fn default() -> Self {
        Self {
            upload: default_ocr_upload(),
            start: default_ocr_start(),
            poll: default_ocr_poll(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TikTokLatency {
    #[serde(default = "default_tiktok_download")]
    pub download: DelayRange,
    #[serde(default = "default_tiktok_profile")]
    pub profile: DelayRange,
    #[serde(default = "default_tiktok_sound")]
    pub sound: DelayRange,
}

fn default_tiktok_download() -> DelayRange {
    DelayRange::between(2000, 5000)
}

fn default_tiktok_profile() -> DelayRange {
    DelayRange::fixed(3000)
}

fn default_tiktok_sound() -> DelayRange {
    DelayRange::fixed(1500)
}

impl Default for TikTokLatency {
    fn default() -> Self {
        Self {
            download: default_tiktok_download(),
            profile: default_tiktok_profile(),
            sound: default_tiktok_sound(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstagramLatency {
    #[serde(default = "default_instagram_post")]
    pub post: DelayRange,
    #[serde(default = "default_instagram_profile")]
    pub profile: DelayRange,
    #[serde(default = "default_instagram_hashtag")]
    pub hashtag: DelayRange,
}

fn default_instagram_post() -> DelayRange {
    DelayRange::between(2000, 4000)
}

fn default_instagram_profile() -> DelayRange {
    DelayRange::between(3000, 5000)
}

fn default_instagram_hashtag() -> DelayRange {
    DelayRange::fixed(2000)
}

impl Default for InstagramLatency {
    fn default() -> Self {
        Self {
            post: default_instagram_post(),
            profile: default_instagram_profile(),
            hashtag: default_instagram_hashtag(),
        }
    }
}

// ─── OCR simulation ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Probability that a file other than the first one fails.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    #[serde(default = "default_confidence_min")]
    pub confidence_min: f64,
    #[serde(default = "default_confidence_max")]
    pub confidence_max: f64,
    /// Used for the start-of-job time estimate.
    #[serde(default = "default_seconds_per_file")]
    pub seconds_per_file: u64,
}

fn default_failure_rate() -> f64 {
    0.1
}

fn default_confidence_min() -> f64 {
    0.85
}

fn default_confidence_max() -> f64 {
    0.99
}

fn default_seconds_per_file() -> u64 {
    3
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            failure_rate: default_failure_rate(),
            confidence_min: default_confidence_min(),
            confidence_max: default_confidence_max(),
            seconds_per_file: default_seconds_per_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Upper bound on polls per job. Unset means one more than the file count.
    #[serde(default)]
    pub max_polls: Option<usize>,
}

fn default_interval_ms() -> u64 {
    1500
}

impl PollerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_polls: None,
        }
    }
}
