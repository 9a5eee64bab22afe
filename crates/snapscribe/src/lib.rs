pub mod broadcast;
pub mod config;
pub mod error;
pub mod export;
pub mod ids;
pub mod logging;
pub mod ocr;
pub mod sim;
pub mod social;
pub mod upload;

pub use broadcast::{JobProgressBroadcaster, JobProgressEvent, JobProgressTracker};
pub use config::{load_config, load_config_from_str, Config};
pub use error::{
    ConfigError, ExportError, PollError, Result, ServiceError, SnapscribeError, UploadError,
};
pub use export::{render_report, text_export_filename, to_json, write_csv};
pub use logging::{init_logging, LogFormat};
pub use ocr::{
    FileResult, FileStatus, JobHandle, JobPoller, JobStatus, JobStatusReport, MockOcrService,
    OcrService, Progress, UploadResult,
};
pub use social::{InstagramService, MockInstagramService, MockTikTokService, TikTokService};
pub use upload::{validate_batch, FileDescriptor};
