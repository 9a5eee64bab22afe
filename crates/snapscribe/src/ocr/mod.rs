//! Simulated OCR job service: upload a batch, start a job, poll until every
//! file is resolved.

pub mod canned;
pub mod ledger;
pub mod mock;
pub mod poller;
pub mod service;
pub mod types;

pub use ledger::{JobLedger, LedgerSummary};
pub use mock::MockOcrService;
pub use poller::JobPoller;
pub use service::OcrService;
pub use types::{
    FileResult, FileStatus, JobHandle, JobStatus, JobStatusReport, Progress, UploadResult,
    UploadStatus, UploadedFile,
};
