use async_trait::async_trait;

use crate::error::ServiceError;
use crate::ocr::types::{JobHandle, JobStatusReport, UploadResult};
use crate::upload::FileDescriptor;

/// Remote OCR job API: submit a batch, start a job, poll it.
///
/// Polling is caller-driven. Each `poll` derives its answer from the
/// caller-supplied `completed_so_far`, so callers must feed back the count
/// from the previous report.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Uploads a batch and assigns every file an id.
    async fn submit(&self, files: &[FileDescriptor]) -> Result<UploadResult, ServiceError>;

    async fn start_processing(
        &self,
        upload_id: &str,
        file_ids: &[String],
    ) -> Result<JobHandle, ServiceError>;

    async fn poll(
        &self,
        job_id: &str,
        file_ids: &[String],
        completed_so_far: usize,
    ) -> Result<JobStatusReport, ServiceError>;

    /// Tells the service the caller stopped polling `job_id`.
    fn release(&self, _job_id: &str) {}
}
