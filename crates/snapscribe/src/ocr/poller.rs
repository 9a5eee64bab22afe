//! Caller-side polling loop for OCR jobs.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::broadcast::{JobProgressBroadcaster, JobProgressTracker};
use crate::config::schema::PollerSettings;
use crate::error::PollError;
use crate::ocr::service::OcrService;
use crate::ocr::types::JobStatusReport;
use crate::upload::FileDescriptor;

/// Drives a job service on a fixed interval until a job reaches a terminal
/// status.
pub struct JobPoller {
    service: Arc<dyn OcrService>,
    interval: Duration,
    max_polls: Option<usize>,
    progress: Option<JobProgressBroadcaster>,
}

impl JobPoller {
    pub fn new(service: Arc<dyn OcrService>, settings: &PollerSettings) -> Self {
        Self {
            service,
            interval: settings.interval(),
            max_polls: settings.max_polls,
            progress: None,
        }
    }

    /// Publishes a progress event for every report.
    pub fn with_broadcaster(mut self, broadcaster: JobProgressBroadcaster) -> Self {
        self.progress = Some(broadcaster);
        self
    }

    /// Uploads `files`, starts a job and polls it to completion.
    pub async fn run_batch(&self, files: &[FileDescriptor]) -> Result<JobStatusReport, PollError> {
        let upload = self.service.submit(files).await?;
        let file_ids = upload.file_ids();
        let handle = self
            .service
            .start_processing(&upload.upload_id, &file_ids)
            .await?;

        if let Some(broadcaster) = &self.progress {
            broadcaster.start_job(&handle);
        }

        self.poll_until_terminal(&handle.job_id, &file_ids).await
    }

    /// Polls `job_id` until its status is terminal, feeding each report's
    /// completed count into the next call.
    ///
    /// The job is released on every exit: terminal report, service error or
    /// exhausted poll budget.
    pub async fn poll_until_terminal(
        &self,
        job_id: &str,
        file_ids: &[String],
    ) -> Result<JobStatusReport, PollError> {
        let max_polls = self.max_polls.unwrap_or(file_ids.len() + 1);
        let tracker = self
            .progress
            .as_ref()
            .map(|b| JobProgressTracker::new(job_id, b.sender()));

        let mut completed = 0;
        for attempt in 1..=max_polls {
            if attempt > 1 && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }

            let report = match self.service.poll(job_id, file_ids, completed).await {
                Ok(report) => report,
                Err(e) => {
                    warn!("Polling job {} failed: {}", job_id, e);
                    self.service.release(job_id);
                    return Err(e.into());
                }
            };
            debug!(
                "Poll {} for job {}: {}/{} ({})",
                attempt, job_id, report.progress.completed, report.progress.total, report.status
            );

            if let Some(tracker) = &tracker {
                tracker.report(&report);
            }

            if report.status.is_terminal() {
                info!(
                    "Job {} reached {} after {} polls",
                    job_id, report.status, attempt
                );
                self.service.release(job_id);
                return Ok(report);
            }

            completed = report.progress.completed;
        }

        warn!("Job {} still processing after {} polls", job_id, max_polls);
        self.service.release(job_id);
        Err(PollError::Exhausted {
            job_id: job_id.to_string(),
            polls: max_polls,
        })
    }
}
