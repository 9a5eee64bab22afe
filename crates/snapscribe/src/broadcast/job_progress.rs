//! Job progress broadcaster for real-time job status streaming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::ocr::types::{JobHandle, JobStatus, JobStatusReport, Progress};

/// Progress event for an OCR job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProgressEvent {
    /// Unique job identifier.
    pub job_id: String,
    /// Overall job status.
    pub status: JobStatus,
    /// Counters at the time of the event.
    pub progress: Progress,
    /// Human-readable message describing current activity.
    pub message: String,
    /// Timestamp of this event.
    pub timestamp: DateTime<Utc>,
    /// Filenames that failed so far.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_files: Vec<String>,
}

impl JobProgressEvent {
    /// Creates the event announcing a freshly started job.
    pub fn started(handle: &JobHandle) -> Self {
        Self {
            job_id: handle.job_id.clone(),
            status: handle.status,
            progress: Progress::new(0, handle.total_files),
            message: format!(
                "Processing {} files (about {}s)",
                handle.total_files, handle.estimated_time
            ),
            timestamp: Utc::now(),
            failed_files: vec![],
        }
    }

    /// Creates an event from a poll report.
    pub fn from_report(report: &JobStatusReport) -> Self {
        let failed_files: Vec<String> = report.failed_files().map(|f| f.filename.clone()).collect();
        let message = match report.status {
            JobStatus::Processing => format!(
                "Processed {} of {} files",
                report.progress.completed, report.progress.total
            ),
            JobStatus::Completed => "Text extracted from all files".to_string(),
            JobStatus::CompletedWithErrors => format!(
                "Completed with {} failed file(s)",
                failed_files.len()
            ),
            JobStatus::Failed => "Processing failed".to_string(),
        };

        Self {
            job_id: report.job_id.clone(),
            status: report.status,
            progress: report.progress,
            message,
            timestamp: Utc::now(),
            failed_files,
        }
    }
}

/// Broadcasts job progress events for streaming.
#[derive(Clone)]
pub struct JobProgressBroadcaster {
    sender: Arc<broadcast::Sender<JobProgressEvent>>,
}

impl JobProgressBroadcaster {
    /// Creates a new job progress broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends a progress event to all subscribers.
    pub fn send(&self, event: JobProgressEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }

    /// Creates a new subscriber for progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<JobProgressEvent> {
        self.sender.subscribe()
    }

    /// Creates a tracker for a started job and announces it.
    pub fn start_job(&self, handle: &JobHandle) -> JobProgressTracker {
        let tracker = JobProgressTracker::new(&handle.job_id, Arc::clone(&self.sender));
        tracker.send(JobProgressEvent::started(handle));
        tracker
    }

    /// Gets the inner sender for creating trackers.
    pub fn sender(&self) -> Arc<broadcast::Sender<JobProgressEvent>> {
        Arc::clone(&self.sender)
    }
}

impl Default for JobProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Tracks progress for a single job.
pub struct JobProgressTracker {
    job_id: String,
    sender: Arc<broadcast::Sender<JobProgressEvent>>,
}

impl JobProgressTracker {
    pub fn new(job_id: &str, sender: Arc<broadcast::Sender<JobProgressEvent>>) -> Self {
        Self {
            job_id: job_id.to_string(),
            sender,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    fn send(&self, event: JobProgressEvent) {
        let _ = self.sender.send(event);
    }

    /// Publishes the state carried by a poll report.
    pub fn report(&self, report: &JobStatusReport) {
        self.send(JobProgressEvent::from_report(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::types::FileResult;

    fn handle(total: usize) -> JobHandle {
        JobHandle {
            job_id: "job-1".to_string(),
            status: JobStatus::Processing,
            total_files: total,
            estimated_time: total as u64 * 3,
        }
    }

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = JobProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        broadcaster.send(JobProgressEvent::started(&handle(2)));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.job_id, "job-1");
        assert_eq!(received.status, JobStatus::Processing);
        assert_eq!(received.progress.completed, 0);
        assert_eq!(received.message, "Processing 2 files (about 6s)");
    }

    #[test]
    fn test_start_job_announces() {
        let broadcaster = JobProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        let tracker = broadcaster.start_job(&handle(3));
        assert_eq!(tracker.job_id(), "job-1");

        let received = rx.try_recv().unwrap();
        assert_eq!(received.progress.total, 3);
        assert_eq!(received.progress.percentage, 0);
    }

    #[test]
    fn test_report_with_failures() {
        let broadcaster = JobProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();
        let tracker = broadcaster.start_job(&handle(2));
        let _ = rx.try_recv(); // Consume start event

        tracker.report(&JobStatusReport {
            job_id: "job-1".to_string(),
            status: JobStatus::CompletedWithErrors,
            progress: Progress::new(2, 2),
            files: vec![
                FileResult::completed("f1", "a.jpg", "text", 0.9),
                FileResult::failed("f2", "b.jpg", "blurry"),
            ],
        });

        let received = rx.try_recv().unwrap();
        assert_eq!(received.status, JobStatus::CompletedWithErrors);
        assert_eq!(received.failed_files, vec!["b.jpg".to_string()]);
        assert_eq!(received.message, "Completed with 1 failed file(s)");
    }

    #[test]
    fn test_processing_message() {
        let report = JobStatusReport {
            job_id: "job-1".to_string(),
            status: JobStatus::Processing,
            progress: Progress::new(1, 3),
            files: vec![],
        };
        let event = JobProgressEvent::from_report(&report);
        assert_eq!(event.message, "Processed 1 of 3 files");
        assert!(event.failed_files.is_empty());
    }

    #[test]
    fn test_send_without_subscribers() {
        let broadcaster = JobProgressBroadcaster::default();
        broadcaster.send(JobProgressEvent::started(&handle(1)));
    }
}
