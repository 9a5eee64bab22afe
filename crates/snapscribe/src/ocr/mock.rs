//! OCR job service that fabricates results locally.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::Instrument;

use crate::config::schema::{Config, OcrLatency, OcrSettings};
use crate::error::ServiceError;
use crate::ids::generate_id;
use crate::ocr::canned::{CANNED_TEXTS, FAILURE_MESSAGE};
use crate::ocr::ledger::JobLedger;
use crate::ocr::service::OcrService;
use crate::ocr::types::{
    FileResult, JobHandle, JobStatus, JobStatusReport, Progress, UploadResult, UploadStatus,
    UploadedFile,
};
use crate::sim::SimRng;
use crate::upload::FileDescriptor;

/// Uploaded files not yet handed to a job.
struct PendingUpload {
    uploaded_at: DateTime<Utc>,
    /// Filenames by file id.
    filenames: HashMap<String, String>,
}

/// Mock OCR backend.
///
/// Each poll advances one more file. A file's outcome is drawn once and
/// recorded in the ledger, so it never changes on later polls. The first
/// file of a batch always succeeds.
pub struct MockOcrService {
    settings: OcrSettings,
    latency: OcrLatency,
    rng: SimRng,
    ledger: JobLedger,
    /// Uploads awaiting `start_processing`, by upload id.
    uploads: RwLock<HashMap<String, PendingUpload>>,
}

impl MockOcrService {
    pub fn new(settings: OcrSettings, latency: OcrLatency, seed: Option<u64>) -> Self {
        Self {
            settings,
            latency,
            rng: SimRng::new(seed),
            ledger: JobLedger::new(),
            uploads: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ocr.clone(), config.latency.ocr.clone(), config.seed)
    }

    pub fn ledger(&self) -> &JobLedger {
        &self.ledger
    }

    /// Number of uploads that no job has started from yet.
    pub fn pending_uploads(&self) -> usize {
        match self.uploads.read() {
            Ok(uploads) => uploads.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Drops ledger entries not polled within `max_idle`, and uploads older
    /// than `max_idle` that were never started. Returns how many of both were
    /// removed.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let jobs = self.ledger.prune_idle(max_idle);

        let max_idle = chrono::Duration::from_std(max_idle).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now()
            .checked_sub_signed(max_idle)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut uploads = self.uploads_write();
        let before = uploads.len();
        uploads.retain(|_, u| u.uploaded_at >= cutoff);
        let stale_uploads = before - uploads.len();
        if stale_uploads > 0 {
            debug!("Pruned {} uploads that were never started", stale_uploads);
        }

        jobs + stale_uploads
    }

    fn uploads_write(&self) -> RwLockWriteGuard<'_, HashMap<String, PendingUpload>> {
        match self.uploads.write() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Upload registry lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn remember_upload(&self, upload_id: &str, files: &[UploadedFile]) {
        let filenames = files
            .iter()
            .map(|f| (f.file_id.clone(), f.filename.clone()))
            .collect();
        self.uploads_write().insert(
            upload_id.to_string(),
            PendingUpload {
                uploaded_at: Utc::now(),
                filenames,
            },
        );
    }

    /// Removes an upload from the registry, returning its filenames.
    fn take_upload(&self, upload_id: &str) -> HashMap<String, String> {
        self.uploads_write()
            .remove(upload_id)
            .map(|u| u.filenames)
            .unwrap_or_default()
    }

    /// Display name for a file: the uploaded name when known, otherwise a
    /// positional placeholder.
    fn filename_for(&self, job_id: &str, file_id: &str, index: usize) -> String {
        self.ledger
            .filename(job_id, file_id)
            .unwrap_or_else(|| format!("document_{}.jpg", index + 1))
    }

    fn draw_result(&self, index: usize, file_id: &str, filename: &str) -> FileResult {
        let failure_rate = self.settings.failure_rate.clamp(0.0, 1.0);
        let (min, max) = (self.settings.confidence_min, self.settings.confidence_max);

        self.rng.with(|rng| {
            let fails = index != 0 && rng.gen_bool(failure_rate);
            if fails {
                return FileResult::failed(file_id, filename, FAILURE_MESSAGE);
            }

            let text = CANNED_TEXTS.choose(rng).copied().unwrap_or(CANNED_TEXTS[0]);
            let confidence = if max > min {
                rng.gen_range(min..=max)
            } else {
                min
            };
            FileResult::completed(file_id, filename, text, confidence)
        })
    }
}

#[async_trait]
impl OcrService for MockOcrService {
    async fn submit(&self, files: &[FileDescriptor]) -> Result<UploadResult, ServiceError> {
        let span = tracing::info_span!("ocr.upload", files = files.len());
        async {
            self.rng.simulate_latency(&self.latency.upload).await;

            let (upload_id, uploaded) = self.rng.with(|rng| {
                let upload_id = generate_id("upl", rng);
                let uploaded: Vec<UploadedFile> = files
                    .iter()
                    .map(|file| UploadedFile {
                        file_id: generate_id("file", rng),
                        filename: file.name.clone(),
                        size: file.size,
                        status: UploadStatus::Uploaded,
                    })
                    .collect();
                (upload_id, uploaded)
            });

            self.remember_upload(&upload_id, &uploaded);
            debug!("Upload {} accepted {} files", upload_id, uploaded.len());

            Ok(UploadResult {
                upload_id,
                total_files: uploaded.len(),
                files: uploaded,
            })
        }
        .instrument(span)
        .await
    }

    async fn start_processing(
        &self,
        upload_id: &str,
        file_ids: &[String],
    ) -> Result<JobHandle, ServiceError> {
        let span = tracing::info_span!("ocr.start", upload_id, files = file_ids.len());
        async {
            self.rng.simulate_latency(&self.latency.start).await;

            let job_id = self.rng.with(|rng| generate_id("job", rng));
            let filenames = self.take_upload(upload_id);
            self.ledger.open_batch(&job_id, file_ids, filenames);

            info!(
                "Started OCR job {} for upload {} ({} files)",
                job_id,
                upload_id,
                file_ids.len()
            );

            Ok(JobHandle {
                job_id,
                status: JobStatus::Processing,
                total_files: file_ids.len(),
                estimated_time: file_ids.len() as u64 * self.settings.seconds_per_file,
            })
        }
        .instrument(span)
        .await
    }

    async fn poll(
        &self,
        job_id: &str,
        file_ids: &[String],
        completed_so_far: usize,
    ) -> Result<JobStatusReport, ServiceError> {
        let span = tracing::info_span!("ocr.poll", job_id, completed_so_far);
        async {
            self.rng.simulate_latency(&self.latency.poll).await;

            let order = self.ledger.batch_order(job_id, file_ids);
            let progress = Progress::new(completed_so_far.saturating_add(1), order.len());

            let files: Vec<FileResult> = order
                .iter()
                .enumerate()
                .map(|(index, file_id)| {
                    let filename = self.filename_for(job_id, file_id, index);
                    if index < progress.completed {
                        self.ledger.resolve_with(job_id, file_id, || {
                            self.draw_result(index, file_id, &filename)
                        })
                    } else {
                        FileResult::processing(file_id, &filename)
                    }
                })
                .collect();

            let status = JobStatus::from_files(&files);
            debug!(
                "Job {} at {}/{} ({}%): {}",
                job_id, progress.completed, progress.total, progress.percentage, status
            );
            if status.is_terminal() {
                info!("Job {} finished: {}", job_id, status);
            }

            Ok(JobStatusReport {
                job_id: job_id.to_string(),
                status,
                progress,
                files,
            })
        }
        .instrument(span)
        .await
    }

    fn release(&self, job_id: &str) {
        if self.ledger.release(job_id) {
            debug!("Released job {}", job_id);
        }
    }
}
