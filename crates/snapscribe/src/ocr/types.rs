//! Request and response shapes of the OCR job service.

use serde::{Deserialize, Serialize};

/// Status attached to every file accepted by an upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploaded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_id: String,
    pub filename: String,
    pub size: u64,
    pub status: UploadStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub upload_id: String,
    pub files: Vec<UploadedFile>,
    pub total_files: usize,
}

impl UploadResult {
    /// File identifiers in upload order.
    pub fn file_ids(&self) -> Vec<String> {
        self.files.iter().map(|f| f.file_id.clone()).collect()
    }
}

/// Overall status of a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    CompletedWithErrors,
    /// Reserved for backends that can fail a whole job. The mock never does.
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Processing)
    }

    /// Derives the overall status from per-file statuses.
    pub fn from_files(files: &[FileResult]) -> Self {
        if files.iter().any(|f| f.status == FileStatus::Processing) {
            JobStatus::Processing
        } else if files.iter().any(|f| f.status == FileStatus::Failed) {
            JobStatus::CompletedWithErrors
        } else {
            JobStatus::Completed
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Processing => write!(f, "Processing"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::CompletedWithErrors => write!(f, "Completed with errors"),
            JobStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    pub job_id: String,
    pub status: JobStatus,
    pub total_files: usize,
    /// Naive estimate in seconds, linear in file count.
    pub estimated_time: u64,
}

/// Status of a single file within a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Processing,
    Completed,
    Failed,
}

impl FileStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FileStatus::Processing)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    pub file_id: String,
    pub filename: String,
    pub status: FileStatus,
    /// Set only when completed.
    pub extracted_text: Option<String>,
    /// Set only when completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Set only when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn processing(file_id: &str, filename: &str) -> Self {
        Self {
            file_id: file_id.to_string(),
            filename: filename.to_string(),
            status: FileStatus::Processing,
            extracted_text: None,
            confidence: None,
            error: None,
        }
    }

    pub fn completed(file_id: &str, filename: &str, text: &str, confidence: f64) -> Self {
        Self {
            file_id: file_id.to_string(),
            filename: filename.to_string(),
            status: FileStatus::Completed,
            extracted_text: Some(text.to_string()),
            confidence: Some(confidence),
            error: None,
        }
    }

    pub fn failed(file_id: &str, filename: &str, error: &str) -> Self {
        Self {
            file_id: file_id.to_string(),
            filename: filename.to_string(),
            status: FileStatus::Failed,
            extracted_text: None,
            confidence: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl Progress {
    /// Builds counters with `completed` clamped to `total` and
    /// `percentage = round(100 * completed / total)`. An empty job reports 100.
    pub fn new(completed: usize, total: usize) -> Self {
        let completed = completed.min(total);
        let percentage = if total == 0 {
            100
        } else {
            (100.0 * completed as f64 / total as f64).round() as u8
        };
        Self {
            completed,
            total,
            percentage,
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusReport {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: Progress,
    pub files: Vec<FileResult>,
}

impl JobStatusReport {
    pub fn failed_files(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| f.status == FileStatus::Failed)
    }

    pub fn completed_files(&self) -> impl Iterator<Item = &FileResult> {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Completed)
    }
}
