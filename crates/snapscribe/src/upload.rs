//! Client-side batch validation run before files are handed to a job service.

use serde::{Deserialize, Serialize};

use crate::config::schema::UploadLimits;
use crate::error::UploadError;

/// A file selected for upload: its display name and byte size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    /// Declared MIME type. When absent it is guessed from the extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Declared MIME type, or the first guess for the filename extension.
    pub fn effective_mime_type(&self) -> Option<String> {
        match &self.mime_type {
            Some(declared) => Some(declared.to_ascii_lowercase()),
            None => mime_guess::from_path(&self.name)
                .first()
                .map(|m| m.essence_str().to_string()),
        }
    }
}

/// Checks a batch against the configured limits.
///
/// Count is checked first, then each file in order: format before size. The
/// first violation wins.
pub fn validate_batch(files: &[FileDescriptor], limits: &UploadLimits) -> Result<(), UploadError> {
    if files.is_empty() {
        return Err(UploadError::EmptyBatch);
    }

    if files.len() > limits.max_files {
        return Err(UploadError::TooManyFiles {
            max: limits.max_files,
        });
    }

    for file in files {
        let accepted = file
            .effective_mime_type()
            .map(|mime| limits.accepted_formats.iter().any(|f| *f == mime))
            .unwrap_or(false);
        if !accepted {
            return Err(UploadError::UnsupportedFormat {
                name: file.name.clone(),
            });
        }

        if file.size > limits.max_file_size {
            return Err(UploadError::FileTooLarge {
                name: file.name.clone(),
                limit: limits.max_file_size_label(),
            });
        }
    }

    Ok(())
}
