//! Rendering of finished job reports as text, CSV and JSON.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExportError;
use crate::ocr::types::{FileStatus, JobStatusReport};

const DEFAULT_EXPORT_NAME: &str = "extracted-text.txt";
const NO_TEXT: &str = "[No text detected]";

static RE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[^/.]+$").unwrap());

/// Name of the `.txt` file offered for download of an image's text.
pub fn text_export_filename(original: Option<&str>) -> String {
    match original {
        Some(name) if !name.is_empty() => format!("{}.txt", RE_EXTENSION.replace(name, "")),
        _ => DEFAULT_EXPORT_NAME.to_string(),
    }
}

/// Plain-text rendering of every resolved file in `report`.
///
/// Files that are still processing are skipped.
pub fn render_report(report: &JobStatusReport) -> String {
    let separator = "=".repeat(60);
    let rule = "-".repeat(60);
    let mut out = String::new();

    for (index, file) in report.files.iter().enumerate() {
        match file.status {
            FileStatus::Processing => continue,
            FileStatus::Failed => {
                let _ = writeln!(
                    out,
                    "\nError in image {}: {}",
                    file.filename,
                    file.error.as_deref().unwrap_or_default()
                );
            }
            FileStatus::Completed => {
                let text = match file.extracted_text.as_deref() {
                    Some(t) if !t.is_empty() => t,
                    _ => NO_TEXT,
                };
                let _ = write!(
                    out,
                    "\n{}\nImage {}: {}\n{}\n{}\n",
                    separator,
                    index + 1,
                    file.filename,
                    rule,
                    text
                );
            }
        }
    }

    out
}

/// Writes one CSV row per resolved file. Failed files carry their error
/// message in the text column.
pub fn write_csv<W: Write>(report: &JobStatusReport, writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Order", "Image", "Extracted Text"])?;

    for (index, file) in report.files.iter().enumerate() {
        let text = match file.status {
            FileStatus::Processing => continue,
            FileStatus::Completed => file.extracted_text.as_deref().unwrap_or_default(),
            FileStatus::Failed => file.error.as_deref().unwrap_or_default(),
        };
        let order = (index + 1).to_string();
        csv.write_record([order.as_str(), file.filename.as_str(), text])?;
    }

    csv.flush()?;
    Ok(())
}

pub fn to_json(report: &JobStatusReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::types::{FileResult, JobStatus, Progress};

    fn report() -> JobStatusReport {
        JobStatusReport {
            job_id: "job_x".to_string(),
            status: JobStatus::Processing,
            progress: Progress::new(3, 4),
            files: vec![
                FileResult::completed("f1", "invoice.jpg", "Total: $10", 0.9),
                FileResult::failed("f2", "dark.png", "Too dark"),
                FileResult::completed("f3", "blank.png", "", 0.9),
                FileResult::processing("f4", "late.jpg"),
            ],
        }
    }

    #[test]
    fn test_text_export_filename() {
        assert_eq!(text_export_filename(Some("scan.jpeg")), "scan.txt");
        assert_eq!(text_export_filename(Some("a.b.png")), "a.b.txt");
        assert_eq!(text_export_filename(Some("noext")), "noext.txt");
        assert_eq!(text_export_filename(Some("")), "extracted-text.txt");
        assert_eq!(text_export_filename(None), "extracted-text.txt");
    }

    #[test]
    fn test_render_report() {
        let text = render_report(&report());
        assert!(text.contains("Image 1: invoice.jpg\n"));
        assert!(text.contains("Total: $10"));
        assert!(text.contains("Error in image dark.png: Too dark"));
        assert!(text.contains("Image 3: blank.png"));
        assert!(text.contains("[No text detected]"));
        assert!(!text.contains("late.jpg"));
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        write_csv(&report(), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Order,Image,Extracted Text");
        assert_eq!(lines[1], "1,invoice.jpg,Total: $10");
        assert_eq!(lines[2], "2,dark.png,Too dark");
        assert_eq!(lines[3], "3,blank.png,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_csv_quotes_multiline_text() {
        let report = JobStatusReport {
            job_id: "job_y".to_string(),
            status: JobStatus::Completed,
            progress: Progress::new(1, 1),
            files: vec![FileResult::completed("f1", "a.jpg", "line one\nline two", 0.9)],
        };
        let mut buf = Vec::new();
        write_csv(&report, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["jobId"], "job_x");
        assert_eq!(value["files"].as_array().unwrap().len(), 4);
    }
}
