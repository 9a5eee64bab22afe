//! In-memory ledger of per-file resolutions for running jobs.
//!
//! A file's outcome is drawn once, the first time it falls below a job's
//! completion count, and replayed on every later poll. Each entry also fixes
//! the batch order and the display names of the job's files.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::ocr::types::FileResult;

#[derive(Debug, Clone)]
struct LedgerEntry {
    created_at: DateTime<Utc>,
    last_polled_at: DateTime<Utc>,
    /// File ids in batch order. Position 0 is the file that never fails.
    order: Vec<String>,
    filenames: HashMap<String, String>,
    resolved: HashMap<String, FileResult>,
}

impl LedgerEntry {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            last_polled_at: now,
            order: Vec::new(),
            filenames: HashMap::new(),
            resolved: HashMap::new(),
        }
    }

    /// Whether `file_ids` names the same files as the recorded order.
    fn same_batch(&self, file_ids: &[String]) -> bool {
        if self.order.len() != file_ids.len() {
            return false;
        }
        let known: HashSet<&str> = self.order.iter().map(String::as_str).collect();
        let given: HashSet<&str> = file_ids.iter().map(String::as_str).collect();
        known == given
    }
}

/// Snapshot of one ledger entry.
#[derive(Debug, Clone)]
pub struct LedgerSummary {
    pub job_id: String,
    pub created_at: DateTime<Utc>,
    pub last_polled_at: DateTime<Utc>,
    pub resolved_files: usize,
}

#[derive(Default)]
pub struct JobLedger {
    jobs: RwLock<HashMap<String, LedgerEntry>>,
}

impl JobLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, LedgerEntry>> {
        match self.jobs.read() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Job ledger lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, LedgerEntry>> {
        match self.jobs.write() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Job ledger lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Registers a job. Opening a known job only refreshes its poll time.
    pub fn open(&self, job_id: &str) {
        let mut jobs = self.write();
        jobs.entry(job_id.to_string())
            .and_modify(|e| e.last_polled_at = Utc::now())
            .or_insert_with(LedgerEntry::new);
    }

    /// Registers a started job with its batch order and the uploaded names
    /// of its files.
    pub fn open_batch(
        &self,
        job_id: &str,
        file_ids: &[String],
        filenames: HashMap<String, String>,
    ) {
        let mut jobs = self.write();
        let entry = jobs
            .entry(job_id.to_string())
            .or_insert_with(LedgerEntry::new);
        entry.last_polled_at = Utc::now();
        entry.order = file_ids.to_vec();
        entry.filenames = filenames;
    }

    /// Returns the job's files in batch order, opening unknown jobs on the
    /// fly and refreshing the poll time.
    ///
    /// A reordering of the recorded batch yields the recorded order. Any
    /// other set of ids replaces it.
    pub fn batch_order(&self, job_id: &str, file_ids: &[String]) -> Vec<String> {
        let mut jobs = self.write();
        let entry = jobs
            .entry(job_id.to_string())
            .or_insert_with(LedgerEntry::new);
        entry.last_polled_at = Utc::now();
        if !entry.same_batch(file_ids) {
            entry.order = file_ids.to_vec();
        }
        entry.order.clone()
    }

    pub fn filename(&self, job_id: &str, file_id: &str) -> Option<String> {
        self.read()
            .get(job_id)
            .and_then(|e| e.filenames.get(file_id).cloned())
    }

    /// Returns the recorded result for a file, drawing it with `draw` if the
    /// file has never been resolved. Unknown jobs are opened on the fly.
    pub fn resolve_with<F>(&self, job_id: &str, file_id: &str, draw: F) -> FileResult
    where
        F: FnOnce() -> FileResult,
    {
        let mut jobs = self.write();
        let entry = jobs
            .entry(job_id.to_string())
            .or_insert_with(LedgerEntry::new);
        entry
            .resolved
            .entry(file_id.to_string())
            .or_insert_with(draw)
            .clone()
    }

    pub fn resolved(&self, job_id: &str, file_id: &str) -> Option<FileResult> {
        self.read()
            .get(job_id)
            .and_then(|e| e.resolved.get(file_id).cloned())
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.read().contains_key(job_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn summary(&self, job_id: &str) -> Option<LedgerSummary> {
        self.read().get(job_id).map(|e| LedgerSummary {
            job_id: job_id.to_string(),
            created_at: e.created_at,
            last_polled_at: e.last_polled_at,
            resolved_files: e.resolved.len(),
        })
    }

    /// Forgets a job. Returns whether it was tracked.
    pub fn release(&self, job_id: &str) -> bool {
        self.write().remove(job_id).is_some()
    }

    /// Drops jobs that have not been polled within `max_idle`.
    /// Returns how many were removed.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let max_idle = chrono::Duration::from_std(max_idle).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now()
            .checked_sub_signed(max_idle)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut jobs = self.write();
        let before = jobs.len();
        jobs.retain(|_, e| e.last_polled_at >= cutoff);
        let removed = before - jobs.len();
        if removed > 0 {
            log::debug!("Pruned {} idle jobs from ledger", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::types::FileStatus;

    #[test]
    fn test_resolve_draws_once() {
        let ledger = JobLedger::new();
        let first = ledger.resolve_with("job_1", "file_a", || {
            FileResult::completed("file_a", "a.jpg", "first", 0.9)
        });
        let second = ledger.resolve_with("job_1", "file_a", || {
            FileResult::failed("file_a", "a.jpg", "should not be drawn")
        });

        assert_eq!(first, second);
        assert_eq!(second.status, FileStatus::Completed);
        assert_eq!(second.extracted_text.as_deref(), Some("first"));
    }

    #[test]
    fn test_resolve_opens_unknown_job() {
        let ledger = JobLedger::new();
        assert!(!ledger.contains("job_x"));
        ledger.resolve_with("job_x", "f", || FileResult::failed("f", "f.jpg", "err"));
        assert!(ledger.contains("job_x"));
        assert_eq!(ledger.summary("job_x").unwrap().resolved_files, 1);
    }

    #[test]
    fn test_jobs_are_independent() {
        let ledger = JobLedger::new();
        ledger.resolve_with("job_1", "f", || FileResult::failed("f", "f.jpg", "err"));
        assert!(ledger.resolved("job_2", "f").is_none());
        assert!(ledger.resolved("job_1", "f").is_some());
    }

    #[test]
    fn test_open_is_idempotent() {
        let ledger = JobLedger::new();
        ledger.open("job_1");
        ledger.resolve_with("job_1", "f", || FileResult::failed("f", "f.jpg", "err"));
        ledger.open("job_1");
        assert_eq!(ledger.len(), 1);
        assert!(ledger.resolved("job_1", "f").is_some());
    }

    #[test]
    fn test_release() {
        let ledger = JobLedger::new();
        ledger.open("job_1");
        assert!(ledger.release("job_1"));
        assert!(!ledger.release("job_1"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_prune_idle() {
        let ledger = JobLedger::new();
        ledger.open("job_1");
        ledger.open("job_2");

        assert_eq!(ledger.prune_idle(Duration::from_secs(3600)), 0);
        assert_eq!(ledger.len(), 2);

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(ledger.prune_idle(Duration::ZERO), 2);
        assert!(ledger.is_empty());
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_batch_order_survives_reordering() {
        let ledger = JobLedger::new();
        assert_eq!(ledger.batch_order("job_1", &ids(&["a", "b"])), ids(&["a", "b"]));
        assert_eq!(ledger.batch_order("job_1", &ids(&["b", "a"])), ids(&["a", "b"]));
    }

    #[test]
    fn test_batch_order_replaced_by_new_set() {
        let ledger = JobLedger::new();
        ledger.batch_order("job_1", &ids(&["a", "b"]));
        assert_eq!(
            ledger.batch_order("job_1", &ids(&["c", "a", "b"])),
            ids(&["c", "a", "b"])
        );
        assert_eq!(
            ledger.batch_order("job_1", &ids(&["a", "a", "b"])),
            ids(&["a", "a", "b"])
        );
    }

    #[test]
    fn test_open_batch_keeps_filenames() {
        let ledger = JobLedger::new();
        let names = HashMap::from([("a".to_string(), "scan.png".to_string())]);
        ledger.open_batch("job_1", &ids(&["a", "b"]), names);

        assert_eq!(ledger.filename("job_1", "a").as_deref(), Some("scan.png"));
        assert!(ledger.filename("job_1", "b").is_none());
        assert_eq!(ledger.batch_order("job_1", &ids(&["b", "a"])), ids(&["a", "b"]));

        ledger.release("job_1");
        assert!(ledger.filename("job_1", "a").is_none());
    }
}
