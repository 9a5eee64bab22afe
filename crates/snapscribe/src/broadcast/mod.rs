//! Broadcasting of job progress events.
//!
//! Subscribers (a UI layer, a log sink, tests) receive every state change
//! the poller observes.

pub mod job_progress;

pub use job_progress::{JobProgressBroadcaster, JobProgressEvent, JobProgressTracker};
