//! Mock analysis generators for social media platforms.
//!
//! Every call waits a configured delay and returns a structurally complete
//! payload filled with random figures and canned strings. None of them can
//! fail.

pub mod instagram;
pub mod tiktok;

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

pub use instagram::{InstagramService, MockInstagramService};
pub use tiktok::{MockTikTokService, TikTokService};

static RE_HANDLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\w+)").unwrap());

/// Extracts the first `@handle` from a URL, without the `@`.
pub fn handle_from_url(url: &str) -> Option<String> {
    RE_HANDLE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Uppercases the first character, as the mocks do for display names.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}
