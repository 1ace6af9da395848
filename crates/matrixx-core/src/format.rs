//! Display helpers derived from authoritative state.
//!
//! Nothing here is stored; every string is recomputed from the number or
//! timestamp it renders.

use chrono::{DateTime, Utc};

/// `MM:SS`, zero-padded. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Human readable byte count in base 1024 with at most two decimals.
///
/// `0 Bytes`, `512 Bytes`, `1.5 KB`, `5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Sidebar-style age of a timestamp: `Just now`, `5h ago`, `3d ago`, or a
/// calendar date once a week has passed.
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - at).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if hours < 168 {
        format!("{}d ago", hours / 24)
    } else {
        at.format("%Y-%m-%d").to_string()
    }
}

/// Cut `title` to `max_chars` characters, marking the cut with `...`.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}
