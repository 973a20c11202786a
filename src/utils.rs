//! Utility functions for date formatting, string manipulation, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Date stamps for the digest body and the email subject
//! - String truncation for logging model responses and page previews
//! - File system validation for the optional HTML snapshot directory

use chrono::Local;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Format today's date for the digest page header.
///
/// # Returns
///
/// The current local date as `"June 03, 2025"`-style text.
pub fn digest_date() -> String {
    Local::now().format("%B %d, %Y").to_string()
}

/// Format today's date for the email subject line.
///
/// # Returns
///
/// The current local date as `"Jun 03, 2025"`-style text.
pub fn subject_date() -> String {
    Local::now().format("%b %d, %Y").to_string()
}

/// Today's date in `YYYY-MM-DD` form, used for snapshot filenames.
pub fn file_date() -> String {
    Local::now().date_naive().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and
/// byte count indicator appended. The cut is moved back to the nearest
/// character boundary so multi-byte text never splits mid-character.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Arguments
///
/// * `path` - The directory path to validate
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Snapshot directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
