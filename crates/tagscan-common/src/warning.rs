//! Tokenizer warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer to report malformed markup it recovered from.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
///
/// Shared by every caller in the process and only emptied by
/// [`clear_warnings`].
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("HTML Tokenizer", "malformed tag at line 3 (byte 41)");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[tagscan {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (call before tokenizing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings printed since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test, since the set is process-wide and tests run in parallel.
    #[test]
    fn warnings_are_deduplicated_until_cleared() {
        warn_once("Test", "dedup-check-unique-message");
        warn_once("Test", "dedup-check-unique-message");
        let after_first = warning_count();
        assert!(after_first >= 1);

        clear_warnings();
        assert_eq!(warning_count(), 0);

        warn_once("Test", "dedup-check-unique-message");
        assert_eq!(warning_count(), 1);
    }
}
