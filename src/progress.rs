//! Progress bar for page downloads, measured in data rows.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates the per-fetch progress bar.
///
/// Returns a hidden bar when `enabled` is false so callers can update it
/// unconditionally. The length is unknown until the first page reports the
/// total; see [`set_total`].
#[must_use]
pub fn page_progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} points")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

/// Sets the bar length once the total row count is known.
pub fn set_total(bar: &ProgressBar, total: u64) {
    if bar.length() != Some(total) {
        bar.set_length(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_bar_is_hidden() {
        let bar = page_progress_bar(false);
        assert!(bar.is_hidden());
        bar.inc(10);
        assert_eq!(bar.position(), 10);
    }

    #[test]
    fn test_set_total_updates_length() {
        let bar = page_progress_bar(false);
        set_total(&bar, 12_345);
        assert_eq!(bar.length(), Some(12_345));
    }
}
