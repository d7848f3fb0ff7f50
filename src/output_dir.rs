//! Per-run output directory naming: `<root>/<YYYY-MM-DD>#NNN`.
//!
//! Runs on the same day are numbered from `#001` upward. Directories are only
//! named here; the caller creates them.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

/// Returns a fresh run directory under `root` for today.
///
/// # Errors
///
/// Returns the IO error if `root` exists but cannot be listed.
pub fn new_output_dir(root: &Path) -> io::Result<PathBuf> {
    new_output_dir_on(root, Local::now().date_naive())
}

/// Returns today's most recent run directory, or `#001` when there is none.
///
/// # Errors
///
/// Returns the IO error if `root` exists but cannot be listed.
pub fn latest_output_dir(root: &Path) -> io::Result<PathBuf> {
    latest_output_dir_on(root, Local::now().date_naive())
}

/// [`new_output_dir`] for an explicit date.
///
/// # Errors
///
/// See [`new_output_dir`].
pub fn new_output_dir_on(root: &Path, date: NaiveDate) -> io::Result<PathBuf> {
    let next = highest_run_number(root, date)?.map_or(1, |n| n + 1);
    Ok(run_dir(root, date, next))
}

/// [`latest_output_dir`] for an explicit date.
///
/// # Errors
///
/// See [`new_output_dir`].
pub fn latest_output_dir_on(root: &Path, date: NaiveDate) -> io::Result<PathBuf> {
    let latest = highest_run_number(root, date)?.unwrap_or(1);
    Ok(run_dir(root, date, latest))
}

fn run_dir(root: &Path, date: NaiveDate, number: u32) -> PathBuf {
    root.join(format!("{}#{number:03}", date.format("%Y-%m-%d")))
}

fn highest_run_number(root: &Path, date: NaiveDate) -> io::Result<Option<u32>> {
    let prefix = format!("{}#", date.format("%Y-%m-%d"));
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut highest = None;
    for entry in entries {
        let name = entry?.file_name();
        let Some(number) = name
            .to_str()
            .and_then(|name| name.strip_prefix(&prefix))
            .and_then(|suffix| suffix.parse::<u32>().ok())
        else {
            continue;
        };
        highest = highest.max(Some(number));
    }
    Ok(highest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 31).unwrap()
    }

    #[test]
    fn test_missing_root_starts_at_001() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("eia_api");

        assert_eq!(
            new_output_dir_on(&root, date()).unwrap(),
            root.join("2022-05-31#001")
        );
    }

    #[test]
    fn test_next_number_follows_highest_existing_run() {
        let temp = TempDir::new().unwrap();
        for name in ["2022-05-31#001", "2022-05-31#004", "2022-05-30#009", "notes"] {
            std::fs::create_dir(temp.path().join(name)).unwrap();
        }

        assert_eq!(
            new_output_dir_on(temp.path(), date()).unwrap(),
            temp.path().join("2022-05-31#005")
        );
        assert_eq!(
            latest_output_dir_on(temp.path(), date()).unwrap(),
            temp.path().join("2022-05-31#004")
        );
    }

    #[test]
    fn test_latest_without_runs_is_001() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            latest_output_dir_on(temp.path(), date()).unwrap(),
            temp.path().join("2022-05-31#001")
        );
    }

    #[test]
    fn test_new_output_dir_uses_today() {
        let temp = TempDir::new().unwrap();
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();

        let dir = new_output_dir(temp.path()).unwrap();
        assert_eq!(dir, temp.path().join(format!("{today}#001")));
    }
}
