//! Runtime configuration resolution for the CLI.
//!
//! # Invariants
//! - Explicit flags win over environment; environment wins over defaults.
//! - Blank values are treated as absent.

use chrono::{Local, NaiveDate};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MEMORIAL_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "memorial.sqlite3";

/// Resolves the database path: flag (or `MEMORIAL_DB_PATH` via clap) first,
/// then `<temp_dir>/memorial.sqlite3`.
pub fn resolve_db_path(flag: Option<&str>) -> PathBuf {
    flag.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
}

/// Resolves "today": explicit `YYYY-MM-DD` flag, else the local calendar date.
pub fn resolve_today(flag: Option<&str>) -> Result<NaiveDate, String> {
    match flag.map(str::trim).filter(|value| !value.is_empty()) {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|err| format!("--today `{text}` is not a valid YYYY-MM-DD date: {err}")),
        None => Ok(Local::now().date_naive()),
    }
}
