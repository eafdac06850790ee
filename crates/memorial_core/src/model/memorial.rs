//! Memorial domain model.
//!
//! # Responsibility
//! - Define the profile record for one deceased individual.
//! - Parse stored date text into calendar dates on demand.
//!
//! # Invariants
//! - `id` is stable and never reused for another memorial.
//! - `death_date`/`birth_date` are kept as delivered by storage; parsing is
//!   lenient and never panics.
//! - No ordering is enforced between `birth_date` and `death_date`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static LEADING_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{4})-(\d{2})-(\d{2})(?:$|[T\s])").expect("valid leading date regex")
});

/// Opaque memorial identifier as issued by storage.
pub type MemorialId = String;

/// Validation failures for memorial writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemorialValidationError {
    /// `id` is empty after trim.
    EmptyId,
    /// `deceased_name` is empty after trim.
    BlankName,
    /// A present date field cannot be parsed.
    InvalidDate {
        field: &'static str,
        value: String,
    },
}

impl Display for MemorialValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "memorial id must not be empty"),
            Self::BlankName => write!(f, "deceased name must not be blank"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} `{value}` is not a valid YYYY-MM-DD date")
            }
        }
    }
}

impl Error for MemorialValidationError {}

/// Profile data for one deceased individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorialRecord {
    pub id: MemorialId,
    pub deceased_name: String,
    /// Date text (`YYYY-MM-DD` or ISO timestamp). Records without it are not
    /// scheduled.
    pub death_date: Option<String>,
    /// Display only.
    pub birth_date: Option<String>,
    /// Display only.
    pub image_url: Option<String>,
}

impl MemorialRecord {
    /// Creates a memorial with a generated id.
    pub fn new(deceased_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), deceased_name)
    }

    /// Creates a memorial with a caller-provided id.
    ///
    /// Used by import paths where identity already exists in the backend.
    pub fn with_id(id: impl Into<MemorialId>, deceased_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            deceased_name: deceased_name.into(),
            death_date: None,
            birth_date: None,
            image_url: None,
        }
    }

    /// Builder-style setter for `death_date`.
    pub fn died_on(mut self, date: impl Into<String>) -> Self {
        self.death_date = Some(date.into());
        self
    }

    /// Builder-style setter for `birth_date`.
    pub fn born_on(mut self, date: impl Into<String>) -> Self {
        self.birth_date = Some(date.into());
        self
    }

    /// Parsed death date, or `None` when absent or unparseable.
    pub fn parsed_death_date(&self) -> Option<NaiveDate> {
        self.death_date.as_deref().and_then(parse_memorial_date)
    }

    /// Parsed birth date, or `None` when absent or unparseable.
    pub fn parsed_birth_date(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(parse_memorial_date)
    }

    /// Checks write-side invariants.
    ///
    /// Read paths do not call this: stored rows with odd date text are still
    /// surfaced so that downstream derivations can omit them individually.
    pub fn validate(&self) -> Result<(), MemorialValidationError> {
        if self.id.trim().is_empty() {
            return Err(MemorialValidationError::EmptyId);
        }
        if self.deceased_name.trim().is_empty() {
            return Err(MemorialValidationError::BlankName);
        }
        check_date("death_date", self.death_date.as_deref())?;
        check_date("birth_date", self.birth_date.as_deref())?;
        Ok(())
    }
}

/// Parses storage date text into a calendar date.
///
/// Accepts `YYYY-MM-DD` and timestamps starting with it
/// (`1990-06-15T08:30:00Z`, `1990-06-15 08:30:00`). The time part is ignored.
pub fn parse_memorial_date(value: &str) -> Option<NaiveDate> {
    let captures = LEADING_DATE_RE.captures(value)?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn check_date(field: &'static str, value: Option<&str>) -> Result<(), MemorialValidationError> {
    match value {
        Some(text) if parse_memorial_date(text).is_none() => {
            Err(MemorialValidationError::InvalidDate {
                field,
                value: text.to_string(),
            })
        }
        _ => Ok(()),
    }
}
