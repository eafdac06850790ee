//! Death anniversary scheduling.
//!
//! # Responsibility
//! - Derive the next anniversary, countdown and ordinal for memorials.
//! - Order derived views for the "upcoming", "recent" and "past" listings.
//!
//! # Invariants
//! - `today` is always supplied by the caller; no clock is read here.
//! - `days_until >= 0` and `days_until == 0` only on the anniversary itself.
//! - Records without a usable death date or representable anniversary are
//!   omitted, never reported as errors.
//! - Sorting is stable.

use crate::model::memorial::MemorialRecord;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Derived, display-ready anniversary data for one memorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnniversaryView {
    pub record: MemorialRecord,
    /// Parsed `record.death_date`.
    pub death_date: NaiveDate,
    /// Nearest anniversary on or after `today`.
    pub next_anniversary: NaiveDate,
    pub days_until: i64,
    /// Years between the death year and the year of `next_anniversary`.
    pub anniversary_ordinal: u32,
}

/// Listing order for anniversary views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnniversarySort {
    /// Soonest anniversary first; ties go to the more recently deceased.
    #[default]
    Closest,
    /// Most recent death date first.
    Recent,
    /// Oldest death date first.
    Past,
}

impl AnniversarySort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closest => "closest",
            Self::Recent => "recent",
            Self::Past => "past",
        }
    }
}

/// Unknown sort mode text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortMode(pub String);

impl Display for UnknownSortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown sort mode `{}`; expected closest|recent|past",
            self.0
        )
    }
}

impl Error for UnknownSortMode {}

impl FromStr for AnniversarySort {
    type Err = UnknownSortMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "closest" => Ok(Self::Closest),
            "recent" => Ok(Self::Recent),
            "past" => Ok(Self::Past),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

/// Computes one view per memorial with a usable death date.
///
/// Output keeps input order. Records with no death date are filtered out
/// silently. Records whose death date text cannot be parsed, or whose next
/// anniversary falls outside the representable calendar, are filtered out
/// with a warning.
pub fn compute_anniversaries(records: &[MemorialRecord], today: NaiveDate) -> Vec<AnniversaryView> {
    let mut views = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for record in records {
        let Some(raw) = record.death_date.as_deref() else {
            skipped += 1;
            continue;
        };
        let Some(death_date) = record.parsed_death_date() else {
            warn!(
                "event=anniversary_skip module=anniversary status=skipped memorial_id={} reason=invalid_death_date len={}",
                record.id,
                raw.len()
            );
            skipped += 1;
            continue;
        };
        let Some(view) = derive_view(record, death_date, today) else {
            warn!(
                "event=anniversary_skip module=anniversary status=skipped memorial_id={} reason=date_out_of_range today={}",
                record.id, today
            );
            skipped += 1;
            continue;
        };
        views.push(view);
    }

    debug!(
        "event=anniversary_compute module=anniversary status=ok input={} output={} skipped={}",
        records.len(),
        views.len(),
        skipped
    );
    views
}

/// Returns `views` reordered by `mode`. Equal keys keep their input order.
pub fn sort_anniversaries(
    mut views: Vec<AnniversaryView>,
    mode: AnniversarySort,
) -> Vec<AnniversaryView> {
    match mode {
        AnniversarySort::Closest => views.sort_by(closest_first),
        AnniversarySort::Recent => views.sort_by(|a, b| b.death_date.cmp(&a.death_date)),
        AnniversarySort::Past => views.sort_by(|a, b| a.death_date.cmp(&b.death_date)),
    }
    views
}

/// Next occurrence of the death month/day on or after `today`.
///
/// `None` when that occurrence lies beyond the last representable date.
pub fn next_anniversary(death_date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let candidate = anniversary_in_year(death_date, today.year())?;
    if candidate >= today {
        return Some(candidate);
    }
    anniversary_in_year(death_date, today.year().checked_add(1)?)
}

fn derive_view(
    record: &MemorialRecord,
    death_date: NaiveDate,
    today: NaiveDate,
) -> Option<AnniversaryView> {
    let next = next_anniversary(death_date, today)?;
    let ordinal = (next.year() - death_date.year()).max(0);
    Some(AnniversaryView {
        record: record.clone(),
        death_date,
        next_anniversary: next,
        days_until: (next - today).num_days(),
        anniversary_ordinal: u32::try_from(ordinal).unwrap_or(0),
    })
}

// 29 February falls on 1 March in non-leap years.
fn anniversary_in_year(death_date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, death_date.month(), death_date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

fn closest_first(a: &AnniversaryView, b: &AnniversaryView) -> Ordering {
    a.days_until
        .cmp(&b.days_until)
        .then_with(|| b.death_date.cmp(&a.death_date))
}
