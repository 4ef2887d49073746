//! Upcoming-anniversary projection.
//!
//! Recurrence math is not expressible in the store's query language, so the
//! caller fetches all events and projects them here, in memory. Policies that
//! the date arithmetic has to pick one way or the other:
//!
//! - The reference "today" is a plain calendar date. Callers holding a
//!   datetime truncate it to its local date first; since every candidate
//!   occurrence sits at local midnight, that is the same as taking the
//!   ceiling of the fractional day difference.
//! - A Feb 29 origin lands on Mar 1 in non-leap candidate years.
//! - Output is ordered by days-until ascending, ties by `id` ascending.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::models::Anniversary;

/// The next occurrence of an event on or after `reference`, or `None` if the
/// event is in the past and does not recur.
///
/// Recurring events are projected onto `reference`'s year, rolling into the
/// next year when this year's occurrence has already passed. Non-recurring
/// events only ever occur on their origin date.
pub fn next_occurrence(origin: NaiveDate, recurring: bool, reference: NaiveDate) -> Option<NaiveDate> {
    if !recurring {
        return (origin >= reference).then_some(origin);
    }
    let this_year = calendar_day(reference.year(), origin)?;
    if this_year < reference {
        calendar_day(reference.year() + 1, origin)
    } else {
        Some(this_year)
    }
}

/// Project `events` to those whose next occurrence falls within
/// `window_days` of `reference` (inclusive on both ends), optionally
/// restricted to events created by `owner`.
///
/// Events with an unparseable stored date are skipped, not fatal.
pub fn upcoming(
    events: Vec<Anniversary>,
    reference: NaiveDate,
    window_days: i64,
    owner: Option<&str>,
) -> Vec<Anniversary> {
    let mut hits: Vec<(i64, Anniversary)> = Vec::new();

    for event in events {
        if let Some(owner) = owner {
            if event.created_by != owner {
                continue;
            }
        }

        let origin = match NaiveDate::parse_from_str(&event.date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(err) => {
                warn!("Skipping anniversary {} with malformed date '{}': {}", event.id, event.date, err);
                continue;
            }
        };

        let Some(next) = next_occurrence(origin, event.is_recurring, reference) else {
            continue;
        };

        // next_occurrence never returns a date before the reference, so the
        // difference is always >= 0 here.
        let days_until = (next - reference).num_days();
        if days_until <= window_days {
            hits.push((days_until, event));
        }
    }

    hits.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
    hits.into_iter().map(|(_, event)| event).collect()
}

fn calendar_day(year: i32, origin: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, origin.month(), origin.day())
        // Only Feb 29 can fail to land; roll it to Mar 1.
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}
