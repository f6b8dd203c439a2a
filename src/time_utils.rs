// SPDX-License-Identifier: MIT

//! Shared helpers for calendar-day handling and timestamp formatting.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar day (UTC) a timestamp falls on.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Canonical mid-day timestamp for a calendar day.
///
/// Used when a day must be widened back to a timestamp; noon keeps the
/// result on the same calendar day under small time zone offsets.
pub fn canonical_noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(noon()))
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

/// Sentinel time-of-day meaning "logged retroactively; the date is
/// meaningful, the exact time is not".
///
/// This is a display heuristic from the record-logging flow. It is only
/// consulted when formatting records for presentation; the completion
/// projector never interprets it.
pub fn backdated_sentinel() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap()
}

/// Whether a completion timestamp carries the retroactive-logging sentinel.
pub fn is_backdated(completed_at: DateTime<Utc>) -> bool {
    completed_at.time() == backdated_sentinel()
}
