// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar bucketing helpers.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Sunday on or before the calendar date of `date`.
pub fn week_start(date: DateTime<Utc>) -> NaiveDate {
    let day = date.date_naive();
    let offset = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

/// "YYYY-MM" key for a timestamp.
pub fn month_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m").to_string()
}
