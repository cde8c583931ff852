use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::models::Goal;

/// Calendar-day identifier in `YYYY-MM-DD` form. Zero-padded, so
/// lexicographic order equals chronological order.
pub type DayId = String;

/// Day id for a moment in time, using the local calendar date.
/// Two timestamps on the same local day map to the same id regardless
/// of their time-of-day component.
pub fn to_day_id(moment: &DateTime<Local>) -> DayId {
    format!(
        "{:04}-{:02}-{:02}",
        moment.year(),
        moment.month(),
        moment.day()
    )
}

/// Day id for a plain calendar date.
pub fn day_id_of(date: NaiveDate) -> DayId {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a day id back into a date. Returns `None` for malformed input.
pub fn from_day_id(day_id: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(day_id, "%Y-%m-%d").ok()
}

/// Bucket goals by their due day. Buckets come back in ascending day-id
/// order; within a bucket the goals keep their relative input order.
pub fn group_by_day<'a>(
    goals: impl IntoIterator<Item = &'a Goal>,
) -> Vec<(DayId, Vec<&'a Goal>)> {
    let mut buckets: BTreeMap<DayId, Vec<&Goal>> = BTreeMap::new();
    for goal in goals {
        buckets
            .entry(day_id_of(goal.due_date))
            .or_default()
            .push(goal);
    }
    buckets.into_iter().collect()
}
