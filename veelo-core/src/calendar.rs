//! Whole-day expansion of reserved intervals and the range booking gate.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

use crate::model::ReservedInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Reason a proposed rental range cannot be booked.
pub enum RangeConflict {
    /// End date lies before the start date.
    Inverted,
    /// Start date lies before today.
    InPast,
    /// A day within the range is already reserved.
    Overlap(NaiveDate),
}

impl fmt::Display for RangeConflict {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeConflict::Inverted => write!(formatter, "End date is before the start date"),
            RangeConflict::InPast => write!(formatter, "Start date is in the past"),
            RangeConflict::Overlap(day) => {
                write!(formatter, "{} is already booked", day.format("%Y-%m-%d"))
            }
        }
    }
}

/// Expand reserved intervals into the set of individual booked days.
///
/// Both endpoints are included; a zero-length interval contributes exactly one
/// day. An inverted interval (`end < start`) contributes nothing and the
/// remaining intervals are still processed.
#[must_use]
pub fn disabled_days(intervals: &[ReservedInterval]) -> BTreeSet<NaiveDate> {
    let mut days = BTreeSet::new();
    for interval in intervals {
        let mut day = interval.start;
        while day <= interval.end {
            days.insert(day);
            let Some(next) = day.succ_opt() else {
                break;
            };
            day = next;
        }
    }
    days
}

/// Check a proposed inclusive range against the disabled-day set.
///
/// Returns `None` when the range is bookable. `today` itself is a valid start
/// date; only days strictly before it are rejected.
#[must_use]
pub fn range_conflict(
    start: NaiveDate,
    end: NaiveDate,
    disabled: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> Option<RangeConflict> {
    if end < start {
        return Some(RangeConflict::Inverted);
    }
    if start < today {
        return Some(RangeConflict::InPast);
    }
    disabled
        .range(start..=end)
        .next()
        .copied()
        .map(RangeConflict::Overlap)
}
