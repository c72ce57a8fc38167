use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::error::RecurrenceError;
use super::types::{Recurrence, RecurrenceDescriptor, RecurrencePattern};
use crate::event::EventPayload;

/// Number of daily occurrences in a `week` window.
const DAYS_IN_WEEK: u32 = 7;

/// Distance between two consecutive candidates.
#[derive(Debug, Clone, Copy)]
enum Step {
    Days(u64),
    Months(u32),
}

impl Step {
    /// The `n`th candidate counted from the anchor.
    ///
    /// Month offsets are always taken from the anchor, so a day clipped by a
    /// short month (Jan 30 -> Feb 29) does not stay clipped afterwards.
    /// Returns `None` once the calendar overflows.
    fn nth_from(self, anchor: NaiveDateTime, n: u32) -> Option<NaiveDateTime> {
        match self {
            Step::Days(days) => anchor.checked_add_days(Days::new(days * u64::from(n))),
            Step::Months(months) => anchor.checked_add_months(Months::new(months.checked_mul(n)?)),
        }
    }
}

/// Expands an anchor event into the occurrences to persist.
///
/// | recurrence | pattern | candidates                                   |
/// |------------|---------|----------------------------------------------|
/// | week       | daily   | 7, one day apart                             |
/// | week       | sameDay | `count`, seven days apart                    |
/// | month      | daily   | one per day through the end of `now`'s month |
/// | month      | sameDay | `count`, one calendar month apart            |
/// | none       | -       | the anchor itself                            |
///
/// Candidates that start before `now` are dropped but still use up their
/// slot in the counted loops. Every occurrence keeps the anchor's start
/// time of day and ends on its own date at the anchor's end hour and
/// minute.
///
/// # Errors
///
/// Returns [`RecurrenceError::EmptyExpansion`] when nothing is left to
/// schedule, including a `week`/`month` rule with a missing or unknown
/// pattern.
pub fn generate(
    now: NaiveDateTime,
    anchor: &EventPayload,
    descriptor: &RecurrenceDescriptor,
) -> Result<Vec<EventPayload>, RecurrenceError> {
    let occurrences = match (descriptor.recurrence, descriptor.pattern) {
        (Recurrence::None, _) => vec![anchor.clone()],
        (Recurrence::Week, Some(RecurrencePattern::Daily)) => {
            expand_counted(now, anchor, Step::Days(1), DAYS_IN_WEEK)
        }
        (Recurrence::Week, Some(RecurrencePattern::SameDay)) => {
            expand_counted(now, anchor, Step::Days(7), descriptor.count)
        }
        (Recurrence::Month, Some(RecurrencePattern::Daily)) => expand_to_month_end(now, anchor),
        (Recurrence::Month, Some(RecurrencePattern::SameDay)) => {
            expand_counted(now, anchor, Step::Months(1), descriptor.count)
        }
        (Recurrence::Week | Recurrence::Month, _) => Vec::new(),
    };

    if occurrences.is_empty() {
        return Err(RecurrenceError::EmptyExpansion);
    }

    Ok(occurrences)
}

/// Returns the last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn expand_counted(
    now: NaiveDateTime,
    anchor: &EventPayload,
    step: Step,
    count: u32,
) -> Vec<EventPayload> {
    (0..count)
        .map_while(|n| step.nth_from(anchor.start, n))
        .filter(|candidate| *candidate >= now)
        .map(|candidate| occurrence_at(anchor, candidate))
        .collect()
}

fn expand_to_month_end(now: NaiveDateTime, anchor: &EventPayload) -> Vec<EventPayload> {
    let window_end = last_day_of_month(now.date());

    // Days before this offset all start before `now`.
    let first = u32::try_from(now.signed_duration_since(anchor.start).num_days().max(0))
        .unwrap_or(u32::MAX);

    (first..)
        .map_while(|n| Step::Days(1).nth_from(anchor.start, n))
        .take_while(|candidate| candidate.date() <= window_end)
        .filter(|candidate| *candidate >= now)
        .map(|candidate| occurrence_at(anchor, candidate))
        .collect()
}

fn occurrence_at(anchor: &EventPayload, start: NaiveDateTime) -> EventPayload {
    EventPayload {
        start,
        end: start.date().and_time(end_time_of_day(anchor.end)),
        email: anchor.email.clone(),
        extra: anchor.extra.clone(),
    }
}

/// The anchor's end time of day, truncated to the minute.
fn end_time_of_day(end: NaiveDateTime) -> NaiveTime {
    NaiveTime::from_hms_opt(end.hour(), end.minute(), 0).unwrap_or(NaiveTime::MIN)
}
