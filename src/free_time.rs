use chrono::{NaiveDate, NaiveTime};

use crate::models::{Schedule, Task};

/// A half-open gap between events, bounded by the tracked day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Gaps on `date` not covered by any event starting that day.
///
/// The day runs 00:00 to 23:59. Events spanning past midnight are cut off
/// at 23:59, and events that merely *end* on `date` (having started
/// earlier) are not considered; their morning coverage is not modelled.
pub fn free_slots(events: &[&Task], date: NaiveDate) -> Vec<FreeSlot> {
    let day_end = end_of_day();
    let mut events: Vec<&Task> = events.to_vec();
    events.sort_by_key(|task| match task.schedule() {
        Schedule::Event {
            start_date,
            start_time,
            ..
        } => (*start_date, *start_time),
        _ => (date, NaiveTime::MIN),
    });

    let mut slots = Vec::new();
    let mut cursor = NaiveTime::MIN;
    for task in events {
        let Schedule::Event {
            start_date,
            end_date,
            start_time,
            end_time,
        } = task.schedule()
        else {
            continue;
        };
        if *start_date != date {
            continue;
        }
        let effective_end = if *end_date != date { day_end } else { *end_time };
        if *start_time > cursor {
            slots.push(FreeSlot {
                start: cursor,
                end: *start_time,
            });
        }
        cursor = cursor.max(effective_end);
    }
    if cursor < day_end {
        slots.push(FreeSlot {
            start: cursor,
            end: day_end,
        });
    }
    slots
}
