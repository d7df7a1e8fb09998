use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Week,
    Month,
}

/// Sunday of the week containing `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn add_months(base: NaiveDate, months: i32) -> NaiveDate {
    let total = base.year() * 12 + base.month() as i32 - 1 + months;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12) + 1) as u32;
    let day = base.day().min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(base)
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .map(|d| (d - Duration::days(1)).day())
        .unwrap_or(28)
}

/// A Sunday-anchored seven-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCursor {
    start: NaiveDate,
}

impl WeekCursor {
    pub fn containing(date: NaiveDate) -> WeekCursor {
        WeekCursor {
            start: week_start_of(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn next(&mut self) {
        self.start += Duration::weeks(1);
    }

    pub fn previous(&mut self) {
        self.start -= Duration::weeks(1);
    }

    /// Date of the given ISO weekday (1 = Monday .. 7 = Sunday) inside
    /// this window.
    pub fn date_for_weekday(&self, day_of_week: u32) -> NaiveDate {
        debug_assert!((1..=7).contains(&day_of_week));
        let anchor = self.start.weekday().number_from_monday() as i64;
        let mut diff = day_of_week as i64 - anchor;
        if diff < 0 {
            diff += 7;
        }
        self.start + Duration::days(diff)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..7).map(move |offset| start + Duration::days(offset))
    }
}

/// A calendar-month window, anchored to the first of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    start: NaiveDate,
}

impl MonthCursor {
    pub fn containing(date: NaiveDate) -> MonthCursor {
        MonthCursor {
            start: first_of_month(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn days_in_month(&self) -> u32 {
        last_day_of_month(self.start.year(), self.start.month())
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.days_in_month()) - 1)
    }

    pub fn next(&mut self) {
        self.start = add_months(self.start, 1);
    }

    pub fn previous(&mut self) {
        self.start = add_months(self.start, -1);
    }
}

/// Maps a user-typed day number to a concrete date in the active window.
///
/// Month mode is a plain range check against the month length. Week mode
/// first reads the number as a day of the week-start's month; when that
/// lands before the window or outside that month (a week straddling a
/// month boundary), the number is re-read as a day of the following month
/// before the window bounds are enforced.
pub fn resolve_day(
    day: u32,
    view: ActiveView,
    week: &WeekCursor,
    month: &MonthCursor,
) -> Result<NaiveDate, ValidationError> {
    if !(1..=31).contains(&day) {
        return Err(ValidationError::InvalidDayNumber);
    }
    match view {
        ActiveView::Month => {
            let days_in_month = month.days_in_month();
            if day > days_in_month {
                return Err(ValidationError::DayOutOfRangeForMonth { days_in_month });
            }
            Ok(month.start().with_day(day).unwrap_or(month.start()))
        }
        ActiveView::Week => {
            let week_start = week.start();
            let week_end = week.end();
            let month_start = first_of_month(week_start);
            let candidate = month_start + Duration::days(i64::from(day) - 1);
            if candidate < week_start || candidate.month() != week_start.month() {
                let next_month = add_months(month_start, 1);
                let Some(candidate) = next_month.with_day(day) else {
                    return Err(ValidationError::NotInCurrentWeek);
                };
                if candidate > week_end {
                    return Err(ValidationError::NotInCurrentWeek);
                }
                Ok(candidate)
            } else if candidate > week_end {
                Err(ValidationError::NotInCurrentWeek)
            } else {
                Ok(candidate)
            }
        }
    }
}
