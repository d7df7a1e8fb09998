use chrono::NaiveDate;
use thiserror::Error;

/// Recoverable, user-facing validation failures. The command loop prints
/// these and keeps running; none of them terminate the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid day number. Day must be between 1 and 31.")]
    InvalidDayNumber,
    #[error("Invalid day for month view. Please enter a day between 1 and {days_in_month}.")]
    DayOutOfRangeForMonth { days_in_month: u32 },
    #[error("Invalid day for week view. Please enter a day that falls within the current week.")]
    NotInCurrentWeek,
    #[error("There are no tasks on this date. Please try again.")]
    EmptyDay { date: NaiveDate },
    #[error("Task number {index} does not exist on this date. Please try again.")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("The given date and time fields do not match this task's type.")]
    ScheduleMismatch,
}
