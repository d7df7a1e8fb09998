use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::{Priority, Schedule};
use crate::storage::{parse_date, parse_time};

pub const ADD_USAGE: &str =
    "add, <day>, <t|d|e>, <description>[, dd/mm/yyyy HHMM[, dd/mm/yyyy HHMM]]";
pub const UPDATE_USAGE: &str =
    "update, <day>, <index>, <description>[, dd/mm/yyyy HHMM[, dd/mm/yyyy HHMM]]";
pub const DELETE_USAGE: &str = "delete, <day>, <index>";
pub const MARK_USAGE: &str = "mark, <day>, <index>";
pub const PRIORITY_USAGE: &str = "priority, <day>, <index>, <high|medium|low>";
pub const FREE_USAGE: &str = "free, <day>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid input. Enter help to see the available commands.")]
    UnknownCommand,
    #[error("Invalid input format. Please provide input in the format: {usage}")]
    BadShape { usage: &'static str },
    #[error("Invalid day number. Please enter a valid integer.")]
    BadDayNumber,
    #[error("Invalid task index. Please enter a valid integer.")]
    BadIndex,
    #[error("Invalid task type given. Use t for todo, d for deadline, e for event.")]
    BadTaskKind,
    #[error("Invalid priority level. Please use 'high', 'medium', or 'low'.")]
    BadPriority,
    #[error("Invalid date format. Please use the format dd/mm/yyyy.")]
    BadDate,
    #[error("Invalid time format. Please use the 24-hour format HHMM.")]
    BadTime,
    #[error("Task description must not be empty.")]
    EmptyDescription,
}

/// Date/time segments riding on an `update`, parsed without knowing the
/// target task's kind; the store checks the variant matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleFields {
    Deadline {
        due_date: NaiveDate,
        due_time: NaiveTime,
    },
    Event {
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    WeekView,
    MonthView,
    NextWindow,
    PreviousWindow,
    Add {
        day: u32,
        name: String,
        schedule: Schedule,
    },
    Update {
        day: u32,
        index: usize,
        name: String,
        fields: Option<ScheduleFields>,
    },
    Delete {
        day: u32,
        index: usize,
    },
    Mark {
        day: u32,
        index: usize,
    },
    Priority {
        day: u32,
        index: usize,
        level: Priority,
    },
    FreeTime {
        day: u32,
    },
    Help,
    Quit,
}

/// Splits a comma-separated command line and validates every token, so
/// the core only ever sees well-formed values.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    match parts[0].to_lowercase().as_str() {
        "week" => Ok(Command::WeekView),
        "month" => Ok(Command::MonthView),
        "next" => Ok(Command::NextWindow),
        "prev" => Ok(Command::PreviousWindow),
        "help" => Ok(Command::Help),
        "quit" => Ok(Command::Quit),
        "add" => parse_add(&parts),
        "update" => parse_update(&parts),
        "delete" => {
            let (day, index) = parse_day_index(&parts, DELETE_USAGE)?;
            Ok(Command::Delete { day, index })
        }
        "mark" => {
            let (day, index) = parse_day_index(&parts, MARK_USAGE)?;
            Ok(Command::Mark { day, index })
        }
        "priority" => parse_priority(&parts),
        "free" => {
            if parts.len() != 2 {
                return Err(ParseError::BadShape { usage: FREE_USAGE });
            }
            Ok(Command::FreeTime {
                day: parse_day(parts[1])?,
            })
        }
        _ => Err(ParseError::UnknownCommand),
    }
}

fn parse_add(parts: &[&str]) -> Result<Command, ParseError> {
    if parts.len() < 4 {
        return Err(ParseError::BadShape { usage: ADD_USAGE });
    }
    let day = parse_day(parts[1])?;
    let name = parse_name(parts[3])?;
    let schedule = match parts[2].to_lowercase().as_str() {
        "t" => {
            if parts.len() != 4 {
                return Err(ParseError::BadShape { usage: ADD_USAGE });
            }
            Schedule::None
        }
        "d" => {
            if parts.len() != 5 {
                return Err(ParseError::BadShape { usage: ADD_USAGE });
            }
            let (due_date, due_time) = parse_date_time(parts[4])?;
            Schedule::Deadline { due_date, due_time }
        }
        "e" => {
            if parts.len() != 6 {
                return Err(ParseError::BadShape { usage: ADD_USAGE });
            }
            let (start_date, start_time) = parse_date_time(parts[4])?;
            let (end_date, end_time) = parse_date_time(parts[5])?;
            Schedule::Event {
                start_date,
                end_date,
                start_time,
                end_time,
            }
        }
        _ => return Err(ParseError::BadTaskKind),
    };
    Ok(Command::Add { day, name, schedule })
}

fn parse_update(parts: &[&str]) -> Result<Command, ParseError> {
    if !(4..=6).contains(&parts.len()) {
        return Err(ParseError::BadShape {
            usage: UPDATE_USAGE,
        });
    }
    let day = parse_day(parts[1])?;
    let index = parse_index(parts[2])?;
    let name = parse_name(parts[3])?;
    let fields = match parts.len() {
        4 => None,
        5 => {
            let (due_date, due_time) = parse_date_time(parts[4])?;
            Some(ScheduleFields::Deadline { due_date, due_time })
        }
        _ => {
            let (start_date, start_time) = parse_date_time(parts[4])?;
            let (end_date, end_time) = parse_date_time(parts[5])?;
            Some(ScheduleFields::Event {
                start_date,
                end_date,
                start_time,
                end_time,
            })
        }
    };
    Ok(Command::Update {
        day,
        index,
        name,
        fields,
    })
}

fn parse_priority(parts: &[&str]) -> Result<Command, ParseError> {
    if parts.len() != 4 {
        return Err(ParseError::BadShape {
            usage: PRIORITY_USAGE,
        });
    }
    let day = parse_day(parts[1])?;
    let index = parse_index(parts[2])?;
    let level = Priority::from_word(parts[3]).ok_or(ParseError::BadPriority)?;
    Ok(Command::Priority { day, index, level })
}

fn parse_day_index(parts: &[&str], usage: &'static str) -> Result<(u32, usize), ParseError> {
    if parts.len() != 3 {
        return Err(ParseError::BadShape { usage });
    }
    Ok((parse_day(parts[1])?, parse_index(parts[2])?))
}

fn parse_day(token: &str) -> Result<u32, ParseError> {
    token.parse().map_err(|_| ParseError::BadDayNumber)
}

fn parse_index(token: &str) -> Result<usize, ParseError> {
    token.parse().map_err(|_| ParseError::BadIndex)
}

fn parse_name(token: &str) -> Result<String, ParseError> {
    if token.is_empty() {
        return Err(ParseError::EmptyDescription);
    }
    Ok(token.to_string())
}

/// A `dd/mm/yyyy HHMM` segment.
fn parse_date_time(segment: &str) -> Result<(NaiveDate, NaiveTime), ParseError> {
    let mut tokens = segment.split_whitespace();
    let date_token = tokens.next().ok_or(ParseError::BadDate)?;
    let time_token = tokens.next().ok_or(ParseError::BadTime)?;
    if tokens.next().is_some() {
        return Err(ParseError::BadDate);
    }
    let date = parse_date(date_token).ok_or(ParseError::BadDate)?;
    let time = parse_time(time_token).ok_or(ParseError::BadTime)?;
    Ok((date, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse_command("WEEK"), Ok(Command::WeekView));
        assert_eq!(parse_command("  Month  "), Ok(Command::MonthView));
        assert_eq!(parse_command("next"), Ok(Command::NextWindow));
        assert_eq!(parse_command("prev"), Ok(Command::PreviousWindow));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        assert_eq!(parse_command("banana"), Err(ParseError::UnknownCommand));
    }

    #[test]
    fn add_todo_parses() {
        assert_eq!(
            parse_command("add, 5, t, buy milk"),
            Ok(Command::Add {
                day: 5,
                name: "buy milk".into(),
                schedule: Schedule::None,
            })
        );
    }

    #[test]
    fn add_deadline_parses_date_and_time() {
        assert_eq!(
            parse_command("add, 5, d, report, 02/04/2024 1800"),
            Ok(Command::Add {
                day: 5,
                name: "report".into(),
                schedule: Schedule::Deadline {
                    due_date: date(2024, 4, 2),
                    due_time: time(18, 0),
                },
            })
        );
    }

    #[test]
    fn add_event_parses_both_segments() {
        assert_eq!(
            parse_command("add, 7, e, lunch, 07/04/2024 1200, 07/04/2024 1300"),
            Ok(Command::Add {
                day: 7,
                name: "lunch".into(),
                schedule: Schedule::Event {
                    start_date: date(2024, 4, 7),
                    end_date: date(2024, 4, 7),
                    start_time: time(12, 0),
                    end_time: time(13, 0),
                },
            })
        );
    }

    #[test]
    fn add_rejects_bad_tokens() {
        assert_eq!(parse_command("add, 5, t"), Err(ParseError::BadShape { usage: ADD_USAGE }));
        assert_eq!(parse_command("add, x, t, name"), Err(ParseError::BadDayNumber));
        assert_eq!(parse_command("add, 5, z, name"), Err(ParseError::BadTaskKind));
        assert_eq!(parse_command("add, 5, t, "), Err(ParseError::EmptyDescription));
        assert_eq!(
            parse_command("add, 5, d, report, 31/13/2024 1800"),
            Err(ParseError::BadDate)
        );
        assert_eq!(
            parse_command("add, 5, d, report, 02/04/2024 2561"),
            Err(ParseError::BadTime)
        );
    }

    #[test]
    fn update_without_fields_keeps_none() {
        assert_eq!(
            parse_command("update, 5, 2, new name"),
            Ok(Command::Update {
                day: 5,
                index: 2,
                name: "new name".into(),
                fields: None,
            })
        );
    }

    #[test]
    fn update_with_one_segment_carries_deadline_fields() {
        assert_eq!(
            parse_command("update, 5, 2, new name, 03/04/2024 0900"),
            Ok(Command::Update {
                day: 5,
                index: 2,
                name: "new name".into(),
                fields: Some(ScheduleFields::Deadline {
                    due_date: date(2024, 4, 3),
                    due_time: time(9, 0),
                }),
            })
        );
    }

    #[test]
    fn update_with_two_segments_carries_event_fields() {
        assert_eq!(
            parse_command("update, 5, 2, moved, 05/04/2024 1200, 05/04/2024 1300"),
            Ok(Command::Update {
                day: 5,
                index: 2,
                name: "moved".into(),
                fields: Some(ScheduleFields::Event {
                    start_date: date(2024, 4, 5),
                    end_date: date(2024, 4, 5),
                    start_time: time(12, 0),
                    end_time: time(13, 0),
                }),
            })
        );
    }

    #[test]
    fn delete_mark_free_parse_day_and_index() {
        assert_eq!(parse_command("delete, 5, 1"), Ok(Command::Delete { day: 5, index: 1 }));
        assert_eq!(parse_command("mark, 5, 1"), Ok(Command::Mark { day: 5, index: 1 }));
        assert_eq!(parse_command("free, 7"), Ok(Command::FreeTime { day: 7 }));
        assert_eq!(parse_command("mark, 5, x"), Err(ParseError::BadIndex));
        assert_eq!(
            parse_command("free"),
            Err(ParseError::BadShape { usage: FREE_USAGE })
        );
    }

    #[test]
    fn priority_requires_a_known_level() {
        assert_eq!(
            parse_command("priority, 5, 1, HIGH"),
            Ok(Command::Priority {
                day: 5,
                index: 1,
                level: Priority::High,
            })
        );
        assert_eq!(
            parse_command("priority, 5, 1, urgent"),
            Err(ParseError::BadPriority)
        );
    }
}
