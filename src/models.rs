use chrono::{NaiveDate, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn code(self) -> char {
        match self {
            Priority::High => 'H',
            Priority::Medium => 'M',
            Priority::Low => 'L',
        }
    }

    /// Save-file codes. Unknown codes fall back to Low so an old or
    /// hand-edited file still loads.
    pub fn from_code(code: char) -> Priority {
        match code {
            'H' => Priority::High,
            'M' => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn from_word(word: &str) -> Option<Priority> {
        match word.to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Todo,
    Deadline,
    Event,
}

impl TaskKind {
    pub fn code(self) -> char {
        match self {
            TaskKind::Todo => 'T',
            TaskKind::Deadline => 'D',
            TaskKind::Event => 'E',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Todo => "Todo",
            TaskKind::Deadline => "Deadline",
            TaskKind::Event => "Event",
        }
    }
}

/// Date/time payload of a task. The variant is fixed at construction;
/// updates may replace the payload but never change its variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    None,
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

impl Schedule {
    pub fn kind(&self) -> TaskKind {
        match self {
            Schedule::None => TaskKind::Todo,
            Schedule::Deadline { .. } => TaskKind::Deadline,
            Schedule::Event { .. } => TaskKind::Event,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub done: bool,
    pub priority: Priority,
    schedule: Schedule,
}

impl Task {
    pub fn new(name: String, schedule: Schedule) -> Task {
        debug_assert!(!name.trim().is_empty(), "task name must not be empty");
        Task {
            name,
            done: false,
            priority: Priority::default(),
            schedule,
        }
    }

    pub fn todo(name: String) -> Task {
        Task::new(name, Schedule::None)
    }

    pub fn deadline(name: String, due_date: NaiveDate, due_time: NaiveTime) -> Task {
        Task::new(name, Schedule::Deadline { due_date, due_time })
    }

    pub fn event(
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Task {
        Task::new(
            name,
            Schedule::Event {
                start_date,
                end_date,
                start_time,
                end_time,
            },
        )
    }

    pub fn kind(&self) -> TaskKind {
        self.schedule.kind()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Event start date, `None` for other kinds.
    pub fn event_start_date(&self) -> Option<NaiveDate> {
        match self.schedule {
            Schedule::Event { start_date, .. } => Some(start_date),
            _ => None,
        }
    }

    pub fn status_code(&self) -> char {
        if self.done { 'X' } else { 'O' }
    }

    /// `[kind][done][priority]` prefix shown in listings and grids.
    pub fn icon(&self) -> String {
        format!(
            "[{}][{}][{}]",
            self.kind().code(),
            self.status_code(),
            self.priority.code()
        )
    }
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
    fn new_task_is_incomplete_and_low_priority() {
        let task = Task::todo("read chapter 4".into());
        assert!(!task.done);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.kind(), TaskKind::Todo);
    }

    #[test]
    fn icon_reflects_kind_status_and_priority() {
        let mut task = Task::deadline("assignment".into(), date(2024, 4, 2), time(18, 0));
        assert_eq!(task.icon(), "[D][O][L]");
        task.done = true;
        task.priority = Priority::High;
        assert_eq!(task.icon(), "[D][X][H]");
    }

    #[test]
    fn priority_codes_round_trip_and_unknown_defaults_low() {
        assert_eq!(Priority::from_code('H'), Priority::High);
        assert_eq!(Priority::from_code('M'), Priority::Medium);
        assert_eq!(Priority::from_code('L'), Priority::Low);
        assert_eq!(Priority::from_code('?'), Priority::Low);
    }

    #[test]
    fn priority_words_are_case_insensitive() {
        assert_eq!(Priority::from_word("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_word("Medium"), Some(Priority::Medium));
        assert_eq!(Priority::from_word("low"), Some(Priority::Low));
        assert_eq!(Priority::from_word("urgent"), None);
    }

    #[test]
    fn event_start_date_only_for_events() {
        let event = Task::event(
            "standup".into(),
            date(2024, 4, 7),
            date(2024, 4, 7),
            time(12, 0),
            time(13, 0),
        );
        assert_eq!(event.event_start_date(), Some(date(2024, 4, 7)));
        assert_eq!(Task::todo("x".into()).event_start_date(), None);
    }
}
