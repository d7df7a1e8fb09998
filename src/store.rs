use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::info;

use crate::errors::ValidationError;
use crate::models::{Priority, Schedule, Task, TaskKind};

#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Relocated { to: NaiveDate },
}

/// Tasks bucketed by date. Within a bucket, insertion order is the order
/// users see; the 1-based numbers they type address positions here.
#[derive(Debug, Default)]
pub struct TaskStore {
    buckets: BTreeMap<NaiveDate, Vec<Task>>,
}

impl TaskStore {
    pub fn new() -> TaskStore {
        TaskStore::default()
    }

    pub fn add(&mut self, date: NaiveDate, task: Task) {
        info!("adding {} '{}' on {}", task.kind().label(), task.name, date);
        self.buckets.entry(date).or_default().push(task);
    }

    pub fn tasks_on(&self, date: NaiveDate) -> &[Task] {
        self.buckets.get(&date).map_or(&[], Vec::as_slice)
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks_on(date)
            .iter()
            .filter(|task| task.kind() == TaskKind::Event)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<Task>)> {
        self.buckets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Flips the completion flag; returns the new state.
    pub fn toggle_done(
        &mut self,
        date: NaiveDate,
        index: usize,
    ) -> Result<bool, ValidationError> {
        let task = self.slot_mut(date, index)?;
        task.done = !task.done;
        Ok(task.done)
    }

    pub fn set_priority(
        &mut self,
        date: NaiveDate,
        index: usize,
        priority: Priority,
    ) -> Result<(), ValidationError> {
        let task = self.slot_mut(date, index)?;
        task.priority = priority;
        Ok(())
    }

    /// Replaces the task at `index` with one carrying the new name and,
    /// optionally, a new schedule of the same variant. Completion and
    /// priority carry over. When an event's start date changes, the task
    /// moves to the new start date's bucket, appended at the end.
    pub fn update(
        &mut self,
        date: NaiveDate,
        index: usize,
        name: String,
        new_schedule: Option<Schedule>,
    ) -> Result<UpdateOutcome, ValidationError> {
        let old = self.slot_mut(date, index)?;
        let schedule = match new_schedule {
            Some(schedule) => {
                if schedule.kind() != old.kind() {
                    return Err(ValidationError::ScheduleMismatch);
                }
                schedule
            }
            None => old.schedule().clone(),
        };
        let mut replacement = Task::new(name, schedule);
        replacement.done = old.done;
        replacement.priority = old.priority;

        let relocate = match (old.event_start_date(), replacement.event_start_date()) {
            (Some(old_start), Some(new_start)) if old_start != new_start => Some(new_start),
            _ => None,
        };
        match relocate {
            Some(new_start) => {
                info!(
                    "relocating event '{}' from {} to {}",
                    replacement.name, date, new_start
                );
                let _ = self.remove_at(date, index - 1);
                self.buckets.entry(new_start).or_default().push(replacement);
                Ok(UpdateOutcome::Relocated { to: new_start })
            }
            None => {
                *self.slot_mut(date, index)? = replacement;
                Ok(UpdateOutcome::Updated)
            }
        }
    }

    /// A missing task is reported to the caller, not treated as an error.
    pub fn delete(&mut self, date: NaiveDate, index: usize) -> DeleteOutcome {
        let Some(tasks) = self.buckets.get(&date) else {
            return DeleteOutcome::NotFound;
        };
        if index == 0 || index > tasks.len() {
            return DeleteOutcome::NotFound;
        }
        let removed = self.remove_at(date, index - 1);
        if let Some(task) = removed {
            info!("deleted '{}' from {}", task.name, date);
        }
        DeleteOutcome::Deleted
    }

    fn remove_at(&mut self, date: NaiveDate, position: usize) -> Option<Task> {
        let tasks = self.buckets.get_mut(&date)?;
        if position >= tasks.len() {
            return None;
        }
        let task = tasks.remove(position);
        if tasks.is_empty() {
            self.buckets.remove(&date);
        }
        Some(task)
    }

    fn slot_mut(&mut self, date: NaiveDate, index: usize) -> Result<&mut Task, ValidationError> {
        let tasks = self
            .buckets
            .get_mut(&date)
            .ok_or(ValidationError::EmptyDay { date })?;
        let len = tasks.len();
        if index == 0 || index > len {
            return Err(ValidationError::IndexOutOfRange { index, len });
        }
        Ok(&mut tasks[index - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn tasks_keep_insertion_order_within_a_bucket() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        store.add(day, Task::todo("first".into()));
        store.add(day, Task::todo("second".into()));
        let names: Vec<_> = store.tasks_on(day).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn deleting_the_sole_task_drops_the_bucket() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        store.add(day, Task::todo("only".into()));
        assert_eq!(store.delete(day, 1), DeleteOutcome::Deleted);
        assert!(store.is_empty());
        assert!(store.tasks_on(day).is_empty());
    }

    #[test]
    fn deleting_a_missing_task_is_not_an_error() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        assert_eq!(store.delete(day, 1), DeleteOutcome::NotFound);
        store.add(day, Task::todo("only".into()));
        assert_eq!(store.delete(day, 2), DeleteOutcome::NotFound);
        assert_eq!(store.delete(day, 0), DeleteOutcome::NotFound);
        assert_eq!(store.task_count(), 1);
    }

    #[test]
    fn toggling_done_twice_restores_the_original_state() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        store.add(day, Task::todo("toggle me".into()));
        assert_eq!(store.toggle_done(day, 1), Ok(true));
        assert_eq!(store.toggle_done(day, 1), Ok(false));
        assert!(!store.tasks_on(day)[0].done);
    }

    #[test]
    fn out_of_range_index_leaves_the_store_unchanged() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        store.add(day, Task::todo("keep".into()));
        assert_eq!(
            store.toggle_done(day, 2),
            Err(ValidationError::IndexOutOfRange { index: 2, len: 1 })
        );
        assert_eq!(
            store.set_priority(date(2024, 4, 3), 1, Priority::High),
            Err(ValidationError::EmptyDay {
                date: date(2024, 4, 3)
            })
        );
        assert_eq!(store.task_count(), 1);
        assert!(!store.tasks_on(day)[0].done);
        assert_eq!(store.tasks_on(day)[0].priority, Priority::Low);
    }

    #[test]
    fn set_priority_overwrites_directly() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        store.add(day, Task::todo("rank me".into()));
        store.set_priority(day, 1, Priority::High).unwrap();
        assert_eq!(store.tasks_on(day)[0].priority, Priority::High);
        store.set_priority(day, 1, Priority::Medium).unwrap();
        assert_eq!(store.tasks_on(day)[0].priority, Priority::Medium);
    }

    #[test]
    fn update_replaces_name_and_keeps_flags() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        store.add(day, Task::todo("draft".into()));
        store.toggle_done(day, 1).unwrap();
        store.set_priority(day, 1, Priority::High).unwrap();
        assert_eq!(
            store.update(day, 1, "final".into(), None),
            Ok(UpdateOutcome::Updated)
        );
        let task = &store.tasks_on(day)[0];
        assert_eq!(task.name, "final");
        assert!(task.done);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn update_rejects_schedule_of_a_different_variant() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 2);
        store.add(day, Task::todo("plain".into()));
        let schedule = Schedule::Deadline {
            due_date: date(2024, 4, 3),
            due_time: time(18, 0),
        };
        assert_eq!(
            store.update(day, 1, "plain".into(), Some(schedule)),
            Err(ValidationError::ScheduleMismatch)
        );
        assert_eq!(store.tasks_on(day)[0].name, "plain");
    }

    #[test]
    fn changing_an_event_start_date_relocates_it() {
        let mut store = TaskStore::new();
        let old_day = date(2024, 4, 2);
        let new_day = date(2024, 4, 5);
        store.add(
            old_day,
            Task::event(
                "moved".into(),
                old_day,
                old_day,
                time(12, 0),
                time(13, 0),
            ),
        );
        store.add(new_day, Task::todo("already here".into()));
        let schedule = Schedule::Event {
            start_date: new_day,
            end_date: new_day,
            start_time: time(12, 0),
            end_time: time(13, 0),
        };
        assert_eq!(
            store.update(old_day, 1, "moved".into(), Some(schedule)),
            Ok(UpdateOutcome::Relocated { to: new_day })
        );
        assert!(store.tasks_on(old_day).is_empty());
        let names: Vec<_> = store
            .tasks_on(new_day)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["already here", "moved"]);
    }

    #[test]
    fn events_on_filters_other_kinds() {
        let mut store = TaskStore::new();
        let day = date(2024, 4, 7);
        store.add(day, Task::todo("not an event".into()));
        store.add(
            day,
            Task::event("lunch".into(), day, day, time(12, 0), time(13, 0)),
        );
        let events = store.events_on(day);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "lunch");
    }
}
