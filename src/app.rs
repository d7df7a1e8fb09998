use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use log::warn;

use crate::calendar::{ActiveView, MonthCursor, WeekCursor, resolve_day};
use crate::config::Config;
use crate::errors::ValidationError;
use crate::free_time::free_slots;
use crate::input::{Command, ScheduleFields};
use crate::models::{Schedule, Task};
use crate::storage;
use crate::store::{DeleteOutcome, TaskStore, UpdateOutcome};
use crate::ui;

/// Application state: the store, both view cursors, and the save path.
/// Every successful mutation rewrites the save file before returning.
pub struct App {
    pub store: TaskStore,
    pub week: WeekCursor,
    pub month: MonthCursor,
    pub active_view: ActiveView,
    pub should_quit: bool,
    save_path: PathBuf,
}

impl App {
    pub fn new(config: &Config) -> App {
        let save_path = config.data.save_file.clone();
        let store = match storage::load_tasks(&save_path) {
            Ok(store) => store,
            Err(e) => {
                warn!("failed to load save file: {e}");
                eprintln!("Could not read the save file ({e}); starting with an empty tracker.");
                TaskStore::new()
            }
        };
        App::from_parts(Local::now().date_naive(), store, save_path)
    }

    fn from_parts(today: NaiveDate, store: TaskStore, save_path: PathBuf) -> App {
        App {
            store,
            week: WeekCursor::containing(today),
            month: MonthCursor::containing(today),
            active_view: ActiveView::Week,
            should_quit: false,
            save_path,
        }
    }

    pub fn render(&self) {
        ui::print_active_view(&self.store, self.active_view, &self.week, &self.month);
    }

    pub fn handle(&mut self, command: Command) -> Result<(), ValidationError> {
        match command {
            Command::WeekView => self.active_view = ActiveView::Week,
            Command::MonthView => self.active_view = ActiveView::Month,
            Command::NextWindow => match self.active_view {
                ActiveView::Week => self.week.next(),
                ActiveView::Month => self.month.next(),
            },
            Command::PreviousWindow => match self.active_view {
                ActiveView::Week => self.week.previous(),
                ActiveView::Month => self.month.previous(),
            },
            Command::Help => ui::print_help(),
            Command::Quit => self.should_quit = true,
            Command::Add {
                day,
                name,
                schedule,
            } => {
                let date = self.resolve(day)?;
                let kind = schedule.kind();
                self.store.add(date, Task::new(name, schedule));
                self.persist();
                println!("{} added.", kind.label());
                ui::print_day_tasks(&self.store, date);
            }
            Command::Update {
                day,
                index,
                name,
                fields,
            } => {
                let date = self.resolve(day)?;
                let schedule = fields.map(schedule_from_fields);
                match self.store.update(date, index, name, schedule)? {
                    UpdateOutcome::Updated => {
                        self.persist();
                        println!("Task updated.");
                        ui::print_day_tasks(&self.store, date);
                    }
                    UpdateOutcome::Relocated { to } => {
                        self.persist();
                        println!("Task updated and moved to {}.", to.format("%d/%m/%Y"));
                        ui::print_day_tasks(&self.store, to);
                    }
                }
            }
            Command::Delete { day, index } => {
                let date = self.resolve(day)?;
                match self.store.delete(date, index) {
                    DeleteOutcome::Deleted => {
                        self.persist();
                        println!("Task deleted.");
                        ui::print_day_tasks(&self.store, date);
                    }
                    DeleteOutcome::NotFound => {
                        println!("The task you are trying to delete does not exist.");
                    }
                }
            }
            Command::Mark { day, index } => {
                let date = self.resolve(day)?;
                let done = self.store.toggle_done(date, index)?;
                self.persist();
                if done {
                    println!("Task marked as done.");
                } else {
                    println!("Task marked as not done.");
                }
                ui::print_day_tasks(&self.store, date);
            }
            Command::Priority { day, index, level } => {
                let date = self.resolve(day)?;
                self.store.set_priority(date, index, level)?;
                self.persist();
                println!("Priority updated.");
                ui::print_day_tasks(&self.store, date);
            }
            Command::FreeTime { day } => {
                let date = self.resolve(day)?;
                let events = self.store.events_on(date);
                let slots = free_slots(&events, date);
                ui::print_free_slots(date, &slots);
            }
        }
        Ok(())
    }

    fn resolve(&self, day: u32) -> Result<NaiveDate, ValidationError> {
        resolve_day(day, self.active_view, &self.week, &self.month)
    }

    fn persist(&self) {
        if let Err(e) = storage::save_tasks(&self.store, &self.save_path) {
            warn!("failed to save tasks: {e}");
            eprintln!("Could not write the save file: {e}");
        }
    }
}

fn schedule_from_fields(fields: ScheduleFields) -> Schedule {
    match fields {
        ScheduleFields::Deadline { due_date, due_time } => {
            Schedule::Deadline { due_date, due_time }
        }
        ScheduleFields::Event {
            start_date,
            end_date,
            start_time,
            end_time,
        } => Schedule::Event {
            start_date,
            end_date,
            start_time,
            end_time,
        },
    }
}
