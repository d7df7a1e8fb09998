use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use log::info;
use regex::Regex;
use thiserror::Error;

use crate::models::{Priority, Task};
use crate::store::TaskStore;

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H%M";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed save line: {0}")]
    MalformedLine(String),
}

fn line_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\|.+").expect("valid line pattern"))
}

/// Rewrites the whole save file from the store, one task per line:
/// `<bucket date>|<kind>|<done>|<priority>|<name>[|fields...]`.
pub fn save_tasks(store: &TaskStore, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut content = String::new();
    for (date, tasks) in store.iter() {
        for task in tasks {
            content.push_str(&encode_task(*date, task));
            content.push('\n');
        }
    }
    fs::write(path, content)?;
    info!("saved {} tasks to {}", store.task_count(), path.display());
    Ok(())
}

/// Reads the save file into a fresh store, creating an empty file (and its
/// parent directory) on first run. Any malformed line aborts the load.
pub fn load_tasks(path: &Path) -> Result<TaskStore, StorageError> {
    if !path.exists() {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "")?;
        info!("created new save file at {}", path.display());
        return Ok(TaskStore::new());
    }

    let content = fs::read_to_string(path)?;
    let mut store = TaskStore::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !line_shape().is_match(line) {
            return Err(StorageError::MalformedLine(line.to_string()));
        }
        let (date, task) = decode_task(line)?;
        store.add(date, task);
    }
    info!("loaded {} tasks from {}", store.task_count(), path.display());
    Ok(store)
}

fn encode_task(date: NaiveDate, task: &Task) -> String {
    use crate::models::Schedule;

    let mut line = format!(
        "{}|{}|{}|{}|{}",
        date.format("%Y-%m-%d"),
        task.kind().code(),
        task.status_code(),
        task.priority.code(),
        task.name
    );
    match task.schedule() {
        Schedule::None => {}
        Schedule::Deadline { due_date, due_time } => {
            line.push_str(&format!(
                "|{}|{}",
                due_date.format(DATE_FORMAT),
                due_time.format(TIME_FORMAT)
            ));
        }
        Schedule::Event {
            start_date,
            end_date,
            start_time,
            end_time,
        } => {
            line.push_str(&format!(
                "|{}|{}|{}|{}",
                start_date.format(DATE_FORMAT),
                end_date.format(DATE_FORMAT),
                start_time.format(TIME_FORMAT),
                end_time.format(TIME_FORMAT)
            ));
        }
    }
    line
}

fn decode_task(line: &str) -> Result<(NaiveDate, Task), StorageError> {
    let malformed = || StorageError::MalformedLine(line.to_string());
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 5 {
        return Err(malformed());
    }
    let date = NaiveDate::parse_from_str(parts[0], "%Y-%m-%d").map_err(|_| malformed())?;
    let done = match parts[2] {
        "X" => true,
        "O" => false,
        _ => return Err(malformed()),
    };
    let priority = Priority::from_code(parts[3].chars().next().ok_or_else(malformed)?);
    let name = parts[4].to_string();
    if name.trim().is_empty() {
        return Err(malformed());
    }

    let mut task = match parts[1] {
        "T" if parts.len() == 5 => Task::todo(name),
        "D" if parts.len() == 7 => {
            let due_date = parse_date(parts[5]).ok_or_else(malformed)?;
            let due_time = parse_time(parts[6]).ok_or_else(malformed)?;
            Task::deadline(name, due_date, due_time)
        }
        "E" if parts.len() == 9 => {
            let start_date = parse_date(parts[5]).ok_or_else(malformed)?;
            let end_date = parse_date(parts[6]).ok_or_else(malformed)?;
            let start_time = parse_time(parts[7]).ok_or_else(malformed)?;
            let end_time = parse_time(parts[8]).ok_or_else(malformed)?;
            Task::event(name, start_date, end_date, start_time, end_time)
        }
        _ => return Err(malformed()),
    };
    task.done = done;
    task.priority = priority;
    Ok((date, task))
}

pub fn parse_date(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

pub fn parse_time(token: &str) -> Option<NaiveTime> {
    if token.len() != 4 || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveTime::parse_from_str(token, TIME_FORMAT).ok()
}
