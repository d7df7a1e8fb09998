use chrono::{Datelike, NaiveDate};
use crossterm::style::{StyledContent, Stylize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::calendar::{ActiveView, MonthCursor, WeekCursor, week_start_of};
use crate::free_time::FreeSlot;
use crate::input::{
    ADD_USAGE, DELETE_USAGE, FREE_USAGE, MARK_USAGE, PRIORITY_USAGE, UPDATE_USAGE,
};
use crate::models::{Schedule, Task, TaskKind};
use crate::store::TaskStore;

const CELL_WIDTH: usize = 15;
const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn print_active_view(
    store: &TaskStore,
    view: ActiveView,
    week: &WeekCursor,
    month: &MonthCursor,
) {
    match view {
        ActiveView::Week => print_week_view(store, week),
        ActiveView::Month => print_month_view(store, month),
    }
}

pub fn print_week_view(store: &TaskStore, week: &WeekCursor) {
    println!(
        "Week View: {} - {}",
        week.start().format("%d/%m/%Y"),
        week.end().format("%d/%m/%Y")
    );
    print_divider();
    print_row(DAY_NAMES.iter().map(|name| name.to_string()));
    print_row(week.days().map(|date| date.format("%d/%m").to_string()));
    print_divider();

    let columns: Vec<Vec<String>> = week
        .days()
        .map(|date| wrapped_task_lines(store.tasks_on(date)))
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..height {
        print_row(
            columns
                .iter()
                .map(|lines| lines.get(row).cloned().unwrap_or_default()),
        );
    }
    print_divider();
}

pub fn print_month_view(store: &TaskStore, month: &MonthCursor) {
    println!("Month View: {}", month.start().format("%B %Y"));
    print_divider();
    print_row(DAY_NAMES.iter().map(|name| name.to_string()));
    print_divider();

    let mut current = week_start_of(month.start());
    let month_end = month.end();
    while current <= month_end {
        let week = WeekCursor::containing(current);
        let in_month: Vec<Option<NaiveDate>> = week
            .days()
            .map(|date| (date.month() == month.start().month()).then_some(date))
            .collect();
        print_row(in_month.iter().map(|slot| match slot {
            Some(date) => date.day().to_string(),
            None => String::new(),
        }));

        let height = in_month
            .iter()
            .map(|slot| slot.map_or(0, |date| store.tasks_on(date).len()))
            .max()
            .unwrap_or(0);
        for row in 0..height {
            print!("|");
            for slot in &in_month {
                let task = slot.and_then(|date| store.tasks_on(date).get(row));
                match task {
                    Some(task) => {
                        let icon = task.icon();
                        let pad = CELL_WIDTH.saturating_sub(UnicodeWidthStr::width(icon.as_str()));
                        print!("{}{}|", colored_icon(task), " ".repeat(pad));
                    }
                    None => print!("{}|", " ".repeat(CELL_WIDTH)),
                }
            }
            println!();
        }
        print_divider();
        current += chrono::Duration::weeks(1);
    }
}

/// Numbered listing for one date, printed after mutations so the 1-based
/// indices users type stay visible.
pub fn print_day_tasks(store: &TaskStore, date: NaiveDate) {
    let tasks = store.tasks_on(date);
    if tasks.is_empty() {
        println!("No tasks on {}.", date.format("%d/%m/%Y"));
        return;
    }
    println!("Tasks on {}:", date.format("%d/%m/%Y"));
    for (position, task) in tasks.iter().enumerate() {
        println!(
            "{}. {} {}{}",
            position + 1,
            colored_icon(task),
            task.name,
            schedule_summary(task)
        );
    }
}

pub fn print_free_slots(date: NaiveDate, slots: &[FreeSlot]) {
    if slots.is_empty() {
        println!("No free time slots on {}.", date.format("%d/%m/%Y"));
        return;
    }
    println!("Free time slots on {}:", date.format("%d/%m/%Y"));
    for slot in slots {
        println!(
            "  {} - {}",
            slot.start.format("%H:%M"),
            slot.end.format("%H:%M")
        );
    }
}

pub fn print_help() {
    println!("Commands (comma-separated):");
    println!("  week | month          switch the active view");
    println!("  next | prev           shift the active view window");
    println!("  {ADD_USAGE}");
    println!("  {UPDATE_USAGE}");
    println!("  {DELETE_USAGE}");
    println!("  {MARK_USAGE}");
    println!("  {PRIORITY_USAGE}");
    println!("  {FREE_USAGE}");
    println!("  help | quit");
    println!("Day numbers refer to the active window; dates are dd/mm/yyyy, times HHMM.");
}

fn schedule_summary(task: &Task) -> String {
    match task.schedule() {
        Schedule::None => String::new(),
        Schedule::Deadline { due_date, due_time } => format!(
            " (by {} {})",
            due_date.format("%d/%m/%Y"),
            due_time.format("%H:%M")
        ),
        Schedule::Event {
            start_date,
            end_date,
            start_time,
            end_time,
        } => format!(
            " (from {} {} to {} {})",
            start_date.format("%d/%m/%Y"),
            start_time.format("%H:%M"),
            end_date.format("%d/%m/%Y"),
            end_time.format("%H:%M")
        ),
    }
}

fn colored_icon(task: &Task) -> StyledContent<String> {
    let icon = task.icon();
    if task.done {
        return icon.green();
    }
    match task.kind() {
        TaskKind::Todo => icon.cyan(),
        TaskKind::Deadline => icon.blue(),
        TaskKind::Event => icon.magenta(),
    }
}

fn wrapped_task_lines(tasks: &[Task]) -> Vec<String> {
    let mut lines = Vec::new();
    for task in tasks {
        let text = format!("{} {}", task.icon(), task.name);
        for line in textwrap::wrap(&text, CELL_WIDTH) {
            lines.push(line.into_owned());
        }
    }
    lines
}

fn print_divider() {
    let segment = format!("+{}", "-".repeat(CELL_WIDTH));
    println!("{}+", segment.repeat(7));
}

fn print_row(cells: impl Iterator<Item = String>) {
    print!("|");
    for cell in cells {
        print!("{}|", pad_cell(&cell));
    }
    println!();
}

/// Pads (or truncates) to the cell width by display width, so wide glyphs
/// in task names keep the grid aligned.
fn pad_cell(text: &str) -> String {
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > CELL_WIDTH {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push_str(&" ".repeat(CELL_WIDTH - width));
    out
}
