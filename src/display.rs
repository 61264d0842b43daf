use chrono::{DateTime, Local, NaiveDate, Utc};
use owo_colors::OwoColorize;

use crate::days::DayGroups;
use crate::model::{Note, Task, TaskStatus};
use crate::stats::TaskStats;
use crate::util::plural;

/// Color settings for one invocation.
#[derive(Copy, Clone, Debug)]
pub struct Style {
    pub color: bool,
    pub dark: bool,
}

impl Style {
    pub fn plain() -> Self {
        Self {
            color: false,
            dark: false,
        }
    }
}

pub fn print_header(now: DateTime<Local>, greeting: &str, style: Style) {
    let date = now.format("%d/%m/%Y").to_string();
    let time = now.format("%H:%M:%S").to_string();
    if style.color {
        println!("{}  {}  {}", accent(greeting, style), date.dimmed(), time.dimmed());
    } else {
        println!("{greeting}  {date}  {time}");
    }
}

pub fn print_day_tasks(day: NaiveDate, today: NaiveDate, tasks: &[&Task], style: Style) {
    println!("{}", format_day_heading(day, today, tasks.len(), style));
    if tasks.is_empty() {
        println!("No tasks.");
    }
    for (index, task) in tasks.iter().enumerate() {
        println!("{}", task_line(index, task, style));
    }
    if day != today {
        println!("{}", format_label("(past day: new tasks go to today)", style));
    }
}

pub fn print_days(groups: &DayGroups<'_>, selected: NaiveDate, today: NaiveDate, style: Style) {
    if groups.is_empty() {
        println!("No tasks.");
        return;
    }

    for (day, tasks) in groups.iter() {
        let mark = if day == selected { "*" } else { " " };
        let mut line = format!(
            "{mark} {}  {} task{}",
            day.format("%b %d, %Y"),
            tasks.len(),
            plural(tasks.len())
        );
        if day == today {
            line.push_str(" (Today)");
        }
        if day == today && style.color {
            println!("{}", accent(&line, style));
        } else {
            println!("{line}");
        }
    }
}

pub fn task_line(index: usize, task: &Task, style: Style) -> String {
    let status = format_status(task.status, style);
    let position = format_label(&format!("{:>2}.", index + 1), style);
    let title = format_title(task, style);
    let time = task
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    format!("[{status}] {position} {title}  {}", format_label(&time, style))
}

pub fn print_task_view(task: &Task, style: Style) {
    println!("{} {}", format_label("ID:", style), task.id);
    println!("{} {}", format_label("Title:", style), format_title(task, style));
    println!("{} {}", format_label("Status:", style), format_status(task.status, style));
    println!(
        "{} {}",
        format_label("Created:", style),
        format_created(&task.created_at, style)
    );
}

pub fn print_notes(notes: &[Note], style: Style) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }

    for (index, note) in notes.iter().enumerate() {
        let position = format_label(&format!("{:>2}.", index + 1), style);
        let created = format_created(&note.created_at, style);
        println!("{position} {created}");
        for line in note.content.lines() {
            println!("    {line}");
        }
    }
}

pub fn print_stats(stats: &TaskStats, style: Style) {
    let progress = format!("{}%", stats.progress());
    println!("Total:     {}", stats.total);
    println!("Pending:   {}", paint_status(&stats.pending.to_string(), TaskStatus::Pending, style));
    println!(
        "Completed: {}",
        paint_status(&stats.completed.to_string(), TaskStatus::Completed, style)
    );
    println!("Closed:    {}", paint_status(&stats.closed.to_string(), TaskStatus::Closed, style));
    if style.color {
        println!("Progress:  {}", accent(&progress, style));
    } else {
        println!("Progress:  {progress}");
    }
}

pub fn print_celebration(style: Style) {
    let line = "*  All tasks completed. Nice work!  *";
    let border = "~".repeat(line.chars().count());
    if !style.color {
        println!("{border}\n{line}\n{border}");
        return;
    }
    println!("{}", border.bright_magenta());
    println!("{}", line.bright_yellow().bold());
    println!("{}", border.bright_cyan());
}

fn format_day_heading(day: NaiveDate, today: NaiveDate, count: usize, style: Style) -> String {
    let mut text = format!("== {} ==", day.format("%Y-%m-%d"));
    if day == today {
        text = format!("== Today's Tasks ({}) ==", day.format("%Y-%m-%d"));
    }
    text.push_str(&format!("  {count} task{}", plural(count)));
    if style.color {
        format!("{}", text.bold())
    } else {
        text
    }
}

fn format_status(status: TaskStatus, style: Style) -> String {
    let text = match status {
        TaskStatus::Pending => "todo",
        TaskStatus::Completed => "done",
        TaskStatus::Closed => "shut",
    };
    paint_status(text, status, style)
}

fn paint_status(text: &str, status: TaskStatus, style: Style) -> String {
    if !style.color {
        return text.to_string();
    }
    match (status, style.dark) {
        (TaskStatus::Pending, true) => format!("{}", text.bright_yellow()),
        (TaskStatus::Pending, false) => format!("{}", text.yellow()),
        (TaskStatus::Completed, true) => format!("{}", text.bright_green()),
        (TaskStatus::Completed, false) => format!("{}", text.green()),
        (TaskStatus::Closed, true) => format!("{}", text.bright_red()),
        (TaskStatus::Closed, false) => format!("{}", text.red()),
    }
}

fn format_title(task: &Task, style: Style) -> String {
    if !style.color {
        return task.title.clone();
    }
    if task.is_completed() {
        format!("{}", task.title.strikethrough().dimmed())
    } else if style.dark {
        format!("{}", task.title.bright_white().bold())
    } else {
        format!("{}", task.title.bold())
    }
}

fn format_label(label: &str, style: Style) -> String {
    if style.color {
        format!("{}", label.dimmed())
    } else {
        label.to_string()
    }
}

fn format_created(value: &DateTime<Utc>, style: Style) -> String {
    let text = value
        .with_timezone(&Local)
        .format("%b %d, %Y %H:%M")
        .to_string();
    format_label(&text, style)
}

fn accent(text: &str, style: Style) -> String {
    if style.dark {
        format!("{}", text.bright_cyan().bold())
    } else {
        format!("{}", text.blue().bold())
    }
}
