use std::ffi::OsString;
use std::rc::Rc;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, Timelike};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, info};

use crate::celebrate::Celebration;
use crate::cli::{Cli, Commands, DayArg, MoveTarget, NoteCommands, ThemeMode, init_tracing};
use crate::config::{load_config, resolve_data_dir};
use crate::days::{DayGroups, DaySelection, day_key, splice_day_order};
use crate::display::{
    Style, print_celebration, print_day_tasks, print_days, print_header, print_notes, print_stats,
    print_task_view,
};
use crate::model::{AppConfig, Note, Task, TaskStatus};
use crate::notes::NoteStore;
use crate::prefs::{Preferences, greeting, system_prefers_dark};
use crate::reorder::{DropTarget, Edge, reorder};
use crate::stats::TaskStats;
use crate::storage::{FileStorage, Storage};
use crate::tasks::TaskStore;
use crate::util::parse_day;

/// Outcome of a status change on the displayed day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub found: bool,
    pub celebrate: bool,
}

/// Everything one session works with. All mutations go through here.
pub struct App {
    config: AppConfig,
    tasks: TaskStore,
    notes: NoteStore,
    prefs: Preferences,
    selection: DaySelection,
    celebration: Celebration,
}

impl App {
    #[tracing::instrument(skip(storage, config))]
    pub fn open(storage: Rc<dyn Storage>, config: AppConfig, prefers_dark: bool) -> anyhow::Result<Self> {
        let mut tasks = TaskStore::load(storage.clone())?;
        let pruned = tasks.prune_older_than(config.retention_days)?;
        if pruned > 0 {
            info!(pruned, retention_days = config.retention_days, "removed expired tasks");
        }

        let notes = NoteStore::load(storage.clone())?;
        let prefs = Preferences::load(storage, prefers_dark)?;

        let mut app = Self {
            config,
            tasks,
            notes,
            prefs,
            selection: DaySelection::new(Local::now().date_naive()),
            celebration: Celebration::default(),
        };
        app.resync_celebration();
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.notes()
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn day_groups(&self) -> DayGroups<'_> {
        DayGroups::build(self.tasks.tasks(), &Local)
    }

    pub fn today(&self) -> NaiveDate {
        self.selection.today()
    }

    pub fn selected_day(&self) -> NaiveDate {
        self.selection.selected()
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        if day != self.selection.selected() {
            debug!(%day, "switching day");
            self.selection.select(day);
            self.resync_celebration();
        }
    }

    pub fn can_add_tasks(&self) -> bool {
        self.selection.accepts_new_tasks()
    }

    /// Tasks of the selected day, in store order.
    pub fn displayed_tasks(&self) -> Vec<&Task> {
        tasks_on_day(self.tasks.tasks(), self.selection.selected())
    }

    /// Position (1-based) in the displayed list first, then a stored id.
    pub fn resolve_task(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        let displayed = self.displayed_tasks();
        if let Ok(position) = reference.parse::<usize>() {
            if position >= 1 && position <= displayed.len() {
                return Some(displayed[position - 1].id.clone());
            }
        }
        self.tasks.get(reference).map(|t| t.id.clone())
    }

    pub fn add_task(&mut self, title: &str) -> anyhow::Result<Option<Task>> {
        if !self.can_add_tasks() {
            bail!("tasks can only be added to today");
        }
        let added = self.tasks.add(title)?.cloned();
        if added.is_some() {
            self.resync_celebration();
        }
        Ok(added)
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> anyhow::Result<StatusChange> {
        let found = self.tasks.set_status(id, status)?;
        if !found {
            return Ok(StatusChange {
                found,
                celebrate: false,
            });
        }

        let displayed = tasks_on_day(self.tasks.tasks(), self.selection.selected());
        let celebrate = self.celebration.observe(displayed);
        if celebrate {
            info!(day = %self.selection.selected(), "all tasks completed");
        }
        Ok(StatusChange { found, celebrate })
    }

    pub fn delete_task(&mut self, id: &str) -> anyhow::Result<Option<Task>> {
        let removed = self.tasks.delete(id)?;
        if removed.is_some() {
            self.resync_celebration();
        }
        Ok(removed)
    }

    /// Moves a task within the selected day and writes the new order back.
    #[tracing::instrument(skip(self))]
    pub fn move_task(&mut self, id: &str, target: DropTarget) -> anyhow::Result<()> {
        let day = self.selection.selected();
        let day_tasks: Vec<Task> = self.displayed_tasks().into_iter().cloned().collect();
        let source = day_tasks
            .iter()
            .position(|t| t.id == id)
            .with_context(|| format!("task {id} is not on {day}"))?;

        let reordered = reorder(&day_tasks, source, target)?;
        let full = splice_day_order(self.tasks.tasks(), day, reordered, &Local, self.config.splice)?;
        self.tasks.reorder(full)
    }

    pub fn add_note(&mut self, content: &str) -> anyhow::Result<Option<Note>> {
        Ok(self.notes.add(content)?.cloned())
    }

    pub fn delete_note(&mut self, id: &str) -> anyhow::Result<Option<Note>> {
        self.notes.delete(id)
    }

    pub fn resolve_note(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        let notes = self.notes.notes();
        if let Ok(position) = reference.parse::<usize>() {
            if position >= 1 && position <= notes.len() {
                return Some(notes[position - 1].id.clone());
            }
        }
        notes.iter().find(|n| n.id == reference).map(|n| n.id.clone())
    }

    pub fn toggle_theme(&mut self) -> anyhow::Result<bool> {
        self.prefs.toggle_dark_mode()
    }

    pub fn set_theme(&mut self, dark: bool) -> anyhow::Result<()> {
        self.prefs.set_dark_mode(dark)
    }

    pub fn set_user_name(&mut self, name: &str) -> anyhow::Result<bool> {
        self.prefs.set_user_name(name)
    }

    fn resync_celebration(&mut self) {
        self.celebration = Celebration::seeded(self.displayed_tasks());
    }
}

fn tasks_on_day(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| day_key(&t.created_at, &Local) == day)
        .collect()
}

pub fn run(args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = Cli::parse_from(args);
    init_tracing(cli.verbose, cli.quiet)?;

    let command = cli.command.unwrap_or(Commands::Today);
    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), &config);
    let storage = FileStorage::open(&data_dir)
        .with_context(|| format!("failed to open storage at {}", data_dir.display()))?;

    let mut app = App::open(Rc::new(storage), config, system_prefers_dark())?;
    let style = Style {
        color: app.config().color && !cli.no_color,
        dark: app.prefs().dark_mode(),
    };

    dispatch(&mut app, command, style)?;
    info!("done");
    Ok(())
}

fn dispatch(app: &mut App, command: Commands, style: Style) -> anyhow::Result<()> {
    match command {
        Commands::Today => {
            let now = Local::now();
            let greeting = greeting(now.hour(), app.prefs().user_name());
            print_header(now, &greeting, style);
            println!();
            print_stats(&TaskStats::collect(app.tasks()), style);
            println!();
            print_selected_day(app, style);
        }

        Commands::Completions { .. } => {
            // Handled before storage is opened.
        }

        Commands::Add { title } => match app.add_task(&title)? {
            Some(task) => println!("Added \"{}\"", task.title.trim()),
            None => println!("Nothing to add."),
        },

        Commands::List { day } => {
            select_day(app, &day)?;
            print_selected_day(app, style);
        }

        Commands::Days => {
            print_days(&app.day_groups(), app.selected_day(), app.today(), style);
        }

        Commands::View { task, day } => {
            select_day(app, &day)?;
            let id = require_task(app, &task)?;
            if let Some(task) = app.tasks().iter().find(|t| t.id == id) {
                print_task_view(task, style);
            }
        }

        Commands::Done { task, day } => change_status(app, &task, &day, TaskStatus::Completed, style)?,
        Commands::Close { task, day } => change_status(app, &task, &day, TaskStatus::Closed, style)?,
        Commands::Reopen { task, day } => change_status(app, &task, &day, TaskStatus::Pending, style)?,
        Commands::Status { task, status, day } => change_status(app, &task, &day, status, style)?,

        Commands::Delete { task, day } => {
            select_day(app, &day)?;
            let id = require_task(app, &task)?;
            if let Some(removed) = app.delete_task(&id)? {
                println!("Deleted \"{}\"", removed.title.trim());
            }
        }

        Commands::Move { task, target, day } => {
            select_day(app, &day)?;
            let id = require_task(app, &task)?;
            let target = drop_target(app, &target)?;
            app.move_task(&id, target)?;
            print_selected_day(app, style);
        }

        Commands::Stats { all, day } => {
            let stats = if all {
                TaskStats::collect(app.tasks())
            } else {
                select_day(app, &day)?;
                TaskStats::collect(app.displayed_tasks())
            };
            print_stats(&stats, style);
        }

        Commands::Note { command } => match command {
            NoteCommands::Add { content } => match app.add_note(&content)? {
                Some(_) => println!("Saved note."),
                None => println!("Nothing to save."),
            },
            NoteCommands::List => print_notes(app.notes(), style),
            NoteCommands::Delete { note } => {
                let Some(id) = app.resolve_note(&note) else {
                    bail!("no note matches '{note}'");
                };
                if app.delete_note(&id)?.is_some() {
                    println!("Deleted note.");
                }
            }
        },

        Commands::Theme { mode } => {
            let dark = match mode {
                None => app.prefs().dark_mode(),
                Some(ThemeMode::Toggle) => app.toggle_theme()?,
                Some(ThemeMode::Dark) => {
                    app.set_theme(true)?;
                    true
                }
                Some(ThemeMode::Light) => {
                    app.set_theme(false)?;
                    false
                }
            };
            println!("Theme: {}", if dark { "dark" } else { "light" });
        }

        Commands::Name { name } => {
            if let Some(name) = name {
                if !app.set_user_name(&name)? {
                    println!("Name unchanged.");
                }
            }
            let hour = Local::now().hour();
            println!("{}", greeting(hour, app.prefs().user_name()));
        }
    }

    Ok(())
}

fn select_day(app: &mut App, arg: &DayArg) -> anyhow::Result<()> {
    if let Some(raw) = arg.day.as_deref() {
        let day = parse_day(raw, app.today()).map_err(|e| anyhow::anyhow!("invalid day '{raw}': {e}"))?;
        app.select_day(day);
    }
    Ok(())
}

fn require_task(app: &App, reference: &str) -> anyhow::Result<String> {
    app.resolve_task(reference)
        .with_context(|| format!("no task matches '{reference}' on {}", app.selected_day()))
}

fn drop_target(app: &App, target: &MoveTarget) -> anyhow::Result<DropTarget> {
    if target.top {
        return Ok(DropTarget::Container { edge: Edge::Before });
    }
    if target.bottom {
        return Ok(DropTarget::Container { edge: Edge::After });
    }

    let (reference, edge) = match (target.before.as_deref(), target.after.as_deref()) {
        (Some(reference), _) => (reference, Edge::Before),
        (None, Some(reference)) => (reference, Edge::After),
        (None, None) => bail!("a move needs --before, --after, --top or --bottom"),
    };

    let id = require_task(app, reference)?;
    let index = app
        .displayed_tasks()
        .iter()
        .position(|t| t.id == id)
        .with_context(|| format!("task '{reference}' is not on {}", app.selected_day()))?;
    Ok(DropTarget::Item { index, edge })
}

fn change_status(
    app: &mut App,
    reference: &str,
    day: &DayArg,
    status: TaskStatus,
    style: Style,
) -> anyhow::Result<()> {
    select_day(app, day)?;
    let id = require_task(app, reference)?;
    let change = app.set_status(&id, status)?;
    if change.found {
        if let Some(task) = app.tasks().iter().find(|t| t.id == id) {
            println!("\"{}\" is now {status}", task.title.trim());
        }
    }
    if change.celebrate {
        print_celebration(style);
    }
    Ok(())
}

fn print_selected_day(app: &App, style: Style) {
    print_day_tasks(app.selected_day(), app.today(), &app.displayed_tasks(), style);
}
