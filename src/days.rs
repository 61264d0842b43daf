use std::collections::BTreeMap;

use anyhow::ensure;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::model::{SpliceMode, Task};

pub fn day_key<Tz: TimeZone>(created_at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    created_at.with_timezone(tz).date_naive()
}

/// Tasks bucketed by the calendar day they were created on, in store order.
#[derive(Debug, Default)]
pub struct DayGroups<'a> {
    buckets: BTreeMap<NaiveDate, Vec<&'a Task>>,
}

impl<'a> DayGroups<'a> {
    pub fn build<Tz: TimeZone>(tasks: &'a [Task], tz: &Tz) -> Self {
        let mut buckets: BTreeMap<NaiveDate, Vec<&'a Task>> = BTreeMap::new();
        for task in tasks {
            buckets
                .entry(day_key(&task.created_at, tz))
                .or_default()
                .push(task);
        }
        Self { buckets }
    }

    /// Day keys, most recent first.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.buckets.keys().rev().copied().collect()
    }

    pub fn tasks_on(&self, day: NaiveDate) -> &[&'a Task] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Task])> {
        self.buckets
            .iter()
            .rev()
            .map(|(day, tasks)| (*day, tasks.as_slice()))
    }
}

/// Day the user is looking at. Lives for one session only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DaySelection {
    selected: NaiveDate,
    today: NaiveDate,
}

impl DaySelection {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected: today,
            today,
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn select(&mut self, day: NaiveDate) {
        self.selected = day;
    }

    /// New tasks can only be added while today is selected.
    pub fn accepts_new_tasks(&self) -> bool {
        self.selected == self.today
    }
}

/// Writes a reordered day subsequence back into the full task order.
pub fn splice_day_order<Tz: TimeZone>(
    all: &[Task],
    day: NaiveDate,
    reordered_day: Vec<Task>,
    tz: &Tz,
    mode: SpliceMode,
) -> anyhow::Result<Vec<Task>> {
    let on_day = |task: &Task| day_key(&task.created_at, tz) == day;

    let mut current: Vec<&str> = all
        .iter()
        .filter(|t| on_day(*t))
        .map(|t| t.id.as_str())
        .collect();
    let mut incoming: Vec<&str> = reordered_day.iter().map(|t| t.id.as_str()).collect();
    current.sort_unstable();
    incoming.sort_unstable();
    ensure!(current == incoming, "reordered tasks do not match the tasks of {day}");

    let out = match mode {
        SpliceMode::Append => {
            let mut out = reordered_day;
            out.extend(all.iter().filter(|t| !on_day(*t)).cloned());
            out
        }
        SpliceMode::InPlace => {
            let mut replacements = reordered_day.into_iter();
            let mut out = Vec::with_capacity(all.len());
            for task in all {
                if on_day(task) {
                    if let Some(next) = replacements.next() {
                        out.push(next);
                    }
                } else {
                    out.push(task.clone());
                }
            }
            out
        }
    };

    Ok(out)
}
