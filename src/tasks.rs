use std::rc::Rc;

use anyhow::{Context, ensure};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::model::{Task, TaskStatus};
use crate::storage::{Storage, TASKS_KEY, load_json, save_json};
use crate::util::{is_blank, next_id};

/// Ordered task list, newest first, written back to storage after every change.
pub struct TaskStore {
    storage: Rc<dyn Storage>,
    tasks: Vec<Task>,
}

impl TaskStore {
    #[tracing::instrument(skip(storage))]
    pub fn load(storage: Rc<dyn Storage>) -> anyhow::Result<Self> {
        let tasks: Vec<Task> = load_json(storage.as_ref(), TASKS_KEY).context("failed to load tasks")?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(Self { storage, tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, title: &str) -> anyhow::Result<Option<&Task>> {
        self.add_at(title, Utc::now())
    }

    #[tracing::instrument(skip(self, title))]
    pub fn add_at(&mut self, title: &str, now: DateTime<Utc>) -> anyhow::Result<Option<&Task>> {
        if is_blank(title) {
            debug!("ignoring blank task title");
            return Ok(None);
        }

        let id = next_id(now, self.tasks.iter().map(|t| t.id.as_str()));
        self.tasks.insert(
            0,
            Task {
                id,
                title: title.to_string(),
                status: TaskStatus::Pending,
                created_at: now,
            },
        );
        self.commit()?;
        info!(id = %self.tasks[0].id, "added task");
        Ok(self.tasks.first())
    }

    /// Returns false when no task has `id`.
    #[tracing::instrument(skip(self))]
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> anyhow::Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!("no task with that id");
            return Ok(false);
        };
        task.status = status;
        self.commit()?;
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> anyhow::Result<Option<Task>> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            debug!("no task with that id");
            return Ok(None);
        };
        let removed = self.tasks.remove(pos);
        self.commit()?;
        Ok(Some(removed))
    }

    /// Replaces the whole order. `new_order` must name exactly the current tasks,
    /// counting repeated ids. Records are taken from the store, so only positions change.
    #[tracing::instrument(skip(self, new_order), fields(count = new_order.len()))]
    pub fn reorder(&mut self, new_order: Vec<Task>) -> anyhow::Result<()> {
        ensure!(
            new_order.len() == self.tasks.len(),
            "new order has {} tasks, store has {}",
            new_order.len(),
            self.tasks.len()
        );

        let mut used = vec![false; self.tasks.len()];
        let mut picked = Vec::with_capacity(new_order.len());
        for wanted in &new_order {
            let index = pick_unused(&self.tasks, &used, wanted)
                .with_context(|| format!("new order lists task {} more often than the store", wanted.id))?;
            used[index] = true;
            picked.push(index);
        }

        self.tasks = picked.into_iter().map(|i| self.tasks[i].clone()).collect();
        self.commit()
    }

    pub fn prune_older_than(&mut self, days: u32) -> anyhow::Result<usize> {
        self.prune_older_than_at(days, Utc::now())
    }

    /// Drops tasks created strictly before `now - days`. Returns how many went away.
    #[tracing::instrument(skip(self))]
    pub fn prune_older_than_at(&mut self, days: u32, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let cutoff = now - Duration::days(i64::from(days));
        let before = self.tasks.len();
        self.tasks.retain(|t| t.created_at >= cutoff);
        let removed = before - self.tasks.len();

        if removed > 0 {
            info!(removed, %cutoff, "pruned old tasks");
            self.commit()?;
        }
        Ok(removed)
    }

    fn commit(&self) -> anyhow::Result<()> {
        save_json(self.storage.as_ref(), TASKS_KEY, &self.tasks).context("failed to save tasks")
    }
}

/// First unused stored task with `wanted`'s id, preferring an identical record
/// so repeated ids keep their own title and status.
fn pick_unused(tasks: &[Task], used: &[bool], wanted: &Task) -> Option<usize> {
    let mut same_id = tasks
        .iter()
        .enumerate()
        .filter(|&(i, t)| !used[i] && t.id == wanted.id);
    let (first, task) = same_id.next()?;
    if task == wanted {
        return Some(first);
    }
    same_id
        .find(|&(_, t)| t == wanted)
        .map(|(i, _)| i)
        .or(Some(first))
}
