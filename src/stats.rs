use crate::model::{Task, TaskStatus};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub closed: usize,
}

impl TaskStats {
    pub fn collect<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut stats = TaskStats::default();
        for task in tasks {
            stats.total += 1;
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Closed => stats.closed += 1,
            }
        }
        stats
    }

    /// Completed share in whole percent, rounded half up.
    pub fn progress(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 200 + self.total) / (self.total * 2)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn with_statuses(statuses: &[TaskStatus]) -> Vec<Task> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Task {
                id: i.to_string(),
                title: format!("task {i}"),
                status: *status,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn counts_each_status() {
        let tasks = with_statuses(&[
            TaskStatus::Pending,
            TaskStatus::Completed,
            TaskStatus::Completed,
            TaskStatus::Closed,
        ]);
        let stats = TaskStats::collect(&tasks);
        assert_eq!(
            stats,
            TaskStats {
                total: 4,
                pending: 1,
                completed: 2,
                closed: 1
            }
        );
        assert_eq!(stats.progress(), 50);
    }

    #[test]
    fn progress_rounds_like_the_dashboard() {
        let tasks = with_statuses(&[TaskStatus::Completed, TaskStatus::Pending, TaskStatus::Pending]);
        assert_eq!(TaskStats::collect(&tasks).progress(), 33);

        let tasks = with_statuses(&[TaskStatus::Completed, TaskStatus::Completed, TaskStatus::Pending]);
        assert_eq!(TaskStats::collect(&tasks).progress(), 67);

        assert_eq!(TaskStats::default().progress(), 0);
    }
}
