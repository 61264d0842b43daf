use crate::model::Task;

pub fn all_completed<'a, I>(tasks: I) -> bool
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut any = false;
    for task in tasks {
        if !task.is_completed() {
            return false;
        }
        any = true;
    }
    any
}

/// Fires once each time the displayed tasks become all completed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Celebration {
    all_done: bool,
}

impl Celebration {
    /// Starts from what is already on screen, so an already finished list does not fire.
    pub fn seeded<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        Self {
            all_done: all_completed(tasks),
        }
    }

    /// Feeds the displayed set after a status change. Returns true when the effect should fire.
    pub fn observe<'a, I>(&mut self, tasks: I) -> bool
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let now_done = all_completed(tasks);
        let fire = now_done && !self.all_done;
        self.all_done = now_done;
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use chrono::Utc;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fires_once_per_transition() {
        let mut tasks = vec![
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::Completed),
        ];
        let mut celebration = Celebration::seeded(&tasks);

        tasks[0].status = TaskStatus::Completed;
        assert!(celebration.observe(&tasks));
        assert!(!celebration.observe(&tasks));

        tasks[1].status = TaskStatus::Closed;
        assert!(!celebration.observe(&tasks));

        tasks[1].status = TaskStatus::Completed;
        assert!(celebration.observe(&tasks));
    }

    #[test]
    fn empty_set_never_fires() {
        let mut celebration = Celebration::default();
        assert!(!celebration.observe(&[]));
    }

    #[test]
    fn seeded_with_finished_list_stays_quiet() {
        let tasks = vec![task("a", TaskStatus::Completed)];
        let mut celebration = Celebration::seeded(&tasks);
        assert!(!celebration.observe(&tasks));
    }
}
