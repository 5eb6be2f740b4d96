/*
[INPUT]:  Task lists decoded from successful list queries
[OUTPUT]: Last applied snapshot, swapped whole
[POS]:    Sync layer - authoritative in-memory task cache
[UPDATE]: When snapshot shape or lookup helpers change
*/

use std::collections::HashSet;

use grabdeck_adapter::Task;

/// Complete task set returned by one successful list query, in service order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    tasks: Vec<Task>,
}

impl Snapshot {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.tasks.iter().map(|task| task.id.as_str()).collect()
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

impl From<Vec<Task>> for Snapshot {
    fn from(tasks: Vec<Task>) -> Self {
        Self::new(tasks)
    }
}

/// Holds the latest snapshot. Only whole snapshots are accepted.
#[derive(Debug, Default)]
pub struct TaskStore {
    current: Snapshot,
    generation: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in `snapshot`, returning the one it supersedes
    pub fn replace(&mut self, snapshot: Snapshot) -> Snapshot {
        self.generation += 1;
        std::mem::replace(&mut self.current, snapshot)
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Number of snapshots applied so far
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grabdeck_adapter::TaskStatus;

    #[test]
    fn replace_returns_previous_snapshot() {
        let mut store = TaskStore::new();
        assert!(store.current().is_empty());
        assert_eq!(store.generation(), 0);

        let first = Snapshot::new(vec![Task::new("a", TaskStatus::Pending)]);
        let previous = store.replace(first.clone());
        assert!(previous.is_empty());
        assert_eq!(store.current(), &first);

        let second = Snapshot::new(vec![Task::new("b", TaskStatus::Downloading)]);
        let previous = store.replace(second);
        assert_eq!(previous, first);
        assert_eq!(store.generation(), 2);
        assert!(store.current().get("a").is_none());
        assert!(store.current().get("b").is_some());
    }

    #[test]
    fn ids_follow_snapshot() {
        let snapshot = Snapshot::from(vec![
            Task::new("a", TaskStatus::Pending),
            Task::new("b", TaskStatus::Paused),
        ]);
        let ids = snapshot.ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
    }
}
