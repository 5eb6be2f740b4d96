/*
[INPUT]:  Snapshots accepted by the engine, a TaskView implementation
[OUTPUT]: Minimal view mutations bringing the view in line with the snapshot
[POS]:    Sync layer - incremental reconciliation
[UPDATE]: When a card sub-region gains its own change detection
*/

use std::collections::{HashMap, HashSet};

use grabdeck_adapter::{Task, TaskStatus};
use tracing::{debug, warn};

use crate::store::Snapshot;
use crate::view::{TaskView, actions_for};

/// Counters for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub created: usize,
    pub patched: usize,
    pub rebuilt: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Details {
    title: String,
    file_size: String,
    thumbnail: Option<String>,
}

impl Details {
    fn of(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            file_size: task.file_size.clone(),
            thumbnail: task.thumbnail.clone(),
        }
    }
}

/// What the view currently shows for one task id
struct ViewEntry<H> {
    handle: H,
    status: TaskStatus,
    error: Option<String>,
    details: Details,
}

/// Owns the id -> view entry map and drives the view from snapshots
pub struct Reconciler<V: TaskView> {
    view: V,
    entries: HashMap<String, ViewEntry<V::Handle>>,
    shown_count: Option<usize>,
}

impl<V: TaskView> Reconciler<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            entries: HashMap::new(),
            shown_count: None,
        }
    }

    /// Apply `snapshot` to the view.
    ///
    /// After return the set of entry ids equals the set of ids in `snapshot`.
    /// A repeated id keeps its first occurrence.
    pub fn apply(&mut self, snapshot: &Snapshot) -> PassStats {
        let mut stats = PassStats::default();
        let mut seen: HashSet<&str> = HashSet::with_capacity(snapshot.len());

        for task in snapshot.iter() {
            if !seen.insert(task.id.as_str()) {
                warn!(task_id = %task.id, "duplicate task id in snapshot, ignoring repeat");
                continue;
            }

            match self.entries.get_mut(&task.id) {
                Some(entry) => {
                    if patch_entry(&mut self.view, entry, task) {
                        stats.rebuilt += 1;
                    }
                    stats.patched += 1;
                }
                None => {
                    let actions = actions_for(task);
                    let handle = self.view.create_entry(task, &actions);
                    debug!(task_id = %task.id, status = %task.status, "view entry created");
                    self.entries.insert(
                        task.id.clone(),
                        ViewEntry {
                            handle,
                            status: task.status,
                            error: task.error_message.clone(),
                            details: Details::of(task),
                        },
                    );
                    stats.created += 1;
                }
            }
        }

        let gone: Vec<String> = self
            .entries
            .keys()
            .filter(|id| !seen.contains(id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            if let Some(entry) = self.entries.remove(&id) {
                self.view.destroy_entry(entry.handle);
                debug!(task_id = %id, "view entry removed");
                stats.removed += 1;
            }
        }

        let count = self.entries.len();
        if self.shown_count != Some(count) {
            self.view.set_summary(count);
            self.shown_count = Some(count);
        }

        stats
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.entries.contains_key(task_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

/// Patch an existing entry; returns whether the action set was rebuilt
fn patch_entry<V: TaskView>(view: &mut V, entry: &mut ViewEntry<V::Handle>, task: &Task) -> bool {
    let status_changed = entry.status != task.status;
    if status_changed {
        debug!(
            task_id = %task.id,
            from = %entry.status,
            to = %task.status,
            "status changed"
        );
        view.patch_status(&entry.handle, task);
        view.rebuild_actions(&entry.handle, task, &actions_for(task));
        entry.status = task.status;
    }

    let details = Details::of(task);
    if entry.details != details {
        view.patch_details(&entry.handle, task);
        entry.details = details;
    }

    view.patch_progress(&entry.handle, task);
    view.patch_transfer(&entry.handle, task);

    if entry.error != task.error_message {
        view.set_error_panel(&entry.handle, task.error_message.as_deref());
        entry.error = task.error_message.clone();
    }

    status_changed
}
