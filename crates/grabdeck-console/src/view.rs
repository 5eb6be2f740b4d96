/*
[INPUT]:  Tasks from the applied snapshot
[OUTPUT]: View mutation seam driven by the Reconciler
[POS]:    Sync layer - boundary between reconciliation and rendering
[UPDATE]: When a card gains a sub-region that is patched independently
*/

use grabdeck_adapter::{Task, TaskStatus};

/// Control offered on a task card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Pause,
    Resume,
    Cancel,
    OpenFolder,
}

/// Controls a task offers in its current status.
///
/// Open-folder is only offered once the service reported where the output
/// went.
pub fn actions_for(task: &Task) -> Vec<ActionKind> {
    match task.status {
        TaskStatus::Downloading => vec![ActionKind::Pause, ActionKind::Cancel],
        TaskStatus::Paused => vec![ActionKind::Resume, ActionKind::Cancel],
        TaskStatus::Pending => vec![ActionKind::Cancel],
        TaskStatus::Completed if task.output_file.is_some() => vec![ActionKind::OpenFolder],
        TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled => Vec::new(),
    }
}

/// Persistent rendering surface mutated by the Reconciler.
///
/// Every method touches exactly one sub-region of one entry, so an
/// implementation can keep transient state (focus, selection) in the others.
/// Handles are owned by the Reconciler; the view only ever sees them lent.
pub trait TaskView {
    type Handle;

    /// Full render of a new entry, appended after every existing one
    fn create_entry(&mut self, task: &Task, actions: &[ActionKind]) -> Self::Handle;

    /// Status label, icon and style
    fn patch_status(&mut self, handle: &Self::Handle, task: &Task);

    /// Title, file size and thumbnail
    fn patch_details(&mut self, handle: &Self::Handle, task: &Task);

    /// Progress bar width and percentage text
    fn patch_progress(&mut self, handle: &Self::Handle, task: &Task);

    /// Speed and eta
    fn patch_transfer(&mut self, handle: &Self::Handle, task: &Task);

    /// Replace the action-button set
    fn rebuild_actions(&mut self, handle: &Self::Handle, task: &Task, actions: &[ActionKind]);

    /// Show the error panel with `message`, or hide it on `None`
    fn set_error_panel(&mut self, handle: &Self::Handle, message: Option<&str>);

    /// Detach and drop an entry
    fn destroy_entry(&mut self, handle: Self::Handle);

    /// Task count and empty-state indicator
    fn set_summary(&mut self, count: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_by_status() {
        let mut task = Task::new("a", TaskStatus::Downloading);
        assert_eq!(actions_for(&task), vec![ActionKind::Pause, ActionKind::Cancel]);

        task.status = TaskStatus::Paused;
        assert_eq!(actions_for(&task), vec![ActionKind::Resume, ActionKind::Cancel]);

        task.status = TaskStatus::Pending;
        assert_eq!(actions_for(&task), vec![ActionKind::Cancel]);

        task.status = TaskStatus::Failed;
        assert!(actions_for(&task).is_empty());

        task.status = TaskStatus::Cancelled;
        assert!(actions_for(&task).is_empty());
    }

    #[test]
    fn open_folder_needs_output_path() {
        let mut task = Task::new("a", TaskStatus::Completed);
        assert!(actions_for(&task).is_empty());

        task.output_file = Some("/data/videos".to_string());
        assert_eq!(actions_for(&task), vec![ActionKind::OpenFolder]);
    }
}
