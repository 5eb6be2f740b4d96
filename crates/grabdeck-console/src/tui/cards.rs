/*
[INPUT]:  View mutations from the Reconciler
[OUTPUT]: Persistent card models rendered by ui::cards, selection and action focus
[POS]:    TUI view model - TaskView implementation for the terminal
[UPDATE]: When a card shows a new field or gains interaction state
*/

use grabdeck_adapter::{Task, TaskStatus};
use grabdeck_console::{ActionKind, TaskView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CardHandle(u64);

/// One rendered task card. Fields are only touched by the matching patch.
#[derive(Debug, Clone)]
pub(crate) struct Card {
    key: u64,
    pub(crate) task_id: String,
    pub(crate) url: Option<String>,
    pub(crate) title: String,
    pub(crate) file_size: String,
    pub(crate) thumbnail: Option<String>,
    pub(crate) status: TaskStatus,
    pub(crate) progress: f64,
    pub(crate) speed: String,
    pub(crate) eta: String,
    pub(crate) downloaded: Option<String>,
    pub(crate) actions: Vec<ActionKind>,
    pub(crate) focused_action: usize,
    pub(crate) output_file: Option<String>,
    pub(crate) error: Option<String>,
}

impl Card {
    pub(crate) fn focused(&self) -> Option<ActionKind> {
        self.actions.get(self.focused_action).copied()
    }
}

#[derive(Debug, Default)]
pub(crate) struct CardView {
    cards: Vec<Card>,
    next_key: u64,
    summary: Option<usize>,
    selected: usize,
}

impl CardView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// `None` until the first reconciliation pass
    pub(crate) fn summary(&self) -> Option<usize> {
        self.summary
    }

    pub(crate) fn selected_index(&self) -> Option<usize> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.selected.min(self.cards.len() - 1))
        }
    }

    pub(crate) fn selected(&self) -> Option<&Card> {
        self.selected_index().map(|index| &self.cards[index])
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        if self.cards.is_empty() {
            self.selected = 0;
            return;
        }
        let last = (self.cards.len() - 1) as isize;
        let current = self.selected.min(self.cards.len() - 1) as isize;
        self.selected = (current + delta).clamp(0, last) as usize;
    }

    pub(crate) fn move_action_focus(&mut self, delta: isize) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let card = &mut self.cards[index];
        if card.actions.is_empty() {
            return;
        }
        let last = (card.actions.len() - 1) as isize;
        card.focused_action = (card.focused_action as isize + delta).clamp(0, last) as usize;
    }

    fn card_mut(&mut self, handle: &CardHandle) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.key == handle.0)
    }
}

impl TaskView for CardView {
    type Handle = CardHandle;

    fn create_entry(&mut self, task: &Task, actions: &[ActionKind]) -> CardHandle {
        self.next_key += 1;
        let key = self.next_key;
        self.cards.push(Card {
            key,
            task_id: task.id.clone(),
            url: task.url.clone(),
            title: task.title.clone(),
            file_size: task.file_size.clone(),
            thumbnail: task.thumbnail.clone(),
            status: task.status,
            progress: task.progress_percent(),
            speed: task.speed.clone(),
            eta: task.eta.clone(),
            downloaded: task.downloaded_size.clone(),
            actions: actions.to_vec(),
            focused_action: 0,
            output_file: task.output_file.clone(),
            error: task.error_message.clone(),
        });
        CardHandle(key)
    }

    fn patch_status(&mut self, handle: &CardHandle, task: &Task) {
        if let Some(card) = self.card_mut(handle) {
            card.status = task.status;
        }
    }

    fn patch_details(&mut self, handle: &CardHandle, task: &Task) {
        if let Some(card) = self.card_mut(handle) {
            card.title = task.title.clone();
            card.file_size = task.file_size.clone();
            card.thumbnail = task.thumbnail.clone();
        }
    }

    fn patch_progress(&mut self, handle: &CardHandle, task: &Task) {
        if let Some(card) = self.card_mut(handle) {
            card.progress = task.progress_percent();
        }
    }

    fn patch_transfer(&mut self, handle: &CardHandle, task: &Task) {
        if let Some(card) = self.card_mut(handle) {
            card.speed = task.speed.clone();
            card.eta = task.eta.clone();
            card.downloaded = task.downloaded_size.clone();
        }
    }

    fn rebuild_actions(&mut self, handle: &CardHandle, task: &Task, actions: &[ActionKind]) {
        if let Some(card) = self.card_mut(handle) {
            card.actions = actions.to_vec();
            card.focused_action = 0;
            card.output_file = task.output_file.clone();
        }
    }

    fn set_error_panel(&mut self, handle: &CardHandle, message: Option<&str>) {
        if let Some(card) = self.card_mut(handle) {
            card.error = message.map(str::to_string);
        }
    }

    fn destroy_entry(&mut self, handle: CardHandle) {
        if let Some(pos) = self.cards.iter().position(|card| card.key == handle.0) {
            self.cards.remove(pos);
            if pos < self.selected {
                self.selected -= 1;
            }
        }
    }

    fn set_summary(&mut self, count: usize) {
        self.summary = Some(count);
    }
}
