/*
[INPUT]:  TaskService, a TaskView, console configuration
[OUTPUT]: Single-owner event loop tying poller, store, reconciler and notifier together
[POS]:    Sync layer - engine entry point used by the TUI and headless modes
[UPDATE]: When a new event kind or engine accessor is added
*/

use std::sync::Arc;

use chrono::{DateTime, Local};
use grabdeck_adapter::{ClientError, Task, TaskService};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ConsoleConfig;
use crate::dispatch::{Confirm, Dispatcher};
use crate::notify::{Notification, Notifier};
use crate::poller::Poller;
use crate::reconcile::{PassStats, Reconciler};
use crate::store::{Snapshot, TaskStore};
use crate::view::TaskView;

/// Everything that reaches the engine loop from spawned work
#[derive(Debug)]
pub enum EngineEvent {
    /// A list fetch finished
    Snapshot {
        seq: u64,
        result: Result<Vec<Task>, ClientError>,
    },
    /// Fetch now, outside the periodic cadence
    Poke,
    Notify(Notification),
}

enum Wake {
    Tick,
    Event(EngineEvent),
}

/// Owns the store, the view and the notifier. Nothing else mutates them.
pub struct Engine<V: TaskView> {
    service: Arc<dyn TaskService>,
    store: TaskStore,
    reconciler: Reconciler<V>,
    poller: Poller,
    notifier: Notifier,
    events_tx: UnboundedSender<EngineEvent>,
    events_rx: UnboundedReceiver<EngineEvent>,
    settle_delay: std::time::Duration,
    last_sync: Option<DateTime<Local>>,
    poll_failures: u64,
}

impl<V: TaskView> Engine<V> {
    /// Must be called inside a tokio runtime
    pub fn new(service: Arc<dyn TaskService>, view: V, config: &ConsoleConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let poller = Poller::new(
            Arc::clone(&service),
            events_tx.clone(),
            config.sync.poll_interval(),
        );
        Self {
            service,
            store: TaskStore::new(),
            reconciler: Reconciler::new(view),
            poller,
            notifier: Notifier::new(
                config.notifications.display(),
                config.notifications.exit(),
            ),
            events_tx,
            events_rx,
            settle_delay: config.sync.start_settle(),
            last_sync: None,
            poll_failures: 0,
        }
    }

    /// Dispatcher wired to this engine's channel and service
    pub fn dispatcher(&self, confirm: Arc<dyn Confirm>) -> Dispatcher {
        Dispatcher::new(
            Arc::clone(&self.service),
            self.events_tx.clone(),
            confirm,
            self.settle_delay,
        )
    }

    /// Sender for code that needs to notify or poke from elsewhere
    pub fn events(&self) -> UnboundedSender<EngineEvent> {
        self.events_tx.clone()
    }

    pub fn poke_now(&mut self) -> Option<u64> {
        self.poller.poke_now()
    }

    /// Wait for one periodic tick or one event and handle it.
    ///
    /// Cancel-safe: dropping the future before it resolves loses nothing.
    pub async fn step(&mut self) -> Option<PassStats> {
        let wake = tokio::select! {
            _ = self.poller.tick() => Wake::Tick,
            Some(event) = self.events_rx.recv() => Wake::Event(event),
        };

        match wake {
            Wake::Tick => {
                self.poller.poke_now();
                None
            }
            Wake::Event(event) => self.handle_event(event),
        }
    }

    /// Apply one event; returns pass counters when a snapshot was applied
    pub fn handle_event(&mut self, event: EngineEvent) -> Option<PassStats> {
        match event {
            EngineEvent::Snapshot { seq, result } => {
                if !self.poller.accepts(seq) {
                    debug!(seq, latest = self.poller.latest_seq(), "stale fetch result discarded");
                    return None;
                }
                match result {
                    Ok(tasks) => Some(self.apply(Snapshot::new(tasks))),
                    Err(err) => {
                        self.poll_failures += 1;
                        warn!(seq, error = %err, "task list fetch failed, skipping cycle");
                        None
                    }
                }
            }
            EngineEvent::Poke => {
                self.poller.poke_now();
                None
            }
            EngineEvent::Notify(notification) => {
                debug!(severity = %notification.severity, message = %notification.message, "notification");
                self.notifier.notify(notification);
                None
            }
        }
    }

    fn apply(&mut self, snapshot: Snapshot) -> PassStats {
        let count = snapshot.len();
        self.store.replace(snapshot);
        let stats = self.reconciler.apply(self.store.current());
        self.last_sync = Some(Local::now());
        if stats.created + stats.removed + stats.rebuilt > 0 {
            info!(
                count,
                created = stats.created,
                rebuilt = stats.rebuilt,
                removed = stats.removed,
                "snapshot applied"
            );
        } else {
            debug!(count, "snapshot applied");
        }
        stats
    }

    /// Run headless until `shutdown` fires
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("sync engine started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = self.step() => {}
            }
        }
        self.shutdown();
    }

    /// Stop the timer; late fetch results become no-ops
    pub fn shutdown(&mut self) {
        if self.poller.is_running() {
            self.poller.stop();
            info!("sync engine stopped");
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn reconciler(&self) -> &Reconciler<V> {
        &self.reconciler
    }

    pub fn view(&self) -> &V {
        self.reconciler.view()
    }

    pub fn view_mut(&mut self) -> &mut V {
        self.reconciler.view_mut()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn last_sync(&self) -> Option<DateTime<Local>> {
        self.last_sync
    }

    pub fn poll_failures(&self) -> u64 {
        self.poll_failures
    }
}
