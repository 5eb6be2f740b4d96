/*
[INPUT]:  TaskService, poll period, engine event channel
[OUTPUT]: Sequenced snapshot fetches reported as EngineEvent::Snapshot
[POS]:    Sync layer - periodic and on-demand retrieval
[UPDATE]: When fetch scheduling or staleness rules change
*/

use std::sync::Arc;
use std::time::Duration;

use grabdeck_adapter::TaskService;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::engine::EngineEvent;

/// Issues list fetches on a fixed cadence and on demand.
///
/// Every fetch gets the next sequence number. Only the response carrying the
/// latest issued number is accepted; anything older lost the race.
pub struct Poller {
    service: Arc<dyn TaskService>,
    events: UnboundedSender<EngineEvent>,
    interval: Interval,
    issued: u64,
    running: bool,
}

impl Poller {
    /// Must be called inside a tokio runtime. The first tick fires at once,
    /// which doubles as the initial fetch.
    pub fn new(
        service: Arc<dyn TaskService>,
        events: UnboundedSender<EngineEvent>,
        period: Duration,
    ) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            service,
            events,
            interval,
            issued: 0,
            running: true,
        }
    }

    /// Wait for the next periodic deadline
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Fetch right away without moving the periodic phase. Returns the
    /// sequence number of the fetch, or `None` once stopped.
    pub fn poke_now(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.issued += 1;
        let seq = self.issued;
        let service = Arc::clone(&self.service);
        let events = self.events.clone();

        trace!(seq, "fetch issued");
        tokio::spawn(async move {
            let result = service.list_tasks().await;
            if events.send(EngineEvent::Snapshot { seq, result }).is_err() {
                debug!(seq, "engine gone, dropping fetch result");
            }
        });
        Some(seq)
    }

    /// Whether a response tagged `seq` may be applied
    pub fn accepts(&self, seq: u64) -> bool {
        self.running && seq == self.issued
    }

    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop issuing fetches; results still in flight will be rejected
    pub fn stop(&mut self) {
        self.running = false;
    }
}
