use crate::snapshot::TableSnapshot;
use holdem_engine::engine::HandResult;
use holdem_engine::history::ActionKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

pub type TableId = String;

// Slow subscribers lose events instead of stalling the table.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<TableEvent>;
pub type EventReceiver = mpsc::Receiver<TableEvent>;

/// Everything a table reports to the outside world.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    /// Full state as the human player may see it.
    StateChanged {
        table_id: TableId,
        snapshot: TableSnapshot,
    },
    ActionTaken {
        table_id: TableId,
        hand_number: u64,
        seat: usize,
        action: ActionKind,
        timed_out: bool,
    },
    HandCompleted {
        table_id: TableId,
        result: HandResult,
    },
    Notice {
        table_id: TableId,
        notice: TableNotice,
    },
    TableOver {
        table_id: TableId,
        reason: String,
    },
}

impl TableEvent {
    pub fn table_id(&self) -> &TableId {
        match self {
            TableEvent::StateChanged { table_id, .. }
            | TableEvent::ActionTaken { table_id, .. }
            | TableEvent::HandCompleted { table_id, .. }
            | TableEvent::Notice { table_id, .. }
            | TableEvent::TableOver { table_id, .. } => table_id,
        }
    }
}

/// Out-of-band problems the player should hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableNotice {
    /// The bankroll was not updated for a finished hand.
    SettlementFailed {
        hand_number: u64,
        delta: i64,
        message: String,
    },
    HandAborted { hand_number: u64, message: String },
}

pub struct EventSubscription {
    bus: EventBus,
    table_id: TableId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.table_id, self.subscriber_id);
    }
}

/// Fan-out of table events, keyed by table.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<TableId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, table_id: TableId) -> EventSubscription {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let subscriber_id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned")
            .entry(table_id.clone())
            .or_default()
            .push((subscriber_id, tx));

        tracing::debug!(table_id = %table_id, subscriber_id, "subscribed to table events");

        EventSubscription {
            bus: self.clone(),
            table_id,
            subscriber_id,
            receiver: rx,
        }
    }

    pub fn broadcast(&self, table_id: &TableId, event: TableEvent) {
        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .expect("subscriber lock poisoned");
            guard.get(table_id).cloned()
        };

        let Some(list) = subscribers else {
            tracing::trace!(table_id = %table_id, "no subscribers for table");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    table_id = %table_id,
                    subscriber_id = id,
                    error = %e,
                    "dropping table event subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(table_id, &failed);
        }
    }

    pub fn unsubscribe(&self, table_id: &TableId, subscriber_id: usize) {
        self.remove_subscribers(table_id, &[subscriber_id]);
    }

    pub fn drop_table(&self, table_id: &TableId) {
        self.inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned")
            .remove(table_id);
    }

    pub fn subscriber_count(&self) -> usize {
        let guard = self
            .inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned");
        guard.values().map(Vec::len).sum()
    }

    fn remove_subscribers(&self, table_id: &TableId, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        if let Some(list) = guard.get_mut(table_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(table_id);
            }
        }
    }
}
