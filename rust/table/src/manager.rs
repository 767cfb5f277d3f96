use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use holdem_engine::player::PlayerAction;

use crate::errors::TableError;
use crate::events::{EventBus, EventSubscription, TableId};
use crate::ledger::ChipLedger;
use crate::session::{open_table, SeatedUser, TableHandle};
use crate::settings::TableSettings;
use crate::snapshot::TableSnapshot;

/// Registry of running tables sharing one ledger and one event bus.
#[derive(Debug)]
pub struct TableManager<L> {
    tables: RwLock<HashMap<TableId, Arc<TableHandle>>>,
    event_bus: EventBus,
    ledger: Arc<L>,
}

impl<L: ChipLedger> TableManager<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self::with_event_bus(ledger, EventBus::new())
    }

    pub fn with_event_bus(ledger: Arc<L>, event_bus: EventBus) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            event_bus,
            ledger,
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub async fn create_table(
        &self,
        settings: TableSettings,
        user: SeatedUser,
    ) -> Result<TableId, TableError> {
        let handle = open_table(
            settings,
            user,
            Arc::clone(&self.ledger),
            self.event_bus.clone(),
        )
        .await?;
        let id = handle.id().clone();
        self.tables
            .write()
            .map_err(|_| TableError::StoragePoisoned)?
            .insert(id.clone(), Arc::new(handle));
        Ok(id)
    }

    pub fn get_table(&self, id: &TableId) -> Result<Arc<TableHandle>, TableError> {
        let guard = self.tables.read().map_err(|_| TableError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| TableError::NotFound(id.clone()))
    }

    pub async fn act(
        &self,
        id: &TableId,
        action: PlayerAction,
    ) -> Result<TableSnapshot, TableError> {
        self.get_table(id)?.act(action).await
    }

    pub async fn snapshot(&self, id: &TableId) -> Result<TableSnapshot, TableError> {
        self.get_table(id)?.snapshot().await
    }

    pub fn subscribe(&self, id: &TableId) -> Result<EventSubscription, TableError> {
        Ok(self.get_table(id)?.subscribe())
    }

    pub async fn close_table(&self, id: &TableId) -> Result<(), TableError> {
        let handle = self
            .tables
            .write()
            .map_err(|_| TableError::StoragePoisoned)?
            .remove(id)
            .ok_or_else(|| TableError::NotFound(id.clone()))?;
        handle.close().await;
        tracing::info!(table_id = %id, "table removed");
        Ok(())
    }

    pub fn active_tables(&self) -> Vec<TableId> {
        self.tables
            .read()
            .map(|guard| guard.keys().cloned().collect())
            .unwrap_or_default()
    }
}
