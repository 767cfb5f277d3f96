//! # holdem-table: async table sessions
//!
//! Runs [`holdem_engine`] tables for one human against computer seats.
//! Each table is an actor task owning its engine; clients talk to it through
//! a [`TableHandle`] and watch it through the [`EventBus`].
//!
//! - [`session`] - table actor, turn timer, AI pacing and settlement
//! - [`manager`] - registry of running tables
//! - [`ledger`] - external bankroll the human plays from
//! - [`snapshot`] - player-facing view of a table
//! - [`events`] - event fan-out to subscribers
//! - [`settings`] - table settings, TOML and environment loading
//! - [`errors`] - error types and severities
//! - [`logging`] - tracing setup
//! - [`input`] - typed command parsing for the terminal client

pub mod errors;
pub mod events;
pub mod input;
pub mod ledger;
pub mod logging;
pub mod manager;
pub mod session;
pub mod settings;
pub mod snapshot;

pub use errors::{ErrorSeverity, TableError};
pub use events::{EventBus, EventSubscription, TableEvent, TableId, TableNotice};
pub use ledger::{ChipLedger, InMemoryLedger, LedgerError};
pub use manager::TableManager;
pub use session::{open_table, SeatedUser, TableHandle};
pub use settings::TableSettings;
pub use snapshot::{SeatView, TableSnapshot};
