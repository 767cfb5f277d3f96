//! Error types for table sessions.
//!
//! Player mistakes and infrastructure failures share one enum; callers use
//! [`TableError::severity`] to decide how loudly to report them and
//! [`TableError::to_response`] to hand them back to a client.
use holdem_engine::errors::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::events::TableId;
use crate::ledger::LedgerError;
use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Illegal action: {0}")]
    IllegalAction(String),
    #[error("It's not your turn")]
    NotYourTurn,
    #[error("Table is closed")]
    TableClosed,
    #[error("Table is over")]
    TableOver,
    #[error("Table not found: {0}")]
    NotFound(TableId),
    #[error("Balance unavailable: {0}")]
    BalanceUnavailable(#[source] LedgerError),
    #[error("Insufficient balance: {balance} chips, at least {required} required")]
    InsufficientBalance { balance: u64, required: u64 },
    #[error("Game engine error: {0}")]
    Engine(GameError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Table storage poisoned")]
    StoragePoisoned,
}

impl From<GameError> for TableError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::TableOver => TableError::TableOver,
            GameError::NotPlayersTurn { .. } | GameError::NoHandInProgress => {
                TableError::NotYourTurn
            }
            e if e.is_illegal_action() => TableError::IllegalAction(e.to_string()),
            e => TableError::Engine(e),
        }
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Expected during normal play, caused by the player.
    Client,
    /// Unexpected, needs investigation.
    Server,
    /// Table state can no longer be trusted.
    Critical,
}

impl TableError {
    /// Machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            TableError::IllegalAction(_) => "illegal_action",
            TableError::NotYourTurn => "not_your_turn",
            TableError::TableClosed => "table_closed",
            TableError::TableOver => "table_over",
            TableError::NotFound(_) => "table_not_found",
            TableError::BalanceUnavailable(_) => "balance_unavailable",
            TableError::InsufficientBalance { .. } => "insufficient_balance",
            TableError::Engine(_) => "engine_error",
            TableError::Settings(_) => "invalid_settings",
            TableError::StoragePoisoned => "storage_poisoned",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TableError::Engine(GameError::DeckExhausted) | TableError::StoragePoisoned => {
                ErrorSeverity::Critical
            }
            TableError::Engine(_) | TableError::BalanceUnavailable(_) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }

    /// Emits the error at a level matching its severity.
    pub fn log(&self) {
        match self.severity() {
            ErrorSeverity::Client => tracing::info!(code = self.error_code(), error = %self, "client error"),
            ErrorSeverity::Server => tracing::error!(code = self.error_code(), error = %self, "server error"),
            ErrorSeverity::Critical => {
                tracing::error!(code = self.error_code(), error = %self, critical = true, "critical error")
            }
        }
    }
}

/// Error payload handed back to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "not_your_turn")
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}
