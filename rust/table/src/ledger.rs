//! External chip bankroll for the human player.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("delta {delta} rejected for balance {balance}")]
    Rejected { balance: u64, delta: i64 },
}

/// Bankroll store a table reads at open and settles into after every hand.
///
/// Implementations may be slow or fail; tables never wait on a settlement
/// before dealing the next hand.
pub trait ChipLedger: Send + Sync + 'static {
    fn fetch_balance(&self, user_id: &str) -> impl Future<Output = Result<u64, LedgerError>> + Send;

    /// Applies `delta` and returns the new balance.
    fn apply_chip_delta(
        &self,
        user_id: &str,
        delta: i64,
    ) -> impl Future<Output = Result<u64, LedgerError>> + Send;
}

/// Process-local ledger used by the command-line client and tests.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<String, u64>>,
    applied: Mutex<Vec<(String, i64)>>,
    failures_left: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(user_id: impl Into<String>, balance: u64) -> Self {
        let ledger = Self::new();
        ledger.set_balance(user_id, balance);
        ledger
    }

    pub fn set_balance(&self, user_id: impl Into<String>, balance: u64) {
        self.balances
            .lock()
            .expect("ledger lock poisoned")
            .insert(user_id.into(), balance);
    }

    pub fn balance(&self, user_id: &str) -> Option<u64> {
        self.balances
            .lock()
            .expect("ledger lock poisoned")
            .get(user_id)
            .copied()
    }

    /// Makes the next `count` settlement attempts fail.
    pub fn fail_next_settlements(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Deltas that were applied, oldest first.
    pub fn applied_deltas(&self) -> Vec<(String, i64)> {
        self.applied.lock().expect("ledger lock poisoned").clone()
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl ChipLedger for InMemoryLedger {
    async fn fetch_balance(&self, user_id: &str) -> Result<u64, LedgerError> {
        self.balance(user_id)
            .ok_or_else(|| LedgerError::UnknownUser(user_id.to_string()))
    }

    async fn apply_chip_delta(&self, user_id: &str, delta: i64) -> Result<u64, LedgerError> {
        if self.take_failure() {
            return Err(LedgerError::Unavailable("injected failure".to_string()));
        }
        let mut balances = self.balances.lock().expect("ledger lock poisoned");
        let balance = balances
            .get_mut(user_id)
            .ok_or_else(|| LedgerError::UnknownUser(user_id.to_string()))?;
        let updated = balance
            .checked_add_signed(delta)
            .ok_or(LedgerError::Rejected {
                balance: *balance,
                delta,
            })?;
        *balance = updated;
        drop(balances);
        self.applied
            .lock()
            .expect("ledger lock poisoned")
            .push((user_id.to_string(), delta));
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn applies_signed_deltas() {
        let ledger = InMemoryLedger::with_balance("u", 1_000);
        assert_eq!(ledger.apply_chip_delta("u", -300).await, Ok(700));
        assert_eq!(ledger.apply_chip_delta("u", 50).await, Ok(750));
        assert_eq!(ledger.fetch_balance("u").await, Ok(750));
        assert_eq!(ledger.applied_deltas().len(), 2);
    }

    #[tokio::test]
    async fn rejects_overdraw_and_unknown_users() {
        let ledger = InMemoryLedger::with_balance("u", 100);
        assert_eq!(
            ledger.apply_chip_delta("u", -101).await,
            Err(LedgerError::Rejected {
                balance: 100,
                delta: -101
            })
        );
        assert!(matches!(
            ledger.fetch_balance("nobody").await,
            Err(LedgerError::UnknownUser(_))
        ));
    }

    #[tokio::test]
    async fn injected_failures_run_out() {
        let ledger = InMemoryLedger::with_balance("u", 100);
        ledger.fail_next_settlements(1);
        assert!(ledger.apply_chip_delta("u", 10).await.is_err());
        assert_eq!(ledger.apply_chip_delta("u", 10).await, Ok(110));
    }
}
