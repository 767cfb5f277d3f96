//! One running table: an actor task that owns the engine, the turn timer and
//! the computer seats, driven by commands from a [`TableHandle`].

use std::sync::Arc;

use holdem_ai::{create_ai, AIOpponent};
use holdem_engine::engine::{Engine, HandResult, Progress};
use holdem_engine::errors::GameError;
use holdem_engine::player::{Player, PlayerAction};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::TableError;
use crate::events::{EventBus, EventSubscription, TableEvent, TableId, TableNotice};
use crate::ledger::ChipLedger;
use crate::settings::TableSettings;
use crate::snapshot::TableSnapshot;

const COMMAND_BUFFER: usize = 32;
/// Attempts per hand before a settlement is reported as failed.
const SETTLEMENT_ATTEMPTS: usize = 2;

const AI_NAMES: [&str; 9] = [
    "Ava", "Milo", "Iris", "Theo", "Nora", "Felix", "Luna", "Oscar", "Ruby",
];

/// The human taking a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatedUser {
    pub user_id: String,
    pub display_name: String,
}

impl SeatedUser {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

enum TableCommand {
    Act {
        action: PlayerAction,
        reply: oneshot::Sender<Result<TableSnapshot, TableError>>,
    },
    Snapshot {
        reply: oneshot::Sender<TableSnapshot>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// Client side of a running table. Dropping the handle stops the table.
#[derive(Debug)]
pub struct TableHandle {
    id: TableId,
    commands: mpsc::Sender<TableCommand>,
    events: EventBus,
    task: JoinHandle<()>,
}

impl TableHandle {
    pub fn id(&self) -> &TableId {
        &self.id
    }

    /// Submits the human seat's action and returns the resulting view.
    pub async fn act(&self, action: PlayerAction) -> Result<TableSnapshot, TableError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(TableCommand::Act { action, reply })
            .await
            .map_err(|_| TableError::TableClosed)?;
        rx.await.map_err(|_| TableError::TableClosed)?
    }

    pub async fn snapshot(&self) -> Result<TableSnapshot, TableError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(TableCommand::Snapshot { reply })
            .await
            .map_err(|_| TableError::TableClosed)?;
        rx.await.map_err(|_| TableError::TableClosed)
    }

    pub fn subscribe(&self) -> EventSubscription {
        self.events.subscribe(self.id.clone())
    }

    /// Stops the table and waits for its task to wind down.
    pub async fn close(&self) {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(TableCommand::Close { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TableHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Reads the user's balance, seats them with it and starts dealing.
pub async fn open_table<L: ChipLedger>(
    settings: TableSettings,
    user: SeatedUser,
    ledger: Arc<L>,
    events: EventBus,
) -> Result<TableHandle, TableError> {
    settings.validate()?;

    let balance = ledger
        .fetch_balance(&user.user_id)
        .await
        .map_err(TableError::BalanceUnavailable)?;
    let required = u64::from(settings.big_blind);
    if balance < required {
        return Err(TableError::InsufficientBalance { balance, required });
    }
    let stack = u32::try_from(balance).unwrap_or(u32::MAX);

    let mut players = vec![Player::human(0, user.display_name.clone(), stack)];
    players.extend(
        AI_NAMES
            .iter()
            .take(settings.opponents)
            .enumerate()
            .map(|(i, name)| Player::bot(i + 1, *name, settings.ai_stack)),
    );

    let seed = settings.seed.unwrap_or_else(rand::random);
    let engine = Engine::new(settings.table_config(), players, Some(seed))?;
    let ai = create_ai(&settings.ai_strategy);
    let id: TableId = Uuid::new_v4().to_string();

    info!(
        table_id = %id,
        user_id = %user.user_id,
        seed,
        opponents = settings.opponents,
        stack,
        ai = ai.name(),
        "table opened"
    );

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let actor = TableActor {
        id: id.clone(),
        settings,
        engine,
        ai,
        rng: ChaCha20Rng::seed_from_u64(seed.wrapping_add(1)),
        human: 0,
        user_id: user.user_id,
        ledger,
        events: events.clone(),
        token: 0,
        pending: None,
        timers: JoinSet::new(),
        over: false,
    };
    let task = tokio::spawn(actor.run(rx));

    Ok(TableHandle {
        id,
        commands: tx,
        events,
        task,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    AiTurn(usize),
    HumanTimeout(usize),
    NextHand,
}

/// A scheduled wake-up. Its token must match the table's current token when
/// it fires, otherwise it is ignored.
#[derive(Debug, Clone, Copy)]
struct Pending {
    token: u64,
    timer: Timer,
    deadline: Instant,
}

struct TableActor<L> {
    id: TableId,
    settings: TableSettings,
    engine: Engine,
    ai: Box<dyn AIOpponent>,
    rng: ChaCha20Rng,
    human: usize,
    user_id: String,
    ledger: Arc<L>,
    events: EventBus,
    token: u64,
    /// The timer the table is currently waiting on.
    pending: Option<Pending>,
    /// Every timer task still sleeping, superseded ones included. Dropped
    /// with the actor, which aborts them.
    timers: JoinSet<Pending>,
    /// No further hands will be dealt; the actor keeps serving snapshots.
    over: bool,
}

impl<L: ChipLedger> TableActor<L> {
    async fn run(mut self, mut commands: mpsc::Receiver<TableCommand>) {
        let progress = self.engine.start_hand();
        self.on_progress(progress);

        let mut close_reply = None;
        loop {
            tokio::select! {
                biased;
                cmd = commands.recv() => match cmd {
                    Some(TableCommand::Act { action, reply }) => {
                        let _ = reply.send(self.human_action(action));
                    }
                    Some(TableCommand::Snapshot { reply }) => {
                        let _ = reply.send(self.snapshot());
                    }
                    Some(TableCommand::Close { reply }) => {
                        close_reply = Some(reply);
                        break;
                    }
                    None => break,
                },
                Some(joined) = self.timers.join_next() => match joined {
                    Ok(fired) => self.fire(fired),
                    Err(e) => warn!(table_id = %self.id, error = %e, "timer task failed"),
                },
            }
        }

        self.events.drop_table(&self.id);
        info!(table_id = %self.id, hands = self.engine.hand().hand_number, "table closed");
        if let Some(reply) = close_reply {
            let _ = reply.send(());
        }
    }

    fn schedule(&mut self, timer: Timer, delay: std::time::Duration) {
        self.token += 1;
        let pending = Pending {
            token: self.token,
            timer,
            deadline: Instant::now() + delay,
        };
        self.pending = Some(pending);
        self.timers.spawn(async move {
            sleep_until(pending.deadline).await;
            pending
        });
    }

    // Superseded timers keep sleeping; bumping the token is what retires them.
    fn cancel_timer(&mut self) {
        self.token += 1;
        self.pending = None;
    }

    fn human_action(&mut self, action: PlayerAction) -> Result<TableSnapshot, TableError> {
        if self.over || self.engine.is_table_over() {
            return Err(TableError::TableOver);
        }
        if self.engine.current_player() != Some(self.human) {
            return Err(TableError::NotYourTurn);
        }
        // a rejected action leaves the turn timer running
        let progress = match self.engine.apply_action(self.human, action) {
            Err(e) if e.is_illegal_action() => return Err(e.into()),
            other => other,
        };
        self.cancel_timer();
        if progress.is_ok() {
            self.publish_last_action();
        }
        self.on_progress(progress);
        Ok(self.snapshot())
    }

    fn fire(&mut self, pending: Pending) {
        if pending.token != self.token {
            debug!(table_id = %self.id, timer = ?pending.timer, "stale timer ignored");
            return;
        }
        self.pending = None;
        let progress = match pending.timer {
            Timer::NextHand => self.engine.start_hand(),
            Timer::AiTurn(seat) | Timer::HumanTimeout(seat)
                if self.engine.current_player() != Some(seat) =>
            {
                debug!(table_id = %self.id, seat, "timer for a seat no longer to act");
                return;
            }
            Timer::AiTurn(seat) => self.ai_turn(seat),
            Timer::HumanTimeout(seat) => {
                info!(table_id = %self.id, seat, "turn timed out");
                self.engine.apply_timeout(seat)
            }
        };
        if progress.is_ok() && pending.timer != Timer::NextHand {
            self.publish_last_action();
        }
        self.on_progress(progress);
    }

    fn ai_turn(&mut self, seat: usize) -> Result<Progress, GameError> {
        let action = self.ai.get_action(&self.engine, seat, &mut self.rng);
        match self.engine.apply_action(seat, action) {
            Err(e) if e.is_illegal_action() => {
                warn!(table_id = %self.id, seat, ?action, error = %e, "ai chose an illegal action");
                self.engine.apply_timeout(seat)
            }
            other => other,
        }
    }

    fn on_progress(&mut self, progress: Result<Progress, GameError>) {
        match progress {
            Ok(Progress::AwaitingAction(seat)) => {
                if seat == self.human {
                    self.schedule(Timer::HumanTimeout(seat), self.settings.turn_timeout());
                } else {
                    self.schedule(Timer::AiTurn(seat), self.settings.ai_think());
                }
                self.publish_state();
            }
            Ok(Progress::HandComplete(result)) => {
                self.cancel_timer();
                self.settle(&result);
                self.broadcast(TableEvent::HandCompleted {
                    table_id: self.id.clone(),
                    result,
                });
                self.publish_state();
                if self.engine.is_table_over() {
                    self.table_over("fewer than two seats have chips");
                } else {
                    self.schedule(Timer::NextHand, self.settings.next_hand_delay());
                }
            }
            Ok(Progress::TableOver) => {
                self.cancel_timer();
                self.publish_state();
                self.table_over("fewer than two seats have chips");
            }
            Err(err) => {
                let err = TableError::from(err);
                err.log();
                error!(table_id = %self.id, hand_number = self.engine.hand().hand_number, "hand aborted");
                self.cancel_timer();
                self.broadcast(TableEvent::Notice {
                    table_id: self.id.clone(),
                    notice: TableNotice::HandAborted {
                        hand_number: self.engine.hand().hand_number,
                        message: err.to_string(),
                    },
                });
                self.table_over("hand aborted");
            }
        }
    }

    fn table_over(&mut self, reason: &str) {
        info!(table_id = %self.id, reason, "table over");
        self.broadcast(TableEvent::TableOver {
            table_id: self.id.clone(),
            reason: reason.to_string(),
        });
        self.over = true;
    }

    /// Pushes the human seat's result to the ledger in the background.
    fn settle(&self, result: &HandResult) {
        let delta = result.delta_for(self.human);
        let hand_number = result.hand_number;
        let ledger = Arc::clone(&self.ledger);
        let events = self.events.clone();
        let table_id = self.id.clone();
        let user_id = self.user_id.clone();

        tokio::spawn(async move {
            let mut last_error = None;
            for attempt in 1..=SETTLEMENT_ATTEMPTS {
                match ledger.apply_chip_delta(&user_id, delta).await {
                    Ok(balance) => {
                        debug!(table_id = %table_id, hand_number, delta, balance, "hand settled");
                        return;
                    }
                    Err(e) => {
                        warn!(table_id = %table_id, hand_number, attempt, error = %e, "settlement attempt failed");
                        last_error = Some(e);
                    }
                }
            }
            if let Some(e) = last_error {
                warn!(table_id = %table_id, hand_number, delta, "settlement abandoned");
                events.broadcast(
                    &table_id,
                    TableEvent::Notice {
                        table_id: table_id.clone(),
                        notice: TableNotice::SettlementFailed {
                            hand_number,
                            delta,
                            message: e.to_string(),
                        },
                    },
                );
            }
        });
    }

    fn snapshot(&self) -> TableSnapshot {
        let remaining = self.pending.as_ref().and_then(|p| match p.timer {
            Timer::HumanTimeout(_) => {
                let left = p.deadline.saturating_duration_since(Instant::now());
                Some(u64::try_from(left.as_millis()).unwrap_or(u64::MAX))
            }
            _ => None,
        });
        TableSnapshot::capture(&self.id, &self.engine, remaining)
    }

    fn publish_state(&self) {
        self.broadcast(TableEvent::StateChanged {
            table_id: self.id.clone(),
            snapshot: self.snapshot(),
        });
    }

    fn publish_last_action(&self) {
        if let Some(record) = self.engine.actions().last() {
            self.broadcast(TableEvent::ActionTaken {
                table_id: self.id.clone(),
                hand_number: self.engine.hand().hand_number,
                seat: record.seat,
                action: record.kind,
                timed_out: record.timed_out,
            });
        }
    }

    fn broadcast(&self, event: TableEvent) {
        self.events.broadcast(&self.id, event);
    }
}
