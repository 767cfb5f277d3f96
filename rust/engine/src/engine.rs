use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::betting::{self, street_status, StreetStatus};
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{funded_seats, next_seat_where, seats_after, HandState, Street, TablePhase};
use crate::hand::{evaluate_best_of_seven, HandScore};
use crate::history::{ActionKind, ActionRecord, ShowdownInfo, ShownHand};
use crate::player::{Player, PlayerAction};
use crate::pot::PotManager;
use crate::rules::{self, LegalActions};

/// Blind structure of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 20,
            big_blind: 40,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 || self.big_blind < self.small_blind {
            return Err(GameError::InvalidBlinds {
                small: self.small_blind,
                big: self.big_blind,
            });
        }
        Ok(())
    }
}

/// Largest table the engine deals for.
pub const MAX_SEATS: usize = 10;

/// Outcome of a finished hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_number: u64,
    pub pot: u32,
    pub board: Vec<Card>,
    pub went_to_showdown: bool,
    pub winners: Vec<usize>,
    /// Chips paid out per seat.
    pub payouts: Vec<u32>,
    /// End-of-hand chips minus start-of-hand chips, per seat.
    pub deltas: Vec<i64>,
    pub showdown: Option<ShowdownInfo>,
}

impl HandResult {
    pub fn delta_for(&self, seat: usize) -> i64 {
        self.deltas.get(seat).copied().unwrap_or(0)
    }
}

/// Where the table stands after an engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The seat must act before anything else happens.
    AwaitingAction(usize),
    HandComplete(HandResult),
    /// Fewer than two seats have chips; no further hand can start.
    TableOver,
}

/// Synchronous hand/table state machine for one table.
///
/// The engine never waits: every operation runs until a seat has to decide
/// or the hand ends, and reports that as a [`Progress`]. Timers, AI think
/// time and settlement live with the caller.
///
/// # Examples
///
/// ```
/// use holdem_engine::engine::{Engine, Progress, TableConfig};
/// use holdem_engine::player::{Player, PlayerAction};
///
/// let players = vec![
///     Player::human(0, "You", 1_000),
///     Player::bot(1, "Bot", 1_000),
/// ];
/// let mut engine = Engine::new(TableConfig::default(), players, Some(7)).unwrap();
///
/// // heads-up: the dealer posts the small blind and acts first pre-flop
/// let Progress::AwaitingAction(seat) = engine.start_hand().unwrap() else {
///     panic!("expected a decision");
/// };
/// assert_eq!(engine.hand().pot, 60);
///
/// match engine.apply_action(seat, PlayerAction::Fold).unwrap() {
///     Progress::HandComplete(result) => assert_eq!(result.pot, 60),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug)]
pub struct Engine {
    config: TableConfig,
    players: Vec<Player>,
    hand: HandState,
    phase: TablePhase,
    rng: ChaCha20Rng,
    deck: Deck,
    next_deck: Option<Deck>,
    dealer: Option<usize>,
    /// Seat the next turn scan starts after.
    cursor: usize,
    to_act: Option<usize>,
    start_chips: Vec<u32>,
    actions: Vec<ActionRecord>,
    last_result: Option<HandResult>,
}

impl Engine {
    /// Seats are indexed by position in `players`; ids are rewritten to match.
    pub fn new(
        config: TableConfig,
        mut players: Vec<Player>,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        if players.len() < 2 {
            return Err(GameError::NotEnoughPlayers(players.len()));
        }
        if players.len() > MAX_SEATS {
            return Err(GameError::TooManyPlayers(players.len()));
        }
        for (idx, p) in players.iter_mut().enumerate() {
            p.id = idx;
        }
        let mut rng = ChaCha20Rng::seed_from_u64(seed.unwrap_or_else(rand::random));
        let deck = Deck::shuffled(&mut rng);
        let start_chips = players.iter().map(|p| p.chips).collect();
        Ok(Self {
            config,
            players,
            hand: HandState::new(),
            phase: TablePhase::Lobby,
            rng,
            deck,
            next_deck: None,
            dealer: None,
            cursor: 0,
            to_act: None,
            start_chips,
            actions: Vec::new(),
            last_result: None,
        })
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn hand(&self) -> &HandState {
        &self.hand
    }

    pub fn phase(&self) -> TablePhase {
        self.phase
    }

    pub fn is_table_over(&self) -> bool {
        self.phase == TablePhase::TableOver
    }

    pub fn dealer_seat(&self) -> Option<usize> {
        self.dealer
    }

    pub fn human_seat(&self) -> Option<usize> {
        self.players.iter().position(|p| p.is_human)
    }

    /// Seat whose decision the hand is waiting on.
    pub fn current_player(&self) -> Option<usize> {
        self.to_act
    }

    pub fn legal_actions(&self) -> Option<LegalActions> {
        self.to_act.map(|seat| {
            rules::legal_actions(
                seat,
                &self.players[seat],
                &self.hand,
                betting::opponents_can_respond(&self.players, seat),
            )
        })
    }

    /// Actions of the current (or just finished) hand, blinds included.
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn last_result(&self) -> Option<&HandResult> {
        self.last_result.as_ref()
    }

    /// Deals the next hand from `deck` instead of a fresh shuffle.
    pub fn set_next_deck(&mut self, deck: Deck) {
        self.next_deck = Some(deck);
    }

    pub fn start_hand(&mut self) -> Result<Progress, GameError> {
        match self.phase {
            TablePhase::Lobby | TablePhase::Payout => {}
            TablePhase::TableOver => return Ok(Progress::TableOver),
            _ => return Err(GameError::HandAlreadyInProgress),
        }
        let funded = funded_seats(&self.players);
        if funded < 2 {
            self.phase = TablePhase::TableOver;
            return Ok(Progress::TableOver);
        }

        self.phase = TablePhase::Dealing;
        for p in &mut self.players {
            p.reset_for_hand();
        }
        self.start_chips = self.players.iter().map(|p| p.chips).collect();
        self.actions.clear();
        self.last_result = None;
        self.to_act = None;

        let dealer = match self.dealer {
            None => self.players.iter().position(Player::has_chips),
            Some(prev) => next_seat_where(&self.players, prev, Player::has_chips),
        }
        .ok_or(GameError::NotEnoughPlayers(funded))?;
        self.dealer = Some(dealer);

        let hand_number = self.hand.hand_number + 1;
        self.hand = HandState::new();
        self.hand.hand_number = hand_number;
        self.hand.dealer_seat_index = dealer;
        self.deck = match self.next_deck.take() {
            Some(deck) => deck,
            None => Deck::shuffled(&mut self.rng),
        };

        let small = if funded == 2 {
            dealer
        } else {
            next_seat_where(&self.players, dealer, Player::has_chips).unwrap_or(dealer)
        };
        let big = next_seat_where(&self.players, small, Player::has_chips).unwrap_or(small);
        self.post_blind(small, self.config.small_blind, true);
        self.post_blind(big, self.config.big_blind, false);

        self.hand.current_bet = self
            .players
            .iter()
            .map(|p| p.current_street_bet)
            .max()
            .unwrap_or(0);
        self.hand.last_raise_size = self.config.big_blind;
        self.hand.min_raise_to = self.hand.current_bet + self.config.big_blind;

        let progress = self.deal_hole_cards(dealer).and_then(|()| {
            info!(hand_number, dealer, small, big, "hand started");
            self.hand.street = Street::PreFlop;
            self.phase = TablePhase::PreFlop;
            self.cursor = big;
            self.advance()
        });
        self.abort_on_error(progress)
    }

    fn deal_hole_cards(&mut self, dealer: usize) -> Result<(), GameError> {
        for _ in 0..2 {
            for seat in seats_after(self.players.len(), dealer) {
                if !self.players[seat].folded {
                    let card = self.deck.deal_card()?;
                    self.players[seat].give_card(card);
                }
            }
        }
        Ok(())
    }

    // A hand that cannot be finished is voided: every seat gets back what it
    // had when the hand started and the table waits for the next deal.
    fn abort_on_error(&mut self, progress: Result<Progress, GameError>) -> Result<Progress, GameError> {
        if let Err(err) = &progress {
            warn!(hand_number = self.hand.hand_number, error = %err, "hand aborted, contributions refunded");
            for (p, &start) in self.players.iter_mut().zip(&self.start_chips) {
                p.chips = start;
                p.reset_for_hand();
            }
            let hand_number = self.hand.hand_number;
            let dealer = self.hand.dealer_seat_index;
            self.hand = HandState::new();
            self.hand.hand_number = hand_number;
            self.hand.dealer_seat_index = dealer;
            self.actions.clear();
            self.to_act = None;
            self.phase = if funded_seats(&self.players) < 2 {
                TablePhase::TableOver
            } else {
                TablePhase::Payout
            };
        }
        progress
    }

    /// Applies `action` for `seat`. Rejected actions leave the state untouched.
    pub fn apply_action(&mut self, seat: usize, action: PlayerAction) -> Result<Progress, GameError> {
        self.act(seat, action, false)
    }

    /// Resolves an expired turn: call when the full call is affordable (a
    /// check when nothing is owed), otherwise fold.
    pub fn apply_timeout(&mut self, seat: usize) -> Result<Progress, GameError> {
        self.check_turn(seat)?;
        let player = &self.players[seat];
        let action = if player.to_call(self.hand.current_bet) <= player.chips {
            PlayerAction::Call
        } else {
            PlayerAction::Fold
        };
        self.act(seat, action, true)
    }

    fn check_turn(&self, seat: usize) -> Result<(), GameError> {
        if self.phase == TablePhase::TableOver {
            return Err(GameError::TableOver);
        }
        if seat >= self.players.len() {
            return Err(GameError::UnknownSeat(seat));
        }
        let expected = match self.to_act {
            Some(expected) if self.phase.is_betting() => expected,
            _ => return Err(GameError::NoHandInProgress),
        };
        if seat != expected {
            return Err(GameError::NotPlayersTurn {
                expected,
                actual: seat,
            });
        }
        Ok(())
    }

    fn act(&mut self, seat: usize, action: PlayerAction, timed_out: bool) -> Result<Progress, GameError> {
        self.check_turn(seat)?;
        let validated = rules::validate_action(
            &self.players[seat],
            &self.hand,
            betting::opponents_can_respond(&self.players, seat),
            action,
        )?;

        betting::apply_action(
            &mut self.players,
            &mut self.hand,
            seat,
            validated,
            self.config.big_blind,
        );
        let kind = ActionKind::from(validated);
        let player = &mut self.players[seat];
        player.status_label = match kind {
            ActionKind::Fold => "Fold",
            _ if player.all_in => "All-in",
            ActionKind::Check => "Check",
            ActionKind::Call { .. } => "Call",
            _ => "Raise",
        }
        .to_string();
        debug!(seat, street = ?self.hand.street, ?kind, timed_out, "action applied");
        self.actions.push(ActionRecord {
            seat,
            street: self.hand.street,
            kind,
            timed_out,
        });
        debug_assert_eq!(
            self.hand.pot,
            self.players.iter().map(|p| p.total_hand_contribution).sum::<u32>()
        );

        self.cursor = seat;
        self.to_act = None;
        let progress = self.advance();
        self.abort_on_error(progress)
    }

    fn post_blind(&mut self, seat: usize, amount: u32, small: bool) {
        let paid = betting::post_blind(&mut self.players[seat], &mut self.hand, amount);
        let kind = if small {
            ActionKind::SmallBlind { amount: paid }
        } else {
            ActionKind::BigBlind { amount: paid }
        };
        self.players[seat].status_label = if small { "SB" } else { "BB" }.to_string();
        self.actions.push(ActionRecord {
            seat,
            street: Street::PreFlop,
            kind,
            timed_out: false,
        });
    }

    // Runs the hand forward until a seat must decide or the hand is over.
    fn advance(&mut self) -> Result<Progress, GameError> {
        loop {
            match street_status(&self.players, &self.hand, self.cursor) {
                StreetStatus::Action(seat) => {
                    self.to_act = Some(seat);
                    return Ok(Progress::AwaitingAction(seat));
                }
                StreetStatus::FoldOut(winner) => return Ok(self.fold_out(winner)),
                StreetStatus::Complete => match self.hand.street.next() {
                    Some((street, count)) => {
                        self.deal_street(street, count)?;
                        self.cursor = self.hand.dealer_seat_index;
                    }
                    None => return Ok(self.showdown()),
                },
                StreetStatus::RunOut => {
                    while let Some((street, count)) = self.hand.street.next() {
                        self.deal_street(street, count)?;
                    }
                    return Ok(self.showdown());
                }
            }
        }
    }

    fn deal_street(&mut self, street: Street, count: usize) -> Result<(), GameError> {
        self.deck.burn_card()?;
        for _ in 0..count {
            let card = self.deck.deal_card()?;
            self.hand.board.push(card);
        }
        betting::reset_for_street(&mut self.players, &mut self.hand, self.config.big_blind);
        self.hand.street = street;
        self.phase = street.into();
        debug!(
            hand_number = self.hand.hand_number,
            ?street,
            board = self.hand.board.len(),
            "street dealt"
        );
        Ok(())
    }

    fn fold_out(&mut self, winner: usize) -> Progress {
        let pot = self.hand.pot;
        self.players[winner].add_chips(pot);
        self.players[winner].status_label = "Winner".to_string();
        let mut payouts = vec![0; self.players.len()];
        payouts[winner] = pot;
        self.finish_hand(payouts, vec![winner], None)
    }

    fn showdown(&mut self) -> Progress {
        self.phase = TablePhase::Showdown;
        self.hand.street = Street::Showdown;

        let board = self.hand.board.clone();
        let mut scores: Vec<Option<HandScore>> = vec![None; self.players.len()];
        let mut shown = Vec::new();
        for (seat, p) in self.players.iter_mut().enumerate() {
            if !p.is_contender() {
                continue;
            }
            let cards: Vec<Card> = p.hole_cards.iter().chain(board.iter()).copied().collect();
            let score = evaluate_best_of_seven(&cards);
            p.hand_score = Some(score.clone());
            scores[seat] = Some(score.clone());
            shown.push(ShownHand {
                seat,
                cards: p.hole_cards.clone(),
                score,
            });
        }

        let pots = PotManager::from_players(&self.players);
        debug_assert_eq!(pots.total(), self.hand.pot);
        let order: Vec<usize> = seats_after(self.players.len(), self.hand.dealer_seat_index).collect();
        let awards = pots.awards(&scores, &order);
        let payouts = pots.distribute(&scores, &order);

        let mut winners: Vec<usize> = Vec::new();
        let mut tied: Vec<usize> = Vec::new();
        for award in awards.iter().filter(|a| a.contested) {
            if award.winners.len() > 1 {
                tied.extend(&award.winners);
            }
            winners.extend(&award.winners);
        }
        if winners.is_empty() {
            // nobody else showed down, so the lone contender takes everything back
            winners.extend((0..self.players.len()).filter(|&s| payouts[s] > 0));
        }
        winners.sort_unstable();
        winners.dedup();
        let split = !tied.is_empty();
        for (seat, p) in self.players.iter_mut().enumerate() {
            p.add_chips(payouts[seat]);
            if let Some(score) = &p.hand_score {
                let prefix = if tied.contains(&seat) {
                    "Split - "
                } else if winners.contains(&seat) {
                    "Winner - "
                } else {
                    "Loser - "
                };
                p.status_label = format!("{prefix}{}", score.describe());
            }
        }

        let info = ShowdownInfo {
            hands: shown,
            winners: winners.clone(),
            notes: split.then(|| "split pot".to_string()),
        };
        self.finish_hand(payouts, winners, Some(info))
    }

    fn finish_hand(
        &mut self,
        payouts: Vec<u32>,
        winners: Vec<usize>,
        showdown: Option<ShowdownInfo>,
    ) -> Progress {
        let deltas = self
            .players
            .iter()
            .zip(&self.start_chips)
            .map(|(p, &start)| i64::from(p.chips) - i64::from(start))
            .collect();
        let result = HandResult {
            hand_number: self.hand.hand_number,
            pot: self.hand.pot,
            board: self.hand.board.clone(),
            went_to_showdown: showdown.is_some(),
            winners,
            payouts,
            deltas,
            showdown,
        };
        info!(
            hand_number = result.hand_number,
            pot = result.pot,
            winners = ?result.winners,
            showdown = result.went_to_showdown,
            "hand complete"
        );

        self.to_act = None;
        self.phase = if funded_seats(&self.players) < 2 {
            TablePhase::TableOver
        } else {
            TablePhase::Payout
        };
        self.last_result = Some(result.clone());
        Progress::HandComplete(result)
    }
}
