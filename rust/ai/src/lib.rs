//! # holdem-ai: computer opponents
//!
//! Decision policies for the computer-controlled seats of a Hold'em table.
//! A policy only reads the engine; the caller applies the returned action.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`baseline`] - Strength and pot-odds driven policy with some randomness
//! - [`create_ai`] - Factory function for creating AI opponents
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_ai::{create_ai, AIOpponent};
//! use holdem_engine::engine::{Engine, Progress, TableConfig};
//! use holdem_engine::player::Player;
//! use rand::SeedableRng;
//!
//! let ai = create_ai("baseline");
//! let players = vec![Player::human(0, "You", 2_000), Player::bot(1, "Bot", 2_000)];
//! let mut engine = Engine::new(TableConfig::default(), players, Some(42)).unwrap();
//!
//! if let Progress::AwaitingAction(seat) = engine.start_hand().unwrap() {
//!     let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(1);
//!     let action = ai.get_action(&engine, seat, &mut rng);
//!     engine.apply_action(seat, action).unwrap();
//! }
//! ```

use holdem_engine::engine::Engine;
use holdem_engine::player::PlayerAction;
use rand::RngCore;

pub mod baseline;

/// Trait defining the interface for AI opponents.
///
/// Implementations must return an action that is legal for `seat` in the
/// engine's current state. Randomness comes only from `rng`, so a seeded
/// generator replays the same decisions.
///
/// ```rust
/// use holdem_ai::AIOpponent;
/// use holdem_engine::engine::Engine;
/// use holdem_engine::player::PlayerAction;
/// use rand::RngCore;
///
/// struct CallingStation;
///
/// impl AIOpponent for CallingStation {
///     fn get_action(&self, _engine: &Engine, _seat: usize, _rng: &mut dyn RngCore) -> PlayerAction {
///         PlayerAction::Call
///     }
///
///     fn name(&self) -> &str {
///         "CallingStation"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    fn get_action(&self, engine: &Engine, seat: usize, rng: &mut dyn RngCore) -> PlayerAction;

    fn name(&self) -> &str;
}

/// Creates an AI opponent by strategy name. Unknown names get the baseline
/// policy.
///
/// ```rust
/// use holdem_ai::create_ai;
///
/// assert_eq!(create_ai("baseline").name(), "BaselineAI");
/// assert_eq!(create_ai("no-such-bot").name(), "BaselineAI");
/// ```
pub fn create_ai(_ai_type: &str) -> Box<dyn AIOpponent> {
    Box::new(baseline::BaselineAI::new())
}
