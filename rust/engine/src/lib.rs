//! # holdem-engine: Texas Hold'em table core
//!
//! A synchronous, seedable no-limit Hold'em engine for one table of two to
//! ten seats. The engine owns the seats, the per-hand deck and the betting
//! state; callers drive it one decision at a time and receive a
//! [`engine::Progress`] back from every operation.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text notation
//! - [`deck`] - Per-hand deck with injected RNG shuffling
//! - [`hand`] - Five and best-of-seven hand evaluation, score comparison
//! - [`player`] - Seat state and requested actions
//! - [`game`] - Streets, table phases and the shared hand state
//! - [`rules`] - Action validation and legal action ranges
//! - [`betting`] - Turn order and street completion
//! - [`pot`] - Side-pot layering and distribution
//! - [`history`] - In-memory action and showdown records
//! - [`engine`] - Hand/table orchestration
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{evaluate_best_of_seven, Category};
//!
//! let cards = parse_cards("2h 2d 7c 7s Kh Kd Kc").unwrap();
//! let score = evaluate_best_of_seven(&cards);
//! assert_eq!(score.category, Category::FullHouse);
//! assert_eq!(score.tiebreak, vec![13, 7]);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! The same seed produces the same shuffles, so whole tables can be replayed:
//!
//! ```rust
//! use holdem_engine::deck::Deck;
//!
//! let mut a = Deck::new_with_seed(42);
//! let mut b = Deck::new_with_seed(42);
//! assert_eq!(a.deal_card(), b.deal_card());
//! ```

pub mod betting;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod history;
pub mod player;
pub mod pot;
pub mod rules;
