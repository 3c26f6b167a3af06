//! # Hold'em Equity
//!
//! Poker hand ranking and Monte Carlo equity for Texas Hold'em.
//!
//! ## Features
//!
//! - **Card model**: compact `AS` / `10H` tokens, a static 52-card deck and
//!   remaining-deck queries
//! - **Hand evaluation**: category and a single totally ordered score for any
//!   five cards
//! - **Best of seven**: exhaustive search over all 21 five-card subsets
//! - **Equity simulation**: parallel random dealing with split-pot credit,
//!   seeding, cancellation and time limits
//!
//! ## Quick Start
//!
//! ```
//! use holdem_equity::cards::{Board, HoleCards};
//! use holdem_equity::eval::{best_of_seven_tokens, evaluate, HandCategory};
//! use holdem_equity::equity::simulate_equity;
//! use holdem_equity::cards::parse_cards;
//!
//! let royal = evaluate(&parse_cards("AS,KS,QS,JS,10S").unwrap()).unwrap();
//! assert_eq!(royal.category, HandCategory::RoyalFlush);
//!
//! let (hand, _score) = best_of_seven_tokens("2C,2D,2S,9H,9D,KC,4S").unwrap();
//! assert_eq!(hand.category(), HandCategory::FullHouse);
//!
//! let players = [HoleCards::parse("AS,AH").unwrap(), HoleCards::parse("2C,7D").unwrap()];
//! let equities = simulate_equity(&players, &Board::new(), 2_000).unwrap();
//! assert_eq!(equities.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   cards::deck ──► equity::simulator ──► eval::best ──► eval::hand
//!   (remaining)     (sample board,        (21 subsets)   (category,
//!                    tally winners)                       score)
//! ```

#![warn(missing_docs)]

/// Cards, the deck, hole cards and boards.
pub mod cards;

/// Monte Carlo equity simulation.
pub mod equity;

/// Crate-wide error type.
pub mod error;

/// Five-card evaluation and best-of-seven selection.
pub mod eval;

// Re-export commonly used types at crate root for convenience
pub use cards::{Board, Card, HoleCards, Suit};
pub use equity::{simulate_equity, EquityResult, EquitySimulator, SimulationConfig};
pub use error::{PokerError, Result};
pub use eval::{best_of_seven, evaluate, Evaluation, Hand, HandCategory, Score};
