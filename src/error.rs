//! Error types shared by every layer of the crate.

use crate::cards::Card;
use thiserror::Error;

/// Everything that can go wrong while parsing, evaluating or simulating.
#[derive(Debug, Error)]
pub enum PokerError {
    /// A card token could not be parsed.
    #[error("invalid card token '{token}'")]
    InvalidCard {
        /// The rejected token.
        token: String,
    },

    /// A card appeared twice where all cards must be distinct.
    #[error("duplicate card {card}")]
    DuplicateCard {
        /// The repeated card.
        card: Card,
    },

    /// A five-card hand could not be built.
    #[error("invalid hand: {detail}")]
    InvalidHand {
        /// What was wrong.
        detail: String,
    },

    /// Bad input to the best-hand selector or the simulator.
    #[error("invalid input: {detail}")]
    InvalidInput {
        /// What was wrong.
        detail: String,
    },

    /// Board is not empty, a flop, or a flop plus turn.
    #[error("invalid board: {detail}")]
    InvalidBoard {
        /// What was wrong.
        detail: String,
    },

    /// Not enough undealt cards left to complete the board.
    #[error("deck exhausted: need {needed} cards, only {available} remain")]
    DeckExhaustion {
        /// Cards required to complete the board.
        needed: usize,
        /// Cards left in the deck.
        available: usize,
    },

    /// Simulation configuration failed validation.
    #[error("invalid configuration: {detail}")]
    InvalidConfig {
        /// Failed check.
        detail: String,
    },

    /// Simulation was stopped before a single trial finished.
    #[error("simulation cancelled after {trials} trials")]
    Cancelled {
        /// Trials completed before stopping.
        trials: u64,
    },

    /// Worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PokerError>;
