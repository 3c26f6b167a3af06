//! Card representation.
//!
//! A `Card` is a rank (2-14, ace high) and a `Suit`. Cards travel as compact
//! tokens like `AS`, `10H` or `KD`: the rank (`2`..`10`, `J`, `Q`, `K`, `A`)
//! followed by a single suit letter (`S`, `H`, `C`, `D`).

use crate::error::{PokerError, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest rank (deuce).
pub const RANK_2: u8 = 2;
/// Top card of the wheel.
pub const RANK_5: u8 = 5;
/// Ten, the low card of a royal flush.
pub const RANK_T: u8 = 10;
/// Highest rank (ace).
pub const RANK_A: u8 = 14;

/// Rank tokens indexed by `rank - 2`.
const RANK_TOKENS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Spades (`S`)
    Spade,
    /// Hearts (`H`)
    Heart,
    /// Clubs (`C`)
    Club,
    /// Diamonds (`D`)
    Diamond,
}

impl Suit {
    /// All four suits in deck order.
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];

    /// Single-letter token for this suit.
    pub fn token(&self) -> char {
        match self {
            Suit::Spade => 'S',
            Suit::Heart => 'H',
            Suit::Club => 'C',
            Suit::Diamond => 'D',
        }
    }

    /// Parse a suit letter (case-insensitive).
    pub fn from_token(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' => Some(Suit::Spade),
            'H' => Some(Suit::Heart),
            'C' => Some(Suit::Club),
            'D' => Some(Suit::Diamond),
            _ => None,
        }
    }

    #[inline]
    fn index(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A single playing card.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    /// Create a card from a rank (2-14) and suit.
    ///
    /// Fails with `InvalidCard` if the rank is out of range.
    pub fn new(rank: u8, suit: Suit) -> Result<Self> {
        if !(RANK_2..=RANK_A).contains(&rank) {
            return Err(PokerError::InvalidCard {
                token: format!("{}{}", rank, suit),
            });
        }
        Ok(Self { rank, suit })
    }

    /// Build a card whose rank is already known to be valid.
    #[inline]
    pub(crate) const fn from_parts(rank: u8, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Parse a card token like `AS`, `10H` or `2c`.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || PokerError::InvalidCard {
            token: token.to_string(),
        };
        let token = token.trim();
        let mut chars = token.chars();
        let suit = chars.next_back().and_then(Suit::from_token).ok_or_else(invalid)?;
        let rank_str = chars.as_str().to_ascii_uppercase();
        let rank = RANK_TOKENS
            .iter()
            .position(|&r| r == rank_str)
            .ok_or_else(invalid)?;
        Ok(Self::from_parts(rank as u8 + RANK_2, suit))
    }

    /// Render this card as a token; the inverse of [`Card::parse`].
    pub fn to_token(&self) -> String {
        format!("{}{}", RANK_TOKENS[(self.rank - RANK_2) as usize], self.suit.token())
    }

    /// Rank value (2-14, ace high).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Card suit.
    #[inline]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Dense index 0-51 (`(rank - 2) * 4 + suit`), matching deck order.
    #[inline]
    pub fn id(&self) -> u8 {
        (self.rank - RANK_2) * 4 + self.suit.index()
    }
}

impl FromStr for Card {
    type Err = PokerError;

    fn from_str(s: &str) -> Result<Self> {
        Card::parse(s)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_token())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Card {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_token())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Card::parse(&token).map_err(serde::de::Error::custom)
    }
}

/// Parse a comma-separated list of card tokens, e.g. `"AS,KD,10H"`.
///
/// An empty (or all-whitespace) string yields no cards.
pub fn parse_cards(list: &str) -> Result<Vec<Card>> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',').map(Card::parse).collect()
}

/// Render cards back into the comma-separated token form.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_token)
        .collect::<Vec<_>>()
        .join(",")
}

/// Return the first card that appears more than once, if any.
pub fn find_duplicate(cards: &[Card]) -> Option<Card> {
    let mut seen = FxHashSet::default();
    cards.iter().copied().find(|&card| !seen.insert(card))
}
