//! Cards, the standard deck, hole cards and the community board.

pub mod card;
pub mod deck;

pub use card::{find_duplicate, format_cards, parse_cards, Card, Suit};
pub use deck::{remaining, remaining_from_tokens, standard_deck, Board, HoleCards};
