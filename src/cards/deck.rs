//! The 52-card universe, hole cards and the community board.
//!
//! The deck is a static table built at compile time and never mutated.
//! A "remaining deck" is not an object of its own: it is recomputed from the
//! set of dealt cards each time it is needed.

use super::card::{find_duplicate, format_cards, parse_cards, Card, Suit, RANK_2};
use crate::error::{PokerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Number of community cards on a complete board.
pub const FULL_BOARD: usize = 5;

static STANDARD_DECK: [Card; DECK_SIZE] = build_deck();

const fn build_deck() -> [Card; DECK_SIZE] {
    let mut cards = [Card::from_parts(RANK_2, Suit::Spade); DECK_SIZE];
    let mut i = 0;
    while i < DECK_SIZE {
        cards[i] = Card::from_parts(RANK_2 + (i / 4) as u8, Suit::ALL[i % 4]);
        i += 1;
    }
    cards
}

/// All 52 cards, ordered by rank then suit (`2S, 2H, 2C, 2D, 3S, ...`).
pub fn standard_deck() -> &'static [Card; DECK_SIZE] {
    &STANDARD_DECK
}

/// The standard deck minus `dealt`, in deck order.
///
/// Fails with `DuplicateCard` if `dealt` names the same card twice.
pub fn remaining(dealt: &[Card]) -> Result<Vec<Card>> {
    if let Some(card) = find_duplicate(dealt) {
        return Err(PokerError::DuplicateCard { card });
    }
    let dealt_mask = dealt.iter().fold(0u64, |mask, c| mask | 1u64 << c.id());
    Ok(STANDARD_DECK
        .iter()
        .copied()
        .filter(|c| dealt_mask & (1u64 << c.id()) == 0)
        .collect())
}

/// Like [`remaining`], but takes the dealt cards as a comma-separated token list.
pub fn remaining_from_tokens(dealt: &str) -> Result<Vec<Card>> {
    remaining(&parse_cards(dealt)?)
}

/// A player's two private cards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct HoleCards {
    cards: [Card; 2],
}

impl HoleCards {
    /// Create hole cards from two distinct cards.
    pub fn new(first: Card, second: Card) -> Result<Self> {
        if first == second {
            return Err(PokerError::DuplicateCard { card: first });
        }
        Ok(Self {
            cards: [first, second],
        })
    }

    /// Build from a slice that must hold exactly two cards.
    pub fn from_slice(cards: &[Card]) -> Result<Self> {
        match cards {
            [first, second] => Self::new(*first, *second),
            _ => Err(PokerError::InvalidInput {
                detail: format!(
                    "hole cards need exactly 2 cards, got {} ({})",
                    cards.len(),
                    format_cards(cards)
                ),
            }),
        }
    }

    /// Parse hole cards from a token list like `"AS,AH"`.
    pub fn parse(list: &str) -> Result<Self> {
        Self::from_slice(&parse_cards(list)?)
    }

    /// Both cards.
    pub fn cards(&self) -> [Card; 2] {
        self.cards
    }

    /// Check if a card is one of these hole cards.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }
}

impl TryFrom<Vec<Card>> for HoleCards {
    type Error = PokerError;

    fn try_from(cards: Vec<Card>) -> Result<Self> {
        Self::from_slice(&cards)
    }
}

impl From<HoleCards> for Vec<Card> {
    fn from(hole: HoleCards) -> Self {
        hole.cards.to_vec()
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_cards(&self.cards))
    }
}

impl fmt::Debug for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

/// Known community cards: nothing, a flop, or a flop plus turn.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// An empty (preflop) board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from 0, 3 or 4 distinct cards.
    pub fn from_cards(cards: &[Card]) -> Result<Self> {
        if !matches!(cards.len(), 0 | 3 | 4) {
            return Err(PokerError::InvalidBoard {
                detail: format!(
                    "board must hold 0, 3 or 4 cards, got {} ({})",
                    cards.len(),
                    format_cards(cards)
                ),
            });
        }
        if let Some(card) = find_duplicate(cards) {
            return Err(PokerError::DuplicateCard { card });
        }
        Ok(Self {
            cards: cards.to_vec(),
        })
    }

    /// Build a board street by street. A turn requires a flop.
    pub fn from_streets(flop: Option<&[Card]>, turn: Option<Card>) -> Result<Self> {
        let mut cards = Vec::with_capacity(4);
        match flop {
            Some(flop) if flop.len() != 3 => {
                return Err(PokerError::InvalidBoard {
                    detail: format!("flop must hold 3 cards, got {}", flop.len()),
                })
            }
            Some(flop) => cards.extend_from_slice(flop),
            None if turn.is_some() => {
                return Err(PokerError::InvalidBoard {
                    detail: "turn card given without a flop".to_string(),
                })
            }
            None => {}
        }
        cards.extend(turn);
        Self::from_cards(&cards)
    }

    /// Parse a board from a token list like `"AS,KD,10H"`.
    pub fn parse(list: &str) -> Result<Self> {
        Self::from_cards(&parse_cards(list)?)
    }

    /// Known community cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of known community cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if no community cards are known.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards still to come before the board is complete.
    pub fn missing(&self) -> usize {
        FULL_BOARD - self.cards.len()
    }

}

impl TryFrom<Vec<Card>> for Board {
    type Error = PokerError;

    fn try_from(cards: Vec<Card>) -> Result<Self> {
        Self::from_cards(&cards)
    }
}

impl From<Board> for Vec<Card> {
    fn from(board: Board) -> Self {
        board.cards
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_cards(&self.cards))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_standard_deck() {
        let deck = standard_deck();
        assert_eq!(deck.len(), 52);
        let distinct: FxHashSet<Card> = deck.iter().copied().collect();
        assert_eq!(distinct.len(), 52);
        assert_eq!(deck[0].to_token(), "2S");
        assert_eq!(deck[51].to_token(), "AD");
        for (i, card) in deck.iter().enumerate() {
            assert_eq!(card.id() as usize, i);
        }
    }

    #[test]
    fn test_token_round_trip_whole_deck() {
        for &card in standard_deck() {
            assert_eq!(Card::parse(&card.to_token()).unwrap(), card);
        }
    }

    #[test]
    fn test_remaining() {
        let dealt = parse_cards("AS,AH,2C,7D").unwrap();
        let rest = remaining(&dealt).unwrap();
        assert_eq!(rest.len(), 52 - dealt.len());
        assert!(rest.iter().all(|c| !dealt.contains(c)));
        assert_eq!(remaining(&[]).unwrap().len(), 52);
    }

    #[test]
    fn test_remaining_rejects_duplicates() {
        let dealt = parse_cards("AS,KD,AS").unwrap();
        match remaining(&dealt) {
            Err(PokerError::DuplicateCard { card }) => assert_eq!(card.to_token(), "AS"),
            other => panic!("expected duplicate error, got {:?}", other),
        }
        assert!(matches!(
            remaining_from_tokens("AS,XX"),
            Err(PokerError::InvalidCard { .. })
        ));
        assert_eq!(remaining_from_tokens("AS,KD").unwrap().len(), 50);
    }

    #[test]
    fn test_hole_cards() {
        let hole = HoleCards::parse("AS,AH").unwrap();
        assert!(hole.contains(Card::parse("AH").unwrap()));
        assert_eq!(hole.to_string(), "AS,AH");

        assert!(matches!(
            HoleCards::parse("AS"),
            Err(PokerError::InvalidInput { .. })
        ));
        assert!(matches!(
            HoleCards::parse("AS,KS,QS"),
            Err(PokerError::InvalidInput { .. })
        ));
        assert!(matches!(
            HoleCards::parse("AS,AS"),
            Err(PokerError::DuplicateCard { .. })
        ));
    }

    #[test]
    fn test_board_sizes() {
        assert_eq!(Board::parse("").unwrap().missing(), 5);
        assert_eq!(Board::parse("AS,KD,10H").unwrap().missing(), 2);
        let turn = Board::parse("AS,KD,10H,2C").unwrap();
        assert_eq!(turn.len(), 4);
        assert_eq!(turn.missing(), 1);

        for bad in ["AS", "AS,KD", "AS,KD,10H,2C,3C"] {
            assert!(matches!(
                Board::parse(bad),
                Err(PokerError::InvalidBoard { .. })
            ));
        }
        assert!(matches!(
            Board::parse("AS,KD,AS"),
            Err(PokerError::DuplicateCard { .. })
        ));
    }

    #[test]
    fn test_board_from_streets() {
        let flop = parse_cards("AS,KD,10H").unwrap();
        let turn = Card::parse("2C").unwrap();

        let board = Board::from_streets(Some(&flop), Some(turn)).unwrap();
        assert_eq!(board.to_string(), "AS,KD,10H,2C");
        assert_eq!(Board::from_streets(None, None).unwrap().len(), 0);

        assert!(matches!(
            Board::from_streets(None, Some(turn)),
            Err(PokerError::InvalidBoard { .. })
        ));
        assert!(matches!(
            Board::from_streets(Some(&flop[..2]), None),
            Err(PokerError::InvalidBoard { .. })
        ));
    }

    #[test]
    fn test_board_serde() {
        let board = Board::parse("AS,KD,10H").unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["AS","KD","10H"]"#);
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert!(serde_json::from_str::<Board>(r#"["AS"]"#).is_err());
    }
}
