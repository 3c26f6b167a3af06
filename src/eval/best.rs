//! Best five-card hand out of seven.
//!
//! Each five-card subset of seven cards is the complement of a pair of
//! skipped positions, so the 21 subsets are enumerated by choosing which two
//! cards to leave out.

use super::hand::{Hand, Score, HAND_SIZE};
use crate::cards::{find_duplicate, format_cards, parse_cards, Card, HoleCards};
use crate::error::{PokerError, Result};

/// Cards available to a player at showdown.
pub const SEVEN: usize = 7;

/// Number of five-card subsets of seven cards.
pub const SUBSET_COUNT: usize = 21;

/// All five-card subsets of `cards`, each exactly once.
pub fn five_card_subsets(cards: &[Card; SEVEN]) -> impl Iterator<Item = [Card; HAND_SIZE]> + '_ {
    (0..SEVEN).flat_map(move |skip_a| {
        ((skip_a + 1)..SEVEN).map(move |skip_b| {
            let mut subset = [cards[0]; HAND_SIZE];
            let kept = (0..SEVEN).filter(|&i| i != skip_a && i != skip_b);
            for (slot, i) in subset.iter_mut().zip(kept) {
                *slot = cards[i];
            }
            subset
        })
    })
}

/// Best hand among seven cards already known to be distinct.
///
/// First subset seen wins on an exact score tie.
pub(crate) fn best_hand(cards: &[Card; SEVEN]) -> (Hand, Score) {
    // Enumeration starts by skipping positions 0 and 1.
    let mut best = Hand::from_distinct([cards[2], cards[3], cards[4], cards[5], cards[6]]);
    let mut best_score = best.score();
    for hand in five_card_subsets(cards).skip(1).map(Hand::from_distinct) {
        let score = hand.score();
        if score > best_score {
            best = hand;
            best_score = score;
        }
    }
    (best, best_score)
}

/// Pick the highest-scoring five-card hand out of exactly seven distinct cards.
pub fn best_of_seven(cards: &[Card]) -> Result<(Hand, Score)> {
    let seven: &[Card; SEVEN] = cards.try_into().map_err(|_| PokerError::InvalidInput {
        detail: format!(
            "best hand needs exactly {} cards, got {} ({})",
            SEVEN,
            cards.len(),
            format_cards(cards)
        ),
    })?;
    if let Some(card) = find_duplicate(cards) {
        return Err(PokerError::InvalidInput {
            detail: format!("duplicate card {} in {}", card, format_cards(cards)),
        });
    }
    Ok(best_hand(seven))
}

/// Parse seven card tokens and pick the best hand.
pub fn best_of_seven_tokens(list: &str) -> Result<(Hand, Score)> {
    best_of_seven(&parse_cards(list)?)
}

/// Join hole cards with a complete five-card board.
pub(crate) fn seven_cards(hole: &HoleCards, community: &[Card; 5]) -> [Card; SEVEN] {
    let [a, b] = hole.cards();
    [
        a,
        b,
        community[0],
        community[1],
        community[2],
        community[3],
        community[4],
    ]
}
