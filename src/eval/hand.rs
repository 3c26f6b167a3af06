//! Five-card hand evaluation.
//!
//! A `Hand` is exactly five distinct cards. Its category is found by checking
//! the rules from most to least specific (first match wins), and its score
//! packs the category and the kicker ordering into one base-15 integer:
//!
//! ```text
//! score = category * 15^5 + k0 * 15^4 + k1 * 15^3 + k2 * 15^2 + k3 * 15 + k4
//! ```
//!
//! Kickers are the five ranks sorted by histogram count, then by rank, both
//! descending. A wheel (A-2-3-4-5) counts its ace as 1 so it ranks below a
//! six-high straight.

use crate::cards::{find_duplicate, format_cards, parse_cards, Card, Suit};
use crate::cards::card::{RANK_2, RANK_5, RANK_A, RANK_T};
use crate::error::{PokerError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// Cards in an evaluated hand.
pub const HAND_SIZE: usize = 5;

const BASE: u32 = 15;
const CATEGORY_WEIGHT: u32 = BASE * BASE * BASE * BASE * BASE;

/// Hand categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    /// No made hand.
    HighCard = 0,
    /// Two cards of one rank.
    OnePair = 1,
    /// Two different pairs.
    TwoPair = 2,
    /// Three cards of one rank.
    ThreeOfAKind = 3,
    /// Five consecutive ranks.
    Straight = 4,
    /// Five cards of one suit.
    Flush = 5,
    /// Three of a kind plus a pair.
    FullHouse = 6,
    /// Four cards of one rank.
    FourOfAKind = 7,
    /// Straight in a single suit.
    StraightFlush = 8,
    /// Ace-high straight flush.
    RoyalFlush = 9,
}

impl HandCategory {
    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }

    /// Numeric category, 0 (high card) through 9 (royal flush).
    pub fn value(&self) -> u8 {
        *self as u8
    }

    fn from_value(value: u32) -> Self {
        match value {
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            8 => HandCategory::StraightFlush,
            9 => HandCategory::RoyalFlush,
            _ => HandCategory::HighCard,
        }
    }

    fn is_straight_kind(&self) -> bool {
        matches!(
            self,
            HandCategory::Straight | HandCategory::StraightFlush | HandCategory::RoyalFlush
        )
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Totally ordered hand strength. Higher wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u32);

impl Score {
    fn new(category: HandCategory, kickers: &[u8; HAND_SIZE]) -> Self {
        let kicker_value = kickers
            .iter()
            .fold(0u32, |acc, &k| acc * BASE + k as u32);
        Self(category as u32 * CATEGORY_WEIGHT + kicker_value)
    }

    /// Get the raw score value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Category encoded in this score.
    pub fn category(&self) -> HandCategory {
        HandCategory::from_value(self.0 / CATEGORY_WEIGHT)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category and score of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evaluation {
    /// Hand category.
    pub category: HandCategory,
    /// Total-order score; higher wins.
    pub score: Score,
}

/// Count of cards per rank within a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankHistogram {
    counts: [u8; RANK_A as usize + 1],
}

impl RankHistogram {
    fn of(cards: &[Card; HAND_SIZE]) -> Self {
        let mut counts = [0u8; RANK_A as usize + 1];
        for card in cards {
            counts[card.rank() as usize] += 1;
        }
        Self { counts }
    }

    /// Number of cards holding `rank`.
    pub fn count(&self, rank: u8) -> u8 {
        self.counts.get(rank as usize).copied().unwrap_or(0)
    }

    /// Number of distinct ranks.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Largest count of any single rank.
    pub fn max_count(&self) -> u8 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(rank, count)` pairs for the ranks present, highest rank first.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (RANK_2..=RANK_A)
            .rev()
            .map(move |rank| (rank, self.counts[rank as usize]))
            .filter(|&(_, count)| count > 0)
    }
}

/// One classification rule as seen by a trace callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCheck {
    /// Category the rule would assign.
    pub category: HandCategory,
    /// Whether the hand satisfied the rule.
    pub matched: bool,
}

type Rule = (HandCategory, fn(&Hand) -> bool);

/// Rules from most to least specific; high card is the fallback.
const RULES: [Rule; 9] = [
    (HandCategory::RoyalFlush, Hand::is_royal_flush),
    (HandCategory::StraightFlush, Hand::is_straight_flush),
    (HandCategory::FourOfAKind, Hand::is_four_of_a_kind),
    (HandCategory::FullHouse, Hand::is_full_house),
    (HandCategory::Flush, Hand::is_flush),
    (HandCategory::Straight, Hand::is_straight),
    (HandCategory::ThreeOfAKind, Hand::is_three_of_a_kind),
    (HandCategory::TwoPair, Hand::is_two_pair),
    (HandCategory::OnePair, Hand::is_one_pair),
];

/// Five distinct cards with a lazily computed, cached evaluation.
#[derive(Clone)]
pub struct Hand {
    cards: [Card; HAND_SIZE],
    histogram: RankHistogram,
    evaluation: OnceLock<Evaluation>,
}

impl Hand {
    /// Create a hand from five distinct cards.
    pub fn new(cards: [Card; HAND_SIZE]) -> Result<Self> {
        if let Some(card) = find_duplicate(&cards) {
            return Err(PokerError::InvalidHand {
                detail: format!("duplicate card {} in {}", card, format_cards(&cards)),
            });
        }
        Ok(Self::from_distinct(cards))
    }

    /// Caller guarantees the cards are distinct.
    pub(crate) fn from_distinct(cards: [Card; HAND_SIZE]) -> Self {
        Self {
            histogram: RankHistogram::of(&cards),
            cards,
            evaluation: OnceLock::new(),
        }
    }

    /// Create a hand from a slice that must hold exactly five cards.
    pub fn from_slice(cards: &[Card]) -> Result<Self> {
        let cards: [Card; HAND_SIZE] = cards.try_into().map_err(|_| PokerError::InvalidHand {
            detail: format!(
                "expected {} cards, got {} ({})",
                HAND_SIZE,
                cards.len(),
                format_cards(cards)
            ),
        })?;
        Self::new(cards)
    }

    /// Parse a hand from a token list like `"AS,KS,QS,JS,10S"`.
    pub fn parse(list: &str) -> Result<Self> {
        Self::from_slice(&parse_cards(list)?)
    }

    /// Cards in construction order.
    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.cards
    }

    /// Cards ordered by rank (then suit), highest first.
    pub fn sorted_cards(&self) -> [Card; HAND_SIZE] {
        let mut sorted = self.cards;
        sorted.sort_by(|a, b| b.rank().cmp(&a.rank()).then(a.suit().cmp(&b.suit())));
        sorted
    }

    /// Count of cards per rank.
    pub fn rank_histogram(&self) -> &RankHistogram {
        &self.histogram
    }

    /// Category and score, computed on first use.
    pub fn evaluation(&self) -> Evaluation {
        *self.evaluation.get_or_init(|| {
            let category = self.classify_with(|check| {
                if check.matched {
                    log::trace!("{} matched {}", format_cards(&self.cards), check.category);
                }
            });
            Evaluation {
                category,
                score: Score::new(category, &self.kickers(category)),
            }
        })
    }

    /// Hand category.
    pub fn category(&self) -> HandCategory {
        self.evaluation().category
    }

    /// Hand score.
    pub fn score(&self) -> Score {
        self.evaluation().score
    }

    /// Classify the hand, reporting every rule checked to `trace`.
    ///
    /// Rules are checked from royal flush downwards and checking stops at the
    /// first match. The trace sees no effect on the result or the cached
    /// evaluation.
    pub fn classify_with<F: FnMut(RuleCheck)>(&self, mut trace: F) -> HandCategory {
        for (category, rule) in RULES {
            let matched = rule(self);
            trace(RuleCheck { category, matched });
            if matched {
                return category;
            }
        }
        trace(RuleCheck {
            category: HandCategory::HighCard,
            matched: true,
        });
        HandCategory::HighCard
    }

    fn all_same_suit(&self) -> bool {
        let suit: Suit = self.cards[0].suit();
        self.cards.iter().all(|c| c.suit() == suit)
    }

    fn is_wheel(&self) -> bool {
        self.histogram.distinct() == HAND_SIZE
            && [RANK_A, 2, 3, 4, RANK_5]
                .iter()
                .all(|&rank| self.histogram.count(rank) == 1)
    }

    fn is_run(&self) -> bool {
        if self.histogram.distinct() != HAND_SIZE {
            return false;
        }
        let high = self.cards.iter().map(Card::rank).max().unwrap_or(0);
        let low = self.cards.iter().map(Card::rank).min().unwrap_or(0);
        high - low == 4 || self.is_wheel()
    }

    fn is_royal_flush(&self) -> bool {
        self.is_straight_flush() && (RANK_T..=RANK_A).all(|rank| self.histogram.count(rank) == 1)
    }

    fn is_straight_flush(&self) -> bool {
        self.all_same_suit() && self.is_run()
    }

    fn is_four_of_a_kind(&self) -> bool {
        self.histogram.distinct() == 2 && self.histogram.max_count() == 4
    }

    fn is_full_house(&self) -> bool {
        self.histogram.distinct() == 2 && self.histogram.max_count() == 3
    }

    fn is_flush(&self) -> bool {
        self.all_same_suit()
    }

    fn is_straight(&self) -> bool {
        self.is_run()
    }

    fn is_three_of_a_kind(&self) -> bool {
        self.histogram.max_count() == 3 && !self.is_full_house()
    }

    fn is_two_pair(&self) -> bool {
        self.histogram.max_count() == 2 && self.histogram.distinct() == 3
    }

    fn is_one_pair(&self) -> bool {
        self.histogram.max_count() == 2 && self.histogram.distinct() == 4
    }

    /// Ranks in tie-break order: by count, then rank, both descending.
    fn kickers(&self, category: HandCategory) -> [u8; HAND_SIZE] {
        if category.is_straight_kind() && self.is_wheel() {
            return [5, 4, 3, 2, 1];
        }
        let mut kickers = [0u8; HAND_SIZE];
        for (slot, card) in kickers.iter_mut().zip(self.cards.iter()) {
            *slot = card.rank();
        }
        let histogram = &self.histogram;
        kickers.sort_by(|&a, &b| {
            histogram
                .count(b)
                .cmp(&histogram.count(a))
                .then(b.cmp(&a))
        });
        kickers
    }
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_cards() == other.sorted_cards()
    }
}

impl Eq for Hand {}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_cards(&self.sorted_cards()))
    }
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hand({} = {})", self, self.category())
    }
}

/// Evaluate exactly five cards.
pub fn evaluate(cards: &[Card]) -> Result<Evaluation> {
    Ok(Hand::from_slice(cards)?.evaluation())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(list: &str) -> Hand {
        Hand::parse(list).unwrap()
    }

    fn category(list: &str) -> HandCategory {
        hand(list).category()
    }

    #[test]
    fn test_categories() {
        assert_eq!(category("AS,KS,QS,JS,10S"), HandCategory::RoyalFlush);
        assert_eq!(category("9H,8H,7H,6H,5H"), HandCategory::StraightFlush);
        assert_eq!(category("AD,2D,3D,4D,5D"), HandCategory::StraightFlush);
        assert_eq!(category("9S,9H,9C,9D,KS"), HandCategory::FourOfAKind);
        assert_eq!(category("2H,2D,2C,5S,5H"), HandCategory::FullHouse);
        assert_eq!(category("AS,KS,9S,7S,2S"), HandCategory::Flush);
        assert_eq!(category("10S,9D,8H,7C,6S"), HandCategory::Straight);
        assert_eq!(category("AS,KD,QH,JC,10S"), HandCategory::Straight);
        assert_eq!(category("5S,4D,3H,2C,AS"), HandCategory::Straight);
        assert_eq!(category("AS,AD,AH,KC,JS"), HandCategory::ThreeOfAKind);
        assert_eq!(category("AS,AD,KH,KC,JS"), HandCategory::TwoPair);
        assert_eq!(category("AS,AD,KH,QC,JS"), HandCategory::OnePair);
        assert_eq!(category("2C,5D,9H,JS,AD"), HandCategory::HighCard);
    }

    #[test]
    fn test_near_misses_are_not_straights() {
        assert_eq!(category("KS,AD,2H,3C,4S"), HandCategory::HighCard);
        assert_eq!(category("AS,KD,QH,JC,9S"), HandCategory::HighCard);
        assert_eq!(category("AS,KS,QS,JS,9S"), HandCategory::Flush);
    }

    #[test]
    fn test_royal_flush_is_maximal() {
        let royal = hand("AS,KS,QS,JS,10S");
        assert_eq!(royal.category().value(), 9);
        let king_high = hand("KH,QH,JH,10H,9H");
        assert!(royal.score() > king_high.score());
        let quads = hand("AS,AH,AC,AD,KS");
        assert!(royal.score() > quads.score());
    }

    #[test]
    fn test_score_layout() {
        // Full house 2s over 5s: kickers 2,2,2,5,5.
        let full = hand("2H,2D,2C,5S,5H");
        let expected = 6 * 15u32.pow(5)
            + 2 * 15u32.pow(4)
            + 2 * 15u32.pow(3)
            + 2 * 15u32.pow(2)
            + 5 * 15
            + 5;
        assert_eq!(full.score().value(), expected);
        assert_eq!(full.score().category(), HandCategory::FullHouse);
    }

    fn permutations(cards: &[Card]) -> Vec<Vec<Card>> {
        if cards.len() <= 1 {
            return vec![cards.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..cards.len() {
            let mut rest = cards.to_vec();
            let first = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, first);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_order_independence() {
        for list in ["QH,QD,7S,7C,3H", "AS,2D,3H,4C,5S", "9C,KC,2C,5C,JC"] {
            let cards = parse_cards(list).unwrap();
            let reference = Hand::from_slice(&cards).unwrap().evaluation();
            let orders = permutations(&cards);
            assert_eq!(orders.len(), 120);
            for order in orders {
                assert_eq!(Hand::from_slice(&order).unwrap().evaluation(), reference);
            }
        }
    }

    #[test]
    fn test_higher_category_always_wins() {
        // (weakest hand of the category, strongest hand of the category)
        let extremes = [
            (HandCategory::HighCard, "2S,3D,4H,5C,7S", "AS,KD,QH,JC,9S"),
            (HandCategory::OnePair, "2S,2D,3H,4C,5S", "AS,AD,KH,QC,JS"),
            (HandCategory::TwoPair, "3S,3D,2H,2C,4S", "AS,AD,KH,KC,QS"),
            (HandCategory::ThreeOfAKind, "2S,2D,2H,3C,4S", "AS,AD,AH,KC,QS"),
            (HandCategory::Straight, "AS,2D,3H,4C,5S", "AS,KD,QH,JC,10S"),
            (HandCategory::Flush, "2S,3S,4S,5S,7S", "AS,KS,QS,JS,9S"),
            (HandCategory::FullHouse, "2S,2D,2H,3C,3S", "AS,AD,AH,KC,KS"),
            (HandCategory::FourOfAKind, "2S,2D,2H,2C,3S", "AS,AD,AH,AC,KS"),
            (HandCategory::StraightFlush, "AH,2H,3H,4H,5H", "KH,QH,JH,10H,9H"),
            (HandCategory::RoyalFlush, "AS,KS,QS,JS,10S", "AS,KS,QS,JS,10S"),
        ];
        for (expected, weakest, strongest) in extremes {
            assert_eq!(category(weakest), expected);
            assert_eq!(category(strongest), expected);
            assert!(hand(weakest).score() <= hand(strongest).score());
        }
        for pair in extremes.windows(2) {
            let (lower, _, lower_best) = pair[0];
            let (upper, upper_worst, _) = pair[1];
            assert!(
                hand(upper_worst).score() > hand(lower_best).score(),
                "{} should beat {}",
                upper,
                lower
            );
        }
    }

    #[test]
    fn test_kickers_break_ties() {
        assert!(hand("AS,AD,KH,QC,JS").score() > hand("AS,AD,KH,QC,10S").score());
        assert!(hand("3S,3D,2H,4C,5S").score() > hand("2S,2D,AH,KC,QS").score());
        assert!(hand("KS,KD,2H,2C,5S").score() > hand("QS,QD,JH,JC,AS").score());
        assert_eq!(
            hand("AS,AD,KH,QC,JS").score(),
            hand("AH,AC,KD,QS,JD").score()
        );
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = hand("AS,2D,3H,4C,5S");
        let six_high = hand("2S,3D,4H,5C,6S");
        assert!(wheel.score() < six_high.score());
        assert_eq!(wheel.category(), six_high.category());

        let steel_wheel = hand("AH,2H,3H,4H,5H");
        let six_high_sf = hand("2D,3D,4D,5D,6D");
        assert!(steel_wheel.score() < six_high_sf.score());
        assert!(steel_wheel.score() > hand("AS,AD,AH,AC,KS").score());
    }

    #[test]
    fn test_histogram() {
        let h = hand("QH,QD,7S,7C,3H");
        let histogram = h.rank_histogram();
        assert_eq!(histogram.count(12), 2);
        assert_eq!(histogram.count(3), 1);
        assert_eq!(histogram.count(14), 0);
        assert_eq!(histogram.distinct(), 3);
        assert_eq!(histogram.max_count(), 2);
        let pairs: Vec<(u8, u8)> = histogram.iter().collect();
        assert_eq!(pairs, vec![(12, 2), (7, 2), (3, 1)]);
    }

    #[test]
    fn test_invalid_hands() {
        let cards = parse_cards("AS,KS,QS,JS,10S,9S").unwrap();
        for n in [4, 6] {
            assert!(matches!(
                evaluate(&cards[..n]),
                Err(PokerError::InvalidHand { .. })
            ));
        }
        assert!(matches!(
            Hand::parse("AS,KS,QS,JS,AS"),
            Err(PokerError::InvalidHand { .. })
        ));
    }

    #[test]
    fn test_trace_reports_rules_in_order() {
        let h = hand("2H,2D,2C,5S,5H");
        let mut checks = Vec::new();
        let category = h.classify_with(|check| checks.push(check));
        assert_eq!(category, HandCategory::FullHouse);
        let seen: Vec<HandCategory> = checks.iter().map(|c| c.category).collect();
        assert_eq!(
            seen,
            vec![
                HandCategory::RoyalFlush,
                HandCategory::StraightFlush,
                HandCategory::FourOfAKind,
                HandCategory::FullHouse,
            ]
        );
        assert!(checks.last().unwrap().matched);
        assert!(checks[..3].iter().all(|c| !c.matched));

        let high = hand("2C,5D,9H,JS,AD");
        let mut last = None;
        high.classify_with(|check| last = Some(check));
        assert_eq!(
            last,
            Some(RuleCheck {
                category: HandCategory::HighCard,
                matched: true
            })
        );
    }

    #[test]
    fn test_evaluation_is_cached() {
        let h = hand("AS,AD,KH,QC,JS");
        let first = h.evaluation();
        assert_eq!(h.evaluation(), first);
        assert_eq!(h.clone().evaluation(), first);
    }

    #[test]
    fn test_display_sorted() {
        assert_eq!(hand("2C,AD,10H,10S,5D").to_string(), "AD,10S,10H,5D,2C");
    }
}
