//! Hero hand against a whole family of opponent hands.
//!
//! Every opponent hole pair that can be dealt from the remaining deck (and,
//! optionally, whose two cards carry a given pair of suits) is simulated
//! heads-up against the hero. The per-matchup equities are then averaged.

use super::config::SimulationConfig;
use super::simulator::{Deal, EquitySimulator};
use crate::cards::{remaining, Board, Card, HoleCards, Suit};
use crate::error::{PokerError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Unordered pair of suits an opponent's two cards must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitPattern(pub Suit, pub Suit);

impl SuitPattern {
    /// Check whether two cards carry exactly these suits, in either order.
    pub fn matches(&self, a: Card, b: Card) -> bool {
        (a.suit() == self.0 && b.suit() == self.1) || (a.suit() == self.1 && b.suit() == self.0)
    }

    /// Parse two suit letters, e.g. `"SH"`.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || PokerError::InvalidInput {
            detail: format!("suit pattern must be two suit letters, got '{}'", s),
        };
        let mut chars = s.trim().chars();
        let first = chars.next().and_then(Suit::from_token).ok_or_else(invalid)?;
        let second = chars.next().and_then(Suit::from_token).ok_or_else(invalid)?;
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(first, second))
    }
}

/// Hero equity against one opponent hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// Opponent hole cards.
    pub opponent: HoleCards,
    /// Hero's equity in this matchup.
    pub hero_equity: f64,
    /// Opponent's equity in this matchup.
    pub opponent_equity: f64,
    /// Trials completed for this matchup.
    pub trials: u64,
}

/// Equities of a hero hand against every opponent in a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Hero hole cards.
    pub hero: HoleCards,
    /// Known community cards.
    pub board: Board,
    /// Opponent suit filter, if any.
    pub suits: Option<SuitPattern>,
    /// Completed matchups in opponent order.
    pub matchups: Vec<Matchup>,
    /// Mean `[hero, opponent]` equity over the completed matchups.
    pub average: [f64; 2],
    /// Set when the time limit cut the sweep short.
    pub stopped_early: bool,
}

impl SweepResult {
    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

/// Every opponent hole pair left in the deck once `hero` and `board` are dealt.
pub fn opponent_hands(
    hero: &HoleCards,
    board: &Board,
    suits: Option<SuitPattern>,
) -> Result<Vec<HoleCards>> {
    let mut dealt = hero.cards().to_vec();
    dealt.extend_from_slice(board.cards());
    let deck = remaining(&dealt)?;

    let mut hands = Vec::new();
    for (i, &a) in deck.iter().enumerate() {
        for &b in &deck[i + 1..] {
            if suits.map_or(true, |pattern| pattern.matches(a, b)) {
                hands.push(HoleCards::new(a, b)?);
            }
        }
    }
    Ok(hands)
}

/// Simulate `hero` against every opponent from [`opponent_hands`].
///
/// Matchups run in parallel, each with `config.trials` trials. When a seed is
/// set, matchup `i` uses its own derived seed so the sweep is reproducible.
/// `progress` is called with `(completed, total)` after each matchup.
///
/// `config.time_limit_ms` bounds the whole sweep: one deadline is shared by
/// every matchup, matchups not started by then are skipped, and the averages
/// cover only the matchups that completed at least one trial.
pub fn sweep<F>(
    hero: &HoleCards,
    board: &Board,
    suits: Option<SuitPattern>,
    config: &SimulationConfig,
    progress: Option<F>,
) -> Result<SweepResult>
where
    F: Fn(usize, usize) + Sync,
{
    config.validate()?;
    let opponents = opponent_hands(hero, board, suits)?;
    if opponents.is_empty() {
        return Err(PokerError::InvalidInput {
            detail: format!("no opponent hands match suits {:?}", suits),
        });
    }
    log::info!(
        "sweeping {} against {} opponent hands",
        hero,
        opponents.len()
    );

    let total = opponents.len();
    let completed = AtomicUsize::new(0);
    let deadline = config.time_limit().map(|limit| Instant::now() + limit);
    let matchup_config = SimulationConfig {
        num_threads: None,
        time_limit_ms: None,
        ..config.clone()
    };

    let run = || {
        opponents
            .par_iter()
            .enumerate()
            .map(|(i, opponent)| -> Result<Option<Matchup>> {
                let outcome = if deadline.is_some_and(|d| Instant::now() >= d) {
                    None
                } else {
                    let mut cfg = matchup_config.clone();
                    cfg.seed = config.seed.map(|s| s.wrapping_add((i as u64) << 32));
                    let deal = Deal::new(vec![*hero, *opponent], board.clone())?;
                    match EquitySimulator::new(cfg)?.run_until(&deal, deadline) {
                        Ok(result) => Some(Matchup {
                            opponent: *opponent,
                            hero_equity: result.equities[0],
                            opponent_equity: result.equities[1],
                            trials: result.trials_completed,
                        }),
                        Err(PokerError::Cancelled { .. }) => None,
                        Err(e) => return Err(e),
                    }
                };

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(callback) = &progress {
                    callback(done, total);
                }
                Ok(outcome)
            })
            .collect::<Result<Vec<_>>>()
    };
    let outcomes = match config.num_threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| PokerError::ThreadPool(e.to_string()))?
            .install(run)?,
        None => run()?,
    };
    let matchups: Vec<Matchup> = outcomes.into_iter().flatten().collect();
    if matchups.is_empty() {
        return Err(PokerError::Cancelled { trials: 0 });
    }
    let stopped_early =
        matchups.len() < total || matchups.iter().any(|m| m.trials < config.trials);
    if stopped_early {
        log::warn!(
            "sweep stopped after {} of {} matchups",
            matchups.len(),
            total
        );
    }

    let n = matchups.len() as f64;
    let average = [
        matchups.iter().map(|m| m.hero_equity).sum::<f64>() / n,
        matchups.iter().map(|m| m.opponent_equity).sum::<f64>() / n,
    ];

    Ok(SweepResult {
        hero: *hero,
        board: board.clone(),
        suits,
        matchups,
        average,
        stopped_early,
    })
}
