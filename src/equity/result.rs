//! Simulation outcomes: per-trial showdowns and aggregated equities.

use crate::cards::{format_cards, Board, Card, HoleCards};
use crate::eval::{Hand, HandCategory, Score};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One player's cards and best hand in a single deal.
#[derive(Debug, Clone)]
pub struct PlayerShowdown {
    /// Player's hole cards.
    pub hole: HoleCards,
    /// Best five of the player's seven cards.
    pub best: Hand,
    /// Score of `best`.
    pub score: Score,
}

impl PlayerShowdown {
    /// Category of the player's best hand.
    pub fn category(&self) -> HandCategory {
        self.score.category()
    }
}

/// A single dealt trial: the completed board, each player's best hand and the
/// winner(s). Only lives for the duration of one trial unless a caller keeps it.
#[derive(Debug, Clone)]
pub struct Showdown {
    /// Completed five-card board.
    pub community: [Card; 5],
    /// Per-player results in seat order.
    pub players: Vec<PlayerShowdown>,
    /// Indices of the players holding the top score; more than one on a tie.
    pub winners: Vec<usize>,
}

impl Showdown {
    /// Check if the pot was split.
    pub fn is_tie(&self) -> bool {
        self.winners.len() > 1
    }
}

impl fmt::Display for Showdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board: {}", format_cards(&self.community))?;
        for (i, player) in self.players.iter().enumerate() {
            let marker = if self.winners.contains(&i) { "*" } else { " " };
            writeln!(
                f,
                "{} P{} {} -> {} ({})",
                marker,
                i + 1,
                player.hole,
                player.best,
                player.category()
            )?;
        }
        Ok(())
    }
}

/// Win counters accumulated over a set of trials.
///
/// Only integer counts are kept, so merging is exact: commutative and
/// associative, and batches can be reduced in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Tally {
    pub trials: u64,
    pub wins: Vec<u64>,
    pub ties: Vec<u64>,
    /// `splits[p][k]`: trials player `p` shared with `k - 1` others.
    pub splits: Vec<Vec<u64>>,
}

impl Tally {
    pub fn new(players: usize) -> Self {
        Self {
            trials: 0,
            wins: vec![0; players],
            ties: vec![0; players],
            splits: vec![vec![0; players + 1]; players],
        }
    }

    /// Credit one trial: a sole winner takes it, `k` tied players each record a `k`-way split.
    pub fn record(&mut self, winners: &[usize]) {
        self.trials += 1;
        let k = winners.len();
        for &w in winners {
            if k == 1 {
                self.wins[w] += 1;
            } else {
                self.ties[w] += 1;
                self.splits[w][k] += 1;
            }
        }
    }

    pub fn merge(mut self, other: Tally) -> Tally {
        self.trials += other.trials;
        for (a, b) in self.wins.iter_mut().zip(other.wins) {
            *a += b;
        }
        for (a, b) in self.ties.iter_mut().zip(other.ties) {
            *a += b;
        }
        for (row, other_row) in self.splits.iter_mut().zip(other.splits) {
            for (a, b) in row.iter_mut().zip(other_row) {
                *a += b;
            }
        }
        self
    }

    /// Pot shares won by player `p`: outright wins plus `1/k` per `k`-way split.
    pub fn shares(&self, p: usize) -> f64 {
        self.splits[p]
            .iter()
            .enumerate()
            .skip(2)
            .fold(self.wins[p] as f64, |acc, (k, &n)| acc + n as f64 / k as f64)
    }
}

/// Aggregated equity estimate for every player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Players' hole cards in seat order.
    pub players: Vec<HoleCards>,
    /// Known community cards the simulation started from.
    pub board: Board,
    /// Win fraction per player, ties split evenly; sums to 1.
    pub equities: Vec<f64>,
    /// Trials each player won outright.
    pub wins: Vec<u64>,
    /// Trials each player tied for the top score.
    pub ties: Vec<u64>,
    /// Trials asked for by the configuration.
    pub trials_requested: u64,
    /// Denominator of `equities`; smaller than requested when stopped early.
    pub trials_completed: u64,
    /// Set when cancellation or the time limit ended the run.
    pub stopped_early: bool,
}

impl EquityResult {
    pub(crate) fn from_tally(
        players: Vec<HoleCards>,
        board: Board,
        tally: Tally,
        trials_requested: u64,
    ) -> Self {
        let completed = tally.trials.max(1) as f64;
        Self {
            equities: (0..tally.wins.len())
                .map(|p| tally.shares(p) / completed)
                .collect(),
            stopped_early: tally.trials < trials_requested,
            trials_completed: tally.trials,
            wins: tally.wins,
            ties: tally.ties,
            trials_requested,
            players,
            board,
        }
    }

    /// Equity of player `index`, if present.
    pub fn equity(&self, index: usize) -> Option<f64> {
        self.equities.get(index).copied()
    }

    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}

impl fmt::Display for EquityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.board.is_empty() {
            writeln!(f, "Board: {}", self.board)?;
        }
        for (i, hole) in self.players.iter().enumerate() {
            writeln!(
                f,
                "P{} {:<8} equity {:>6.2}%  wins {:>8}  ties {:>8}",
                i + 1,
                hole.to_string(),
                self.equities[i] * 100.0,
                self.wins[i],
                self.ties[i]
            )?;
        }
        write!(f, "Trials: {}/{}", self.trials_completed, self.trials_requested)?;
        if self.stopped_early {
            write!(f, " (stopped early)")?;
        }
        Ok(())
    }
}
