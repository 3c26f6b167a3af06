//! Monte Carlo equity simulation.
//!
//! Each trial completes the board with cards drawn uniformly without
//! replacement from the undealt deck, picks every player's best hand and
//! credits the winner(s). Trials are split into batches; every batch owns its
//! RNG and its counters, runs on the rayon pool, and the per-batch tallies are
//! summed at the end.

use super::config::{batch_sizes, SimulationConfig};
use super::result::{EquityResult, PlayerShowdown, Showdown, Tally};
use crate::cards::card::RANK_2;
use crate::cards::{find_duplicate, remaining, Board, Card, HoleCards, Suit};
use crate::eval::best::{best_hand, seven_cards};
use crate::error::{PokerError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Minimum number of players in a deal.
pub const MIN_PLAYERS: usize = 2;

/// A validated starting position: every player's hole cards, the known board
/// and the cards still in the deck.
#[derive(Debug, Clone)]
pub struct Deal {
    players: Vec<HoleCards>,
    board: Board,
    undealt: Vec<Card>,
}

impl Deal {
    /// Validate players and board.
    ///
    /// Fails with `InvalidInput` for fewer than two players, `DuplicateCard`
    /// if any card is held twice across players and board, and
    /// `DeckExhaustion` if the deck cannot complete the board.
    pub fn new(players: Vec<HoleCards>, board: Board) -> Result<Self> {
        if players.len() < MIN_PLAYERS {
            return Err(PokerError::InvalidInput {
                detail: format!(
                    "need at least {} players, got {}",
                    MIN_PLAYERS,
                    players.len()
                ),
            });
        }
        let dealt: Vec<Card> = players
            .iter()
            .flat_map(|p| p.cards())
            .chain(board.cards().iter().copied())
            .collect();
        if let Some(card) = find_duplicate(&dealt) {
            return Err(PokerError::DuplicateCard { card });
        }
        let undealt = remaining(&dealt)?;
        let needed = board.missing();
        if undealt.len() < needed {
            return Err(PokerError::DeckExhaustion {
                needed,
                available: undealt.len(),
            });
        }
        Ok(Self {
            players,
            board,
            undealt,
        })
    }

    /// Parse hole-card pairs (`"AS,AH"`) and a board (`""`, a flop or flop plus turn).
    pub fn parse(players: &[&str], board: &str) -> Result<Self> {
        let players = players
            .iter()
            .map(|p| HoleCards::parse(p))
            .collect::<Result<Vec<_>>>()?;
        Self::new(players, Board::parse(board)?)
    }

    /// Players' hole cards in seat order.
    pub fn players(&self) -> &[HoleCards] {
        &self.players
    }

    /// Known community cards.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cards that can still be drawn.
    pub fn undealt(&self) -> &[Card] {
        &self.undealt
    }

    /// Deal one random completion of the board and settle the showdown.
    pub fn deal<R: Rng + ?Sized>(&self, rng: &mut R) -> Showdown {
        let known = self.board.cards();
        let mut community = [Card::from_parts(RANK_2, Suit::Spade); 5];
        community[..known.len()].copy_from_slice(known);
        let drawn = self.undealt.choose_multiple(rng, self.board.missing());
        for (slot, card) in community[known.len()..].iter_mut().zip(drawn) {
            *slot = *card;
        }

        let players: Vec<PlayerShowdown> = self
            .players
            .iter()
            .map(|hole| {
                let (best, score) = best_hand(&seven_cards(hole, &community));
                PlayerShowdown {
                    hole: *hole,
                    best,
                    score,
                }
            })
            .collect();

        let top = players.iter().map(|p| p.score).max();
        let winners = players
            .iter()
            .enumerate()
            .filter(|(_, p)| Some(p.score) == top)
            .map(|(i, _)| i)
            .collect();

        Showdown {
            community,
            players,
            winners,
        }
    }
}

/// Shared flag that asks a running simulation to stop between trials.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the simulation to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Runs equity simulations under a [`SimulationConfig`].
///
/// If the run is cancelled or hits its time limit, the result reports
/// fractions over the trials actually completed and sets `stopped_early`.
/// Stopping before any trial completes is an error.
#[derive(Debug, Clone)]
pub struct EquitySimulator {
    config: SimulationConfig,
    cancel: CancelToken,
}

impl EquitySimulator {
    /// Create a simulator after validating `config`.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancelToken::new(),
        })
    }

    /// Use an externally owned cancel token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this simulator's runs.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Estimate every player's equity for `deal`.
    pub fn run(&self, deal: &Deal) -> Result<EquityResult> {
        let deadline = self.config.time_limit().map(|limit| Instant::now() + limit);
        self.run_until(deal, deadline)
    }

    /// Like [`EquitySimulator::run`], but stops at an externally fixed
    /// `deadline` instead of one derived from the config's time limit.
    pub(crate) fn run_until(&self, deal: &Deal, deadline: Option<Instant>) -> Result<EquityResult> {
        let start = Instant::now();
        let sizes = batch_sizes(self.config.trials, self.config.batch_count());
        let num_players = deal.players().len();

        log::debug!(
            "simulating {} players, board [{}], {} trials in {} batches",
            num_players,
            deal.board(),
            self.config.trials,
            sizes.len()
        );

        let work = || {
            sizes
                .par_iter()
                .enumerate()
                .map(|(batch, &trials)| self.run_batch(deal, batch, trials, deadline))
                .reduce(|| Tally::new(num_players), Tally::merge)
        };
        let tally = match self.config.num_threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| PokerError::ThreadPool(e.to_string()))?
                .install(work),
            None => work(),
        };

        if tally.trials == 0 {
            return Err(PokerError::Cancelled { trials: 0 });
        }
        if tally.trials < self.config.trials {
            log::warn!(
                "simulation stopped after {} of {} trials",
                tally.trials,
                self.config.trials
            );
        }
        log::debug!(
            "simulated {} trials in {:.3}s",
            tally.trials,
            start.elapsed().as_secs_f64()
        );

        Ok(EquityResult::from_tally(
            deal.players().to_vec(),
            deal.board().clone(),
            tally,
            self.config.trials,
        ))
    }

    fn run_batch(&self, deal: &Deal, batch: usize, trials: u64, deadline: Option<Instant>) -> Tally {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(batch as u64)),
            None => StdRng::from_entropy(),
        };
        let mut tally = Tally::new(deal.players().len());
        for _ in 0..trials {
            if self.should_stop(deadline) {
                break;
            }
            let showdown = deal.deal(&mut rng);
            tally.record(&showdown.winners);
        }
        tally
    }

    fn should_stop(&self, deadline: Option<Instant>) -> bool {
        self.cancel.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Estimate each player's win fraction over `trials` random board completions.
///
/// Ties award `1/k` of the trial to each of the `k` tied players, so the
/// fractions sum to 1.
pub fn simulate_equity(players: &[HoleCards], board: &Board, trials: u64) -> Result<Vec<f64>> {
    let deal = Deal::new(players.to_vec(), board.clone())?;
    let simulator = EquitySimulator::new(SimulationConfig::default().with_trials(trials))?;
    Ok(simulator.run(&deal)?.equities)
}
