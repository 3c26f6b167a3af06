//! Monte Carlo equity estimation.
//!
//! # Overview
//!
//! Given each player's hole cards and an optional partial board, the
//! simulator repeatedly completes the board at random, finds every player's
//! best hand and credits the winner. A player's equity is the share of trials
//! they won, with tied trials split evenly among the tied players.
//!
//! # Example
//!
//! ```
//! use holdem_equity::equity::{Deal, EquitySimulator, SimulationConfig};
//!
//! let deal = Deal::parse(&["AS,AH", "KD,KC"], "").unwrap();
//! let config = SimulationConfig::default().with_trials(2_000).with_seed(1);
//! let result = EquitySimulator::new(config).unwrap().run(&deal).unwrap();
//! assert!(result.equities[0] > result.equities[1]);
//! ```

pub mod config;
pub mod result;
pub mod simulator;
pub mod sweep;

pub use config::{batch_sizes, SimulationConfig};
pub use result::{EquityResult, PlayerShowdown, Showdown};
pub use simulator::{simulate_equity, CancelToken, Deal, EquitySimulator};
pub use sweep::{opponent_hands, sweep, Matchup, SuitPattern, SweepResult};
