//! Command-line front end.
//!
//! ```text
//! holdem_equity eval AS,KS,QS,JS,10S
//! holdem_equity best 2C,2D,2S,9H,9D,KC,4S
//! holdem_equity deal -p AS,AH -p 2C,7D --flop 3C,8D,KH
//! holdem_equity equity -p AS,AH -p 2C,7D --trials 20000 --seed 1
//! holdem_equity sweep --hero 2C,2D --suits SH --trials 1000
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use holdem_equity::cards::{parse_cards, Board, Card, HoleCards};
use holdem_equity::equity::{sweep, Deal, EquitySimulator, SimulationConfig, SuitPattern};
use holdem_equity::eval::{best_of_seven, Hand};
use holdem_equity::Result;

#[derive(Parser)]
#[command(name = "holdem_equity", about = "Hold'em hand ranking and Monte Carlo equity")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank exactly five cards
    Eval {
        /// Comma-separated cards, e.g. AS,KS,QS,JS,10S
        cards: String,
        /// Show every rule checked
        #[arg(long)]
        trace: bool,
    },
    /// Pick the best five of seven cards
    Best {
        /// Seven comma-separated cards
        cards: String,
    },
    /// Deal one random board and show the showdown
    Deal {
        #[command(flatten)]
        table: TableArgs,
        /// Seed for the deal
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Estimate every player's equity
    Equity {
        #[command(flatten)]
        table: TableArgs,
        #[command(flatten)]
        sim: SimArgs,
    },
    /// Hero against every opponent hand with a given pair of suits
    Sweep {
        /// Hero hole cards
        #[arg(long)]
        hero: String,
        /// Opponent suits, e.g. SH; omit for every opponent hand
        #[arg(long)]
        suits: Option<String>,
        /// Flop cards
        #[arg(long)]
        flop: Option<String>,
        /// Turn card (requires --flop)
        #[arg(long)]
        turn: Option<String>,
        #[command(flatten)]
        sim: SimArgs,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Player hole cards, one flag per player (e.g. -p AS,AH -p 2C,7D)
    #[arg(short, long = "player", required = true)]
    players: Vec<String>,
    /// Flop cards
    #[arg(long)]
    flop: Option<String>,
    /// Turn card (requires --flop)
    #[arg(long)]
    turn: Option<String>,
}

#[derive(Args)]
struct SimArgs {
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    trials: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    threads: Option<usize>,
    /// Stop after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,
    /// Write the result as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl SimArgs {
    fn config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(trials) = self.trials {
            config = config.with_trials(trials);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        config.validate()?;
        Ok(config)
    }
}

fn board_from_args(flop: Option<&str>, turn: Option<&str>) -> Result<Board> {
    let flop = flop.map(parse_cards).transpose()?;
    let turn = turn.map(Card::parse).transpose()?;
    Board::from_streets(flop.as_deref(), turn)
}

impl TableArgs {
    fn deal(&self) -> Result<Deal> {
        let players = self
            .players
            .iter()
            .map(|p| HoleCards::parse(p))
            .collect::<Result<Vec<_>>>()?;
        let board = board_from_args(self.flop.as_deref(), self.turn.as_deref())?;
        Deal::new(players, board)
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Eval { cards, trace } => {
            let hand = Hand::parse(&cards)?;
            if trace {
                hand.classify_with(|check| {
                    println!(
                        "  {:<16} {}",
                        check.category.name(),
                        if check.matched { "yes" } else { "no" }
                    )
                });
            }
            let eval = hand.evaluation();
            println!(
                "{} -> {} (category {}, score {})",
                hand,
                eval.category,
                eval.category.value(),
                eval.score
            );
        }
        Command::Best { cards } => {
            let (hand, score) = best_of_seven(&parse_cards(&cards)?)?;
            println!("{} -> {} ({}, score {})", cards, hand, hand.category(), score);
        }
        Command::Deal { table, seed } => {
            let deal = table.deal()?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            print!("{}", deal.deal(&mut rng));
        }
        Command::Equity { table, sim } => {
            let deal = table.deal()?;
            let start = Instant::now();
            let result = EquitySimulator::new(sim.config()?)?.run(&deal)?;
            println!("{}", result);
            println!("Time: {:.2}s", start.elapsed().as_secs_f64());
            if let Some(path) = &sim.json {
                result.save_json(path)?;
                println!("Saved JSON: {}", path.display());
            }
        }
        Command::Sweep {
            hero,
            suits,
            flop,
            turn,
            sim,
        } => {
            let hero = HoleCards::parse(&hero)?;
            let board = board_from_args(flop.as_deref(), turn.as_deref())?;
            let suits = suits.as_deref().map(SuitPattern::parse).transpose()?;
            let config = sim.config()?;

            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} matchups [{elapsed_precise}]")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let result = sweep(
                &hero,
                &board,
                suits,
                &config,
                Some(|done: usize, total: usize| {
                    bar.set_length(total as u64);
                    bar.set_position(done as u64);
                }),
            )?;
            bar.finish_and_clear();

            println!(
                "{} vs {} opponent hands: hero {:.2}%, opponents {:.2}%",
                result.hero,
                result.matchups.len(),
                result.average[0] * 100.0,
                result.average[1] * 100.0
            );
            if result.stopped_early {
                println!("Stopped early by the time limit");
            }
            if let Some(path) = &sim.json {
                result.save_json(path)?;
                println!("Saved JSON: {}", path.display());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
