//! Benchmarks for hand evaluation and equity simulation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use holdem_equity::cards::parse_cards;
use holdem_equity::equity::{Deal, EquitySimulator, SimulationConfig};
use holdem_equity::eval::{best_of_seven, evaluate};

fn evaluate_benchmark(c: &mut Criterion) {
    let cards = parse_cards("QH,QD,7S,7C,3H").unwrap();
    c.bench_function("evaluate_5", |b| b.iter(|| evaluate(black_box(&cards))));
}

fn best_of_seven_benchmark(c: &mut Criterion) {
    let cards = parse_cards("2C,2D,2S,9H,9D,KC,4S").unwrap();
    c.bench_function("best_of_seven", |b| b.iter(|| best_of_seven(black_box(&cards))));
}

fn equity_benchmark(c: &mut Criterion) {
    let deal = Deal::parse(&["AS,AH", "2C,7D"], "").unwrap();
    let config = SimulationConfig::default().with_trials(10_000).with_seed(42);
    let simulator = EquitySimulator::new(config).unwrap();

    let mut group = c.benchmark_group("equity");
    group.sample_size(10);
    group.bench_function("heads_up_10000_trials", |b| {
        b.iter(|| simulator.run(black_box(&deal)))
    });
    group.finish();
}

criterion_group!(benches, evaluate_benchmark, best_of_seven_benchmark, equity_benchmark);
criterion_main!(benches);
