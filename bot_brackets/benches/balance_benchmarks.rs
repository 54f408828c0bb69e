use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use bot_brackets::{
    BracketScheduler, BracketsConfig,
    brackets::BracketTable,
    host::{CharacterId, CharacterKind, CharacterState, Faction, InMemoryWorld},
};

/// Random bots piled into the upper brackets, plus a few real players
fn setup_world(n_bots: usize) -> InMemoryWorld {
    InMemoryWorld::with_characters((0..n_bots).map(|i| {
        let faction = if i % 2 == 0 { Faction::Alliance } else { Faction::Horde };
        let kind = if i % 50 == 0 {
            CharacterKind::RealPlayer
        } else {
            CharacterKind::RandomBot
        };
        let level = 40 + (i % 41) as u8;
        CharacterState::new(i as CharacterId + 1, format!("Bot{i}"), level, faction, kind)
    }))
}

fn scheduler(dynamic: bool) -> BracketScheduler {
    let mut config = BracketsConfig {
        flagged_process_limit: 0,
        ..BracketsConfig::default()
    };
    config.dynamic.use_dynamic_distribution = dynamic;
    BracketScheduler::with_seed(config, 1).unwrap()
}

/// Benchmark a full scan with a fresh queue
fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    for n_bots in [100, 1_000, 10_000] {
        let world = setup_world(n_bots);
        group.bench_with_input(BenchmarkId::from_parameter(n_bots), &world, |b, world| {
            b.iter_batched(
                || scheduler(false),
                |mut s| s.scan(world),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark a scan with dynamic weighting enabled
fn bench_scan_dynamic(c: &mut Criterion) {
    let world = setup_world(1_000);
    c.bench_function("scan_dynamic_1000", |b| {
        b.iter_batched(
            || scheduler(true),
            |mut s| s.scan(&world),
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark draining a full queue
fn bench_drain(c: &mut Criterion) {
    c.bench_function("drain_1000", |b| {
        b.iter_batched(
            || {
                let world = setup_world(1_000);
                let mut s = scheduler(false);
                s.scan(&world);
                (s, world)
            },
            |(mut s, mut world)| s.drain(&mut world),
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark normalization of a badly skewed table
fn bench_normalize(c: &mut Criterion) {
    let ranges = BracketsConfig::default().alliance_ranges;
    c.bench_function("clamp_and_normalize", |b| {
        b.iter_batched(
            || BracketTable::new(ranges.clone()),
            |mut table| table.clamp_and_normalize(1, 80),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(balancing, bench_scan, bench_scan_dynamic, bench_drain);

criterion_group!(tables, bench_normalize);

criterion_main!(balancing, tables);
