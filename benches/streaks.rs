use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use mma_dataset::history::{FighterPage, HistoryRow, reconstruct, streaks_from_results};

fn long_career(rows: usize) -> FighterPage {
    let mut listing = Vec::with_capacity(rows + 1);
    listing.push(HistoryRow {
        result: "WIN".to_string(),
        fighter_a: "Alice Ash".to_string(),
        fighter_b: "Bea Blue".to_string(),
    });
    for i in 0..rows {
        listing.push(HistoryRow {
            result: if i % 3 == 0 { "LOSS" } else { "WIN" }.to_string(),
            fighter_a: "Alice Ash".to_string(),
            fighter_b: format!("Opponent {i}"),
        });
    }
    FighterPage {
        own_name: "Alice Ash".to_string(),
        rows: listing,
    }
}

fn bench_streaks(c: &mut Criterion) {
    let page = long_career(500);

    c.bench_function("reconstruct_500_row_history", |b| {
        b.iter(|| reconstruct(black_box(&page), black_box("Bea Blue")))
    });

    let results = (0..500)
        .map(|i| if i % 4 == 0 { "LOSS" } else { "WIN" })
        .collect::<Vec<_>>();
    c.bench_function("streak_walk_500_results", |b| {
        b.iter(|| streaks_from_results(black_box(&results).iter().copied()))
    });
}

criterion_group!(benches, bench_streaks);
criterion_main!(benches);
