use criterion::{criterion_group, criterion_main, Criterion};
use puzzle_sat::coloring::solver::MapColoring;
use puzzle_sat::cryptarithm::solver::Cryptarithm;
use puzzle_sat::csp::encode::Encoding;
use puzzle_sat::csp::solver::solve;
use puzzle_sat::queens::solver::Queens;
use puzzle_sat::sudoku::solver::{Board, Sudoku, EXAMPLE};
use std::hint::black_box;
use std::time::Duration;

fn bench_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("queens - board size");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(20));

    for n in [8, 12, 16] {
        let (model, _) = Queens::new(n).to_model();
        group.bench_function(format!("{n}x{n}"), |b| {
            b.iter(|| {
                let outcome = solve(&model).unwrap();
                black_box(outcome);
            })
        });
    }

    group.finish();
}

fn bench_sudoku(c: &mut Criterion) {
    let sudoku = Sudoku::new(Board::from(EXAMPLE));
    let (model, _) = sudoku.to_model();

    c.bench_function("sudoku - project euler 96 grid 1", |b| {
        b.iter(|| {
            let outcome = solve(&model).unwrap();
            black_box(outcome);
        })
    });
}

fn bench_coloring(c: &mut Criterion) {
    let map = MapColoring::australia(3);
    let (model, _) = map.to_model();

    c.bench_function("coloring - australia, 3 colors", |b| {
        b.iter(|| {
            let outcome = solve(&model).unwrap();
            black_box(outcome);
        })
    });
}

fn bench_cryptarithm(c: &mut Criterion) {
    let mut group = c.benchmark_group("cryptarithm");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(20));

    for puzzle in ["TWO+TWO=FOUR", "SEND+MORE=MONEY"] {
        let (model, _) = Cryptarithm::parse(puzzle).to_model();
        group.bench_function(puzzle, |b| {
            b.iter(|| {
                let outcome = solve(&model).unwrap();
                black_box(outcome);
            })
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let (model, _) = Queens::new(64).to_model();

    c.bench_function("encode - 64x64 queens", |b| {
        b.iter(|| {
            let encoding = Encoding::new(&model);
            black_box(encoding);
        })
    });
}

criterion_group!(
    benches,
    bench_queens,
    bench_sudoku,
    bench_coloring,
    bench_cryptarithm,
    bench_encode
);

criterion_main!(benches);
