// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use boardsmith::config::BoardConfig;
use boardsmith::model::{ConnectionId, PathKind, Point, TileId};
use boardsmith::ops::{apply_ops, ConnectionOp, Op, TileOp};
use boardsmith::query::reachability;
use boardsmith::validate::validate_board;

mod fixtures;
mod profiler;

use fixtures::board::Case;

// Benchmark identity (keep stable):
// - Group names in this file: `validate.board`, `query.reachability`, `ops.apply`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time.
fn benches_validate(c: &mut Criterion) {
    let config = BoardConfig::default();
    let cases = [Case::Small, Case::Medium, Case::LargeDense];

    {
        let mut group = c.benchmark_group("validate.board");

        for case in cases {
            let board = fixtures::board::fixture(case, &config);
            group.throughput(Throughput::Elements(board.tiles().len() as u64));
            group.bench_function(case.id(), |b| {
                b.iter(|| black_box(validate_board(black_box(&board), black_box(&config)).len()))
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("query.reachability");

        for case in cases {
            let board = fixtures::board::fixture(case, &config);
            let source = board.tiles()[0].tile_id().clone();
            group.throughput(Throughput::Elements(board.connections().len() as u64));
            group.bench_function(case.id(), |b| {
                b.iter(|| {
                    let distances = reachability(black_box(&board), &config, black_box(&source));
                    black_box(distances.values().sum::<usize>())
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("ops.apply");

        for case in cases {
            let board = fixtures::board::fixture(case, &config);
            let ops = edit_burst(&board.tiles()[0].tile_id().clone());
            group.throughput(Throughput::Elements(ops.len() as u64));
            group.bench_function(case.id(), |b| {
                b.iter_batched(
                    || board.clone(),
                    |mut board| {
                        let base_rev = board.rev();
                        let result = apply_ops(&mut board, base_rev, black_box(&ops), &config)
                            .expect("apply_ops");
                        black_box(result.applied)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.finish();
    }
}

/// Adds a tile, links it to `anchor`, drags it around and removes it again.
fn edit_burst(anchor: &TileId) -> Vec<Op> {
    let tile_id = TileId::new("bench-room").expect("valid tile id");
    let connection_id = ConnectionId::new("bench-path").expect("valid connection id");

    let mut ops = vec![
        Op::Tile(TileOp::Add {
            tile_id: tile_id.clone(),
            name: "Bench".to_owned(),
            center: Point::new(3000.0, 4000.0),
        }),
        Op::Connection(ConnectionOp::Add {
            connection_id,
            from_tile_id: anchor.clone(),
            to_tile_id: tile_id.clone(),
            kind: PathKind::Blue,
        }),
    ];
    for step in 0..16 {
        ops.push(Op::Tile(TileOp::Move {
            tile_id: tile_id.clone(),
            position: Point::new(1000.0 + step as f64 * 150.0, 3000.0),
        }));
    }
    ops.push(Op::Tile(TileOp::Remove { tile_id }));
    ops
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_validate
}
criterion_main!(benches);
