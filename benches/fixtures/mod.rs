// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use boardsmith::config::BoardConfig;
use boardsmith::layout::RouteRecord;
use boardsmith::model::{Board, Connection, ConnectionId, PathKind, Point, Tile, TileId, TileSize};

pub fn checksum_routes(routes: &[RouteRecord]) -> u64 {
    let mut acc = 0u64;
    for route in routes {
        acc = acc.wrapping_mul(131).wrapping_add(route.points.len() as u64);
        for point in route.display_points.iter().chain(route.icon_frame.iter()) {
            acc = acc.wrapping_add(point.x.abs() as u64);
            acc = acc.wrapping_add(point.y.abs() as u64);
        }
    }
    acc
}

pub mod board {
    use super::*;

    const COLUMN_PITCH: f64 = 1600.0;
    const ROW_PITCH: f64 = 1300.0;
    const KINDS: [PathKind; 3] = [PathKind::Blue, PathKind::Green, PathKind::Red];

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GridParams {
        pub cols: usize,
        pub rows: usize,
        /// Every n-th connection uses the directional kind (0 = never).
        pub directional_every: usize,
        /// Every n-th connection routes through a via-point (0 = never).
        pub via_every: usize,
        pub diagonals: bool,
    }

    impl GridParams {
        pub const fn new(
            cols: usize,
            rows: usize,
            directional_every: usize,
            via_every: usize,
            diagonals: bool,
        ) -> Self {
            Self {
                cols,
                rows,
                directional_every,
                via_every,
                diagonals,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        Medium,
        LargeDense,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::Medium => "medium",
                Self::LargeDense => "large_dense",
            }
        }

        pub const fn params(self) -> GridParams {
            match self {
                Self::Small => GridParams::new(4, 3, 5, 0, false),
                Self::Medium => GridParams::new(8, 6, 4, 3, false),
                Self::LargeDense => GridParams::new(16, 12, 3, 2, true),
            }
        }
    }

    fn tile_id(col: usize, row: usize) -> TileId {
        TileId::new(format!("room-{row:02}-{col:02}")).expect("valid tile id")
    }

    fn connection_id(index: usize) -> ConnectionId {
        ConnectionId::new(format!("path-{index:05}")).expect("valid connection id")
    }

    /// Deterministic grid of tiles, each linked to its right and lower neighbours.
    ///
    /// Spawns go to the first tiles in order; resources are dealt round-robin up to each quota.
    pub fn grid(params: GridParams, config: &BoardConfig) -> Board {
        assert!(params.cols >= 2 && params.rows >= 2, "grid must be at least 2x2");

        let mut tiles = Vec::with_capacity(params.cols * params.rows);
        for row in 0..params.rows {
            for col in 0..params.cols {
                let position =
                    Point::new(200.0 + col as f64 * COLUMN_PITCH, 200.0 + row as f64 * ROW_PITCH);
                let mut tile = Tile::new(tile_id(col, row), format!("Room {row}/{col}"), position);
                if (row + col) % 4 == 0 {
                    tile.set_size(TileSize::Large);
                }
                tiles.push(tile);
            }
        }

        for (slot, tile) in config.spawn_values().zip(tiles.iter_mut()) {
            tile.set_spawn(Some(slot));
        }

        let tile_count = tiles.len();
        let mut cursor = 0usize;
        for category in config.resource_categories() {
            for _ in 0..category.quota {
                let tile = &mut tiles[cursor % tile_count];
                let current = tile.resources().get(&category.name);
                tile.resources_mut().set(category.name.clone(), current + 1);
                cursor += 1;
            }
        }

        let mut pairs = Vec::new();
        for row in 0..params.rows {
            for col in 0..params.cols {
                if col + 1 < params.cols {
                    pairs.push(((col, row), (col + 1, row)));
                }
                if row + 1 < params.rows {
                    pairs.push(((col, row), (col, row + 1)));
                }
                if params.diagonals && col + 1 < params.cols && row + 1 < params.rows {
                    pairs.push(((col, row), (col + 1, row + 1)));
                }
            }
        }

        let mut connections = Vec::with_capacity(pairs.len());
        for (index, ((fc, fr), (tc, tr))) in pairs.into_iter().enumerate() {
            let directional =
                params.directional_every > 0 && index % params.directional_every == 0;
            let kind = if directional {
                config.directional_kind
            } else {
                KINDS[index % KINDS.len()]
            };

            let mut connection =
                Connection::new(connection_id(index), tile_id(fc, fr), tile_id(tc, tr), kind);
            if params.via_every > 0 && index % params.via_every == 1 {
                let x = 200.0 + (fc + tc) as f64 * COLUMN_PITCH / 2.0 + 300.0;
                let y = 200.0 + (fr + tr) as f64 * ROW_PITCH / 2.0 + 450.0;
                connection.set_via_point(Some(Point::new(x, y)));
            }
            connections.push(connection);
        }

        for connection in connections.iter_mut().take(config.breakable_quota) {
            connection.set_breakable(true);
        }

        Board::from_parts(tiles, connections)
    }

    pub fn fixture(case: Case, config: &BoardConfig) -> Board {
        grid(case.params(), config)
    }
}
