// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::board::Board;
use super::connection::{Connection, PathKind};
use super::geometry::Point;
use super::ids::{ConnectionId, TileId};
use super::tile::{SpawnSlot, Tile};
use crate::config::BoardConfig;

pub(crate) fn tid(value: &str) -> TileId {
    TileId::new(value).expect("tile id")
}

pub(crate) fn cid(value: &str) -> ConnectionId {
    ConnectionId::new(value).expect("connection id")
}

pub(crate) fn tile_at(id: &str, x: f64, y: f64) -> Tile {
    Tile::new(tid(id), id.to_uppercase(), Point::new(x, y))
}

pub(crate) fn link(id: &str, from: &str, to: &str, kind: PathKind) -> Connection {
    Connection::new(cid(id), tid(from), tid(to), kind)
}

/// A -> B two-way, B -> C one-way, C -> D breakable.
pub(crate) fn reachability_board() -> Board {
    let tiles = vec![
        tile_at("a", 0.0, 0.0),
        tile_at("b", 2000.0, 0.0),
        tile_at("c", 4000.0, 0.0),
        tile_at("d", 6000.0, 0.0),
    ];
    let mut breakable = link("p:cd", "c", "d", PathKind::Red);
    breakable.set_breakable(true);
    let connections = vec![
        link("p:ab", "a", "b", PathKind::Blue),
        link("p:bc", "b", "c", PathKind::Yellow),
        breakable,
    ];
    Board::from_parts(tiles, connections)
}

/// Six tiles in a ring that satisfy every validation rule of the default config.
pub(crate) fn valid_board(config: &BoardConfig) -> Board {
    let mut tiles = (0..6)
        .map(|idx| {
            let mut tile = tile_at(&format!("t{idx}"), 200.0 + idx as f64 * 1100.0, 400.0);
            tile.set_spawn(Some(SpawnSlot::new(idx as u8)));
            tile
        })
        .collect::<Vec<_>>();

    for category in config.resource_categories() {
        let mut remaining = category.quota;
        let mut idx = 0;
        while remaining > 0 {
            let tile = &mut tiles[idx % 6];
            let current = tile.resources().get(&category.name);
            tile.resources_mut().set(category.name.clone(), current + 1);
            remaining -= 1;
            idx += 1;
        }
    }

    let mut connections = (0..6)
        .map(|idx| {
            link(
                &format!("p{idx}"),
                &format!("t{idx}"),
                &format!("t{}", (idx + 1) % 6),
                PathKind::Blue,
            )
        })
        .collect::<Vec<_>>();
    for connection in connections.iter_mut().take(config.breakable_quota) {
        connection.set_breakable(true);
    }

    Board::from_parts(tiles, connections)
}
