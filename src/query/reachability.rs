// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use crate::config::BoardConfig;
use crate::model::{Board, TileId};

/// Walkable adjacency of the board.
///
/// Breakable connections are left out. Every other connection is an edge
/// `from -> to`; non-directional kinds also get `to -> from`. Connections
/// touching a tile that is not on the board are ignored.
pub fn walk_adjacency(board: &Board, config: &BoardConfig) -> BTreeMap<TileId, Vec<TileId>> {
    let mut adjacency: BTreeMap<TileId, BTreeSet<TileId>> = board
        .tiles()
        .iter()
        .map(|tile| (tile.tile_id().clone(), BTreeSet::new()))
        .collect();

    for connection in board.connections() {
        if connection.breakable() {
            continue;
        }
        let from = connection.from_tile_id();
        let to = connection.to_tile_id();
        if !adjacency.contains_key(from) || !adjacency.contains_key(to) {
            continue;
        }
        if let Some(neighbors) = adjacency.get_mut(from) {
            neighbors.insert(to.clone());
        }
        if !config.is_directional(connection.kind()) {
            if let Some(neighbors) = adjacency.get_mut(to) {
                neighbors.insert(from.clone());
            }
        }
    }

    adjacency
        .into_iter()
        .map(|(tile_id, neighbors)| (tile_id, neighbors.into_iter().collect()))
        .collect()
}

fn bfs_distances(
    adjacency: &BTreeMap<TileId, Vec<TileId>>,
    start: &TileId,
) -> BTreeMap<TileId, usize> {
    let mut dist: BTreeMap<TileId, usize> = BTreeMap::new();
    if !adjacency.contains_key(start) {
        return dist;
    }

    let mut queue: VecDeque<(TileId, usize)> = VecDeque::new();
    dist.insert(start.clone(), 0);
    queue.push_back((start.clone(), 0));

    while let Some((tile_id, distance)) = queue.pop_front() {
        let next_distance = distance.saturating_add(1);
        for next_id in adjacency.get(&tile_id).into_iter().flatten() {
            if dist.contains_key(next_id) {
                continue;
            }
            dist.insert(next_id.clone(), next_distance);
            queue.push_back((next_id.clone(), next_distance));
        }
    }

    dist
}

/// Hop distance from `source` to every tile a player can walk to.
///
/// The source itself is at distance 0; unreachable tiles are absent. An
/// unknown source yields an empty map.
pub fn reachability(
    board: &Board,
    config: &BoardConfig,
    source: &TileId,
) -> BTreeMap<TileId, usize> {
    bfs_distances(&walk_adjacency(board, config), source)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayEntry {
    pub tile_id: TileId,
    pub name: String,
    pub is_source: bool,
    pub distance: Option<usize>,
}

/// Per-tile badges for verification mode, in tile order.
pub fn verification_overlay(
    board: &Board,
    config: &BoardConfig,
    source: &TileId,
) -> Vec<OverlayEntry> {
    let distances = reachability(board, config, source);
    board
        .tiles()
        .iter()
        .map(|tile| OverlayEntry {
            tile_id: tile.tile_id().clone(),
            name: tile.name().to_owned(),
            is_source: tile.tile_id() == source,
            distance: distances.get(tile.tile_id()).copied(),
        })
        .collect()
}
