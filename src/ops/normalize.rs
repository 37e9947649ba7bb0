// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repairs boards that arrive from outside the editor.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::BoardConfig;
use crate::model::{Board, Connection, ConnectionId, SpawnSlot, TileId};

/// One change made by [`normalize_board`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    DroppedDuplicateTile {
        tile_id: TileId,
    },
    DroppedDanglingConnection {
        connection_id: ConnectionId,
    },
    DroppedSelfConnection {
        connection_id: ConnectionId,
    },
    DroppedDuplicateConnection {
        connection_id: ConnectionId,
        duplicate_of: ConnectionId,
    },
    ClearedInvalidSpawn {
        tile_id: TileId,
        slot: SpawnSlot,
    },
    ClearedDuplicateSpawn {
        tile_id: TileId,
        slot: SpawnSlot,
        kept_by: TileId,
    },
    ClearedExcessBreakable {
        connection_id: ConnectionId,
    },
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DroppedDuplicateTile { tile_id } => {
                write!(f, "dropped second tile with id {tile_id}")
            }
            Self::DroppedDanglingConnection { connection_id } => {
                write!(f, "dropped path {connection_id}: endpoint tile is missing")
            }
            Self::DroppedSelfConnection { connection_id } => {
                write!(f, "dropped path {connection_id}: it connects a tile to itself")
            }
            Self::DroppedDuplicateConnection {
                connection_id,
                duplicate_of,
            } => write!(f, "dropped path {connection_id}: duplicate of {duplicate_of}"),
            Self::ClearedInvalidSpawn { tile_id, slot } => {
                write!(f, "cleared spawn {slot} on {tile_id}: no such spawn slot")
            }
            Self::ClearedDuplicateSpawn {
                tile_id,
                slot,
                kept_by,
            } => write!(f, "cleared spawn {slot} on {tile_id}: already held by {kept_by}"),
            Self::ClearedExcessBreakable { connection_id } => {
                write!(f, "cleared breakable wall on {connection_id}: quota exceeded")
            }
        }
    }
}

/// Brings an imported board back within every editor invariant.
///
/// Earlier entries win: the first tile with an id, the first connection of a
/// duplicate pair, the first holder of a spawn slot and the first breakable
/// connections up to the quota are kept. Returns what was changed.
pub fn normalize_board(board: &mut Board, config: &BoardConfig) -> Vec<Adjustment> {
    let mut adjustments = Vec::new();

    let mut seen_tiles = BTreeSet::new();
    board.tiles_mut().retain(|tile| {
        if seen_tiles.insert(tile.tile_id().clone()) {
            return true;
        }
        adjustments.push(Adjustment::DroppedDuplicateTile {
            tile_id: tile.tile_id().clone(),
        });
        false
    });

    let mut holders: BTreeMap<SpawnSlot, TileId> = BTreeMap::new();
    for tile in board.tiles_mut() {
        let Some(slot) = tile.spawn() else {
            continue;
        };
        if !config.is_valid_spawn(slot) {
            tile.set_spawn(None);
            adjustments.push(Adjustment::ClearedInvalidSpawn {
                tile_id: tile.tile_id().clone(),
                slot,
            });
            continue;
        }
        match holders.get(&slot) {
            Some(kept_by) => {
                adjustments.push(Adjustment::ClearedDuplicateSpawn {
                    tile_id: tile.tile_id().clone(),
                    slot,
                    kept_by: kept_by.clone(),
                });
                tile.set_spawn(None);
            }
            None => {
                holders.insert(slot, tile.tile_id().clone());
            }
        }
    }

    let mut kept: Vec<Connection> = Vec::with_capacity(board.connections().len());
    let connections = std::mem::take(board.connections_mut());
    for connection in connections {
        let connection_id = connection.connection_id().clone();
        if !seen_tiles.contains(connection.from_tile_id())
            || !seen_tiles.contains(connection.to_tile_id())
        {
            adjustments.push(Adjustment::DroppedDanglingConnection { connection_id });
            continue;
        }
        if connection.from_tile_id() == connection.to_tile_id() {
            adjustments.push(Adjustment::DroppedSelfConnection { connection_id });
            continue;
        }
        let duplicate_of = kept.iter().find_map(|existing| {
            let same_id = existing.connection_id() == &connection_id;
            let same_path = existing.duplicates(
                connection.from_tile_id(),
                connection.to_tile_id(),
                connection.kind(),
                config.directional_kind,
            );
            (same_id || same_path).then(|| existing.connection_id().clone())
        });
        if let Some(duplicate_of) = duplicate_of {
            adjustments.push(Adjustment::DroppedDuplicateConnection {
                connection_id,
                duplicate_of,
            });
            continue;
        }
        kept.push(connection);
    }

    let mut breakables = 0usize;
    for connection in &mut kept {
        if !connection.breakable() {
            continue;
        }
        if breakables < config.breakable_quota {
            breakables += 1;
            continue;
        }
        connection.set_breakable(false);
        adjustments.push(Adjustment::ClearedExcessBreakable {
            connection_id: connection.connection_id().clone(),
        });
    }
    *board.connections_mut() = kept;

    for adjustment in &adjustments {
        log::warn!("normalized board: {adjustment}");
    }
    if !adjustments.is_empty() {
        board.bump_rev();
    }
    adjustments
}
