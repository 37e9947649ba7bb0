// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural checks run before a board may be exported.
//!
//! The validator never stops at the first problem and never produces prose:
//! each finding is a [`Diagnostic`] carrying the numbers and names a
//! presentation layer needs to phrase it.

use std::collections::BTreeSet;

use serde::Serialize;
use smol_str::SmolStr;

use crate::config::BoardConfig;
use crate::model::{Board, SpawnSlot, Tile, TileId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileRef {
    pub tile_id: TileId,
    pub name: String,
}

impl TileRef {
    fn of(tile: &Tile) -> Self {
        Self {
            tile_id: tile.tile_id().clone(),
            name: tile.name().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceShortfall {
    pub category: SmolStr,
    pub missing: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceExcess {
    pub category: SmolStr,
    pub used: u64,
    pub quota: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    SpawnsUnassigned,
    ResourcesMissing,
    ResourcesExcess,
    TilesUnconnected,
    DeadEnds,
    BreakableShortfall,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::SpawnsUnassigned => "spawns_unassigned",
            Self::ResourcesMissing => "resources_missing",
            Self::ResourcesExcess => "resources_excess",
            Self::TilesUnconnected => "tiles_unconnected",
            Self::DeadEnds => "dead_ends",
            Self::BreakableShortfall => "breakable_shortfall",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    SpawnsUnassigned { slots: Vec<SpawnSlot> },
    ResourcesMissing { categories: Vec<ResourceShortfall> },
    ResourcesExcess { categories: Vec<ResourceExcess> },
    TilesUnconnected { tiles: Vec<TileRef> },
    DeadEnds { tiles: Vec<TileRef> },
    BreakableShortfall { placed: usize, quota: usize },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::SpawnsUnassigned { .. } => DiagnosticKind::SpawnsUnassigned,
            Self::ResourcesMissing { .. } => DiagnosticKind::ResourcesMissing,
            Self::ResourcesExcess { .. } => DiagnosticKind::ResourcesExcess,
            Self::TilesUnconnected { .. } => DiagnosticKind::TilesUnconnected,
            Self::DeadEnds { .. } => DiagnosticKind::DeadEnds,
            Self::BreakableShortfall { .. } => DiagnosticKind::BreakableShortfall,
        }
    }
}

/// Runs every check and returns all findings in check order.
pub fn validate_board(board: &Board, config: &BoardConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check_spawns(board, config, &mut diagnostics);
    check_resources(board, config, &mut diagnostics);
    check_connectivity(board, &mut diagnostics);
    check_dead_ends(board, config, &mut diagnostics);
    check_breakables(board, config, &mut diagnostics);
    diagnostics
}

fn check_spawns(board: &Board, config: &BoardConfig, out: &mut Vec<Diagnostic>) {
    let assigned = board.tiles().iter().filter_map(Tile::spawn).collect::<BTreeSet<_>>();
    let slots = config
        .spawn_values()
        .filter(|slot| !assigned.contains(slot))
        .collect::<Vec<_>>();
    if !slots.is_empty() {
        out.push(Diagnostic::SpawnsUnassigned { slots });
    }
}

fn check_resources(board: &Board, config: &BoardConfig, out: &mut Vec<Diagnostic>) {
    let mut missing = Vec::new();
    let mut excess = Vec::new();
    for category in config.resource_categories() {
        let used: u64 = board
            .tiles()
            .iter()
            .map(|tile| u64::from(tile.resources().get(&category.name)))
            .sum();
        let quota = u64::from(category.quota);
        if used < quota {
            missing.push(ResourceShortfall {
                category: category.name.clone(),
                missing: quota - used,
            });
        } else if used > quota && config.strict_resources {
            excess.push(ResourceExcess {
                category: category.name.clone(),
                used,
                quota: category.quota,
            });
        }
    }
    if !missing.is_empty() {
        out.push(Diagnostic::ResourcesMissing {
            categories: missing,
        });
    }
    if !excess.is_empty() {
        out.push(Diagnostic::ResourcesExcess { categories: excess });
    }
}

fn check_connectivity(board: &Board, out: &mut Vec<Diagnostic>) {
    let connected = board
        .connections()
        .iter()
        .flat_map(|connection| [connection.from_tile_id(), connection.to_tile_id()])
        .collect::<BTreeSet<_>>();
    let tiles = board
        .tiles()
        .iter()
        .filter(|tile| !connected.contains(tile.tile_id()))
        .map(TileRef::of)
        .collect::<Vec<_>>();
    if !tiles.is_empty() {
        out.push(Diagnostic::TilesUnconnected { tiles });
    }
}

/// A tile with an outgoing connection, no two-way connection at all, and some
/// way in is a dead end.
///
/// A tile whose only connection is one outgoing one-way path is not flagged:
/// nothing leads into it.
fn is_dead_end(board: &Board, config: &BoardConfig, tile_id: &TileId) -> bool {
    let mut has_outgoing = false;
    let mut has_incoming = false;
    for connection in board.connections() {
        let two_way = !config.is_directional(connection.kind());
        let outgoing = connection.from_tile_id() == tile_id;
        let incoming = connection.to_tile_id() == tile_id;
        if two_way && (outgoing || incoming) {
            return false;
        }
        has_outgoing |= outgoing;
        has_incoming |= incoming;
    }
    has_outgoing && has_incoming
}

fn check_dead_ends(board: &Board, config: &BoardConfig, out: &mut Vec<Diagnostic>) {
    let tiles = board
        .tiles()
        .iter()
        .filter(|tile| is_dead_end(board, config, tile.tile_id()))
        .map(TileRef::of)
        .collect::<Vec<_>>();
    if !tiles.is_empty() {
        out.push(Diagnostic::DeadEnds { tiles });
    }
}

fn check_breakables(board: &Board, config: &BoardConfig, out: &mut Vec<Diagnostic>) {
    let placed = board.connections().iter().filter(|connection| connection.breakable()).count();
    if placed < config.breakable_quota {
        out.push(Diagnostic::BreakableShortfall {
            placed,
            quota: config.breakable_quota,
        });
    }
}
