// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Editing operations for boards.
//!
//! Operations are applied with optimistic concurrency (revision checks) and
//! produce a minimal delta. Expected editor conditions such as a duplicate
//! path or a full quota are refusals reported in the result; only malformed
//! requests are errors, and an error leaves the board untouched.

use std::collections::BTreeSet;
use std::fmt;

use smol_str::SmolStr;

use crate::config::BoardConfig;
use crate::layout::{closest_perimeter_point, TileFrame};
use crate::model::{
    Board, Connection, ConnectionId, PathKind, Point, PortEnd, PortPosition, SpawnSlot, Tile,
    TileColor, TileId, TileSize,
};

mod normalize;

pub use normalize::{normalize_board, Adjustment};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Tile(TileOp),
    Connection(ConnectionOp),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileOp {
    /// Places a new small tile centred on `center`, clamped into the board.
    Add {
        tile_id: TileId,
        name: String,
        center: Point,
    },
    Remove {
        tile_id: TileId,
    },
    /// Moves the top-left corner to `position`, clamped into the board.
    Move {
        tile_id: TileId,
        position: Point,
    },
    Rename {
        tile_id: TileId,
        name: String,
    },
    SetColor {
        tile_id: TileId,
        color: TileColor,
    },
    SetSize {
        tile_id: TileId,
        size: TileSize,
    },
    SetImage {
        tile_id: TileId,
        image: Option<String>,
    },
    SetSpawn {
        tile_id: TileId,
        spawn: Option<SpawnSlot>,
    },
    AdjustResource {
        tile_id: TileId,
        category: SmolStr,
        delta: i64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionOp {
    Add {
        connection_id: ConnectionId,
        from_tile_id: TileId,
        to_tile_id: TileId,
        kind: PathKind,
    },
    Remove {
        connection_id: ConnectionId,
    },
    SetKind {
        connection_id: ConnectionId,
        kind: PathKind,
    },
    ToggleBreakable {
        connection_id: ConnectionId,
    },
    SetViaPoint {
        connection_id: ConnectionId,
        via_point: Option<Point>,
    },
    SetExitPort {
        connection_id: ConnectionId,
        port: Option<PortPosition>,
    },
    SetEntryPort {
        connection_id: ConnectionId,
        port: Option<PortPosition>,
    },
    /// Snaps a free point onto the perimeter of the tile at `end`.
    DragPort {
        connection_id: ConnectionId,
        end: PortEnd,
        point: Point,
    },
    /// Drops stored ports and the via-point.
    ResetRoute {
        connection_id: ConnectionId,
    },
}

/// Why an operation was declined without touching the board.
#[derive(Debug, Clone, PartialEq)]
pub enum Refusal {
    DuplicateConnection {
        from_tile_id: TileId,
        to_tile_id: TileId,
        kind: PathKind,
    },
    SelfConnection {
        tile_id: TileId,
    },
    BreakableQuotaReached {
        quota: usize,
    },
    ResourceQuotaReached {
        category: SmolStr,
        quota: u32,
    },
    ResourceUnderflow {
        category: SmolStr,
    },
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateConnection {
                from_tile_id,
                to_tile_id,
                kind,
            } => write!(f, "a {kind} path {from_tile_id} -> {to_tile_id} already exists"),
            Self::SelfConnection { tile_id } => {
                write!(f, "a path cannot connect {tile_id} to itself")
            }
            Self::BreakableQuotaReached { quota } => {
                write!(f, "all {quota} breakable walls are already placed")
            }
            Self::ResourceQuotaReached { category, quota } => {
                write!(f, "all {quota} {category} counters are already placed")
            }
            Self::ResourceUnderflow { category } => {
                write!(f, "{category} count cannot go below zero")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refused {
    /// Position of the refused op in the submitted batch.
    pub index: usize,
    pub refusal: Refusal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub refused: Vec<Refused>,
    pub delta: Delta,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    Tile(TileId),
    Connection(ConnectionId),
}

/// Which tiles and connections changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<EntityRef>,
    pub removed: Vec<EntityRef>,
    pub updated: Vec<EntityRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<EntityRef>,
    removed: BTreeSet<EntityRef>,
    updated: BTreeSet<EntityRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, entity: EntityRef) {
        self.removed.remove(&entity);
        self.updated.remove(&entity);
        self.added.insert(entity);
    }

    fn record_removed(&mut self, entity: EntityRef) {
        // Added and removed in one batch: nothing to report.
        if self.added.remove(&entity) {
            self.updated.remove(&entity);
            return;
        }
        self.updated.remove(&entity);
        self.removed.insert(entity);
    }

    fn record_updated(&mut self, entity: EntityRef) {
        if self.added.contains(&entity) || self.removed.contains(&entity) {
            return;
        }
        self.updated.insert(entity);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

pub fn apply_ops(
    board: &mut Board,
    base_rev: u64,
    ops: &[Op],
    config: &BoardConfig,
) -> Result<ApplyResult, ApplyError> {
    let current_rev = board.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict {
            base_rev,
            current_rev,
        });
    }

    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied: 0,
            refused: Vec::new(),
            delta: Delta::default(),
        });
    }

    let mut working = board.clone();
    let mut delta = DeltaBuilder::default();
    let mut refused = Vec::new();

    for (index, op) in ops.iter().enumerate() {
        let outcome = match op {
            Op::Tile(tile_op) => apply_tile_op(&mut working, tile_op, config, &mut delta)?,
            Op::Connection(connection_op) => {
                apply_connection_op(&mut working, connection_op, config, &mut delta)?
            }
        };
        if let Err(refusal) = outcome {
            log::debug!("op {index} refused: {refusal}");
            refused.push(Refused { index, refusal });
        }
    }

    let applied = ops.len() - refused.len();
    if applied > 0 {
        *board = working;
        board.bump_rev();
    }

    Ok(ApplyResult {
        new_rev: board.rev(),
        applied,
        refused,
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Tile,
    Connection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    AlreadyExists { kind: ObjectKind, object_id: String },
    NotFound { kind: ObjectKind, object_id: String },
    UnknownResource { category: SmolStr },
    InvalidSpawn { slot: SpawnSlot, slots: u16 },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                base_rev,
                current_rev,
            } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::AlreadyExists { kind, object_id } => {
                write!(f, "object already exists ({kind:?}, id={object_id})")
            }
            Self::NotFound { kind, object_id } => {
                write!(f, "object not found ({kind:?}, id={object_id})")
            }
            Self::UnknownResource { category } => {
                write!(f, "unknown resource category '{category}'")
            }
            Self::InvalidSpawn { slot, slots } => {
                write!(f, "spawn slot {slot} is out of range (board has {slots} slots)")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted op-application implementation for tile/connection mutations.
include!("ops_impl.rs");
