// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data model: tiles, connections, and the board that owns them.
//!
//! Connections reference tiles by id only; resolving a reference is always an
//! explicit lookup through [`Board`].

pub mod board;
pub mod connection;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
pub mod ids;
pub mod tile;

pub use board::Board;
pub use connection::{Connection, ParsePathKindError, PathKind, PortEnd};
pub use geometry::{ParseSideError, Point, PortPosition, Side};
pub use ids::{ConnectionId, Id, IdError, TileId};
pub use tile::{ParseTileColorError, ResourceCounts, SpawnSlot, Tile, TileColor, TileSize};
