// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::geometry::{Point, PortPosition};
use super::ids::{ConnectionId, TileId};

/// Movement style of a connection.
///
/// Which kind is one-way is board configuration, not a property of the enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Red,
    Green,
    Blue,
    Yellow,
}

impl PathKind {
    pub const ALL: [PathKind; 4] =
        [PathKind::Red, PathKind::Green, PathKind::Blue, PathKind::Yellow];

    pub fn as_str(self) -> &'static str {
        match self {
            PathKind::Red => "red",
            PathKind::Green => "green",
            PathKind::Blue => "blue",
            PathKind::Yellow => "yellow",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePathKindError {
    value: String,
}

impl fmt::Display for ParsePathKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown path kind '{}'", self.value)
    }
}

impl std::error::Error for ParsePathKindError {}

impl FromStr for PathKind {
    type Err = ParsePathKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParsePathKindError { value: s.to_owned() })
    }
}

/// Which end of a connection a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortEnd {
    Exit,
    Entry,
}

/// A typed path between two tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    connection_id: ConnectionId,
    from_tile_id: TileId,
    to_tile_id: TileId,
    kind: PathKind,
    exit_port: Option<PortPosition>,
    entry_port: Option<PortPosition>,
    via_point: Option<Point>,
    breakable: bool,
}

impl Connection {
    pub fn new(
        connection_id: ConnectionId,
        from_tile_id: TileId,
        to_tile_id: TileId,
        kind: PathKind,
    ) -> Self {
        Self {
            connection_id,
            from_tile_id,
            to_tile_id,
            kind,
            exit_port: None,
            entry_port: None,
            via_point: None,
            breakable: false,
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn from_tile_id(&self) -> &TileId {
        &self.from_tile_id
    }

    pub fn to_tile_id(&self) -> &TileId {
        &self.to_tile_id
    }

    pub fn touches(&self, tile_id: &TileId) -> bool {
        &self.from_tile_id == tile_id || &self.to_tile_id == tile_id
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: PathKind) {
        self.kind = kind;
    }

    pub fn exit_port(&self) -> Option<PortPosition> {
        self.exit_port
    }

    pub fn set_exit_port(&mut self, port: Option<PortPosition>) {
        self.exit_port = port;
    }

    pub fn entry_port(&self) -> Option<PortPosition> {
        self.entry_port
    }

    pub fn set_entry_port(&mut self, port: Option<PortPosition>) {
        self.entry_port = port;
    }

    pub fn port(&self, end: PortEnd) -> Option<PortPosition> {
        match end {
            PortEnd::Exit => self.exit_port,
            PortEnd::Entry => self.entry_port,
        }
    }

    pub fn set_port(&mut self, end: PortEnd, port: Option<PortPosition>) {
        match end {
            PortEnd::Exit => self.exit_port = port,
            PortEnd::Entry => self.entry_port = port,
        }
    }

    /// Tile the given end is anchored to.
    pub fn tile_at(&self, end: PortEnd) -> &TileId {
        match end {
            PortEnd::Exit => &self.from_tile_id,
            PortEnd::Entry => &self.to_tile_id,
        }
    }

    pub fn via_point(&self) -> Option<Point> {
        self.via_point
    }

    pub fn set_via_point(&mut self, via_point: Option<Point>) {
        self.via_point = via_point;
    }

    /// Breakable wall / door flag.
    pub fn breakable(&self) -> bool {
        self.breakable
    }

    pub fn set_breakable(&mut self, breakable: bool) {
        self.breakable = breakable;
    }

    /// Whether a connection `from -> to` of `kind` would duplicate this one.
    ///
    /// Reversed endpoints count as the same path unless `kind` is the one-way kind.
    pub fn duplicates(
        &self,
        from_tile_id: &TileId,
        to_tile_id: &TileId,
        kind: PathKind,
        directional_kind: PathKind,
    ) -> bool {
        if self.kind != kind {
            return false;
        }
        if &self.from_tile_id == from_tile_id && &self.to_tile_id == to_tile_id {
            return true;
        }
        kind != directional_kind
            && &self.from_tile_id == to_tile_id
            && &self.to_tile_id == from_tile_id
    }
}
