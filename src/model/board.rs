// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::connection::Connection;
use super::ids::{ConnectionId, TileId};
use super::tile::Tile;

/// The editable map: tiles and connections in creation order.
///
/// Order is significant. Automatic port spacing and route jog offsets follow
/// connection order, so the collections are kept as vectors and looked up by id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Board {
    tiles: Vec<Tile>,
    connections: Vec<Connection>,
    background_image: Option<String>,
    rev: u64,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(tiles: Vec<Tile>, connections: Vec<Connection>) -> Self {
        Self {
            tiles,
            connections,
            background_image: None,
            rev: 0,
        }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut Vec<Tile> {
        &mut self.tiles
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut Vec<Connection> {
        &mut self.connections
    }

    pub fn tile(&self, tile_id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.tile_id() == tile_id)
    }

    pub fn tile_mut(&mut self, tile_id: &TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.tile_id() == tile_id)
    }

    pub fn connection(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|connection| connection.connection_id() == connection_id)
    }

    pub fn connection_mut(&mut self, connection_id: &ConnectionId) -> Option<&mut Connection> {
        self.connections
            .iter_mut()
            .find(|connection| connection.connection_id() == connection_id)
    }

    /// Background image as a `data:` URL.
    pub fn background_image(&self) -> Option<&str> {
        self.background_image.as_deref()
    }

    pub fn set_background_image<T: Into<String>>(&mut self, image: Option<T>) {
        self.background_image = image.map(Into::into);
    }

    /// First `room-<n>` id not used by any tile.
    pub fn next_tile_id(&self) -> TileId {
        let mut suffix = self.tiles.len().saturating_add(1);
        loop {
            let candidate = TileId::new(format!("room-{suffix}")).expect("generated tile id");
            if self.tile(&candidate).is_none() {
                return candidate;
            }
            suffix = suffix.saturating_add(1);
        }
    }

    /// First `path-<n>` id not used by any connection.
    pub fn next_connection_id(&self) -> ConnectionId {
        let mut suffix = self.connections.len().saturating_add(1);
        loop {
            let candidate =
                ConnectionId::new(format!("path-{suffix}")).expect("generated connection id");
            if self.connection(&candidate).is_none() {
                return candidate;
            }
            suffix = suffix.saturating_add(1);
        }
    }
}
