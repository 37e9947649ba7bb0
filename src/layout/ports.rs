// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automatic spacing of ports that share one side of one tile.

use std::collections::BTreeMap;

use crate::model::{ConnectionId, PortEnd, Side, TileId};

/// Pixel offset from the side midpoint for the `index`-th of `total` ports.
///
/// Offsets of one group are evenly spaced by `spacing` and sum to zero.
pub fn port_offset(index: usize, total: usize, spacing: f64) -> f64 {
    (index as f64 - (total as f64 - 1.0) / 2.0) * spacing
}

/// Offsets for every connection end that has no stored port.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortAssignment {
    offsets: BTreeMap<(ConnectionId, PortEnd), f64>,
}

impl PortAssignment {
    pub fn offset(&self, connection_id: &ConnectionId, end: PortEnd) -> Option<f64> {
        self.offsets.get(&(connection_id.clone(), end)).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Collects connection ends per `(tile, side)` in arrival order and spaces them.
#[derive(Debug, Default)]
pub struct PortAssigner {
    groups: BTreeMap<(TileId, Side), Vec<(ConnectionId, PortEnd)>>,
}

impl PortAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one connection end. Call in connection order, exit before entry.
    pub fn push(
        &mut self,
        tile_id: &TileId,
        side: Side,
        connection_id: &ConnectionId,
        end: PortEnd,
    ) {
        self.groups
            .entry((tile_id.clone(), side))
            .or_default()
            .push((connection_id.clone(), end));
    }

    pub fn assign(self, spacing: f64) -> PortAssignment {
        let mut offsets = BTreeMap::new();
        for (_, group) in self.groups {
            let total = group.len();
            for (index, key) in group.into_iter().enumerate() {
                offsets.insert(key, port_offset(index, total, spacing));
            }
        }
        PortAssignment { offsets }
    }
}
