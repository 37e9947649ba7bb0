// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::geometry::Point;
use super::ids::TileId;

/// Height variant of a tile; width is fixed by the board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TileSize {
    #[default]
    Small,
    Large,
}

impl TileSize {
    pub fn as_str(self) -> &'static str {
        match self {
            TileSize::Small => "small",
            TileSize::Large => "large",
        }
    }
}

/// Display palette for tile headers and borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    #[default]
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Purple,
    Pink,
    Gray,
}

impl TileColor {
    pub const ALL: [TileColor; 10] = [
        TileColor::Brown,
        TileColor::Red,
        TileColor::Orange,
        TileColor::Yellow,
        TileColor::Green,
        TileColor::Teal,
        TileColor::Blue,
        TileColor::Purple,
        TileColor::Pink,
        TileColor::Gray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TileColor::Brown => "brown",
            TileColor::Red => "red",
            TileColor::Orange => "orange",
            TileColor::Yellow => "yellow",
            TileColor::Green => "green",
            TileColor::Teal => "teal",
            TileColor::Blue => "blue",
            TileColor::Purple => "purple",
            TileColor::Pink => "pink",
            TileColor::Gray => "gray",
        }
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTileColorError {
    value: String,
}

impl fmt::Display for ParseTileColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tile color '{}'", self.value)
    }
}

impl std::error::Error for ParseTileColorError {}

impl FromStr for TileColor {
    type Err = ParseTileColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileColor::ALL
            .into_iter()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| ParseTileColorError { value: s.to_owned() })
    }
}

/// Starting-position marker. At most one tile on a board holds each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnSlot(u8);

impl SpawnSlot {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SpawnSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-tile resource counters keyed by category name.
///
/// Absent categories read as zero; zero counts are not stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    counts: BTreeMap<SmolStr, u32>,
}

impl ResourceCounts {
    pub fn get(&self, category: &str) -> u32 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: impl Into<SmolStr>, count: u32) {
        let category = category.into();
        if count == 0 {
            self.counts.remove(&category);
        } else {
            self.counts.insert(category, count);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|count| u64::from(*count)).sum()
    }
}

impl<K: Into<SmolStr>> FromIterator<(K, u32)> for ResourceCounts {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut counts = ResourceCounts::default();
        for (category, count) in iter {
            counts.set(category, count);
        }
        counts
    }
}

/// A placed room/location box on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    tile_id: TileId,
    name: String,
    image: Option<String>,
    position: Point,
    size: TileSize,
    resources: ResourceCounts,
    spawn: Option<SpawnSlot>,
    color: TileColor,
}

impl Tile {
    /// `position` is the top-left corner in map pixels.
    pub fn new(tile_id: TileId, name: impl Into<String>, position: Point) -> Self {
        Self {
            tile_id,
            name: name.into(),
            image: None,
            position,
            size: TileSize::default(),
            resources: ResourceCounts::default(),
            spawn: None,
            color: TileColor::default(),
        }
    }

    pub fn tile_id(&self) -> &TileId {
        &self.tile_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Image as a `data:` URL, if one was attached.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn set_image<T: Into<String>>(&mut self, image: Option<T>) {
        self.image = image.map(Into::into);
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> TileSize {
        self.size
    }

    pub fn set_size(&mut self, size: TileSize) {
        self.size = size;
    }

    pub fn resources(&self) -> &ResourceCounts {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceCounts {
        &mut self.resources
    }

    pub fn spawn(&self) -> Option<SpawnSlot> {
        self.spawn
    }

    /// Raw setter. Exclusivity across tiles is enforced by `ops`.
    pub fn set_spawn(&mut self, spawn: Option<SpawnSlot>) {
        self.spawn = spawn;
    }

    pub fn color(&self) -> TileColor {
        self.color
    }

    pub fn set_color(&mut self, color: TileColor) {
        self.color = color;
    }
}
