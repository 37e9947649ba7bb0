// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tunable constants of a board.
//!
//! All distances are map pixels. The defaults describe an A2 print sheet at
//! 300 DPI; a JSON file can override any subset of the fields.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::{PathKind, SpawnSlot, TileSize};

pub const DPI: f64 = 300.0;
pub const MM_PER_INCH: f64 = 25.4;

/// Millimetres to whole pixels at [`DPI`].
pub fn mm_to_px(mm: f64) -> f64 {
    (mm / MM_PER_INCH * DPI).round()
}

/// A resource category and the number of counters the board must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuota {
    pub name: SmolStr,
    pub quota: u32,
}

impl ResourceQuota {
    pub fn new(name: impl Into<SmolStr>, quota: u32) -> Self {
        Self {
            name: name.into(),
            quota,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub board_width: f64,
    pub board_height: f64,
    pub tile_width: f64,
    pub tile_height_small: f64,
    pub tile_height_large: f64,
    /// Inset from tile corners for explicitly placed ports.
    pub port_margin: f64,
    /// Straight run out of a port before the route may bend.
    pub extension: f64,
    /// Gap between automatically spaced ports on one tile side.
    pub port_spacing: f64,
    /// Extra per-route shift of the jog between same-axis extensions.
    pub channel_spacing: f64,
    pub arrow_size: f64,
    /// How much of a directional route's drawn stroke is cut off for the arrowhead.
    pub arrow_length: f64,
    pub icon_size: f64,
    pub icon_border: f64,
    pub resources: Vec<ResourceQuota>,
    pub spawn_slots: u16,
    pub directional_kind: PathKind,
    pub breakable_quota: usize,
    /// Report categories above their quota as well as below.
    pub strict_resources: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_width: mm_to_px(594.0),
            board_height: mm_to_px(420.0),
            tile_width: mm_to_px(100.0),
            tile_height_small: mm_to_px(60.0),
            tile_height_large: mm_to_px(100.0),
            port_margin: mm_to_px(5.0),
            extension: mm_to_px(13.0),
            port_spacing: mm_to_px(10.0),
            channel_spacing: 0.0,
            arrow_size: mm_to_px(8.0),
            arrow_length: mm_to_px(7.5),
            icon_size: mm_to_px(22.0),
            icon_border: mm_to_px(1.5),
            resources: vec![
                ResourceQuota::new("objective", 10),
                ResourceQuota::new("boldness", 10),
                ResourceQuota::new("survival", 12),
                ResourceQuota::new("altruism", 12),
            ],
            spawn_slots: 6,
            directional_kind: PathKind::Yellow,
            breakable_quota: 4,
            strict_resources: true,
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input).map_err(|source| ConfigError::Json {
            path: None,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&input).map_err(|source| ConfigError::Json {
            path: Some(path.to_path_buf()),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimensions = [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("tile_width", self.tile_width),
            ("tile_height_small", self.tile_height_small),
            ("tile_height_large", self.tile_height_large),
            ("icon_size", self.icon_size),
        ];
        for (field, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(format!("{field} must be positive")));
            }
        }

        let non_negative = [
            ("port_margin", self.port_margin),
            ("extension", self.extension),
            ("port_spacing", self.port_spacing),
            ("channel_spacing", self.channel_spacing),
            ("arrow_size", self.arrow_size),
            ("arrow_length", self.arrow_length),
            ("icon_border", self.icon_border),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(format!("{field} must not be negative")));
            }
        }

        if self.resources.is_empty() {
            return Err(ConfigError::invalid("at least one resource category is required"));
        }
        for (idx, category) in self.resources.iter().enumerate() {
            if category.name.is_empty() {
                return Err(ConfigError::invalid("resource category names must not be empty"));
            }
            if self.resources[..idx].iter().any(|prev| prev.name == category.name) {
                return Err(ConfigError::invalid(format!(
                    "duplicate resource category: {}",
                    category.name
                )));
            }
        }

        if self.spawn_slots == 0 || self.spawn_slots > u16::from(u8::MAX) {
            return Err(ConfigError::invalid("spawn_slots must be within 1..=255"));
        }
        Ok(())
    }

    /// Width and height of a tile of `size`.
    pub fn tile_dims(&self, size: TileSize) -> (f64, f64) {
        match size {
            TileSize::Small => (self.tile_width, self.tile_height_small),
            TileSize::Large => (self.tile_width, self.tile_height_large),
        }
    }

    pub fn resource_categories(&self) -> &[ResourceQuota] {
        &self.resources
    }

    pub fn quota_for(&self, category: &str) -> Option<u32> {
        self.resources
            .iter()
            .find(|candidate| candidate.name == category)
            .map(|candidate| candidate.quota)
    }

    pub fn is_directional(&self, kind: PathKind) -> bool {
        kind == self.directional_kind
    }

    pub fn is_valid_spawn(&self, slot: SpawnSlot) -> bool {
        u16::from(slot.value()) < self.spawn_slots
    }

    pub fn spawn_values(&self) -> impl Iterator<Item = SpawnSlot> {
        let count = self.spawn_slots.min(u16::from(u8::MAX));
        (0..count).map(|value| SpawnSlot::new(value as u8))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Invalid {
        reason: String,
    },
}

impl ConfigError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            Self::Json {
                path: Some(path),
                source,
            } => write!(f, "invalid config JSON in {}: {source}", path.display()),
            Self::Json { path: None, source } => write!(f, "invalid config JSON: {source}"),
            Self::Invalid { reason } => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}
