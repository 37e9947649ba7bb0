// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};

use super::data_url::{encode_data_url, mime_for_extension, DataUrl};
use crate::config::BoardConfig;
use crate::model::{
    Board, Connection, ConnectionId, IdError, PathKind, Point, PortPosition, ResourceCounts,
    Side, SpawnSlot, Tile, TileColor, TileId, TileSize,
};
use crate::ops::{normalize_board, Adjustment};

const MANIFEST_FILENAME: &str = "manifest.json";
const ROOMS_DIR: &str = "rooms";
const BACKGROUND_STEM: &str = "background";

/// Highest manifest version this crate reads and the version it writes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    InvalidRelativePath {
        field: &'static str,
        value: PathBuf,
    },
    PathOutsideFolder {
        folder: PathBuf,
        path: PathBuf,
    },
    SymlinkRefused {
        path: PathBuf,
    },
    UnsupportedVersion {
        path: PathBuf,
        version: u32,
    },
    InvalidDataUrl {
        owner: String,
    },
    InvalidImage {
        owner: String,
        source: base64::DecodeError,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::InvalidRelativePath { field, value } => {
                write!(f, "invalid relative path for {field}: {value:?}")
            }
            Self::PathOutsideFolder { folder, path } => {
                write!(f, "path is outside map folder: folder={folder:?} path={path:?}")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
            Self::UnsupportedVersion { path, version } => write!(
                f,
                "unsupported manifest version {version} at {path:?} (max {FORMAT_VERSION})"
            ),
            Self::InvalidDataUrl { owner } => {
                write!(f, "image of {owner} is not a base64 data url")
            }
            Self::InvalidImage { owner, source } => {
                write!(f, "cannot decode image of {owner}: {source}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidImage { source, .. } => Some(source),
            Self::InvalidRelativePath { .. } => None,
            Self::PathOutsideFolder { .. } => None,
            Self::SymlinkRefused { .. } => None,
            Self::UnsupportedVersion { .. } => None,
            Self::InvalidDataUrl { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place without syncing.
    #[default]
    BestEffort,

    /// Also syncs file contents and the parent directory where the platform allows it.
    Durable,
}

/// A board read back from disk together with the repairs applied on import.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBoard {
    pub board: Board,
    pub adjustments: Vec<Adjustment>,
}

/// An unpacked map archive: `manifest.json`, `rooms/<id>.<ext>` and `background.<ext>`.
#[derive(Debug, Clone)]
pub struct MapFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl MapFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILENAME)
    }

    /// Relative location of a tile image inside the folder.
    pub fn room_image_path(tile_id: &TileId, extension: &str) -> PathBuf {
        let file_stem = encode_persisted_id_segment(tile_id.as_str());
        Path::new(ROOMS_DIR).join(format!("{file_stem}.{extension}"))
    }

    pub fn background_image_path(extension: &str) -> PathBuf {
        PathBuf::from(format!("{BACKGROUND_STEM}.{extension}"))
    }

    pub fn exists(&self) -> bool {
        self.manifest_path().is_file()
    }

    /// Reads the manifest and its images, then repairs the board with [`normalize_board`].
    ///
    /// Images that are referenced but missing are dropped with a warning; everything else
    /// that is malformed fails the load.
    pub fn load_board(&self, config: &BoardConfig) -> Result<LoadedBoard, StoreError> {
        let manifest_path = self.manifest_path();
        let manifest_str = fs::read_to_string(&manifest_path).map_err(|source| StoreError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest: ManifestJson =
            serde_json::from_str(&manifest_str).map_err(|source| StoreError::Json {
                path: manifest_path.clone(),
                source,
            })?;

        if manifest.version > FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: manifest_path,
                version: manifest.version,
            });
        }

        let mut board = board_from_manifest(self.root(), manifest)?;
        let adjustments = normalize_board(&mut board, config);
        Ok(LoadedBoard { board, adjustments })
    }

    /// Writes every image first and the manifest last, each atomically.
    pub fn save_board(&self, board: &Board) -> Result<(), StoreError> {
        let mut rooms = Vec::with_capacity(board.tiles().len());
        for tile in board.tiles() {
            let image = match tile.image() {
                Some(image) => {
                    let owner = format!("tile {}", tile.tile_id());
                    let (extension, bytes) = decode_image(&owner, image)?;
                    let relative = Self::room_image_path(tile.tile_id(), &extension);
                    write_atomic_in_folder(
                        self.root(),
                        &self.root.join(&relative),
                        &bytes,
                        self.durability,
                    )?;
                    Some(manifest_path_string(&relative))
                }
                None => None,
            };
            rooms.push(room_to_json(tile, image));
        }

        let background_image = match board.background_image() {
            Some(image) => {
                let (extension, bytes) = decode_image("background", image)?;
                let relative = Self::background_image_path(&extension);
                write_atomic_in_folder(
                    self.root(),
                    &self.root.join(&relative),
                    &bytes,
                    self.durability,
                )?;
                Some(manifest_path_string(&relative))
            }
            None => None,
        };

        let manifest = ManifestJson {
            version: FORMAT_VERSION,
            rooms,
            paths: board.connections().iter().map(path_to_json).collect(),
            background_image,
        };

        let manifest_path = self.manifest_path();
        let manifest_str =
            serde_json::to_string_pretty(&manifest).map_err(|source| StoreError::Json {
                path: manifest_path.clone(),
                source,
            })?;
        write_atomic_in_folder(
            self.root(),
            &manifest_path,
            format!("{manifest_str}\n").as_bytes(),
            self.durability,
        )
    }
}

/// JSON schema of `manifest.json`.
pub fn manifest_schema() -> Schema {
    schemars::schema_for!(ManifestJson)
}

fn decode_image(owner: &str, image: &str) -> Result<(String, Vec<u8>), StoreError> {
    let data_url = DataUrl::parse(image).ok_or_else(|| StoreError::InvalidDataUrl {
        owner: owner.to_owned(),
    })?;
    let bytes = data_url.decode().map_err(|source| StoreError::InvalidImage {
        owner: owner.to_owned(),
        source,
    })?;
    Ok((data_url.extension(), bytes))
}

fn manifest_path_string(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// Manifest DTOs, path safety and atomic write helpers for `MapFolder`.
include!("map_folder/helpers.rs");

#[cfg(test)]
mod tests;
