// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for boards on disk.
//!
//! A map folder is the unpacked form of a map archive: a `manifest.json` plus the
//! tile and background images it references.

pub mod data_url;
pub mod map_folder;

pub use data_url::{encode_data_url, DataUrl};
pub use map_folder::{
    manifest_schema, LoadedBoard, MapFolder, StoreError, WriteDurability, FORMAT_VERSION,
};
