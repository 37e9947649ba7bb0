// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only derived views over a board.

pub mod reachability;

pub use reachability::{reachability, verification_overlay, walk_adjacency, OverlayEntry};
