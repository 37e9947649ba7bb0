// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boardsmith: routing, validation and persistence core for a board-game map editor.
//!
//! A [`model::Board`] holds tiles (rooms) and typed connections between them. Edits go
//! through [`ops::apply_ops`]; [`layout::compose_routes`] turns the board into drawable
//! orthogonal routes, [`validate::validate_board`] checks game rules, and
//! [`query::reachability`] answers which tiles a player can walk to.

pub mod config;
pub mod layout;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
pub mod validate;
