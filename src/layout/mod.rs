// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route geometry for board connections.
//!
//! Everything here is recomputed from a board snapshot on demand; nothing is cached.

pub mod compose;
pub mod decor;
pub mod geometry;
pub mod ports;
pub mod route;

pub use compose::{compose_routes, ResolvedPort, RouteRecord};
pub use decor::{arrowhead_polygon, door_outline, icon_frame, icon_square};
pub use geometry::{
    auto_port_position, clean_route, closest_perimeter_point, point_at_distance, polyline_length,
    port_position, side_facing, tile_center, PerimeterPoint, RoutePoints, TileFrame,
};
pub use ports::{port_offset, PortAssigner, PortAssignment};
pub use route::{build_route, RouteRequest};
