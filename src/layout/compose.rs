// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Render-ready routes for every connection of a board.

use std::collections::BTreeMap;

use serde::Serialize;

use super::decor::{arrowhead_polygon, icon_frame};
use super::geometry::{
    auto_port_position, point_at_distance, polyline_length, port_position, side_facing,
    RoutePoints, TileFrame,
};
use super::ports::PortAssigner;
use super::route::{build_route, RouteRequest};
use crate::config::BoardConfig;
use crate::model::{Board, Connection, ConnectionId, PathKind, Point, PortEnd, Side};

/// Where a connection meets a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPort {
    pub side: Side,
    pub point: Point,
    /// `true` when the port comes from a stored (dragged) position.
    pub explicit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub connection_id: ConnectionId,
    pub kind: PathKind,
    pub directional: bool,
    pub breakable: bool,
    pub exit: ResolvedPort,
    pub entry: ResolvedPort,
    /// Full route from the exit port to the entry port.
    pub points: RoutePoints,
    /// Stroke to draw; ends at the arrowhead base for directional connections.
    pub display_points: RoutePoints,
    pub icon_anchor: Point,
    /// Direction of the final segment in radians.
    pub end_angle: f64,
    pub arrowhead: Option<[Point; 3]>,
    pub icon_frame: Vec<Point>,
}

struct Resolved<'a> {
    connection: &'a Connection,
    from: TileFrame,
    to: TileFrame,
    exit_side: Side,
    entry_side: Side,
}

fn resolve_sides<'a>(
    connection: &'a Connection,
    from: TileFrame,
    to: TileFrame,
) -> Resolved<'a> {
    let (exit_target, entry_target) = match connection.via_point() {
        Some(via) => (via, via),
        None => (to.center(), from.center()),
    };
    let exit_side = connection
        .exit_port()
        .map(|port| port.side())
        .unwrap_or_else(|| side_facing(&from, exit_target));
    let entry_side = connection
        .entry_port()
        .map(|port| port.side())
        .unwrap_or_else(|| side_facing(&to, entry_target));
    Resolved {
        connection,
        from,
        to,
        exit_side,
        entry_side,
    }
}

/// Computes one route per connection whose endpoints both exist.
///
/// Connections referencing a missing tile are skipped. The result is a pure
/// function of `board` and `config`.
pub fn compose_routes(board: &Board, config: &BoardConfig) -> Vec<RouteRecord> {
    let frames = board
        .tiles()
        .iter()
        .map(|tile| (tile.tile_id().as_str(), TileFrame::of(tile, config)))
        .collect::<BTreeMap<_, _>>();

    let mut resolved = Vec::with_capacity(board.connections().len());
    for connection in board.connections() {
        let from = frames.get(connection.from_tile_id().as_str());
        let to = frames.get(connection.to_tile_id().as_str());
        match (from, to) {
            (Some(&from), Some(&to)) => resolved.push(resolve_sides(connection, from, to)),
            _ => log::debug!(
                "skipping connection {}: endpoint {} -> {} is not on the board",
                connection.connection_id(),
                connection.from_tile_id(),
                connection.to_tile_id()
            ),
        }
    }

    let mut assigner = PortAssigner::new();
    for item in &resolved {
        let connection = item.connection;
        if connection.exit_port().is_none() {
            assigner.push(
                connection.from_tile_id(),
                item.exit_side,
                connection.connection_id(),
                PortEnd::Exit,
            );
        }
        if connection.entry_port().is_none() {
            assigner.push(
                connection.to_tile_id(),
                item.entry_side,
                connection.connection_id(),
                PortEnd::Entry,
            );
        }
    }
    let assignment = assigner.assign(config.port_spacing);

    let route_count = resolved.len();
    resolved
        .iter()
        .enumerate()
        .map(|(route_index, item)| {
            let connection = item.connection;
            let port_for = |end: PortEnd, frame: &TileFrame, side: Side| {
                match connection.port(end) {
                    Some(port) => ResolvedPort {
                        side,
                        point: port_position(frame, port, config.port_margin),
                        explicit: true,
                    },
                    None => {
                        let offset = assignment
                            .offset(connection.connection_id(), end)
                            .unwrap_or(0.0);
                        ResolvedPort {
                            side,
                            point: auto_port_position(frame, side, offset),
                            explicit: false,
                        }
                    }
                }
            };
            let exit = port_for(PortEnd::Exit, &item.from, item.exit_side);
            let entry = port_for(PortEnd::Entry, &item.to, item.entry_side);
            let jog_offset =
                (route_index as f64 - route_count as f64 / 2.0) * config.channel_spacing;
            build_record(connection, exit, entry, jog_offset, config)
        })
        .collect()
}

fn build_record(
    connection: &Connection,
    exit: ResolvedPort,
    entry: ResolvedPort,
    jog_offset: f64,
    config: &BoardConfig,
) -> RouteRecord {
    let via_point = connection.via_point();
    let points = build_route(&RouteRequest {
        exit: exit.point,
        exit_side: exit.side,
        entry: entry.point,
        entry_side: entry.side,
        via_point,
        extension: config.extension,
        jog_offset,
    });

    let icon_anchor = via_point
        .or_else(|| point_at_distance(&points, polyline_length(&points) / 2.0))
        .unwrap_or(exit.point);

    let end_angle = match points.as_slice() {
        [.., prev, last] => (last.y - prev.y).atan2(last.x - prev.x),
        _ => 0.0,
    };

    let directional = config.is_directional(connection.kind());
    let display_points = if directional {
        shorten_end(&points, config.arrow_length)
    } else {
        points.clone()
    };
    let arrowhead = if directional {
        points
            .last()
            .map(|&tip| arrowhead_polygon(tip, end_angle, config.arrow_size))
    } else {
        None
    };

    RouteRecord {
        connection_id: connection.connection_id().clone(),
        kind: connection.kind(),
        directional,
        breakable: connection.breakable(),
        exit,
        entry,
        points,
        display_points,
        icon_anchor,
        end_angle,
        arrowhead,
        icon_frame: icon_frame(
            icon_anchor,
            config.icon_size,
            config.icon_border,
            connection.breakable(),
        ),
    }
}

/// Pulls the last vertex back by `length` when the final segment is longer than that.
fn shorten_end(points: &RoutePoints, length: f64) -> RoutePoints {
    let mut shortened = points.clone();
    let n = shortened.len();
    if n < 2 {
        return shortened;
    }
    let (prev, last) = (shortened[n - 2], shortened[n - 1]);
    let segment = prev.distance_to(last);
    if segment > length {
        let ratio = (segment - length) / segment;
        shortened[n - 1] = Point::new(
            prev.x + (last.x - prev.x) * ratio,
            prev.y + (last.y - prev.y) * ratio,
        );
    }
    shortened
}
