// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use smallvec::SmallVec;

use crate::config::BoardConfig;
use crate::model::{Point, PortPosition, Side, Tile};

/// Vertex list of a route. Most routes have at most seven vertices.
pub type RoutePoints = SmallVec<[Point; 8]>;

/// Consecutive vertices closer than this on both axes are merged.
const DEDUPE_TOLERANCE: f64 = 0.5;
/// A vertex within this distance of a straight run through its neighbours is dropped.
const COLLINEAR_TOLERANCE: f64 = 1e-6;

/// Bounding box of a placed tile in map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TileFrame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn of(tile: &Tile, config: &BoardConfig) -> Self {
        let (width, height) = config.tile_dims(tile.size());
        let position = tile.position();
        Self::new(position.x, position.y, width, height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Length of the edge on `side`.
    pub fn side_extent(&self, side: Side) -> f64 {
        if side.is_horizontal() {
            self.height
        } else {
            self.width
        }
    }
}

pub fn tile_center(tile: &Tile, config: &BoardConfig) -> Point {
    TileFrame::of(tile, config).center()
}

/// The side of `frame` that most directly faces `target`.
///
/// `|dx|` is scaled by the frame's aspect ratio before it is compared with
/// `|dy|`, so a wide tile prefers its long edges. Ties go to top/bottom.
pub fn side_facing(frame: &TileFrame, target: Point) -> Side {
    let center = frame.center();
    let dx = target.x - center.x;
    let dy = target.y - center.y;
    let aspect = frame.width / frame.height;
    if dx.abs() / aspect > dy.abs() {
        if dx > 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    } else if dy > 0.0 {
        Side::Bottom
    } else {
        Side::Top
    }
}

/// Point on the edge `side` at `along` pixels from the edge's start corner.
fn point_on_side(frame: &TileFrame, side: Side, along: f64) -> Point {
    match side {
        Side::Top => Point::new(frame.x + along, frame.y),
        Side::Bottom => Point::new(frame.x + along, frame.y + frame.height),
        Side::Left => Point::new(frame.x, frame.y + along),
        Side::Right => Point::new(frame.x + frame.width, frame.y + along),
    }
}

/// Position of a stored port: the offset runs between the two corner insets.
pub fn port_position(frame: &TileFrame, port: PortPosition, margin: f64) -> Point {
    let usable = (frame.side_extent(port.side()) - 2.0 * margin).max(0.0);
    point_on_side(frame, port.side(), margin + port.offset() * usable)
}

/// Position of an automatically spaced port: edge midpoint shifted by `pixel_offset`.
pub fn auto_port_position(frame: &TileFrame, side: Side, pixel_offset: f64) -> Point {
    point_on_side(frame, side, frame.side_extent(side) / 2.0 + pixel_offset)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerimeterPoint {
    pub side: Side,
    /// Fraction along the inset edge, as stored in a [`PortPosition`].
    pub offset: f64,
    pub point: Point,
}

impl PerimeterPoint {
    pub fn port(&self) -> PortPosition {
        PortPosition::new(self.side, self.offset)
    }
}

/// Projects `point` onto every side (clamped to the corner insets) and keeps the nearest.
pub fn closest_perimeter_point(frame: &TileFrame, point: Point, margin: f64) -> PerimeterPoint {
    let mut best: Option<(f64, PerimeterPoint)> = None;
    for side in Side::ALL {
        let extent = frame.side_extent(side);
        let usable = extent - 2.0 * margin;
        let (along, offset) = if usable <= 0.0 {
            (extent / 2.0, 0.5)
        } else {
            let raw = if side.is_horizontal() {
                point.y - frame.y
            } else {
                point.x - frame.x
            };
            let along = raw.clamp(margin, extent - margin);
            (along, (along - margin) / usable)
        };
        let candidate = point_on_side(frame, side, along);
        let distance = candidate.distance_to(point);
        if best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((
                distance,
                PerimeterPoint {
                    side,
                    offset,
                    point: candidate,
                },
            ));
        }
    }
    match best {
        Some((_, found)) => found,
        None => PerimeterPoint {
            side: Side::Top,
            offset: 0.5,
            point: frame.center(),
        },
    }
}

pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance_to(pair[1])).sum()
}

/// The point `distance` along the polyline; past the end this is the last vertex.
pub fn point_at_distance(points: &[Point], distance: f64) -> Option<Point> {
    let mut walked = 0.0;
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let segment = start.distance_to(end);
        if segment > 0.0 && walked + segment >= distance {
            let t = ((distance - walked) / segment).max(0.0);
            return Some(Point::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            ));
        }
        walked += segment;
    }
    points.last().copied()
}

/// Drops near-duplicate vertices and the middle of axis-aligned straight runs.
///
/// A vertex where the run folds back on itself is kept, so a route still
/// reaches a via-point that lies beyond its neighbours. The first and last
/// vertex are always kept exactly.
pub fn clean_route(points: &[Point]) -> RoutePoints {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return RoutePoints::new();
    };
    if points.len() <= 2 {
        return points.iter().copied().collect();
    }

    let mut deduped = RoutePoints::new();
    deduped.push(first);
    for &point in &points[1..] {
        let prev = deduped[deduped.len() - 1];
        let moved_x = (point.x - prev.x).abs() > DEDUPE_TOLERANCE;
        let moved_y = (point.y - prev.y).abs() > DEDUPE_TOLERANCE;
        if moved_x || moved_y {
            deduped.push(point);
        } else if deduped.len() >= 2 {
            let tail = deduped.len() - 1;
            deduped[tail] = merge_onto_run(deduped[tail - 1], prev, point);
        }
    }
    if deduped[deduped.len() - 1] != last {
        deduped.push(last);
    }
    if deduped.len() <= 2 {
        return deduped;
    }

    let mut cleaned = RoutePoints::new();
    cleaned.push(deduped[0]);
    for idx in 1..deduped.len() - 1 {
        let prev = cleaned[cleaned.len() - 1];
        let current = deduped[idx];
        let next = deduped[idx + 1];
        let same_x = (prev.x - current.x).abs() < COLLINEAR_TOLERANCE
            && (current.x - next.x).abs() < COLLINEAR_TOLERANCE
            && between(prev.y, current.y, next.y);
        let same_y = (prev.y - current.y).abs() < COLLINEAR_TOLERANCE
            && (current.y - next.y).abs() < COLLINEAR_TOLERANCE
            && between(prev.x, current.x, next.x);
        if !same_x && !same_y {
            cleaned.push(current);
        }
    }
    cleaned.push(last);
    cleaned
}

/// Folds `point` into the bend `prev`, keeping the axis of the run that
/// ends at `prev`.
fn merge_onto_run(before: Point, prev: Point, point: Point) -> Point {
    if (before.y - prev.y).abs() < COLLINEAR_TOLERANCE {
        Point::new(point.x, prev.y)
    } else if (before.x - prev.x).abs() < COLLINEAR_TOLERANCE {
        Point::new(prev.x, point.y)
    } else {
        prev
    }
}

fn between(a: f64, value: f64, b: f64) -> bool {
    (value - a) * (b - value) >= 0.0
}
