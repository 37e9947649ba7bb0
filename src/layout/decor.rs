// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outlines drawn on top of routes: arrowheads and movement-icon frames.

use crate::model::Point;

/// Icon size the notch proportions of the door border were drawn for.
const DOOR_REFERENCE_SIZE: f64 = 102.0;
const DOOR_NOTCH_SIZE: f64 = 6.0;
const DOOR_NOTCH_DEPTH: f64 = 5.0;

/// Triangle with its tip at `tip`, pointing along `angle` (radians).
pub fn arrowhead_polygon(tip: Point, angle: f64, size: f64) -> [Point; 3] {
    let (sin, cos) = angle.sin_cos();
    let place = |x: f64, y: f64| Point::new(tip.x + x * cos - y * sin, tip.y + x * sin + y * cos);
    [
        place(0.0, 0.0),
        place(-size, -size / 2.0),
        place(-size, size / 2.0),
    ]
}

/// Square centreline of the icon border around an icon centred on `center`.
pub fn icon_square(center: Point, size: f64, border: f64) -> [Point; 4] {
    let total = size + border;
    let left = center.x - total / 2.0;
    let top = center.y - total / 2.0;
    [
        Point::new(left, top),
        Point::new(left + total, top),
        Point::new(left + total, top + total),
        Point::new(left, top + total),
    ]
}

/// Jagged border used for breakable connections.
///
/// Closed outline of 28 vertices, clockwise from the top-left corner, with two
/// outward notches per side at a quarter and three quarters of its length.
pub fn door_outline(center: Point, size: f64, border: f64) -> Vec<Point> {
    let scale = size / DOOR_REFERENCE_SIZE;
    let notch = DOOR_NOTCH_SIZE * scale;
    let depth = DOOR_NOTCH_DEPTH * scale;
    let total = size + border;
    let o = -border / 2.0;
    let (q1, half, q3) = (total / 4.0, total / 2.0, total * 3.0 / 4.0);

    let local = [
        (o, o + notch),
        (o, o),
        (o + notch, o),
        (o + q1, o - depth),
        (o + half - notch, o),
        (o + half + notch, o),
        (o + q3, o - depth),
        (o + total - notch, o),
        (o + total, o),
        (o + total, o + notch),
        (o + total + depth, o + q1),
        (o + total, o + half - notch),
        (o + total, o + half + notch),
        (o + total + depth, o + q3),
        (o + total, o + total - notch),
        (o + total, o + total),
        (o + total - notch, o + total),
        (o + q3, o + total + depth),
        (o + half + notch, o + total),
        (o + half - notch, o + total),
        (o + q1, o + total + depth),
        (o + notch, o + total),
        (o, o + total),
        (o, o + total - notch),
        (o - depth, o + q3),
        (o, o + half + notch),
        (o, o + half - notch),
        (o - depth, o + q1),
    ];

    let origin_x = center.x - size / 2.0;
    let origin_y = center.y - size / 2.0;
    local
        .iter()
        .map(|&(x, y)| Point::new(origin_x + x, origin_y + y))
        .collect()
}

/// Frame drawn around the movement icon of a connection.
pub fn icon_frame(center: Point, size: f64, border: f64, breakable: bool) -> Vec<Point> {
    if breakable {
        door_outline(center, size, border)
    } else {
        icon_square(center, size, border).to_vec()
    }
}
