// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orthogonal route synthesis between two ports.

use super::geometry::{clean_route, RoutePoints};
use crate::model::{Point, Side};

/// Extensions closer than this across their shared axis are joined directly.
pub const ALIGN_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub exit: Point,
    pub exit_side: Side,
    pub entry: Point,
    pub entry_side: Side,
    pub via_point: Option<Point>,
    /// Straight run out of each port before the first bend.
    pub extension: f64,
    /// Shift of the jog between two same-axis extensions.
    pub jog_offset: f64,
}

fn extend(port: Point, side: Side, distance: f64) -> Point {
    let (dx, dy) = side.outward();
    port.offset(dx * distance, dy * distance)
}

/// Builds the cleaned polyline from the exit port to the entry port.
///
/// The first and last vertex are the ports themselves. Every segment is axis
/// aligned except a direct join of two nearly aligned same-axis extensions.
pub fn build_route(request: &RouteRequest) -> RoutePoints {
    let exit_ext = extend(request.exit, request.exit_side, request.extension);
    let entry_ext = extend(request.entry, request.entry_side, request.extension);
    let exit_h = request.exit_side.is_horizontal();
    let entry_h = request.entry_side.is_horizontal();

    let mut points = RoutePoints::new();
    points.push(request.exit);
    points.push(exit_ext);

    match request.via_point {
        Some(via) => {
            // Each leg leaves/arrives along its extension's axis.
            if exit_h {
                points.push(Point::new(via.x, exit_ext.y));
            } else {
                points.push(Point::new(exit_ext.x, via.y));
            }
            points.push(via);
            if entry_h {
                points.push(Point::new(via.x, entry_ext.y));
            } else {
                points.push(Point::new(entry_ext.x, via.y));
            }
        }
        None if exit_h && entry_h => {
            if (exit_ext.y - entry_ext.y).abs() >= ALIGN_TOLERANCE {
                let mid_x = (exit_ext.x + entry_ext.x) / 2.0 + request.jog_offset;
                points.push(Point::new(mid_x, exit_ext.y));
                points.push(Point::new(mid_x, entry_ext.y));
            }
        }
        None if !exit_h && !entry_h => {
            if (exit_ext.x - entry_ext.x).abs() >= ALIGN_TOLERANCE {
                let mid_y = (exit_ext.y + entry_ext.y) / 2.0 + request.jog_offset;
                points.push(Point::new(exit_ext.x, mid_y));
                points.push(Point::new(entry_ext.x, mid_y));
            }
        }
        None => {
            if exit_h {
                points.push(Point::new(entry_ext.x, exit_ext.y));
            } else {
                points.push(Point::new(exit_ext.x, entry_ext.y));
            }
        }
    }

    points.push(entry_ext);
    points.push(request.entry);
    clean_route(&points)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{build_route, RouteRequest};
    use crate::model::{Point, Side};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn request(exit: Point, exit_side: Side, entry: Point, entry_side: Side) -> RouteRequest {
        RouteRequest {
            exit,
            exit_side,
            entry,
            entry_side,
            via_point: None,
            extension: 10.0,
            jog_offset: 0.0,
        }
    }

    fn passes_through(points: &[Point], target: Point) -> bool {
        points.windows(2).any(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let within_x = target.x >= a.x.min(b.x) && target.x <= a.x.max(b.x);
            let within_y = target.y >= a.y.min(b.y) && target.y <= a.y.max(b.y);
            let on_line = (b.x - a.x) * (target.y - a.y) == (b.y - a.y) * (target.x - a.x);
            within_x && within_y && on_line
        })
    }

    fn assert_orthogonal(points: &[Point]) {
        for pair in points.windows(2) {
            assert!(
                pair[0].x == pair[1].x || pair[0].y == pair[1].y,
                "diagonal segment {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn aligned_horizontal_ports_join_directly() {
        let route = build_route(&request(p(0.0, 0.0), Side::Right, p(100.0, 0.0), Side::Left));
        assert_eq!(route.as_slice(), &[p(0.0, 0.0), p(100.0, 0.0)]);
    }

    #[test]
    fn nearly_aligned_ports_keep_a_single_direct_segment() {
        let route = build_route(&request(p(0.0, 0.0), Side::Right, p(100.0, 3.0), Side::Left));
        assert_eq!(route.first(), Some(&p(0.0, 0.0)));
        assert_eq!(route.last(), Some(&p(100.0, 3.0)));
        assert_eq!(route.len(), 4);
    }

    #[test]
    fn offset_horizontal_ports_jog_at_the_midpoint() {
        let route = build_route(&request(p(0.0, 0.0), Side::Right, p(100.0, 40.0), Side::Left));
        assert_eq!(
            route.as_slice(),
            &[p(0.0, 0.0), p(50.0, 0.0), p(50.0, 40.0), p(100.0, 40.0)]
        );
    }

    #[test]
    fn jog_offset_shifts_the_channel() {
        let mut req = request(p(0.0, 0.0), Side::Bottom, p(60.0, 100.0), Side::Top);
        req.jog_offset = 7.0;
        let route = build_route(&req);
        assert_eq!(
            route.as_slice(),
            &[p(0.0, 0.0), p(0.0, 57.0), p(60.0, 57.0), p(60.0, 100.0)]
        );
    }

    #[test]
    fn elbow_close_to_the_exit_extension_stays_orthogonal() {
        let mut req = request(p(1181.0, 354.5), Side::Right, p(1335.3, 2000.0), Side::Top);
        req.extension = 154.0;
        let route = build_route(&req);
        assert_eq!(
            route.as_slice(),
            &[p(1181.0, 354.5), p(1335.3, 354.5), p(1335.3, 2000.0)]
        );
        assert_orthogonal(&route);
    }

    #[test]
    fn perpendicular_ports_use_one_elbow() {
        let route = build_route(&request(p(0.0, 0.0), Side::Right, p(100.0, 100.0), Side::Top));
        assert_eq!(route.as_slice(), &[p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)]);
    }

    #[rstest]
    #[case(Side::Right, Side::Left)]
    #[case(Side::Bottom, Side::Top)]
    #[case(Side::Right, Side::Top)]
    #[case(Side::Top, Side::Left)]
    fn via_point_routes_stay_orthogonal(#[case] exit_side: Side, #[case] entry_side: Side) {
        let mut req = request(p(0.0, 0.0), exit_side, p(300.0, 200.0), entry_side);
        req.via_point = Some(p(150.0, -80.0));
        let route = build_route(&req);
        assert_eq!(route.first(), Some(&p(0.0, 0.0)));
        assert_eq!(route.last(), Some(&p(300.0, 200.0)));
        assert!(passes_through(&route, p(150.0, -80.0)));
        assert_orthogonal(&route);
    }

    #[test]
    fn via_point_leg_follows_the_extension_axis() {
        let mut req = request(p(0.0, 0.0), Side::Right, p(300.0, 200.0), Side::Left);
        req.via_point = Some(p(150.0, -80.0));
        let route = build_route(&req);
        assert_eq!(
            route.as_slice(),
            &[
                p(0.0, 0.0),
                p(150.0, 0.0),
                p(150.0, -80.0),
                p(150.0, 200.0),
                p(300.0, 200.0),
            ]
        );
    }
}
