//! Absolute, finder-relative and displacement coordinates, and the algebra between them.
//!
//! A `Point` addresses a maze cell. A `RelativePoint` is only meaningful to the finder that
//! owns it: its origin is that finder's spawn cell. A `Delta` is a displacement and doubles as
//! the offset of an exploration grid.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelativePoint {
    pub rx: i32,
    pub ry: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl RelativePoint {
    pub const ORIGIN: RelativePoint = RelativePoint { rx: 0, ry: 0 };

    pub const fn new(rx: i32, ry: i32) -> Self {
        Self { rx, ry }
    }
}

impl Delta {
    pub const ZERO: Delta = Delta { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl Add for Delta {
    type Output = Delta;

    fn add(self, rhs: Delta) -> Delta {
        sum_deltas(self, rhs)
    }
}

impl Neg for Delta {
    type Output = Delta;

    fn neg(self) -> Delta {
        scale_delta(self, -1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    pub fn delta(self) -> Delta {
        match self {
            Direction::Top => Delta::new(0, -1),
            Direction::Right => Delta::new(1, 0),
            Direction::Bottom => Delta::new(0, 1),
            Direction::Left => Delta::new(-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
        }
    }

    pub fn from_delta(delta: Delta) -> Option<Self> {
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

pub fn direction_to_delta(direction: Direction) -> Delta {
    direction.delta()
}

/// Rectangle edges, all in the same frame as the points tested against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borders {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Shared capability of the two point flavors: both can be read as, and rebuilt from, a
/// plain `(x, y)` pair. Generic functions over `Coord` hand back the flavor they were given.
pub trait Coord: Copy {
    fn to_point(self) -> Point;
    fn from_point(point: Point) -> Self;
}

impl Coord for Point {
    fn to_point(self) -> Point {
        self
    }

    fn from_point(point: Point) -> Self {
        point
    }
}

impl Coord for RelativePoint {
    fn to_point(self) -> Point {
        rp2p(self)
    }

    fn from_point(point: Point) -> Self {
        p2rp(point)
    }
}

pub fn rp2p(RelativePoint { rx, ry }: RelativePoint) -> Point {
    Point { x: rx, y: ry }
}

pub fn p2rp(Point { x, y }: Point) -> RelativePoint {
    RelativePoint { rx: x, ry: y }
}

pub fn d2p(Delta { dx, dy }: Delta) -> Point {
    Point { x: dx, y: dy }
}

pub fn p2d(Point { x, y }: Point) -> Delta {
    Delta { dx: x, dy: y }
}

impl From<RelativePoint> for Point {
    fn from(value: RelativePoint) -> Self {
        rp2p(value)
    }
}

impl From<Point> for RelativePoint {
    fn from(value: Point) -> Self {
        p2rp(value)
    }
}

impl From<Delta> for Point {
    fn from(value: Delta) -> Self {
        d2p(value)
    }
}

impl From<Point> for Delta {
    fn from(value: Point) -> Self {
        p2d(value)
    }
}

pub fn scale_delta(Delta { dx, dy }: Delta, multiplier: i32) -> Delta {
    Delta {
        dx: dx * multiplier,
        dy: dy * multiplier,
    }
}

pub fn point_with_direction<P: Coord>(point: P, direction: Direction) -> P {
    P::from_point(point_with_delta(point, direction.delta(), 1))
}

/// `point + delta * multiplier`, always as an absolute `Point`.
pub fn point_with_delta<P: Coord>(point: P, delta: Delta, multiplier: i32) -> Point {
    let p = point.to_point();
    Point {
        x: p.x + delta.dx * multiplier,
        y: p.y + delta.dy * multiplier,
    }
}

pub fn sum_deltas(d1: Delta, d2: Delta) -> Delta {
    Delta {
        dx: d1.dx + d2.dx,
        dy: d1.dy + d2.dy,
    }
}

pub fn sum_points<P: Coord, Q: Coord>(p1: P, p2: Q) -> P {
    P::from_point(point_with_delta(p1, p2d(p2.to_point()), 1))
}

/// With `include_borders == false` a point lying exactly on an edge is outside.
pub fn point_in_borders<P: Coord>(point: P, borders: &Borders, include_borders: bool) -> bool {
    let p = point.to_point();
    if include_borders {
        p.x <= borders.right && p.x >= borders.left && p.y >= borders.top && p.y <= borders.bottom
    } else {
        p.x < borders.right && p.x > borders.left && p.y > borders.top && p.y < borders.bottom
    }
}

pub fn equal<P: Coord, Q: Coord>(p1: P, p2: Q) -> bool {
    p1.to_point() == p2.to_point()
}

/// Any of the three coordinate flavors, for callers that carry them around untyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coordinate {
    Absolute(Point),
    Relative(RelativePoint),
    Delta(Delta),
}

impl Coordinate {
    pub fn is_point(&self) -> bool {
        matches!(self, Coordinate::Absolute(_))
    }

    pub fn is_relative_point(&self) -> bool {
        matches!(self, Coordinate::Relative(_))
    }

    pub fn is_delta(&self) -> bool {
        matches!(self, Coordinate::Delta(_))
    }

    /// The raw `(x, y)` pair, whatever the flavor.
    pub fn to_point(self) -> Point {
        match self {
            Coordinate::Absolute(p) => p,
            Coordinate::Relative(rp) => rp2p(rp),
            Coordinate::Delta(d) => d2p(d),
        }
    }

    /// Same flavor, moved one cell. A delta grows by the direction's unit vector.
    pub fn with_direction(self, direction: Direction) -> Self {
        match self {
            Coordinate::Absolute(p) => Coordinate::Absolute(point_with_direction(p, direction)),
            Coordinate::Relative(rp) => Coordinate::Relative(point_with_direction(rp, direction)),
            Coordinate::Delta(d) => Coordinate::Delta(d + direction.delta()),
        }
    }
}

impl From<Point> for Coordinate {
    fn from(value: Point) -> Self {
        Coordinate::Absolute(value)
    }
}

impl From<RelativePoint> for Coordinate {
    fn from(value: RelativePoint) -> Self {
        Coordinate::Relative(value)
    }
}

impl From<Delta> for Coordinate {
    fn from(value: Delta) -> Self {
        Coordinate::Delta(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_map_to_unit_deltas() {
        assert_eq!(direction_to_delta(Direction::Top), Delta::new(0, -1));
        assert_eq!(direction_to_delta(Direction::Right), Delta::new(1, 0));
        assert_eq!(direction_to_delta(Direction::Bottom), Delta::new(0, 1));
        assert_eq!(direction_to_delta(Direction::Left), Delta::new(-1, 0));

        for d in Direction::ALL {
            assert_eq!(Direction::from_delta(d.delta()), Some(d));
            assert_eq!(d.delta() + d.opposite().delta(), Delta::ZERO);
        }
        assert_eq!(Direction::from_delta(Delta::new(1, 1)), None);
    }

    #[test]
    fn point_with_direction_keeps_flavor() {
        let p: Point = point_with_direction(Point::new(2, 2), Direction::Left);
        assert_eq!(p, Point::new(1, 2));

        let rp: RelativePoint = point_with_direction(RelativePoint::ORIGIN, Direction::Top);
        assert_eq!(rp, RelativePoint::new(0, -1));
    }

    #[test]
    fn point_with_delta_is_absolute_and_scaled() {
        let offset = Delta::new(-1, -2);
        assert_eq!(
            point_with_delta(RelativePoint::new(0, -1), offset, -1),
            Point::new(1, 1)
        );
        assert_eq!(point_with_delta(Point::new(3, 4), offset, 2), Point::new(1, 0));
    }

    #[test]
    fn sums() {
        assert_eq!(
            sum_deltas(Delta::new(1, -1), Delta::new(2, 3)),
            Delta::new(3, 2)
        );
        let rp: RelativePoint = sum_points(RelativePoint::new(1, 1), Point::new(2, 3));
        assert_eq!(rp, RelativePoint::new(3, 4));
        let p: Point = sum_points(Point::new(5, 5), RelativePoint::new(-1, 0));
        assert_eq!(p, Point::new(4, 5));
        assert_eq!(-Delta::new(1, -2), Delta::new(-1, 2));
        assert_eq!(scale_delta(Delta::new(1, -2), 3), Delta::new(3, -6));
    }

    #[test]
    fn round_trips() {
        for (x, y) in [(0, 0), (3, -7), (-12, 40)] {
            let p = Point::new(x, y);
            assert_eq!(rp2p(p2rp(p)), p);
            assert_eq!(d2p(p2d(p)), p);
            assert_eq!(Point::from(RelativePoint::from(p)), p);
        }
    }

    #[test]
    fn borders_exclude_edges_unless_included() {
        let borders = Borders {
            top: -1,
            right: 2,
            bottom: 2,
            left: -1,
        };
        assert!(point_in_borders(RelativePoint::ORIGIN, &borders, false));
        assert!(point_in_borders(Point::new(1, 1), &borders, false));
        assert!(!point_in_borders(RelativePoint::new(0, -1), &borders, false));
        assert!(!point_in_borders(Point::new(2, 0), &borders, false));
        assert!(point_in_borders(Point::new(2, 0), &borders, true));
        assert!(point_in_borders(Point::new(-1, -1), &borders, true));
        assert!(!point_in_borders(Point::new(-2, 0), &borders, true));
    }

    #[test]
    fn equality_ignores_flavor() {
        assert!(equal(Point::new(1, 2), RelativePoint::new(1, 2)));
        assert!(!equal(Point::new(1, 2), Point::new(2, 1)));
    }

    #[test]
    fn coordinate_variant_detection() {
        let a = Coordinate::from(Point::new(1, 1));
        let r = Coordinate::from(RelativePoint::new(1, 1));
        let d = Coordinate::from(Delta::new(1, 1));
        assert!(a.is_point() && !a.is_relative_point() && !a.is_delta());
        assert!(r.is_relative_point() && !r.is_point());
        assert!(d.is_delta() && !d.is_point());
        assert_eq!(a.to_point(), r.to_point());
        assert_eq!(
            r.with_direction(Direction::Right),
            Coordinate::Relative(RelativePoint::new(2, 1))
        );
        assert_eq!(
            d.with_direction(Direction::Top),
            Coordinate::Delta(Delta::new(1, 0))
        );
    }
}
