//! Node in the cluster lattice.

use serde::{Deserialize, Serialize};

/// Node identifier, unique within one stage's layout.
///
/// Ids are dense: a layout with `n` nodes uses exactly `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Index into the layout's node vector.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Display label, e.g. `CELL_07`.
    pub fn label(self) -> String {
        format!("CELL_{:02}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D offset from the visualization centre, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation. Exact at both ends: `t = 0` yields `self`,
    /// `t = 1` yields `other` bit-for-bit.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        let s = 1.0 - t;
        Point {
            x: self.x * s + other.x * t,
            y: self.y * s + other.y * t,
        }
    }

    /// Shift both coordinates by the same amount (centre offset for screen space).
    pub fn offset(self, by: f64) -> Point {
        Point { x: self.x + by, y: self.y + by }
    }
}

/// Axial hex coordinate `(q, r)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    pub const ORIGIN: Axial = Axial { q: 0, r: 0 };

    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn is_origin(self) -> bool {
        self.q == 0 && self.r == 0
    }

    /// Flat-top hex-to-pixel transform with circumradius `radius`.
    pub fn to_point(self, radius: f64) -> Point {
        let q = f64::from(self.q);
        let r = f64::from(self.r);
        let sqrt3 = 3f64.sqrt();
        Point {
            x: radius * (1.5 * q),
            y: radius * (sqrt3 / 2.0 * q + sqrt3 * r),
        }
    }

    /// Hex ring index (distance from the origin in lattice steps).
    pub fn ring(self) -> u32 {
        self.q.unsigned_abs()
            .max(self.r.unsigned_abs())
            .max((self.q + self.r).unsigned_abs())
    }
}

/// A laid-out node. Immutable once its stage's layout is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub axial: Axial,
    pub position: Point,
}

impl Node {
    pub fn new(id: NodeId, axial: Axial, radius: f64) -> Self {
        Self { id, axial, position: axial.to_point(radius) }
    }

    pub fn origin() -> Self {
        Self { id: NodeId(0), axial: Axial::ORIGIN, position: Point::ORIGIN }
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        self.position.distance(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_is_exact_at_endpoints() {
        let a = Point::new(-121.24355652982141, 70.0);
        let b = Point::new(210.0, -121.24355652982141);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn axial_ring() {
        assert_eq!(Axial::ORIGIN.ring(), 0);
        assert_eq!(Axial::new(1, -1).ring(), 1);
        assert_eq!(Axial::new(2, -1).ring(), 2);
        assert_eq!(Axial::new(-2, 0).ring(), 2);
    }

    #[test]
    fn label_is_zero_padded() {
        assert_eq!(NodeId(3).label(), "CELL_03");
        assert_eq!(NodeId(18).label(), "CELL_18");
    }
}
