use nalgebra::{Matrix3, Point3, Vector3};

use super::Line;
use crate::tolerance::{side_of, PlaneSide};

/// Plane through `p` with unit normal `n`.
///
/// Invariants:
/// - `||n|| = 1`.
/// - Signed distances are positive on the side `n` points to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    p: Point3<f64>,
    n: Vector3<f64>,
}

impl Plane {
    /// Plane through `p` with normal direction `n`; `None` for a zero normal.
    #[inline]
    pub fn new(p: Point3<f64>, n: Vector3<f64>) -> Option<Self> {
        let n = n.try_normalize(0.0)?;
        Some(Self { p, n })
    }

    /// Caller guarantees `n` is unit length.
    #[inline]
    pub(crate) fn from_unit(p: Point3<f64>, n: Vector3<f64>) -> Self {
        debug_assert!((n.norm() - 1.0).abs() < 1e-9, "plane normal must be unit");
        Self { p, n }
    }

    /// Plane through three points, normal `(b - a) × (c - a)`; `None` if collinear.
    #[inline]
    pub fn through(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        Self::new(*a, (b - a).cross(&(c - a)))
    }

    #[inline]
    pub fn point(&self) -> &Point3<f64> {
        &self.p
    }

    #[inline]
    pub fn normal(&self) -> &Vector3<f64> {
        &self.n
    }

    #[inline]
    pub fn signed_distance(&self, x: &Point3<f64>) -> f64 {
        self.n.dot(&(x - self.p))
    }

    #[inline]
    pub fn side(&self, x: &Point3<f64>, eps: f64) -> PlaneSide {
        side_of(self.signed_distance(x), eps)
    }

    #[inline]
    pub fn is_on(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.signed_distance(x).abs() <= eps
    }

    /// Orthogonal projection of `x` onto the plane.
    #[inline]
    pub fn project(&self, x: &Point3<f64>) -> Point3<f64> {
        x - self.n * self.signed_distance(x)
    }

    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            p: self.p,
            n: -self.n,
        }
    }

    #[inline]
    pub fn is_parallel(&self, other: &Plane, eps: f64) -> bool {
        self.n.cross(&other.n).norm() <= eps
    }

    /// Same point set, either orientation.
    pub fn same_plane(&self, other: &Plane, eps: f64) -> bool {
        self.is_parallel(other, eps) && self.is_on(&other.p, eps)
    }

    /// Crossing of the segment `a → b` with the plane.
    ///
    /// Endpoints on the plane count as crossings. A segment lying in the plane
    /// yields its first endpoint; callers that care test that case first.
    pub fn crossing(&self, a: &Point3<f64>, b: &Point3<f64>, eps: f64) -> Option<Point3<f64>> {
        let da = self.signed_distance(a);
        let db = self.signed_distance(b);
        match (side_of(da, eps), side_of(db, eps)) {
            (PlaneSide::On, _) => Some(*a),
            (_, PlaneSide::On) => Some(*b),
            (sa, sb) if sa == sb => None,
            _ => Some(a + (b - a) * (da / (da - db))),
        }
    }

    /// Point where `line` pierces the plane; `None` when parallel (including
    /// lines lying in the plane).
    pub fn intersect_line(&self, line: &Line, eps: f64) -> Option<Point3<f64>> {
        let dir = line.direction();
        let den = self.n.dot(dir);
        if den.abs() <= eps * dir.norm() {
            return None;
        }
        let t = self.n.dot(&(self.p - line.point())) / den;
        Some(line.at(t))
    }

    /// Line shared by two non-parallel planes.
    pub fn intersect_plane(&self, other: &Plane, eps: f64) -> Option<Line> {
        let dir = self.n.cross(&other.n);
        let d2 = dir.norm_squared();
        if d2.sqrt() <= eps {
            return None;
        }
        // With n_i·x = d_i: x = (d1 (n2 × dir) + d2 (dir × n1)) / |dir|².
        let d_self = self.n.dot(&self.p.coords);
        let d_other = other.n.dot(&other.p.coords);
        let x = (other.n.cross(&dir) * d_self + dir.cross(&self.n) * d_other) / d2;
        Some(Line::new(Point3::from(x), dir))
    }

    /// Common point of three planes, if their normals are independent.
    pub fn meet(a: &Plane, b: &Plane, c: &Plane) -> Option<Point3<f64>> {
        let m = Matrix3::from_rows(&[a.n.transpose(), b.n.transpose(), c.n.transpose()]);
        let inv = m.try_inverse()?;
        let rhs = Vector3::new(
            a.n.dot(&a.p.coords),
            b.n.dot(&b.p.coords),
            c.n.dot(&c.p.coords),
        );
        Some(Point3::from(inv * rhs))
    }

    pub fn translate(&mut self, v: &Vector3<f64>) {
        self.p += v;
    }
}
