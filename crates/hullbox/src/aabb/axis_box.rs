use std::sync::OnceLock;

use nalgebra::{Point3, Vector3};

use crate::error::GeomError;
use crate::geometry::Geometry;
use crate::primitives::{Line, Plane, Segment};

/// Coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Free axes `(u, v)` of a box fixed on this axis.
    #[inline]
    pub fn free(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }

    #[inline]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// Corners in free-axis terms: `LL = (umin, vmin)`, `LU = (umin, vmax)`,
/// `UU = (umax, vmax)`, `UL = (umax, vmin)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    LL,
    LU,
    UU,
    UL,
}

/// Box sides: `Left`/`Right` at umin/umax, `Bottom`/`Top` at vmin/vmax.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxSide {
    Left,
    Right,
    Bottom,
    Top,
}

impl BoxSide {
    const ALL: [BoxSide; 4] = [BoxSide::Left, BoxSide::Right, BoxSide::Bottom, BoxSide::Top];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// A box side: a point when its spanning range is degenerate, else a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Point(Point3<f64>),
    Segment(Segment),
}

impl Edge {
    fn between(a: Point3<f64>, b: Point3<f64>, degenerate: bool) -> Self {
        if degenerate {
            Edge::Point(a)
        } else {
            Edge::Segment(Segment::new(a, b))
        }
    }
}

/// Planar box at a fixed coordinate on `axis`.
///
/// Invariants:
/// - `lo[k] <= hi[k]` on both free axes (constructors normalize).
/// - Stored values exclude `offset`; readers add it.
/// - `corners`, `edges`, `planes` are caches cleared by `translate`.
#[derive(Clone, Debug)]
pub struct AxisBox {
    axis: Axis,
    value: f64,
    lo: [f64; 2],
    hi: [f64; 2],
    offset: Vector3<f64>,
    corners: OnceLock<[Point3<f64>; 4]>,
    edges: OnceLock<[Edge; 4]>,
    planes: OnceLock<[Plane; 4]>,
}

impl PartialEq for AxisBox {
    fn eq(&self, other: &Self) -> bool {
        self.axis == other.axis
            && self.value() == other.value()
            && self.u_min() == other.u_min()
            && self.u_max() == other.u_max()
            && self.v_min() == other.v_min()
            && self.v_max() == other.v_max()
    }
}

impl AxisBox {
    /// Box at `value` on `axis` spanning `u` and `v` on the free axes.
    pub fn new(axis: Axis, value: f64, u: (f64, f64), v: (f64, f64)) -> Self {
        Self {
            axis,
            value,
            lo: [u.0.min(u.1), v.0.min(v.1)],
            hi: [u.0.max(u.1), v.0.max(v.1)],
            offset: Vector3::zeros(),
            corners: OnceLock::new(),
            edges: OnceLock::new(),
            planes: OnceLock::new(),
        }
    }

    /// Degenerate box holding a single point.
    pub fn from_point(axis: Axis, p: &Point3<f64>) -> Self {
        let (u, v) = axis.free();
        Self::new(axis, p[axis.index()], (p[u], p[u]), (p[v], p[v]))
    }

    /// Bounds of `points`; the fixed coordinate is taken from the first point.
    pub fn from_points(axis: Axis, points: &[Point3<f64>]) -> Result<Self, GeomError> {
        let first = points.first().ok_or(GeomError::empty("axis box points"))?;
        let (u, v) = axis.free();
        let mut out = Self::from_point(axis, first);
        for p in &points[1..] {
            out.lo = [out.lo[0].min(p[u]), out.lo[1].min(p[v])];
            out.hi = [out.hi[0].max(p[u]), out.hi[1].max(p[v])];
        }
        Ok(out)
    }

    /// Union of the boxes of each geometry.
    pub fn from_geometries(axis: Axis, geoms: &[Geometry]) -> Result<Self, GeomError> {
        let mut boxes = geoms
            .iter()
            .map(|g| Self::from_points(axis, &g.points()));
        let first = boxes.next().ok_or(GeomError::empty("axis box geometries"))??;
        boxes.try_fold(first, |acc, b| -> Result<Self, GeomError> { Ok(acc.union(&b?)) })
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn offset(&self) -> &Vector3<f64> {
        &self.offset
    }

    /// Fixed coordinate.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value + self.offset[self.axis.index()]
    }

    #[inline]
    pub fn u_min(&self) -> f64 {
        self.lo[0] + self.offset[self.axis.free().0]
    }

    #[inline]
    pub fn u_max(&self) -> f64 {
        self.hi[0] + self.offset[self.axis.free().0]
    }

    #[inline]
    pub fn v_min(&self) -> f64 {
        self.lo[1] + self.offset[self.axis.free().1]
    }

    #[inline]
    pub fn v_max(&self) -> f64 {
        self.hi[1] + self.offset[self.axis.free().1]
    }

    /// Minimum on `a`; the fixed coordinate for the fixed axis.
    pub fn min(&self, a: Axis) -> f64 {
        let (u, _) = self.axis.free();
        if a == self.axis {
            self.value()
        } else if a.index() == u {
            self.u_min()
        } else {
            self.v_min()
        }
    }

    /// Maximum on `a`; the fixed coordinate for the fixed axis.
    pub fn max(&self, a: Axis) -> f64 {
        let (u, _) = self.axis.free();
        if a == self.axis {
            self.value()
        } else if a.index() == u {
            self.u_max()
        } else {
            self.v_max()
        }
    }

    fn point_at(&self, u_val: f64, v_val: f64) -> Point3<f64> {
        let (u, v) = self.axis.free();
        let mut p = Point3::origin();
        p[self.axis.index()] = self.value();
        p[u] = u_val;
        p[v] = v_val;
        p
    }

    /// Corners in `[LL, LU, UU, UL]` order.
    pub fn corners(&self) -> &[Point3<f64>; 4] {
        self.corners.get_or_init(|| {
            let (u0, u1, v0, v1) = (self.u_min(), self.u_max(), self.v_min(), self.v_max());
            [
                self.point_at(u0, v0),
                self.point_at(u0, v1),
                self.point_at(u1, v1),
                self.point_at(u1, v0),
            ]
        })
    }

    #[inline]
    pub fn corner(&self, c: Corner) -> Point3<f64> {
        self.corners()[c as usize]
    }

    /// Side edges in `[Left, Right, Bottom, Top]` order.
    pub fn edges(&self) -> &[Edge; 4] {
        self.edges.get_or_init(|| {
            let [ll, lu, uu, ul] = *self.corners();
            let flat_u = self.lo[0] == self.hi[0];
            let flat_v = self.lo[1] == self.hi[1];
            [
                Edge::between(ll, lu, flat_v),
                Edge::between(ul, uu, flat_v),
                Edge::between(ll, ul, flat_u),
                Edge::between(lu, uu, flat_u),
            ]
        })
    }

    #[inline]
    pub fn edge(&self, side: BoxSide) -> &Edge {
        &self.edges()[side.slot()]
    }

    /// Bounding planes through each side, normals pointing out of the box.
    pub fn planes(&self) -> &[Plane; 4] {
        self.planes.get_or_init(|| {
            let (u, v) = self.axis.free();
            let (eu, ev) = (unit(u), unit(v));
            let [ll, _, uu, _] = *self.corners();
            BoxSide::ALL.map(|side| match side {
                BoxSide::Left => Plane::from_unit(ll, -eu),
                BoxSide::Right => Plane::from_unit(uu, eu),
                BoxSide::Bottom => Plane::from_unit(ll, -ev),
                BoxSide::Top => Plane::from_unit(uu, ev),
            })
        })
    }

    #[inline]
    pub fn plane(&self, side: BoxSide) -> &Plane {
        &self.planes()[side.slot()]
    }

    /// Plane the box lies in, normal along `+axis`.
    pub fn box_plane(&self) -> Plane {
        Plane::from_unit(self.corner(Corner::LL), self.axis.unit())
    }

    /// `self` if it already contains `other`, else the componentwise hull.
    ///
    /// Both boxes must share the fixed coordinate (not checked).
    pub fn union(&self, other: &AxisBox) -> AxisBox {
        if self.contains_box(other) {
            return self.clone();
        }
        Self::new(
            self.axis,
            self.value(),
            (self.u_min().min(other.u_min()), self.u_max().max(other.u_max())),
            (self.v_min().min(other.v_min()), self.v_max().max(other.v_max())),
        )
    }

    /// Free-axis ranges are disjoint on at least one axis (strict).
    pub fn is_beyond(&self, other: &AxisBox) -> bool {
        self.u_max() < other.u_min()
            || self.u_min() > other.u_max()
            || self.v_max() < other.v_min()
            || self.v_min() > other.v_max()
    }

    pub fn intersects_box(&self, other: &AxisBox) -> bool {
        !self.is_beyond(other) || !other.is_beyond(self)
    }

    pub fn contains_box(&self, other: &AxisBox) -> bool {
        self.u_min() <= other.u_min()
            && self.u_max() >= other.u_max()
            && self.v_min() <= other.v_min()
            && self.v_max() >= other.v_max()
    }

    fn in_range(&self, p: &Point3<f64>, eps: f64) -> bool {
        let (u, v) = self.axis.free();
        p[u] >= self.u_min() - eps
            && p[u] <= self.u_max() + eps
            && p[v] >= self.v_min() - eps
            && p[v] <= self.v_max() + eps
    }

    /// Inclusive free-axis range test; the fixed coordinate is not compared.
    #[inline]
    pub fn contains_point(&self, p: &Point3<f64>) -> bool {
        self.in_range(p, 0.0)
    }

    #[inline]
    pub fn contains_segment(&self, s: &Segment) -> bool {
        self.contains_point(&s.a) && self.contains_point(&s.b)
    }

    #[inline]
    pub fn intersects_point(&self, p: &Point3<f64>) -> bool {
        self.contains_point(p)
    }

    /// Does the infinite line touch the box?
    ///
    /// A line crossing the box plane is decided by its piercing point. A line
    /// in the plane is tested side by side.
    pub fn intersects_line(&self, line: &Line, eps: f64) -> bool {
        let a = self.axis.index();
        let dir = line.direction();
        if dir[a].abs() > eps * dir.norm() {
            let t = (self.value() - line.point()[a]) / dir[a];
            return self.in_range(&line.at(t), eps);
        }
        if (line.point()[a] - self.value()).abs() > eps {
            return false;
        }
        self.edges().iter().any(|e| match e {
            Edge::Point(p) => line.contains_point(p, eps),
            Edge::Segment(s) => self.intersect_segment_line(s, line, eps).is_some(),
        })
    }

    /// In-plane intersection of a side segment with a line, by the 2D
    /// determinant formula on the free axes.
    ///
    /// Parallel lines give the whole segment when coincident and nothing
    /// otherwise; a crossing point is kept only inside the segment's range.
    pub fn intersect_segment_line(&self, seg: &Segment, line: &Line, eps: f64) -> Option<Edge> {
        let (u, v) = self.axis.free();
        let q = line.at(1.0);
        let (x1, y1, x2, y2) = (seg.a[u], seg.a[v], seg.b[u], seg.b[v]);
        let (x3, y3, x4, y4) = (line.point()[u], line.point()[v], q[u], q[v]);
        let (dx, dy) = (x4 - x3, y4 - y3);
        let dlen = dx.hypot(dy);
        if dlen <= eps {
            // The line projects to a single point of the plane.
            let hit = self.point_at(x3, y3);
            let flat = Segment::new(self.point_at(x1, y1), self.point_at(x2, y2));
            return flat.contains_point(&hit, eps).then_some(Edge::Point(hit));
        }
        let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if den.abs() <= eps {
            let off = ((x1 - x3) * dy - (y1 - y3) * dx).abs() / dlen;
            return (off <= eps).then_some(Edge::Segment(*seg));
        }
        let a = x1 * y2 - y1 * x2;
        let b = x3 * y4 - y3 * x4;
        let px = (a * (x3 - x4) - (x1 - x2) * b) / den;
        let py = (a * (y3 - y4) - (y1 - y2) * b) / den;
        let within = px >= x1.min(x2) - eps
            && px <= x1.max(x2) + eps
            && py >= y1.min(y2) - eps
            && py <= y1.max(y2) + eps;
        within.then(|| Edge::Point(self.point_at(px, py)))
    }

    /// Shift by `v`; drops every cached derived value.
    pub fn translate(&mut self, v: &Vector3<f64>) {
        self.offset += v;
        self.corners = OnceLock::new();
        self.edges = OnceLock::new();
        self.planes = OnceLock::new();
    }
}

#[inline]
fn unit(i: usize) -> Vector3<f64> {
    Axis::ALL[i].unit()
}
