use std::sync::OnceLock;

use nalgebra::{Point3, Vector3};

use super::axis_box::{Axis, AxisBox};
use crate::error::GeomError;
use crate::geometry::Geometry;
use crate::primitives::{Line, Ray, Segment};

/// Axis-aligned box in 3D.
///
/// Invariants:
/// - `lo <= hi` componentwise (constructors normalize).
/// - Stored bounds exclude `offset`; accessors add it.
/// - `corners` and `faces` are caches cleared by `translate`.
#[derive(Clone, Debug)]
pub struct Aabb {
    lo: Point3<f64>,
    hi: Point3<f64>,
    offset: Vector3<f64>,
    corners: OnceLock<[Point3<f64>; 8]>,
    faces: OnceLock<[AxisBox; 6]>,
}

impl PartialEq for Aabb {
    fn eq(&self, other: &Self) -> bool {
        self.min() == other.min() && self.max() == other.max()
    }
}

impl Aabb {
    /// Box spanned by two opposite corners, in any order.
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            lo: Point3::from(a.coords.inf(&b.coords)),
            hi: Point3::from(a.coords.sup(&b.coords)),
            offset: Vector3::zeros(),
            corners: OnceLock::new(),
            faces: OnceLock::new(),
        }
    }

    #[inline]
    pub fn from_point(p: Point3<f64>) -> Self {
        Self::new(p, p)
    }

    pub fn from_points(points: &[Point3<f64>]) -> Result<Self, GeomError> {
        let first = points.first().ok_or(GeomError::empty("aabb points"))?;
        let (lo, hi) = points[1..]
            .iter()
            .fold((first.coords, first.coords), |(lo, hi), p| {
                (lo.inf(&p.coords), hi.sup(&p.coords))
            });
        Ok(Self::new(Point3::from(lo), Point3::from(hi)))
    }

    /// Union of the boxes of each geometry.
    pub fn from_geometries(geoms: &[Geometry]) -> Result<Self, GeomError> {
        let (first, rest) = geoms
            .split_first()
            .ok_or(GeomError::empty("aabb geometries"))?;
        Ok(rest.iter().fold(first.aabb(), |acc, g| acc.union(&g.aabb())))
    }

    /// Flat box covering an axis box.
    pub fn from_axis_box(b: &AxisBox) -> Self {
        let lo = Point3::new(b.min(Axis::X), b.min(Axis::Y), b.min(Axis::Z));
        let hi = Point3::new(b.max(Axis::X), b.max(Axis::Y), b.max(Axis::Z));
        Self::new(lo, hi)
    }

    #[inline]
    pub fn min(&self) -> Point3<f64> {
        self.lo + self.offset
    }

    #[inline]
    pub fn max(&self) -> Point3<f64> {
        self.hi + self.offset
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.min().x
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.max().x
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.min().y
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.max().y
    }

    #[inline]
    pub fn z_min(&self) -> f64 {
        self.min().z
    }

    #[inline]
    pub fn z_max(&self) -> f64 {
        self.max().z
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min(), &self.max())
    }

    /// Full side lengths `max - min`.
    #[inline]
    pub fn extents(&self) -> Vector3<f64> {
        self.max() - self.min()
    }

    /// Corner `4·ix + 2·iy + iz`, where `i = 0` picks the minimum on that axis.
    pub fn corners(&self) -> &[Point3<f64>; 8] {
        self.corners.get_or_init(|| {
            let (lo, hi) = (self.min(), self.max());
            std::array::from_fn(|i| {
                Point3::new(
                    if i & 4 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 1 == 0 { lo.z } else { hi.z },
                )
            })
        })
    }

    /// Faces in `[left, right, bottom, top, fore, aft]` order: X-boxes at
    /// x-min/x-max, Y-boxes at y-min/y-max, Z-boxes at z-min/z-max.
    pub fn faces(&self) -> &[AxisBox; 6] {
        self.faces.get_or_init(|| {
            let (lo, hi) = (self.min(), self.max());
            let face = |axis: Axis, value: f64| {
                let (u, v) = axis.free();
                AxisBox::new(axis, value, (lo[u], hi[u]), (lo[v], hi[v]))
            };
            [
                face(Axis::X, lo.x),
                face(Axis::X, hi.x),
                face(Axis::Y, lo.y),
                face(Axis::Y, hi.y),
                face(Axis::Z, lo.z),
                face(Axis::Z, hi.z),
            ]
        })
    }

    #[inline]
    pub fn left(&self) -> &AxisBox {
        &self.faces()[0]
    }

    #[inline]
    pub fn right(&self) -> &AxisBox {
        &self.faces()[1]
    }

    #[inline]
    pub fn bottom(&self) -> &AxisBox {
        &self.faces()[2]
    }

    #[inline]
    pub fn top(&self) -> &AxisBox {
        &self.faces()[3]
    }

    #[inline]
    pub fn fore(&self) -> &AxisBox {
        &self.faces()[4]
    }

    #[inline]
    pub fn aft(&self) -> &AxisBox {
        &self.faces()[5]
    }

    /// `self` if it already contains `other`, else the componentwise hull.
    pub fn union(&self, other: &Aabb) -> Aabb {
        if self.contains_box(other) {
            return self.clone();
        }
        Aabb::new(
            Point3::from(self.min().coords.inf(&other.min().coords)),
            Point3::from(self.max().coords.sup(&other.max().coords)),
        )
    }

    /// Disjoint on at least one axis (strict).
    pub fn is_beyond(&self, other: &Aabb) -> bool {
        self.is_beyond_eps(other, 0.0)
    }

    /// Disjoint on at least one axis by more than `eps`.
    pub fn is_beyond_eps(&self, other: &Aabb, eps: f64) -> bool {
        let (a0, a1, b0, b1) = (self.min(), self.max(), other.min(), other.max());
        (0..3).any(|i| a1[i] < b0[i] - eps || a0[i] > b1[i] + eps)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        !self.is_beyond(other) || !other.is_beyond(self)
    }

    pub fn intersects_eps(&self, other: &Aabb, eps: f64) -> bool {
        !self.is_beyond_eps(other, eps) || !other.is_beyond_eps(self, eps)
    }

    #[inline]
    pub fn contains_point(&self, p: &Point3<f64>) -> bool {
        self.contains_point_eps(p, 0.0)
    }

    pub fn contains_point_eps(&self, p: &Point3<f64>, eps: f64) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (0..3).all(|i| p[i] >= lo[i] - eps && p[i] <= hi[i] + eps)
    }

    #[inline]
    pub fn intersects_point(&self, p: &Point3<f64>) -> bool {
        self.contains_point(p)
    }

    #[inline]
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains_box_eps(other, 0.0)
    }

    pub fn contains_box_eps(&self, other: &Aabb, eps: f64) -> bool {
        self.contains_point_eps(&other.min(), eps) && self.contains_point_eps(&other.max(), eps)
    }

    #[inline]
    pub fn contains_segment(&self, s: &Segment) -> bool {
        self.contains_point(&s.a) && self.contains_point(&s.b)
    }

    /// Overlap box of two boxes; `None` when strictly disjoint.
    ///
    /// Touching boxes give a flat (or point) box. No tolerance is applied;
    /// use `intersects_eps` for the biased test.
    pub fn intersect(&self, other: &Aabb) -> Option<Aabb> {
        if !self.intersects(other) {
            return None;
        }
        Some(Aabb::new(
            Point3::from(self.min().coords.sup(&other.min().coords)),
            Point3::from(self.max().coords.inf(&other.max().coords)),
        ))
    }

    /// Slab clip of `origin + t dir`, `t ∈ [t0, t1]`, against the box grown by
    /// `eps`; returns the surviving parameter range.
    fn clip_param(
        &self,
        origin: &Point3<f64>,
        dir: &Vector3<f64>,
        t0: f64,
        t1: f64,
        eps: f64,
    ) -> Option<(f64, f64)> {
        let (lo, hi) = (self.min(), self.max());
        let (mut tmin, mut tmax) = (t0, t1);
        for i in 0..3 {
            let (a, b) = (lo[i] - eps, hi[i] + eps);
            if dir[i].abs() < f64::MIN_POSITIVE {
                if origin[i] < a || origin[i] > b {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir[i];
            let (mut ta, mut tb) = ((a - origin[i]) * inv, (b - origin[i]) * inv);
            if ta > tb {
                std::mem::swap(&mut ta, &mut tb);
            }
            tmin = tmin.max(ta);
            tmax = tmax.min(tb);
            if tmin > tmax {
                return None;
            }
        }
        Some((tmin, tmax))
    }

    pub fn intersects_line(&self, line: &Line, eps: f64) -> bool {
        self.clip_param(
            line.point(),
            line.direction(),
            f64::NEG_INFINITY,
            f64::INFINITY,
            eps,
        )
        .is_some()
    }

    pub fn intersects_segment(&self, seg: &Segment, eps: f64) -> bool {
        self.clip_param(&seg.a, &(seg.b - seg.a), 0.0, 1.0, eps)
            .is_some()
    }

    pub fn intersects_ray(&self, ray: &Ray, eps: f64) -> bool {
        self.clip_param(&ray.origin, &ray.dir, 0.0, f64::INFINITY, eps)
            .is_some()
    }

    /// Euclidean distance to the box; zero inside.
    pub fn distance_to_point(&self, p: &Point3<f64>) -> f64 {
        let clamped = p.coords.sup(&self.min().coords).inf(&self.max().coords);
        (p.coords - clamped).norm()
    }

    /// Shift by `v`; drops every cached derived value.
    pub fn translate(&mut self, v: &Vector3<f64>) {
        self.offset += v;
        self.corners = OnceLock::new();
        self.faces = OnceLock::new();
    }
}
