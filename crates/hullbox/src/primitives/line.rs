use nalgebra::{Point3, Vector3};

use crate::geometry::Geometry;
use crate::tolerance::points_close;

/// Infinite line `p + t v`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    p: Point3<f64>,
    v: Vector3<f64>,
}

/// Outcome of intersecting two infinite lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineHit {
    Point(Point3<f64>),
    Coincident,
}

impl Line {
    /// Line through `p` along `v` (`v` must be non-zero).
    #[inline]
    pub fn new(p: Point3<f64>, v: Vector3<f64>) -> Self {
        debug_assert!(v.norm_squared() > 0.0, "line direction must be non-zero");
        Self { p, v }
    }

    #[inline]
    pub fn through(a: &Point3<f64>, b: &Point3<f64>) -> Self {
        Self::new(*a, b - a)
    }

    #[inline]
    pub fn point(&self) -> &Point3<f64> {
        &self.p
    }

    #[inline]
    pub fn direction(&self) -> &Vector3<f64> {
        &self.v
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.p + self.v * t
    }

    /// Parameter of the orthogonal projection of `x`.
    #[inline]
    pub fn param_of(&self, x: &Point3<f64>) -> f64 {
        (x - self.p).dot(&self.v) / self.v.norm_squared()
    }

    #[inline]
    pub fn closest_point(&self, x: &Point3<f64>) -> Point3<f64> {
        self.at(self.param_of(x))
    }

    #[inline]
    pub fn distance_to_point(&self, x: &Point3<f64>) -> f64 {
        (x - self.p).cross(&self.v).norm() / self.v.norm()
    }

    #[inline]
    pub fn contains_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.distance_to_point(x) <= eps
    }

    /// Directions parallel within `eps` (sine of the angle between them).
    pub fn is_parallel(&self, other: &Line, eps: f64) -> bool {
        let s = self.v.cross(&other.v).norm() / (self.v.norm() * other.v.norm());
        s <= eps
    }

    /// Parameters `(s, t)` of the mutually closest points; `None` when parallel.
    pub fn closest_params(&self, other: &Line) -> Option<(f64, f64)> {
        let a = self.v.dot(&self.v);
        let b = self.v.dot(&other.v);
        let c = other.v.dot(&other.v);
        let w = self.p - other.p;
        let d = self.v.dot(&w);
        let e = other.v.dot(&w);
        let den = a * c - b * b;
        if den.abs() <= f64::EPSILON * a * c {
            return None;
        }
        Some(((b * e - c * d) / den, (a * e - b * d) / den))
    }

    pub fn intersect_line(&self, other: &Line, eps: f64) -> Option<LineHit> {
        if self.is_parallel(other, eps) {
            return self
                .contains_point(&other.p, eps)
                .then_some(LineHit::Coincident);
        }
        let (s, t) = self.closest_params(other)?;
        let a = self.at(s);
        let b = other.at(t);
        points_close(&a, &b, eps).then_some(LineHit::Point(a))
    }

    pub fn translate(&mut self, v: &Vector3<f64>) {
        self.p += v;
    }
}

/// Closed segment between `a` and `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
}

impl Segment {
    #[inline]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn line(&self) -> Line {
        Line::new(self.a, self.b - self.a)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.a, &self.b)
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.a + (self.b - self.a) * t
    }

    pub fn closest_point(&self, x: &Point3<f64>) -> Point3<f64> {
        let d = self.b - self.a;
        let l2 = d.norm_squared();
        if l2 == 0.0 {
            return self.a;
        }
        let t = ((x - self.a).dot(&d) / l2).clamp(0.0, 1.0);
        self.at(t)
    }

    #[inline]
    pub fn distance_to_point(&self, x: &Point3<f64>) -> f64 {
        (x - self.closest_point(x)).norm()
    }

    #[inline]
    pub fn contains_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.distance_to_point(x) <= eps
    }

    /// Overlap with a segment known to lie on (or near) the same line.
    ///
    /// Returns a point when the overlap is shorter than `eps`.
    pub fn overlap_collinear(&self, other: &Segment, eps: f64) -> Option<Geometry> {
        let len = self.length();
        if len <= eps {
            return other
                .contains_point(&self.a, eps)
                .then_some(Geometry::Point(self.a));
        }
        let line = self.line();
        if !line.contains_point(&other.a, eps) || !line.contains_point(&other.b, eps) {
            return None;
        }
        let t0 = line.param_of(&other.a);
        let t1 = line.param_of(&other.b);
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        let slack = eps / len;
        if lo > hi + slack {
            return None;
        }
        let start = self.at(lo.min(hi));
        let end = self.at(hi.max(lo));
        if points_close(&start, &end, eps) {
            Some(Geometry::Point(start))
        } else {
            Some(Geometry::Segment(Segment::new(start, end)))
        }
    }

    /// Intersection with another segment: a point, a shared sub-segment, or nothing.
    pub fn intersect_segment(&self, other: &Segment, eps: f64) -> Option<Geometry> {
        if self.length() <= eps || other.length() <= eps {
            return self.overlap_collinear(other, eps);
        }
        let (l1, l2) = (self.line(), other.line());
        if l1.is_parallel(&l2, eps) {
            return self.overlap_collinear(other, eps);
        }
        let (s, t) = l1.closest_params(&l2)?;
        let (slack1, slack2) = (eps / self.length(), eps / other.length());
        if s < -slack1 || s > 1.0 + slack1 || t < -slack2 || t > 1.0 + slack2 {
            return None;
        }
        let a = self.at(s.clamp(0.0, 1.0));
        let b = other.at(t.clamp(0.0, 1.0));
        points_close(&a, &b, eps).then_some(Geometry::Point(a))
    }

    pub fn translate(&mut self, v: &Vector3<f64>) {
        self.a += v;
        self.b += v;
    }
}

/// Half-line `origin + t dir`, `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub dir: Vector3<f64>,
}

impl Ray {
    #[inline]
    pub fn new(origin: Point3<f64>, dir: Vector3<f64>) -> Self {
        debug_assert!(dir.norm_squared() > 0.0, "ray direction must be non-zero");
        Self { origin, dir }
    }

    #[inline]
    pub fn line(&self) -> Line {
        Line::new(self.origin, self.dir)
    }

    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.dir * t
    }

    pub fn closest_point(&self, x: &Point3<f64>) -> Point3<f64> {
        let t = self.line().param_of(x).max(0.0);
        self.at(t)
    }

    #[inline]
    pub fn contains_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        (x - self.closest_point(x)).norm() <= eps
    }

    pub fn translate(&mut self, v: &Vector3<f64>) {
        self.origin += v;
    }
}
