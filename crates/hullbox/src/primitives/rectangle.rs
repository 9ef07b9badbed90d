use nalgebra::{Point3, Vector3};

use super::{Plane, Triangle};
use crate::aabb::Aabb;

/// Rectangle with corners `p, q, r, s` in boundary order.
///
/// `new` does not check the shape; use `checked` or `is_rectangle` when the
/// corners come from arbitrary input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub p: Point3<f64>,
    pub q: Point3<f64>,
    pub r: Point3<f64>,
    pub s: Point3<f64>,
}

impl Rectangle {
    #[inline]
    pub fn new(p: Point3<f64>, q: Point3<f64>, r: Point3<f64>, s: Point3<f64>) -> Self {
        Self { p, q, r, s }
    }

    pub fn checked(
        p: Point3<f64>,
        q: Point3<f64>,
        r: Point3<f64>,
        s: Point3<f64>,
        eps: f64,
    ) -> Option<Self> {
        Self::is_rectangle(&p, &q, &r, &s, eps).then(|| Self::new(p, q, r, s))
    }

    /// Parallelogram with a right angle at `q` and sides longer than `eps`.
    pub fn is_rectangle(
        p: &Point3<f64>,
        q: &Point3<f64>,
        r: &Point3<f64>,
        s: &Point3<f64>,
        eps: f64,
    ) -> bool {
        let pq = q - p;
        let qr = r - q;
        let rs = s - r;
        let sp = p - s;
        let (lpq, lqr) = (pq.norm(), qr.norm());
        if lpq <= eps || lqr <= eps {
            return false;
        }
        (pq + rs).norm() <= eps && (qr + sp).norm() <= eps && pq.dot(&qr).abs() <= eps * lpq * lqr
    }

    #[inline]
    pub fn points(&self) -> [Point3<f64>; 4] {
        [self.p, self.q, self.r, self.s]
    }

    /// Length of side `p q`.
    #[inline]
    pub fn width(&self) -> f64 {
        (self.q - self.p).norm()
    }

    /// Length of side `q r`.
    #[inline]
    pub fn height(&self) -> f64 {
        (self.r - self.q).norm()
    }

    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        nalgebra::center(&self.p, &self.r)
    }

    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        (self.q - self.p).cross(&(self.r - self.q))
    }

    #[inline]
    pub fn plane(&self) -> Option<Plane> {
        Plane::new(self.p, self.normal())
    }

    pub fn triangles(&self) -> [Triangle; 2] {
        [
            Triangle::new(self.p, self.q, self.r),
            Triangle::new(self.p, self.r, self.s),
        ]
    }

    pub fn contains_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.triangles().iter().any(|t| t.contains_point(x, eps))
    }

    pub fn aabb(&self) -> Aabb {
        let lo = self.p.coords.inf(&self.q.coords).inf(&self.r.coords).inf(&self.s.coords);
        let hi = self.p.coords.sup(&self.q.coords).sup(&self.r.coords).sup(&self.s.coords);
        Aabb::new(Point3::from(lo), Point3::from(hi))
    }
}
