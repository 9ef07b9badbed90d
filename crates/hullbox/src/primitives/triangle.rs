use nalgebra::{Point3, Vector3};

use super::{Line, Plane, Ray, Segment};
use crate::aabb::Aabb;
use crate::geometry::Geometry;
use crate::hull::clip_points_by_plane;
use crate::tolerance::{is_collinear, side_of, PlaneSide};

/// Triangle `p, q, r`; its orientation (normal) follows the vertex order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub p: Point3<f64>,
    pub q: Point3<f64>,
    pub r: Point3<f64>,
}

impl Triangle {
    #[inline]
    pub fn new(p: Point3<f64>, q: Point3<f64>, r: Point3<f64>) -> Self {
        Self { p, q, r }
    }

    #[inline]
    pub fn points(&self) -> [Point3<f64>; 3] {
        [self.p, self.q, self.r]
    }

    /// `(q - p) × (r - p)`, not normalized.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        (self.q - self.p).cross(&(self.r - self.p))
    }

    #[inline]
    pub fn area(&self) -> f64 {
        0.5 * self.normal().norm()
    }

    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.p.coords + self.q.coords + self.r.coords) / 3.0)
    }

    #[inline]
    pub fn is_degenerate(&self, eps: f64) -> bool {
        is_collinear(&self.points(), eps)
    }

    #[inline]
    pub fn plane(&self) -> Option<Plane> {
        Plane::through(&self.p, &self.q, &self.r)
    }

    pub fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.p, self.q),
            Segment::new(self.q, self.r),
            Segment::new(self.r, self.p),
        ]
    }

    /// Planes erected on each edge along the normal, oriented so the interior
    /// is above all three.
    pub fn edge_planes(&self) -> Option<[Plane; 3]> {
        let n = self.normal();
        let inside = self.centroid();
        let erect = |a: &Point3<f64>, b: &Point3<f64>| -> Option<Plane> {
            let plane = Plane::through(a, b, &(a + n))?;
            Some(if plane.signed_distance(&inside) < 0.0 {
                plane.flipped()
            } else {
                plane
            })
        };
        Some([
            erect(&self.p, &self.q)?,
            erect(&self.q, &self.r)?,
            erect(&self.r, &self.p)?,
        ])
    }

    pub fn aabb(&self) -> Aabb {
        let lo = self.p.coords.inf(&self.q.coords).inf(&self.r.coords);
        let hi = self.p.coords.sup(&self.q.coords).sup(&self.r.coords);
        Aabb::new(Point3::from(lo), Point3::from(hi))
    }

    /// Coplanar and inside (or on) all three edges.
    pub fn contains_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        let (Some(plane), Some(edges)) = (self.plane(), self.edge_planes()) else {
            return Segment::new(self.p, self.q).contains_point(x, eps)
                || Segment::new(self.q, self.r).contains_point(x, eps)
                || Segment::new(self.r, self.p).contains_point(x, eps);
        };
        plane.is_on(x, eps) && edges.iter().all(|e| e.side(x, eps) != PlaneSide::Below)
    }

    pub fn intersect_plane(&self, plane: &Plane, eps: f64) -> Option<Geometry> {
        let pts = self.points();
        let d = pts.map(|x| plane.signed_distance(&x));
        let sides = d.map(|v| side_of(v, eps));
        if sides.iter().all(|s| *s == PlaneSide::On) {
            return Some(Geometry::Triangle(*self));
        }
        let mut hits: Vec<Point3<f64>> = Vec::with_capacity(3);
        for i in 0..3 {
            let j = (i + 1) % 3;
            if sides[i] == PlaneSide::On {
                hits.push(pts[i]);
            } else if sides[j] != PlaneSide::On && sides[i] != sides[j] {
                hits.push(pts[i] + (pts[j] - pts[i]) * (d[i] / (d[i] - d[j])));
            }
        }
        Geometry::from_points(&hits, eps)
    }

    pub fn intersect_line(&self, line: &Line, eps: f64) -> Option<Geometry> {
        self.intersect_param(
            line.point(),
            line.direction(),
            f64::NEG_INFINITY,
            f64::INFINITY,
            eps,
        )
    }

    pub fn intersect_segment(&self, seg: &Segment, eps: f64) -> Option<Geometry> {
        if seg.length() <= eps {
            return self
                .contains_point(&seg.a, eps)
                .then_some(Geometry::Point(seg.a));
        }
        self.intersect_param(&seg.a, &(seg.b - seg.a), 0.0, 1.0, eps)
    }

    pub fn intersect_ray(&self, ray: &Ray, eps: f64) -> Option<Geometry> {
        self.intersect_param(&ray.origin, &ray.dir, 0.0, f64::INFINITY, eps)
    }

    /// Shared routine for `origin + t dir`, `t ∈ [t0, t1]`.
    ///
    /// In-plane input is clipped against the edge planes (Cyrus–Beck); anything
    /// else is resolved by its piercing point.
    fn intersect_param(
        &self,
        origin: &Point3<f64>,
        dir: &Vector3<f64>,
        t0: f64,
        t1: f64,
        eps: f64,
    ) -> Option<Geometry> {
        let plane = self.plane()?;
        let scale = dir.norm();
        let dn = plane.normal().dot(dir);
        let dist = plane.signed_distance(origin);
        if dn.abs() > eps * scale {
            let t = -dist / dn;
            let slack = eps / scale;
            if t < t0 - slack || t > t1 + slack {
                return None;
            }
            let x = origin + dir * t;
            return self.contains_point(&x, eps).then_some(Geometry::Point(x));
        }
        if dist.abs() > eps {
            return None;
        }
        let (mut lo, mut hi) = (t0, t1);
        for e in self.edge_planes()? {
            let num = e.signed_distance(origin);
            let den = e.normal().dot(dir);
            if den.abs() <= f64::EPSILON * scale {
                if num < -eps {
                    return None;
                }
                continue;
            }
            let t = (-eps - num) / den;
            if den > 0.0 {
                lo = lo.max(t);
            } else {
                hi = hi.min(t);
            }
            if lo > hi {
                return None;
            }
        }
        Geometry::from_points(&[origin + dir * lo, origin + dir * hi], eps)
    }

    pub fn intersects_line(&self, line: &Line, eps: f64) -> bool {
        self.intersect_line(line, eps).is_some()
    }

    pub fn intersects_segment(&self, seg: &Segment, eps: f64) -> bool {
        self.intersect_segment(seg, eps).is_some()
    }

    pub fn intersects_ray(&self, ray: &Ray, eps: f64) -> bool {
        self.intersect_ray(ray, eps).is_some()
    }

    /// Intersection with another triangle.
    ///
    /// Coplanar pairs are clipped polygon-against-edge-planes; otherwise the
    /// result is the overlap of each triangle's cut by the other's plane.
    pub fn intersect_triangle(&self, other: &Triangle, eps: f64) -> Option<Geometry> {
        let (pa, pb) = (self.plane()?, other.plane()?);
        if pa.same_plane(&pb, eps) {
            let mut poly = self.points().to_vec();
            for e in other.edge_planes()? {
                poly = clip_points_by_plane(&poly, &e, eps);
                if poly.is_empty() {
                    return None;
                }
            }
            return Geometry::from_points(&poly, eps);
        }
        let cut_a = self.intersect_plane(&pb, eps)?.span()?;
        let cut_b = other.intersect_plane(&pa, eps)?.span()?;
        cut_a.overlap_collinear(&cut_b, eps)
    }

    pub fn intersects_triangle(&self, other: &Triangle, eps: f64) -> bool {
        self.intersect_triangle(other, eps).is_some()
    }

    /// Separating-axis test against a box (13 axes), with each axis gap
    /// relaxed by `eps`.
    pub fn intersects_aabb(&self, b: &Aabb, eps: f64) -> bool {
        let c = b.center();
        let h = b.extents() * 0.5;
        let v = [self.p - c, self.q - c, self.r - c];
        let e = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];
        let units = [Vector3::x(), Vector3::y(), Vector3::z()];

        let mut axes: Vec<Vector3<f64>> = Vec::with_capacity(13);
        axes.extend_from_slice(&units);
        axes.push(e[0].cross(&e[1]));
        for u in &units {
            for edge in &e {
                axes.push(u.cross(edge));
            }
        }
        axes.iter()
            .filter(|a| a.norm_squared() > f64::MIN_POSITIVE)
            .all(|a| {
                let proj = v.map(|x| x.dot(a));
                let lo = proj[0].min(proj[1]).min(proj[2]);
                let hi = proj[0].max(proj[1]).max(proj[2]);
                let rad = h.x * a.x.abs() + h.y * a.y.abs() + h.z * a.z.abs();
                let slack = eps * a.norm();
                !(lo > rad + slack || hi < -rad - slack)
            })
    }

    pub fn translate(&mut self, v: &Vector3<f64>) {
        self.p += v;
        self.q += v;
        self.r += v;
    }
}
