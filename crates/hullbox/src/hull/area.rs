use std::sync::OnceLock;

use nalgebra::{Point3, Rotation3, Unit, Vector3};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use super::clip::oriented_toward;
use super::quickhull::{edge_plane, quickhull};
use crate::aabb::Aabb;
use crate::error::GeomError;
use crate::geometry::Geometry;
use crate::primitives::{Line, Plane, Ray, Rectangle, Segment, Triangle};
use crate::tolerance::{dedup_points, farthest_pair, PlaneSide};

/// Convex polygon in 3D, stored as its hull vertices.
///
/// Invariants:
/// - At least three vertices, counterclockwise around the unit `normal`.
/// - All vertices on one plane; no three consecutive vertices collinear.
/// - `triangles`, `edges` and `aabb` are caches cleared by `translate`.
#[derive(Clone, Debug)]
pub struct ConvexArea {
    pts: Vec<Point3<f64>>,
    normal: Vector3<f64>,
    triangles: OnceLock<Vec<Triangle>>,
    edges: OnceLock<Vec<Segment>>,
    aabb: OnceLock<Aabb>,
}

/// Cheapest shape equal to a convex area.
#[derive(Clone, Debug)]
pub enum Simplified {
    Triangle(Triangle),
    Rectangle(Rectangle),
    Area(ConvexArea),
}

impl ConvexArea {
    /// Convex hull of coplanar points.
    ///
    /// Errors: `EmptyInput` for no points, `Degenerate` when fewer than three
    /// non-collinear distinct points remain, `NotCoplanar` when a point is off
    /// the plane by more than `eps`.
    pub fn from_points(points: &[Point3<f64>], eps: f64) -> Result<Self, GeomError> {
        if points.is_empty() {
            return Err(GeomError::empty("convex area points"));
        }
        let unique = dedup_points(points, eps);
        if unique.len() < points.len() {
            trace!(dropped = points.len() - unique.len(), "convex area: merged near-duplicates");
        }
        Self::from_unique_points(unique, eps)
    }

    /// As `from_points`, with the supporting plane normal given.
    pub fn from_points_with_normal(
        points: &[Point3<f64>],
        normal: &Vector3<f64>,
        eps: f64,
    ) -> Result<Self, GeomError> {
        if points.is_empty() {
            return Err(GeomError::empty("convex area points"));
        }
        let n = normal
            .try_normalize(0.0)
            .ok_or_else(|| GeomError::degenerate("zero plane normal"))?;
        Self::build(dedup_points(points, eps), n, eps)
    }

    /// Hull of the vertices of coplanar triangles.
    pub fn from_triangles(tris: &[Triangle], eps: f64) -> Result<Self, GeomError> {
        if tris.is_empty() {
            return Err(GeomError::empty("convex area triangles"));
        }
        let pts: Vec<Point3<f64>> = tris.iter().flat_map(|t| t.points()).collect();
        Self::from_points(&pts, eps)
    }

    /// Points already deduplicated within `eps`.
    pub(crate) fn from_unique_points(unique: Vec<Point3<f64>>, eps: f64) -> Result<Self, GeomError> {
        let n = plane_normal(&unique, eps)?;
        Self::build(unique, n, eps)
    }

    fn build(unique: Vec<Point3<f64>>, normal: Vector3<f64>, eps: f64) -> Result<Self, GeomError> {
        let origin = *unique.first().ok_or(GeomError::empty("convex area points"))?;
        let plane = Plane::from_unit(origin, normal);
        let off = unique
            .iter()
            .map(|p| plane.signed_distance(p).abs())
            .fold(0.0, f64::max);
        if off > eps {
            return Err(GeomError::NotCoplanar { distance: off });
        }
        let pts = quickhull(&unique, &normal, eps);
        if pts.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "hull has {} vertices",
                pts.len()
            )));
        }
        debug!(input = unique.len(), hull = pts.len(), "convex area built");
        Ok(Self {
            pts,
            normal,
            triangles: OnceLock::new(),
            edges: OnceLock::new(),
            aabb: OnceLock::new(),
        })
    }

    /// Hull vertices in boundary order.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.pts
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pts.len()
    }

    /// Unit normal; the boundary runs counterclockwise around it.
    #[inline]
    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    #[inline]
    pub fn plane(&self) -> Plane {
        Plane::from_unit(self.pts[0], self.normal)
    }

    /// Fan triangulation from the first vertex.
    pub fn triangles(&self) -> &[Triangle] {
        self.triangles.get_or_init(|| {
            self.pts[1..]
                .windows(2)
                .map(|w| Triangle::new(self.pts[0], w[0], w[1]))
                .collect()
        })
    }

    /// Boundary edges `v[i] → v[i + 1]`, closing back to the first vertex.
    pub fn edges(&self) -> &[Segment] {
        self.edges.get_or_init(|| {
            let n = self.pts.len();
            (0..n)
                .map(|i| Segment::new(self.pts[i], self.pts[(i + 1) % n]))
                .collect()
        })
    }

    pub fn aabb(&self) -> &Aabb {
        self.aabb.get_or_init(|| {
            let first = self.pts[0].coords;
            let (lo, hi) = self.pts.iter().fold((first, first), |(lo, hi), p| {
                (lo.inf(&p.coords), hi.sup(&p.coords))
            });
            Aabb::new(Point3::from(lo), Point3::from(hi))
        })
    }

    /// Edge planes with outward normals, in edge order.
    fn edge_planes(&self) -> impl Iterator<Item = Plane> + '_ {
        self.edges()
            .iter()
            .filter_map(|e| edge_plane(&e.a, &e.b, &self.normal))
    }

    pub fn area(&self) -> f64 {
        self.triangles().iter().map(Triangle::area).sum()
    }

    /// Area-weighted centroid of the fan.
    pub fn centroid(&self) -> Point3<f64> {
        let (sum, total) = self
            .triangles()
            .iter()
            .fold((Vector3::zeros(), 0.0), |(s, w), t| {
                let a = t.area();
                (s + t.centroid().coords * a, w + a)
            });
        if total > 0.0 {
            Point3::from(sum / total)
        } else {
            self.pts[0]
        }
    }

    /// On the plane and inside or on the boundary (within `eps`).
    pub fn contains_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.plane().is_on(x, eps) && self.edge_planes().all(|e| e.side(x, eps) != PlaneSide::Above)
    }

    /// On the plane and strictly inside the boundary.
    pub fn contains_point_strict(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.plane().is_on(x, eps) && self.edge_planes().all(|e| e.side(x, eps) == PlaneSide::Below)
    }

    pub fn distance_to_point(&self, x: &Point3<f64>) -> f64 {
        let plane = self.plane();
        let proj = plane.project(x);
        if self.edge_planes().all(|e| e.signed_distance(&proj) <= 0.0) {
            return plane.signed_distance(x).abs();
        }
        self.edges()
            .iter()
            .map(|e| e.distance_to_point(x))
            .fold(f64::INFINITY, f64::min)
    }

    /// Triangle for three vertices, rectangle for four forming one, else the
    /// area itself.
    pub fn simplify(&self, eps: f64) -> Simplified {
        match self.pts[..] {
            [p, q, r] => Simplified::Triangle(Triangle::new(p, q, r)),
            [p, q, r, s] => match Rectangle::checked(p, q, r, s, eps) {
                Some(rect) => Simplified::Rectangle(rect),
                None => Simplified::Area(self.clone()),
            },
            _ => Simplified::Area(self.clone()),
        }
    }

    /// Intersection with a plane: the whole area when it lies in the plane,
    /// else a segment or point (or `None`).
    pub fn intersect_plane(&self, plane: &Plane, eps: f64) -> Option<Geometry> {
        if self.plane().same_plane(plane, eps) {
            return Some(Geometry::Area(self.clone()));
        }
        let sides: Vec<PlaneSide> = self.pts.iter().map(|p| plane.side(p, eps)).collect();
        if sides.iter().all(|s| *s == PlaneSide::Above) || sides.iter().all(|s| *s == PlaneSide::Below) {
            return None;
        }
        let hits = self.collect_fan(|t| t.intersect_plane(plane, eps));
        Geometry::from_points(&hits, eps)
    }

    /// Intersection with a triangle, rebuilt from every fan-triangle hit.
    pub fn intersect_triangle(&self, tri: &Triangle, eps: f64) -> Option<Geometry> {
        if !self.aabb().intersects_eps(&tri.aabb(), eps) {
            return None;
        }
        let hits = self.collect_fan(|t| t.intersect_triangle(tri, eps));
        Geometry::from_points(&hits, eps)
    }

    /// Part of the area in the closed half-space of `plane` holding `reference`.
    pub fn clip_plane(&self, plane: &Plane, reference: &Point3<f64>, eps: f64) -> Option<Geometry> {
        let keep = oriented_toward(plane, reference, eps);
        let whole = || Some(Geometry::Area(self.clone()));
        match self.intersect_plane(&keep, eps) {
            None => (keep.side(&self.pts[0], eps) != PlaneSide::Below)
                .then(|| Geometry::Area(self.clone())),
            Some(Geometry::Point(p)) => {
                if self.pts.iter().any(|v| keep.side(v, eps) == PlaneSide::Above) {
                    whole()
                } else {
                    Some(Geometry::Point(p))
                }
            }
            Some(Geometry::Segment(s)) => {
                let mut kept: Vec<Point3<f64>> = self
                    .pts
                    .iter()
                    .copied()
                    .filter(|v| keep.side(v, eps) != PlaneSide::Below)
                    .collect();
                kept.extend([s.a, s.b]);
                trace!(kept = kept.len(), "clip_plane: rebuilding from cut");
                Geometry::from_points(&kept, eps)
            }
            Some(Geometry::Triangle(_)) | Some(Geometry::Area(_)) => whole(),
        }
    }

    /// Clip against the three edge planes of `tri`, each keeping the side
    /// that holds `reference`, chaining each stage's result into the next.
    /// A reference inside the triangle keeps the part of the area it covers.
    pub fn clip_triangle(&self, tri: &Triangle, reference: &Point3<f64>, eps: f64) -> Option<Geometry> {
        let planes = tri.edge_planes()?;
        planes
            .iter()
            .try_fold(Geometry::Area(self.clone()), |g, pl| g.clip_plane(pl, reference, eps))
    }

    pub fn intersects_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.aabb().contains_point_eps(x, eps) && self.any_fan(|t| t.contains_point(x, eps))
    }

    pub fn intersects_aabb(&self, b: &Aabb, eps: f64) -> bool {
        self.aabb().intersects_eps(b, eps) && self.any_fan(|t| t.intersects_aabb(b, eps))
    }

    pub fn intersects_line(&self, line: &Line, eps: f64) -> bool {
        self.aabb().intersects_line(line, eps) && self.any_fan(|t| t.intersects_line(line, eps))
    }

    pub fn intersects_segment(&self, seg: &Segment, eps: f64) -> bool {
        self.aabb().intersects_segment(seg, eps) && self.any_fan(|t| t.intersects_segment(seg, eps))
    }

    pub fn intersects_ray(&self, ray: &Ray, eps: f64) -> bool {
        self.aabb().intersects_ray(ray, eps) && self.any_fan(|t| t.intersects_ray(ray, eps))
    }

    pub fn intersects_triangle(&self, tri: &Triangle, eps: f64) -> bool {
        self.aabb().intersects_eps(&tri.aabb(), eps)
            && self.any_fan(|t| t.intersects_triangle(tri, eps))
    }

    #[cfg(feature = "parallel")]
    fn any_fan<F>(&self, f: F) -> bool
    where
        F: Fn(&Triangle) -> bool + Sync + Send,
    {
        self.triangles().par_iter().any(f)
    }

    #[cfg(not(feature = "parallel"))]
    fn any_fan<F>(&self, f: F) -> bool
    where
        F: Fn(&Triangle) -> bool + Sync + Send,
    {
        self.triangles().iter().any(f)
    }

    #[cfg(feature = "parallel")]
    fn collect_fan<F>(&self, f: F) -> Vec<Point3<f64>>
    where
        F: Fn(&Triangle) -> Option<Geometry> + Sync + Send,
    {
        self.triangles()
            .par_iter()
            .filter_map(f)
            .flat_map_iter(|g| g.points())
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_fan<F>(&self, f: F) -> Vec<Point3<f64>>
    where
        F: Fn(&Triangle) -> Option<Geometry> + Sync + Send,
    {
        self.triangles()
            .iter()
            .filter_map(f)
            .flat_map(|g| g.points())
            .collect()
    }

    /// Shift by `v`; drops every cached derived value.
    pub fn translate(&mut self, v: &Vector3<f64>) {
        for p in &mut self.pts {
            *p += v;
        }
        self.triangles = OnceLock::new();
        self.edges = OnceLock::new();
        self.aabb = OnceLock::new();
    }

    /// Copy rotated by `angle` about the line through `about` along `axis`.
    pub fn rotate(&self, axis: &Unit<Vector3<f64>>, angle: f64, about: &Point3<f64>) -> ConvexArea {
        let rot = Rotation3::from_axis_angle(axis, angle);
        ConvexArea {
            pts: self.pts.iter().map(|p| about + rot * (p - about)).collect(),
            normal: rot * self.normal,
            triangles: OnceLock::new(),
            edges: OnceLock::new(),
            aabb: OnceLock::new(),
        }
    }
}

/// Unit normal of the plane through the farthest pair and the point farthest
/// from their line.
fn plane_normal(unique: &[Point3<f64>], eps: f64) -> Result<Vector3<f64>, GeomError> {
    let (a, b) = farthest_pair(unique).ok_or(GeomError::empty("convex area points"))?;
    let dir = b - a;
    let len = dir.norm();
    if len <= eps {
        return Err(GeomError::degenerate("all points coincide"));
    }
    let (far, off) = unique
        .iter()
        .map(|p| (*p, (p - a).cross(&dir).norm() / len))
        .fold((a, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if off <= eps {
        return Err(GeomError::degenerate("points are collinear"));
    }
    dir.cross(&(far - a))
        .try_normalize(0.0)
        .ok_or_else(|| GeomError::degenerate("points are collinear"))
}
