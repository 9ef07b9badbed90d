//! Closed result type of intersections and clips.
//!
//! `Geometry::from_points` is the single place where a point set is turned
//! back into a shape: 1 → point, 2 → segment, 3 → triangle (segment if
//! collinear), 4+ → convex area (segment if collinear).

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::aabb::Aabb;
use crate::hull::{clip_points_by_plane, oriented_toward, ConvexArea};
use crate::primitives::{Plane, Segment, Triangle};
use crate::tolerance::{dedup_points, farthest_pair, is_collinear, PlaneSide};

#[derive(Clone, Debug)]
pub enum Geometry {
    Point(Point3<f64>),
    Segment(Segment),
    Triangle(Triangle),
    Area(ConvexArea),
}

impl Geometry {
    /// Smallest shape through the unique points (within `eps`); `None` if empty.
    ///
    /// Points must be coplanar within `eps` when four or more remain.
    pub fn from_points(points: &[Point3<f64>], eps: f64) -> Option<Self> {
        let pts = dedup_points(points, eps);
        match pts.len() {
            0 => None,
            1 => Some(Geometry::Point(pts[0])),
            2 => Some(Geometry::Segment(Segment::new(pts[0], pts[1]))),
            _ if is_collinear(&pts, eps) => {
                let (a, b) = farthest_pair(&pts)?;
                Some(Geometry::Segment(Segment::new(a, b)))
            }
            3 => Some(Geometry::Triangle(Triangle::new(pts[0], pts[1], pts[2]))),
            n => match ConvexArea::from_unique_points(pts, eps) {
                Ok(area) => Some(Geometry::Area(area)),
                Err(err) => {
                    debug!(%err, points = n, "from_points: no convex area");
                    None
                }
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "point",
            Geometry::Segment(_) => "segment",
            Geometry::Triangle(_) => "triangle",
            Geometry::Area(_) => "area",
        }
    }

    pub fn points(&self) -> Vec<Point3<f64>> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::Segment(s) => vec![s.a, s.b],
            Geometry::Triangle(t) => t.points().to_vec(),
            Geometry::Area(a) => a.points().to_vec(),
        }
    }

    /// Segment between the two farthest points (degenerate for a point).
    pub fn span(&self) -> Option<Segment> {
        match self {
            Geometry::Point(p) => Some(Segment::new(*p, *p)),
            Geometry::Segment(s) => Some(*s),
            other => {
                let (a, b) = farthest_pair(&other.points())?;
                Some(Segment::new(a, b))
            }
        }
    }

    pub fn aabb(&self) -> Aabb {
        match self {
            Geometry::Point(p) => Aabb::from_point(*p),
            Geometry::Segment(s) => Aabb::new(s.a, s.b),
            Geometry::Triangle(t) => t.aabb(),
            Geometry::Area(a) => a.aabb().clone(),
        }
    }

    pub fn translate(&mut self, v: &Vector3<f64>) {
        match self {
            Geometry::Point(p) => *p += v,
            Geometry::Segment(s) => s.translate(v),
            Geometry::Triangle(t) => t.translate(v),
            Geometry::Area(a) => a.translate(v),
        }
    }

    /// Part of `self` in the closed half-space of `plane` that holds `reference`.
    pub fn clip_plane(
        &self,
        plane: &Plane,
        reference: &Point3<f64>,
        eps: f64,
    ) -> Option<Geometry> {
        let keep = oriented_toward(plane, reference, eps);
        match self {
            Geometry::Point(p) => (keep.side(p, eps) != PlaneSide::Below).then(|| self.clone()),
            Geometry::Segment(s) => {
                let (sa, sb) = (keep.side(&s.a, eps), keep.side(&s.b, eps));
                match (sa == PlaneSide::Below, sb == PlaneSide::Below) {
                    (false, false) => Some(self.clone()),
                    (true, true) => None,
                    (a_out, _) => {
                        let inside = if a_out { s.b } else { s.a };
                        let cut = keep.crossing(&s.a, &s.b, eps)?;
                        Geometry::from_points(&[inside, cut], eps)
                    }
                }
            }
            Geometry::Triangle(t) => {
                let kept = clip_points_by_plane(&t.points(), &keep, eps);
                Geometry::from_points(&kept, eps)
            }
            Geometry::Area(a) => a.clip_plane(&keep, reference, eps),
        }
    }
}
