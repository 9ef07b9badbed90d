//! Polygon as a union of convex parts minus convex holes.
//!
//! Parts may overlap, and so may holes; nothing is checked about their
//! arrangement. The convex hull of all part vertices is cached.

use std::sync::OnceLock;

use nalgebra::{Point3, Vector3};

use crate::aabb::Aabb;
use crate::error::GeomError;
use crate::geometry::Geometry;
use crate::hull::ConvexArea;

#[derive(Clone, Debug)]
pub struct Polygon {
    parts: Vec<ConvexArea>,
    holes: Vec<ConvexArea>,
    /// `(eps, hull)` of the first `convex_hull` call.
    hull: OnceLock<(f64, Option<Geometry>)>,
}

impl Polygon {
    pub fn new(parts: Vec<ConvexArea>, holes: Vec<ConvexArea>) -> Result<Self, GeomError> {
        if parts.is_empty() {
            return Err(GeomError::empty("polygon parts"));
        }
        Ok(Self {
            parts,
            holes,
            hull: OnceLock::new(),
        })
    }

    #[inline]
    pub fn parts(&self) -> &[ConvexArea] {
        &self.parts
    }

    #[inline]
    pub fn holes(&self) -> &[ConvexArea] {
        &self.holes
    }

    /// Vertices of every part, in part order.
    pub fn points(&self) -> Vec<Point3<f64>> {
        self.parts.iter().flat_map(|a| a.points().iter().copied()).collect()
    }

    /// Convex hull of all part vertices.
    ///
    /// Cached for the tolerance of the first call; other tolerances recompute.
    pub fn convex_hull(&self, eps: f64) -> Option<Geometry> {
        let (cached_eps, hull) = self
            .hull
            .get_or_init(|| (eps, Geometry::from_points(&self.points(), eps)));
        if *cached_eps == eps {
            hull.clone()
        } else {
            Geometry::from_points(&self.points(), eps)
        }
    }

    /// In some part and not strictly inside any hole. Hole boundaries belong
    /// to the polygon.
    pub fn contains_point(&self, x: &Point3<f64>, eps: f64) -> bool {
        self.parts.iter().any(|a| a.contains_point(x, eps))
            && !self.holes.iter().any(|h| h.contains_point_strict(x, eps))
    }

    pub fn aabb(&self) -> Aabb {
        let (first, rest) = (&self.parts[0], &self.parts[1..]);
        rest.iter()
            .fold(first.aabb().clone(), |acc, a| acc.union(a.aabb()))
    }

    pub fn intersects_aabb(&self, b: &Aabb, eps: f64) -> bool {
        self.aabb().intersects_eps(b, eps) && self.parts.iter().any(|a| a.intersects_aabb(b, eps))
    }

    pub fn translate(&mut self, v: &Vector3<f64>) {
        for a in self.parts.iter_mut().chain(self.holes.iter_mut()) {
            a.translate(v);
        }
        self.hull = OnceLock::new();
    }
}
