//! Viewport rectangles: a screen rectangle seen from an external eye point
//! such that the frustum through it holds the whole box.

use nalgebra::{Point3, Vector3};
use tracing::trace;

use super::aabb3::Aabb;
use crate::primitives::{Plane, Ray, Rectangle};

/// Orthonormal camera frame looking from `eye` at the box centre.
struct ViewFrame {
    eye: Point3<f64>,
    dir: Vector3<f64>,
    right: Vector3<f64>,
    up: Vector3<f64>,
}

impl ViewFrame {
    fn new(b: &Aabb, eye: &Point3<f64>, right: &Vector3<f64>, eps: f64) -> Option<Self> {
        if b.contains_point_eps(eye, eps) {
            trace!("viewport: eye inside box");
            return None;
        }
        let dir = (b.center() - eye).try_normalize(eps)?;
        let right = (right - dir * right.dot(&dir)).try_normalize(eps)?;
        let up = right.cross(&dir);
        Some(Self {
            eye: *eye,
            dir,
            right,
            up,
        })
    }

    #[inline]
    fn depth(&self, x: &Point3<f64>) -> f64 {
        (x - self.eye).dot(&self.dir)
    }

    fn screen(&self, depth: f64) -> Plane {
        Plane::from_unit(self.eye + self.dir * depth, self.dir)
    }

    /// Corners projected onto the screen plane at `depth`; `None` if any
    /// corner is not in front of the eye.
    fn project(&self, b: &Aabb, depth: f64, eps: f64) -> Option<Vec<Point3<f64>>> {
        b.corners()
            .iter()
            .map(|c| {
                let d = self.depth(c);
                if d <= eps {
                    return None;
                }
                Some(Ray::new(self.eye, c - self.eye).at(depth / d))
            })
            .collect()
    }

    /// Extreme point of `pts` along `axis`.
    fn extreme(pts: &[Point3<f64>], axis: &Vector3<f64>) -> Point3<f64> {
        pts.iter()
            .copied()
            .fold((f64::NEG_INFINITY, pts[0]), |(best, arg), p| {
                let s = p.coords.dot(axis);
                if s > best {
                    (s, p)
                } else {
                    (best, arg)
                }
            })
            .1
    }

    /// Rectangle bounded by the frustum planes through the extreme projections,
    /// corners ordered left-bottom, left-top, right-top, right-bottom.
    fn frame_rectangle(&self, pts: &[Point3<f64>], depth: f64) -> Option<Rectangle> {
        let screen = self.screen(depth);
        let side = |q: Point3<f64>, along: &Vector3<f64>| Plane::through(&self.eye, &q, &(q + along));
        let l = side(Self::extreme(pts, &-self.right), &self.up)?;
        let r = side(Self::extreme(pts, &self.right), &self.up)?;
        let bt = side(Self::extreme(pts, &-self.up), &self.right)?;
        let tp = side(Self::extreme(pts, &self.up), &self.right)?;
        Some(Rectangle::new(
            Plane::meet(&screen, &l, &bt)?,
            Plane::meet(&screen, &l, &tp)?,
            Plane::meet(&screen, &r, &tp)?,
            Plane::meet(&screen, &r, &bt)?,
        ))
    }
}

impl Aabb {
    /// Viewport on the screen plane through the nearest corner.
    ///
    /// `None` when `eye` is inside the box or `right` is parallel to the view
    /// direction.
    pub fn viewport(&self, eye: &Point3<f64>, right: &Vector3<f64>, eps: f64) -> Option<Rectangle> {
        let frame = ViewFrame::new(self, eye, right, eps)?;
        let depth = self
            .corners()
            .iter()
            .map(|c| frame.depth(c))
            .fold(f64::INFINITY, f64::min);
        self.viewport_with(&frame, depth, eps)
    }

    /// Viewport on the screen plane `distance` in front of the box centre.
    pub fn viewport_at_distance(
        &self,
        eye: &Point3<f64>,
        right: &Vector3<f64>,
        distance: f64,
        eps: f64,
    ) -> Option<Rectangle> {
        let frame = ViewFrame::new(self, eye, right, eps)?;
        let depth = (self.center() - eye).norm() - distance;
        self.viewport_with(&frame, depth, eps)
    }

    /// Square viewport `distance` in front of the centre, with half-size
    /// `max extent / zoom` around the screen centre.
    pub fn viewport_zoomed(
        &self,
        eye: &Point3<f64>,
        right: &Vector3<f64>,
        distance: f64,
        zoom: f64,
        eps: f64,
    ) -> Option<Rectangle> {
        if zoom <= eps {
            return None;
        }
        let frame = ViewFrame::new(self, eye, right, eps)?;
        let depth = (self.center() - eye).norm() - distance;
        if depth <= eps {
            trace!(depth, "viewport: screen behind eye");
            return None;
        }
        let half = self.extents().max() / zoom;
        let c = frame.eye + frame.dir * depth;
        let (r, u) = (frame.right * half, frame.up * half);
        Some(Rectangle::new(c - r - u, c - r + u, c + r + u, c + r - u))
    }

    fn viewport_with(&self, frame: &ViewFrame, depth: f64, eps: f64) -> Option<Rectangle> {
        if depth <= eps {
            trace!(depth, "viewport: screen behind eye");
            return None;
        }
        let pts = frame.project(self, depth, eps)?;
        frame.frame_rectangle(&pts, depth)
    }
}
