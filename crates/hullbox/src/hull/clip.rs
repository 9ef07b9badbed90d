use nalgebra::Point3;

use crate::primitives::Plane;
use crate::tolerance::PlaneSide;

/// Sutherland–Hodgman pass of a closed polygon against one plane, keeping the
/// part above or on it. Boundary order is preserved; output may repeat
/// points within `eps`.
pub(crate) fn clip_points_by_plane(poly: &[Point3<f64>], plane: &Plane, eps: f64) -> Vec<Point3<f64>> {
    let mut out = Vec::with_capacity(poly.len() + 1);
    let Some(&last) = poly.last() else {
        return out;
    };
    let mut prev = last;
    let mut prev_side = plane.side(&prev, eps);
    for &cur in poly {
        let cur_side = plane.side(&cur, eps);
        match (prev_side, cur_side) {
            (PlaneSide::Below, PlaneSide::Above) => {
                out.extend(plane.crossing(&prev, &cur, eps));
                out.push(cur);
            }
            (_, PlaneSide::Above) | (_, PlaneSide::On) => out.push(cur),
            (PlaneSide::Above, PlaneSide::Below) => {
                out.extend(plane.crossing(&prev, &cur, eps));
            }
            (_, PlaneSide::Below) => {}
        }
        prev = cur;
        prev_side = cur_side;
    }
    out
}

/// `plane` oriented so `reference` is above it. A reference on the plane
/// keeps the plane's own orientation.
pub(crate) fn oriented_toward(plane: &Plane, reference: &Point3<f64>, eps: f64) -> Plane {
    match plane.side(reference, eps) {
        PlaneSide::Below => plane.flipped(),
        PlaneSide::On | PlaneSide::Above => *plane,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn clips_square_to_half() {
        let sq = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let plane = Plane::new(Point3::new(0.5, 0.0, 0.0), -Vector3::x()).unwrap();
        let out = clip_points_by_plane(&sq, &plane, 1e-12);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|p| p.x <= 0.5 + 1e-12));
    }

    #[test]
    fn reference_picks_orientation() {
        let plane = Plane::new(Point3::origin(), Vector3::z()).unwrap();
        let down = oriented_toward(&plane, &Point3::new(0.0, 0.0, -1.0), 1e-9);
        assert!(down.normal().z < 0.0);
        let same = oriented_toward(&plane, &Point3::new(3.0, 0.0, 0.0), 1e-9);
        assert_eq!(same, plane);
    }
}
