//! Tolerant scalar predicates.
//!
//! Every predicate takes the caller's `eps` explicitly. There is no crate-wide
//! default: the right tolerance depends on the coordinate magnitudes in use.

use nalgebra::Point3;

/// `|a - b| <= eps`.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Points closer than `eps` (Euclidean) are the same point.
#[inline]
pub fn points_close(a: &Point3<f64>, b: &Point3<f64>, eps: f64) -> bool {
    (a - b).norm() <= eps
}

/// Side of a signed quantity relative to zero, with a dead band of `eps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneSide {
    Below,
    On,
    Above,
}

impl PlaneSide {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            PlaneSide::Below => PlaneSide::Above,
            PlaneSide::On => PlaneSide::On,
            PlaneSide::Above => PlaneSide::Below,
        }
    }
}

/// Classify a signed distance.
#[inline]
pub fn side_of(value: f64, eps: f64) -> PlaneSide {
    if value > eps {
        PlaneSide::Above
    } else if value < -eps {
        PlaneSide::Below
    } else {
        PlaneSide::On
    }
}

/// Unique points within `eps`, keeping the first occurrence and input order.
///
/// Quadratic; point sets handed to the hull builder are small.
pub fn dedup_points(points: &[Point3<f64>], eps: f64) -> Vec<Point3<f64>> {
    let mut out: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| points_close(p, q, eps)) {
            out.push(*p);
        }
    }
    out
}

/// The two points spanning the largest distance, found by two farthest-point
/// sweeps (exact for collinear input, a good seed otherwise).
pub(crate) fn farthest_pair(points: &[Point3<f64>]) -> Option<(Point3<f64>, Point3<f64>)> {
    let first = *points.first()?;
    let a = farthest_from(points, &first);
    let b = farthest_from(points, &a);
    Some((a, b))
}

fn farthest_from(points: &[Point3<f64>], from: &Point3<f64>) -> Point3<f64> {
    let mut best = *from;
    let mut best_d2 = 0.0;
    for p in points {
        let d2 = (p - from).norm_squared();
        if d2 > best_d2 {
            best_d2 = d2;
            best = *p;
        }
    }
    best
}

/// All points lie within `eps` of one line (vacuously true for fewer than 3).
pub fn is_collinear(points: &[Point3<f64>], eps: f64) -> bool {
    let Some((a, b)) = farthest_pair(points) else {
        return true;
    };
    let dir = b - a;
    let len = dir.norm();
    if len <= eps {
        return true;
    }
    points
        .iter()
        .all(|p| (p - a).cross(&dir).norm() / len <= eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_of_has_dead_band() {
        assert_eq!(side_of(1e-10, 1e-9), PlaneSide::On);
        assert_eq!(side_of(-1e-10, 1e-9), PlaneSide::On);
        assert_eq!(side_of(2e-9, 1e-9), PlaneSide::Above);
        assert_eq!(side_of(-2e-9, 1e-9), PlaneSide::Below);
        assert_eq!(PlaneSide::Above.flipped(), PlaneSide::Below);
    }

    #[test]
    fn dedup_keeps_first_and_order() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1e-12, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1e-12, 0.0),
        ];
        let out = dedup_points(&pts, 1e-9);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[1], pts[1]);
        assert_eq!(out[2], pts[3]);
    }

    #[test]
    fn collinear_detection_sweeps_eps() {
        let mut pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert!(is_collinear(&pts, 1e-12));
        pts.push(Point3::new(1.0, 1.0, 1.0 + 1e-6));
        assert!(!is_collinear(&pts, 1e-9));
        assert!(is_collinear(&pts, 1e-5));
        assert!(is_collinear(&[], 1e-9));
    }
}
