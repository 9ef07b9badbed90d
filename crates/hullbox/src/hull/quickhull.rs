//! Coplanar quickhull.
//!
//! The recursion appends hull vertices to one accumulator in boundary order,
//! so no index bookkeeping is shared across calls.

use std::cmp::Ordering;

use nalgebra::{Point3, Vector3};
use tracing::trace;

use crate::primitives::Plane;
use crate::tolerance::PlaneSide;

/// Plane containing the edge `p → q` and the hull normal `n`; its normal
/// `(q - p) × n` points away from the hull for a counterclockwise boundary.
pub(crate) fn edge_plane(p: &Point3<f64>, q: &Point3<f64>, n: &Vector3<f64>) -> Option<Plane> {
    Plane::new(*p, (q - p).cross(n))
}

/// Compare along `axis`, breaking ties on the two following axes. The
/// lexicographic extremes of a point set are always hull corners.
fn lex_cmp(a: &Point3<f64>, b: &Point3<f64>, axis: usize) -> Ordering {
    (0..3)
        .map(|k| (axis + k) % 3)
        .map(|i| a[i].total_cmp(&b[i]))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Initial dividing pair: the per-axis extreme pair with the largest squared
/// distance. `None` if every pair is within `eps`.
fn initial_pair(points: &[Point3<f64>], eps: f64) -> Option<(Point3<f64>, Point3<f64>)> {
    (0..3)
        .filter_map(|axis| {
            let lo = points.iter().min_by(|a, b| lex_cmp(a, b, axis))?;
            let hi = points.iter().max_by(|a, b| lex_cmp(a, b, axis))?;
            Some(((hi - lo).norm_squared(), *lo, *hi))
        })
        .filter(|(d2, _, _)| *d2 > eps * eps)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, lo, hi)| (lo, hi))
}

/// Point of `outer` farthest outside `base`. Points within `eps` of the
/// largest distance lie on one line parallel to `p → q`; the one farthest
/// along `p → q` is a corner, the others are not.
fn farthest(
    outer: &[Point3<f64>],
    base: &Plane,
    p: &Point3<f64>,
    q: &Point3<f64>,
    eps: f64,
) -> Option<Point3<f64>> {
    let top = outer
        .iter()
        .map(|x| base.signed_distance(x))
        .max_by(f64::total_cmp)?;
    let along = q - p;
    outer
        .iter()
        .filter(|x| base.signed_distance(x) >= top - eps)
        .max_by(|a, b| (*a - p).dot(&along).total_cmp(&(*b - p).dot(&along)))
        .copied()
}

/// Hull of `unique` (deduplicated, coplanar with unit normal `normal`), in
/// counterclockwise order around `normal`. Points on the hull boundary but not
/// at a corner are dropped.
pub(crate) fn quickhull(unique: &[Point3<f64>], normal: &Vector3<f64>, eps: f64) -> Vec<Point3<f64>> {
    let Some((p0, p1)) = initial_pair(unique, eps) else {
        return unique.first().copied().into_iter().collect();
    };
    let Some(split) = edge_plane(&p0, &p1, normal) else {
        return vec![p0, p1];
    };
    let (mut above, mut below) = (Vec::new(), Vec::new());
    for p in unique {
        match split.side(p, eps) {
            PlaneSide::Above => above.push(*p),
            PlaneSide::Below => below.push(*p),
            PlaneSide::On => {}
        }
    }
    // Edge p0 → p1 has outward normal (p1 - p0) × n, so `above` lies on the
    // far side of p0 → p1 and is walked first.
    let mut hull = Vec::with_capacity(unique.len());
    hull.push(p0);
    chain(&p0, &p1, above, normal, eps, &mut hull);
    hull.push(p1);
    chain(&p1, &p0, below, normal, eps, &mut hull);
    hull
}

/// Append the hull vertices strictly between `p` and `q` whose candidates
/// `outer` all lie outside the edge `p → q`.
fn chain(
    p: &Point3<f64>,
    q: &Point3<f64>,
    outer: Vec<Point3<f64>>,
    n: &Vector3<f64>,
    eps: f64,
    hull: &mut Vec<Point3<f64>>,
) {
    match outer.len() {
        0 => return,
        1 => {
            hull.push(outer[0]);
            return;
        }
        _ => {}
    }
    let Some(base) = edge_plane(p, q, n) else {
        return;
    };
    let Some(far) = farthest(&outer, &base, p, q, eps) else {
        return;
    };
    let (Some(left), Some(right)) = (edge_plane(p, &far, n), edge_plane(&far, q, n)) else {
        trace!("quickhull: farthest point coincides with an edge endpoint");
        return;
    };
    let (mut s1, mut s2) = (Vec::new(), Vec::new());
    let mut inside = 0usize;
    for x in outer.into_iter().filter(|x| *x != far) {
        if left.side(&x, eps) == PlaneSide::Above {
            s1.push(x);
        } else if right.side(&x, eps) == PlaneSide::Above {
            s2.push(x);
        } else {
            inside += 1;
        }
    }
    if inside > 0 {
        trace!(inside, "quickhull: discarded points inside triangle");
    }
    chain(p, &far, s1, n, eps, hull);
    hull.push(far);
    chain(&far, q, s2, n, eps, hull);
}
