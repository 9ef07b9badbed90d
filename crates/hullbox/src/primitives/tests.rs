use super::*;
use crate::aabb::Aabb;
use crate::geometry::Geometry;
use nalgebra::{Point3, Vector3};

const EPS: f64 = 1e-9;

fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, y, z)
}

fn unit_tri() -> Triangle {
    Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0))
}

#[test]
fn plane_sides_and_projection() {
    let pl = Plane::new(p(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 2.0)).unwrap();
    assert!((pl.normal().norm() - 1.0).abs() < 1e-12);
    assert!((pl.signed_distance(&p(3.0, 4.0, 3.0)) - 2.0).abs() < 1e-12);
    assert!(pl.is_on(&p(5.0, -1.0, 1.0), EPS));
    let q = pl.project(&p(1.0, 2.0, -4.0));
    assert!((q - p(1.0, 2.0, 1.0)).norm() < 1e-12);
    assert!(Plane::new(p(0.0, 0.0, 0.0), Vector3::zeros()).is_none());
    assert!(pl.same_plane(&pl.flipped(), EPS));
}

#[test]
fn three_planes_meet_in_a_point() {
    let a = Plane::new(p(1.0, 0.0, 0.0), Vector3::x()).unwrap();
    let b = Plane::new(p(0.0, 2.0, 0.0), Vector3::y()).unwrap();
    let c = Plane::new(p(0.0, 0.0, 3.0), Vector3::z()).unwrap();
    let x = Plane::meet(&a, &b, &c).unwrap();
    assert!((x - p(1.0, 2.0, 3.0)).norm() < 1e-12);
    assert!(Plane::meet(&a, &a, &c).is_none());
}

#[test]
fn plane_plane_line_lies_on_both() {
    let a = Plane::new(p(0.0, 0.0, 1.0), Vector3::z()).unwrap();
    let b = Plane::new(p(2.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0)).unwrap();
    let l = a.intersect_plane(&b, EPS).unwrap();
    for t in [-3.0, 0.0, 5.0] {
        let x = l.at(t);
        assert!(a.is_on(&x, 1e-9) && b.is_on(&x, 1e-9));
    }
    assert!(a.intersect_plane(&a.flipped(), EPS).is_none());
}

#[test]
fn skew_and_crossing_lines() {
    let l1 = Line::through(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0));
    let l2 = Line::through(&p(0.5, -1.0, 0.0), &p(0.5, 1.0, 0.0));
    match l1.intersect_line(&l2, EPS) {
        Some(LineHit::Point(x)) => assert!((x - p(0.5, 0.0, 0.0)).norm() < 1e-12),
        other => panic!("expected a point, got {other:?}"),
    }
    let skew = Line::through(&p(0.5, -1.0, 1.0), &p(0.5, 1.0, 1.0));
    assert!(l1.intersect_line(&skew, EPS).is_none());
    let same = Line::through(&p(3.0, 0.0, 0.0), &p(-2.0, 0.0, 0.0));
    assert_eq!(l1.intersect_line(&same, EPS), Some(LineHit::Coincident));
}

#[test]
fn segments_cross_overlap_or_miss() {
    let s = Segment::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0));
    let cross = Segment::new(p(1.0, -1.0, 0.0), p(1.0, 1.0, 0.0));
    assert!(matches!(s.intersect_segment(&cross, EPS), Some(Geometry::Point(_))));
    let overlap = Segment::new(p(1.0, 0.0, 0.0), p(5.0, 0.0, 0.0));
    match s.intersect_segment(&overlap, EPS) {
        Some(Geometry::Segment(o)) => assert!((o.length() - 1.0).abs() < 1e-12),
        other => panic!("expected overlap, got {other:?}"),
    }
    let touching = Segment::new(p(2.0, 0.0, 0.0), p(3.0, 0.0, 0.0));
    assert!(matches!(s.intersect_segment(&touching, EPS), Some(Geometry::Point(_))));
    let short = Segment::new(p(1.0, 0.5, 0.0), p(1.0, 1.0, 0.0));
    assert!(s.intersect_segment(&short, EPS).is_none());
}

#[test]
fn ray_only_looks_forward() {
    let r = Ray::new(p(0.0, 0.0, 0.0), Vector3::x());
    assert!(r.contains_point(&p(4.0, 0.0, 0.0), EPS));
    assert!(!r.contains_point(&p(-1.0, 0.0, 0.0), EPS));
    assert!((r.closest_point(&p(-3.0, 2.0, 0.0)) - p(0.0, 0.0, 0.0)).norm() < 1e-12);
}

#[test]
fn triangle_containment_and_edge_planes() {
    let t = unit_tri();
    assert!(t.contains_point(&p(0.25, 0.25, 0.0), EPS));
    assert!(t.contains_point(&p(0.5, 0.5, 0.0), EPS));
    assert!(!t.contains_point(&p(0.6, 0.6, 0.0), EPS));
    assert!(!t.contains_point(&p(0.25, 0.25, 0.1), EPS));
    let c = t.centroid();
    for e in t.edge_planes().unwrap() {
        assert!(e.signed_distance(&c) > 0.0);
    }
}

#[test]
fn triangle_cut_by_plane() {
    let t = unit_tri();
    let x_half = Plane::new(p(0.5, 0.0, 0.0), Vector3::x()).unwrap();
    match t.intersect_plane(&x_half, EPS) {
        Some(Geometry::Segment(s)) => assert!((s.length() - 0.5).abs() < 1e-12),
        other => panic!("expected segment, got {other:?}"),
    }
    let through_vertex = Plane::new(p(1.0, 0.0, 0.0), Vector3::x()).unwrap();
    assert!(matches!(
        t.intersect_plane(&through_vertex, EPS),
        Some(Geometry::Point(_))
    ));
    let own = Plane::new(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
    assert!(matches!(t.intersect_plane(&own, EPS), Some(Geometry::Triangle(_))));
    let far = Plane::new(p(0.0, 0.0, 2.0), Vector3::z()).unwrap();
    assert!(t.intersect_plane(&far, EPS).is_none());
}

#[test]
fn triangle_against_lines_segments_rays() {
    let t = unit_tri();
    let pierce = Line::new(p(0.2, 0.2, -1.0), Vector3::z());
    assert!(matches!(t.intersect_line(&pierce, EPS), Some(Geometry::Point(_))));
    let in_plane = Line::new(p(-1.0, 0.25, 0.0), Vector3::x());
    match t.intersect_line(&in_plane, EPS) {
        Some(Geometry::Segment(s)) => assert!((s.length() - 0.75).abs() < 1e-6),
        other => panic!("expected segment, got {other:?}"),
    }
    let short = Segment::new(p(0.2, 0.2, 1.0), p(0.2, 0.2, 0.5));
    assert!(!t.intersects_segment(&short, EPS));
    let away = Ray::new(p(0.2, 0.2, 1.0), Vector3::z());
    assert!(!t.intersects_ray(&away, EPS));
    let toward = Ray::new(p(0.2, 0.2, 1.0), -Vector3::z());
    assert!(t.intersects_ray(&toward, EPS));
}

#[test]
fn crossing_triangles_share_a_segment() {
    let a = unit_tri();
    let b = Triangle::new(p(0.2, 0.2, -1.0), p(0.2, 0.2, 1.0), p(0.2, -2.0, 0.0));
    assert!(matches!(a.intersect_triangle(&b, EPS), Some(Geometry::Segment(_))));
    let lifted = Triangle::new(p(0.0, 0.0, 1.0), p(1.0, 0.0, 1.0), p(0.0, 1.0, 1.0));
    assert!(!a.intersects_triangle(&lifted, EPS));
    let overlap = Triangle::new(p(0.5, 0.0, 0.0), p(1.5, 0.0, 0.0), p(0.5, 1.0, 0.0));
    assert!(matches!(a.intersect_triangle(&overlap, EPS), Some(Geometry::Triangle(_))));
}

#[test]
fn triangle_box_separation() {
    let t = unit_tri();
    assert!(t.intersects_aabb(&Aabb::new(p(0.1, 0.1, -1.0), p(0.2, 0.2, 1.0)), EPS));
    assert!(!t.intersects_aabb(&Aabb::new(p(0.8, 0.8, -1.0), p(1.0, 1.0, 1.0)), EPS));
    assert!(!t.intersects_aabb(&Aabb::new(p(0.0, 0.0, 0.5), p(1.0, 1.0, 1.0)), EPS));
}

#[test]
fn rectangle_predicate() {
    let (a, b, c, d) = (p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 1.0, 0.0), p(0.0, 1.0, 0.0));
    let r = Rectangle::checked(a, b, c, d, EPS).unwrap();
    assert!((r.width() - 2.0).abs() < 1e-12 && (r.height() - 1.0).abs() < 1e-12);
    assert!(r.contains_point(&p(1.5, 0.5, 0.0), EPS));
    assert!(!Rectangle::is_rectangle(&a, &b, &p(3.0, 1.0, 0.0), &p(1.0, 1.0, 0.0), EPS));
}
