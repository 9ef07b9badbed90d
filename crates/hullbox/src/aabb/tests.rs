use super::*;
use crate::geometry::Geometry;
use crate::primitives::{Line, Ray, Segment};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, y, z)
}

fn x_box() -> AxisBox {
    AxisBox::from_points(Axis::X, &[p(1.0, 2.0, 3.0), p(1.0, 5.0, 3.0), p(1.0, 2.0, 7.0)]).unwrap()
}

#[test]
fn x_box_from_points_has_expected_ranges_and_left_edge() {
    let b = x_box();
    assert_eq!((b.min(Axis::Y), b.max(Axis::Y)), (2.0, 5.0));
    assert_eq!((b.min(Axis::Z), b.max(Axis::Z)), (3.0, 7.0));
    assert_eq!(b.value(), 1.0);
    assert_eq!(
        *b.edge(BoxSide::Left),
        Edge::Segment(Segment::new(p(1.0, 2.0, 3.0), p(1.0, 2.0, 7.0)))
    );
    assert_eq!(b.corner(Corner::UL), p(1.0, 5.0, 3.0));
    assert_eq!(b.corner(Corner::LU), p(1.0, 2.0, 7.0));
}

#[test]
fn point_box_edges_are_points() {
    let b = AxisBox::from_point(Axis::Z, &p(1.0, 2.0, 3.0));
    assert!(b.edges().iter().all(|e| *e == Edge::Point(p(1.0, 2.0, 3.0))));
    assert!(b.contains_point(&p(1.0, 2.0, 3.0)));
    assert!(!b.contains_point(&p(1.0, 2.1, 3.0)));
    // A flat-in-v box: bottom/top span u, left/right collapse.
    let s = AxisBox::new(Axis::Z, 0.0, (0.0, 4.0), (1.0, 1.0));
    assert!(matches!(s.edge(BoxSide::Bottom), Edge::Segment(_)));
    assert!(matches!(s.edge(BoxSide::Left), Edge::Point(_)));
}

#[test]
fn planes_point_outward() {
    let b = x_box();
    let inside = p(1.0, 3.0, 5.0);
    for side in [BoxSide::Left, BoxSide::Right, BoxSide::Bottom, BoxSide::Top] {
        assert!(b.plane(side).signed_distance(&inside) < 0.0, "{side:?}");
    }
    assert_eq!(*b.plane(BoxSide::Right).normal(), Vector3::y());
    assert_eq!(*b.plane(BoxSide::Bottom).normal(), -Vector3::z());
}

#[test]
fn axis_box_lines() {
    let b = x_box();
    assert!(b.intersects_line(&Line::new(p(0.0, 3.0, 4.0), Vector3::x()), EPS));
    assert!(!b.intersects_line(&Line::new(p(0.0, 0.0, 0.0), Vector3::x()), EPS));
    assert!(b.intersects_line(&Line::new(p(1.0, 0.0, 5.0), Vector3::y()), EPS));
    assert!(!b.intersects_line(&Line::new(p(1.0, 0.0, 10.0), Vector3::y()), EPS));
    assert!(!b.intersects_line(&Line::new(p(2.0, 0.0, 5.0), Vector3::y()), EPS));
}

#[test]
fn segment_line_determinant_formula() {
    let b = x_box();
    let Edge::Segment(left) = *b.edge(BoxSide::Left) else {
        panic!("left edge should be a segment");
    };
    let crossing = Line::new(p(1.0, 0.0, 5.0), Vector3::y());
    assert_eq!(
        b.intersect_segment_line(&left, &crossing, EPS),
        Some(Edge::Point(p(1.0, 2.0, 5.0)))
    );
    let along = Line::new(p(1.0, 2.0, 0.0), Vector3::z());
    assert_eq!(b.intersect_segment_line(&left, &along, EPS), Some(Edge::Segment(left)));
    let parallel = Line::new(p(1.0, 3.0, 0.0), Vector3::z());
    assert_eq!(b.intersect_segment_line(&left, &parallel, EPS), None);
    let beyond = Line::new(p(1.0, 0.0, 9.0), Vector3::y());
    assert_eq!(b.intersect_segment_line(&left, &beyond, EPS), None);
}

#[test]
fn axis_box_translate_refreshes_caches() {
    let mut b = x_box();
    let before = *b.corners();
    b.translate(&Vector3::new(1.0, -1.0, 2.0));
    assert_eq!(b.value(), 2.0);
    assert_eq!(b.corner(Corner::LL), before[0] + Vector3::new(1.0, -1.0, 2.0));
    assert_eq!(b.min(Axis::Y), 1.0);
}

#[test]
fn axis_box_from_geometries_unions() {
    let geoms = [
        Geometry::Point(p(0.0, 1.0, 1.0)),
        Geometry::Segment(Segment::new(p(0.0, -2.0, 0.0), p(0.0, 0.0, 5.0))),
    ];
    let b = AxisBox::from_geometries(Axis::X, &geoms).unwrap();
    assert_eq!((b.min(Axis::Y), b.max(Axis::Y)), (-2.0, 1.0));
    assert_eq!((b.min(Axis::Z), b.max(Axis::Z)), (0.0, 5.0));
    assert!(AxisBox::from_geometries(Axis::X, &[]).is_err());
}

#[test]
fn cube_corners_and_overlap_box() {
    let a = Aabb::new(p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0));
    let corners = a.corners();
    for c in corners {
        assert!([c.x, c.y, c.z].iter().all(|v| *v == 0.0 || *v == 2.0));
    }
    for i in 0..8 {
        for j in (i + 1)..8 {
            assert_ne!(corners[i], corners[j]);
        }
    }
    let b = Aabb::new(p(1.0, 1.0, 1.0), p(3.0, 3.0, 3.0));
    assert_eq!(a.intersect(&b), Some(Aabb::new(p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0))));
}

#[test]
fn intersect_is_strict_while_eps_test_is_biased() {
    let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let gap = Aabb::new(p(1.0 + 1e-12, 0.0, 0.0), p(2.0, 1.0, 1.0));
    assert!(a.intersect(&gap).is_none());
    assert!(a.intersects_eps(&gap, EPS));
    let touching = Aabb::new(p(1.0, 0.0, 0.0), p(2.0, 1.0, 1.0));
    let flat = a.intersect(&touching).unwrap();
    assert_eq!(flat.x_min(), 1.0);
    assert_eq!(flat.x_max(), 1.0);
}

#[test]
fn faces_sit_on_box_bounds() {
    let a = Aabb::new(p(0.0, 1.0, 2.0), p(3.0, 4.0, 5.0));
    assert_eq!(a.left().axis(), Axis::X);
    assert_eq!(a.left().value(), 0.0);
    assert_eq!(a.right().value(), 3.0);
    assert_eq!(a.top().value(), 4.0);
    assert_eq!(a.fore().value(), 2.0);
    assert_eq!(a.aft().min(Axis::Y), 1.0);
    let flat = Aabb::from_axis_box(a.aft());
    assert_eq!(flat.z_min(), 5.0);
    assert_eq!(flat.z_max(), 5.0);
}

#[test]
fn slab_tests_and_distance() {
    let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    assert!(a.intersects_line(&Line::new(p(-5.0, 0.5, 0.5), Vector3::x()), EPS));
    assert!(!a.intersects_line(&Line::new(p(-5.0, 2.0, 0.5), Vector3::x()), EPS));
    assert!(a.intersects_segment(&Segment::new(p(-1.0, 0.5, 0.5), p(0.5, 0.5, 0.5)), EPS));
    assert!(!a.intersects_segment(&Segment::new(p(-2.0, 0.5, 0.5), p(-1.0, 0.5, 0.5)), EPS));
    assert!(!a.intersects_ray(&Ray::new(p(-1.0, 0.5, 0.5), -Vector3::x()), EPS));
    assert!(a.intersects_ray(&Ray::new(p(-1.0, -1.0, 0.5), Vector3::new(1.0, 1.0, 0.0)), EPS));
    assert!((a.distance_to_point(&p(3.0, 0.5, 0.5)) - 2.0).abs() < 1e-12);
    assert_eq!(a.distance_to_point(&p(0.5, 0.5, 0.5)), 0.0);
}

#[test]
fn aabb_translate_moves_corners() {
    let mut a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    assert_eq!(a.corners()[7], p(1.0, 1.0, 1.0));
    a.translate(&Vector3::new(0.0, 0.0, 10.0));
    assert_eq!(a.corners()[7], p(1.0, 1.0, 11.0));
    assert_eq!(a.fore().value(), 10.0);
    assert!(Aabb::from_points(&[]).is_err());
}

#[test]
fn viewport_frames_unit_box() {
    let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let eye = p(0.5, -5.0, 0.5);
    let r = a.viewport(&eye, &Vector3::x(), EPS).unwrap();
    let expect = [p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(1.0, 0.0, 1.0), p(1.0, 0.0, 0.0)];
    for (got, want) in r.points().iter().zip(expect.iter()) {
        assert!((got - want).norm() < 1e-9, "{got:?} vs {want:?}");
    }
    assert!(a.viewport(&p(0.5, 0.5, 0.5), &Vector3::x(), EPS).is_none());
    assert!(a.viewport(&eye, &Vector3::y(), EPS).is_none());
}

#[test]
fn viewport_variants() {
    let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
    let eye = p(0.5, -5.0, 0.5);
    let far = a.viewport_at_distance(&eye, &Vector3::x(), 1.0, EPS).unwrap();
    // Screen at y = -0.5: the near face projects scaled by 4.5 / 5.
    assert!(far.points().iter().all(|q| (q.y + 0.5).abs() < 1e-9));
    assert!((far.width() - 0.9).abs() < 1e-9 && (far.height() - 0.9).abs() < 1e-9);
    let sq = a.viewport_zoomed(&eye, &Vector3::x(), 1.0, 2.0, EPS).unwrap();
    assert!((sq.width() - 1.0).abs() < 1e-9 && (sq.height() - 1.0).abs() < 1e-9);
    assert!(a.viewport_at_distance(&eye, &Vector3::x(), 10.0, EPS).is_none());
}

fn arb_aabb() -> impl Strategy<Value = Aabb> {
    (
        prop::array::uniform3(-10.0f64..10.0),
        prop::array::uniform3(-10.0f64..10.0),
    )
        .prop_map(|(a, b)| Aabb::new(Point3::from(a), Point3::from(b)))
}

fn arb_z_box() -> impl Strategy<Value = AxisBox> {
    (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0)
        .prop_map(|(u0, u1, v0, v1)| AxisBox::new(Axis::Z, 0.0, (u0, u1), (v0, v1)))
}

proptest! {
    #[test]
    fn union_contains_both(a in arb_aabb(), b in arb_aabb()) {
        let u = a.union(&b);
        prop_assert!(u.contains_box(&a));
        prop_assert!(u.contains_box(&b));
        prop_assert_eq!(a.union(&a), a.clone());
        if a.contains_box(&b) {
            prop_assert_eq!(u, a);
        }
    }

    #[test]
    fn intersects_is_symmetric(a in arb_aabb(), b in arb_aabb()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        prop_assert_eq!(a.intersects(&b), !a.is_beyond(&b) || !b.is_beyond(&a));
        prop_assert_eq!(a.intersect(&b), b.intersect(&a));
        if let Some(i) = a.intersect(&b) {
            prop_assert!(a.contains_box(&i) && b.contains_box(&i));
        }
    }

    #[test]
    fn axis_box_union_and_symmetry(a in arb_z_box(), b in arb_z_box()) {
        let u = a.union(&b);
        prop_assert!(u.contains_box(&a) && u.contains_box(&b));
        prop_assert_eq!(a.union(&a), a.clone());
        if a.contains_box(&b) {
            prop_assert_eq!(u, a.clone());
        }
        prop_assert_eq!(a.intersects_box(&b), b.intersects_box(&a));
        prop_assert_eq!(a.intersects_box(&b), !a.is_beyond(&b) || !b.is_beyond(&a));
    }
}
