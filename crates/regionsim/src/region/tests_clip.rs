//! Two-polygon overlap: fast paths, boundary walks and arc resolution.

use super::clip::{choose_arc, ArcChoice};
use super::polygon::surface;
use super::tests::unit_square;
use super::*;
use nalgebra::vector;

fn region(pts: &[Point]) -> Region {
    Region::from_points("r", pts)
}

fn overlap_of(a: &[Point], b: &[Point]) -> Overlap {
    overlap(&region(a), &region(b))
}

fn polygon(o: Overlap) -> Vec<TaggedVertex> {
    match o {
        Overlap::Polygon(v) => v,
        other => panic!("expected polygon, got {other:?}"),
    }
}

fn points(v: &[TaggedVertex]) -> Vec<Point> {
    v.iter().map(|t| t.point).collect()
}

fn close(a: Point, b: Point) -> bool {
    (a - b).norm() < 1e-9
}

#[test]
fn identical_regions_return_a_verbatim() {
    let a = region(&unit_square());
    let b = region(&unit_square());
    let out = intersection_region(&a, &b).unwrap();
    assert_eq!(out, unit_square());
    // identical but degenerate
    let seg = [vector![0.0, 0.0], vector![1.0, 0.0]];
    assert_eq!(overlap_of(&seg, &seg), Overlap::Empty);
}

#[test]
fn empty_or_disjoint_regions_do_not_overlap() {
    let far: Vec<Point> = unit_square().iter().map(|p| p + vector![5.0, 5.0]).collect();
    assert_eq!(overlap_of(&unit_square(), &far), Overlap::Empty);
    assert_eq!(overlap_of(&[], &unit_square()), Overlap::Empty);
    assert_eq!(overlap_of(&unit_square(), &[]), Overlap::Empty);
    assert!(intersection_region(&region(&far), &region(&unit_square())).is_none());
}

#[test]
fn shifted_rectangle_overlap() {
    let b = [
        vector![0.0, 0.2],
        vector![2.5, 0.2],
        vector![2.5, 2.0],
        vector![0.0, 2.0],
    ];
    let v = polygon(overlap_of(&unit_square(), &b));
    let kinds: Vec<VertexKind> = v.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            VertexKind::Inside,
            VertexKind::Intersection { edge: 1 },
            VertexKind::External,
            VertexKind::Intersection { edge: 2 },
        ]
    );
    let pts = points(&v);
    assert!(close(pts[1], vector![1.0, 0.2]));
    assert!(close(pts[2], vector![1.0, 1.0]));
    assert!(close(pts[3], vector![0.0, 1.0]));
    assert!((surface(&pts) - 0.8).abs() < 1e-9);
}

#[test]
fn corner_cut_triangle_picks_the_inner_corner() {
    let b = [vector![0.0, -1.5], vector![2.5, -1.5], vector![2.5, 1.0]];
    let v = polygon(overlap_of(&unit_square(), &b));
    assert_eq!(v.len(), 3);
    assert_eq!(v[2].kind, VertexKind::External);
    assert!(close(v[2].point, vector![1.0, -1.0]));
    assert!((surface(&points(&v)) - 0.125).abs() < 1e-9);

    // opposite winding of B walks A backwards and finds the same corner
    let mut cw = b.to_vec();
    cw.reverse();
    cw.rotate_left(2);
    let v = polygon(overlap_of(&unit_square(), &cw));
    assert_eq!(v.len(), 3);
    assert!(close(v[2].point, vector![1.0, -1.0]));
    assert!((surface(&points(&v)) - 0.125).abs() < 1e-9);
}

#[test]
fn nested_regions_return_the_inner_one() {
    let small = [
        vector![-0.5, -0.5],
        vector![0.5, -0.5],
        vector![0.5, 0.5],
        vector![-0.5, 0.5],
    ];
    // A inside B
    let v = polygon(overlap_of(&small, &unit_square()));
    assert_eq!(points(&v), small.to_vec());
    assert!(v.iter().all(|t| t.kind == VertexKind::External));
    // B inside A
    let v = polygon(overlap_of(&unit_square(), &small));
    assert_eq!(points(&v), small.to_vec());
    assert!(v.iter().all(|t| t.kind == VertexKind::Inside));
}

#[test]
fn band_through_square_connects_hits_on_same_edge() {
    let band = [
        vector![-2.0, -0.2],
        vector![2.0, -0.2],
        vector![2.0, 0.2],
        vector![-2.0, 0.2],
    ];
    let v = polygon(overlap_of(&unit_square(), &band));
    assert_eq!(v.len(), 4);
    assert!(v.iter().all(|t| matches!(t.kind, VertexKind::Intersection { .. })));
    assert!((surface(&points(&v)) - 0.8).abs() < 1e-9);
}

#[test]
fn hook_shape_follows_a_between_different_edges() {
    let hook = [
        vector![-1.5, -0.2],
        vector![1.5, -0.2],
        vector![1.5, 2.0],
        vector![-1.5, 2.0],
        vector![-1.5, 1.5],
        vector![0.5, 1.5],
        vector![0.5, 0.2],
        vector![-1.5, 0.2],
    ];
    let v = polygon(overlap_of(&unit_square(), &hook));
    let expected = [
        vector![-1.0, -0.2],
        vector![1.0, -0.2],
        vector![1.0, 1.0],
        vector![0.5, 1.0],
        vector![0.5, 0.2],
        vector![-1.0, 0.2],
    ];
    assert_eq!(v.len(), expected.len());
    for (got, want) in v.iter().zip(expected.iter()) {
        assert!(close(got.point, *want), "{:?} vs {:?}", got.point, want);
    }
    assert_eq!(v[2].kind, VertexKind::External);
    assert_eq!(v[4].kind, VertexKind::Inside);
    assert!((surface(&points(&v)) - 1.2).abs() < 1e-9);
}

#[test]
fn slot_through_square_is_ambiguous_with_both_directions_inside() {
    // B contains every vertex of A but a slot splits the overlap in two
    let slotted = [
        vector![-5.0, -5.0],
        vector![-0.1, -5.0],
        vector![-0.1, 3.0],
        vector![0.1, 3.0],
        vector![0.1, -5.0],
        vector![5.0, -5.0],
        vector![5.0, 5.0],
        vector![-5.0, 5.0],
    ];
    assert_eq!(
        overlap_of(&unit_square(), &slotted),
        Overlap::Ambiguous {
            exit_edge: 2,
            entry_edge: 2,
            both_inside: true,
        }
    );
    assert!(intersection_region(&region(&unit_square()), &region(&slotted)).is_none());
}

#[test]
fn collinear_shared_edges_are_reported_as_ambiguous() {
    // the overlap would be [1,2]x[0,2]; the shared bottom and top lines are
    // parallel to B's edges and B's corner on A's edge tests as outside
    let a = [
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![2.0, 2.0],
        vector![0.0, 2.0],
    ];
    let b = [
        vector![1.0, 0.0],
        vector![3.0, 0.0],
        vector![3.0, 2.0],
        vector![1.0, 2.0],
    ];
    assert_eq!(
        overlap_of(&a, &b),
        Overlap::Ambiguous {
            exit_edge: 0,
            entry_edge: 1,
            both_inside: false,
        }
    );
    assert!(intersection_region(&region(&a), &region(&b)).is_none());
}

#[test]
fn arc_choice_covers_unique_both_and_neither() {
    let a = unit_square();
    let far = [vector![5.0, 5.0], vector![6.0, 5.0], vector![5.0, 6.0]];
    let huge = [
        vector![-9.0, -9.0],
        vector![9.0, -9.0],
        vector![9.0, 9.0],
        vector![-9.0, 9.0],
    ];
    let corner = [vector![0.0, -1.5], vector![2.5, -1.5], vector![2.5, 1.0]];
    let bounds = |pts: &[Point]| Bounds::of(pts).unwrap();

    assert_eq!(choose_arc(&a, &far, &bounds(&far), 0, 2), ArcChoice::Neither);
    assert_eq!(choose_arc(&a, &huge, &bounds(&huge), 0, 2), ArcChoice::Both);
    assert_eq!(
        choose_arc(&a, &corner, &bounds(&corner), 0, 1),
        ArcChoice::Unique(vec![1])
    );
    assert_eq!(
        choose_arc(&a, &corner, &bounds(&corner), 1, 0),
        ArcChoice::Unique(vec![1])
    );
    // same edge: straight unless all of A is covered
    assert_eq!(
        choose_arc(&a, &corner, &bounds(&corner), 3, 3),
        ArcChoice::Unique(vec![])
    );
    assert_eq!(choose_arc(&a, &huge, &bounds(&huge), 3, 3), ArcChoice::Both);
}
