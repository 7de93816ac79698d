//! Boundary physics: ray casts, crossing and specular reflection.

use super::tests::unit_square;
use super::*;
use nalgebra::vector;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn close(a: Point, b: Point) -> bool {
    (a - b).norm() < 1e-12
}

#[test]
fn intersect_from_inside_reports_odd_parity() {
    let r = Region::from_points("sq", &unit_square());
    let cast = r.intersect(vector![0.0, 0.2], vector![1.0, 0.0], None);
    assert!(cast.found());
    let hit = cast.nearest.unwrap();
    assert_eq!(hit.edge, 1);
    assert!((hit.u - 1.0).abs() < 1e-12);
    assert!(cast.crossing.odd_parity);
    assert!(!cast.crossing.on_edge);
    assert_eq!(cast.crossing.bits(), 0b01);
}

#[test]
fn intersect_from_outside_reports_even_parity() {
    let r = Region::from_points("sq", &unit_square());
    let cast = r.intersect(vector![-3.0, 0.2], vector![1.0, 0.0], None);
    let hit = cast.nearest.unwrap();
    assert_eq!(hit.edge, 3);
    assert!((hit.u - 2.0).abs() < 1e-12);
    assert_eq!(cast.crossing.bits(), 0b00);
    // pointing away: nothing ahead
    let away = r.intersect(vector![-3.0, 0.2], vector![-1.0, 0.0], None);
    assert!(!away.found());
}

#[test]
fn avoided_edge_still_counts_as_touch() {
    let r = Region::from_points("sq", &unit_square());
    let cast = r.intersect(vector![1.0, 0.0], vector![-1.0, 0.0], Some(1));
    let hit = cast.nearest.unwrap();
    assert_eq!(hit.edge, 3);
    assert!((hit.u - 2.0).abs() < 1e-12);
    assert!(cast.crossing.on_edge);
    assert!(!cast.crossing.odd_parity);
    assert_eq!(cast.crossing.bits(), 0b10);
}

#[test]
fn free_step_is_damped_by_safety_margin() {
    let r = Region::from_points("sq", &unit_square());
    let mut rng = StdRng::seed_from_u64(1);
    let b = r.reflect(vector![0.0, 0.0], vector![0.1, 0.2], None, &mut rng, 0.5);
    assert_eq!(b.event, BoundaryEvent::Free);
    assert!(close(b.r_end, vector![0.08, 0.16]));
    assert_eq!(b.dr_end, Point::zeros());
    assert_eq!(b.edge_to_avoid, None);
}

#[test]
fn certain_crossing_always_crosses() {
    let r = Region::from_points("sq", &unit_square());
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let b = r.reflect(vector![0.5, 0.0], vector![1.0, 0.0], None, &mut rng, 1.0);
        assert_eq!(b.event, BoundaryEvent::Crossed { edge: 1 });
        assert!(close(b.r_end, vector![1.0, 0.0]));
        assert!(close(b.dr_end, vector![0.5, 0.0]));
        assert_eq!(b.edge_to_avoid, Some(1));
    }
}

#[test]
fn impermeable_boundary_always_reflects() {
    let r = Region::from_points("sq", &unit_square());
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let b = r.reflect(vector![0.5, 0.0], vector![1.0, 0.0], None, &mut rng, 0.0);
        assert_eq!(b.event, BoundaryEvent::Reflected { edge: 1 });
        assert!(close(b.r_end, vector![0.9, 0.0]));
        assert!(close(b.dr_end, vector![-0.6, 0.0]));
        assert_eq!(b.edge_to_avoid, Some(1));
    }
}

#[test]
fn specular_reflection_on_horizontal_edge() {
    assert!(close(
        mirror_about_tangent(vector![1.0, -1.0], vector![1.0, 0.0]),
        vector![1.0, 1.0]
    ));
    let r = Region::from_points(
        "floor",
        &[
            vector![0.0, 0.0],
            vector![2.0, 0.0],
            vector![2.0, 2.0],
            vector![0.0, 2.0],
        ],
    );
    let mut rng = StdRng::seed_from_u64(3);
    let b = r.reflect(vector![0.5, 0.5], vector![1.0, -1.0], None, &mut rng, 0.0);
    assert_eq!(b.event, BoundaryEvent::Reflected { edge: 0 });
    assert!(close(b.r_end, vector![0.9, 0.1]));
    // unused 60% of the step, normal component flipped
    assert!(close(b.dr_end, vector![0.6, 0.6]));
}

#[test]
fn avoided_edge_is_not_an_obstruction() {
    let r = Region::from_points("sq", &unit_square());
    let mut rng = StdRng::seed_from_u64(3);
    let b = r.reflect(vector![1.0, 0.0], vector![0.5, 0.0], Some(1), &mut rng, 0.0);
    assert_eq!(b.event, BoundaryEvent::Free);
    assert!(close(b.r_end, vector![1.4, 0.0]));
}

#[test]
fn resolve_step_crosses_then_completes() {
    let r = Region::from_points("sq", &unit_square());
    let mut rng = StdRng::seed_from_u64(11);
    let t = r.resolve_step(vector![0.0, 0.0], vector![3.0, 0.0], &mut rng, 1.0, 8);
    assert_eq!(t.crossings, 1);
    assert_eq!(t.reflections, 0);
    assert_eq!(t.last_edge, Some(1));
    assert!(close(t.position, vector![2.6, 0.0]));
    assert_eq!(t.residual, Point::zeros());
}

#[test]
fn resolve_step_stops_at_event_limit() {
    let r = Region::from_points("sq", &unit_square());
    let mut rng = StdRng::seed_from_u64(11);
    let t = r.resolve_step(vector![0.0, 0.1], vector![40.0, 0.0], &mut rng, 0.0, 3);
    assert_eq!(t.reflections, 3);
    assert_eq!(t.crossings, 0);
    assert!(t.residual.norm() > 0.0);
    assert!(r.is_inside(t.position));
}

proptest! {
    #[test]
    fn mirror_keeps_length_and_tangential_part(
        dx in -5.0f64..5.0, dy in -5.0f64..5.0, angle in 0.0f64..std::f64::consts::TAU,
    ) {
        let d = vector![dx, dy];
        let t_hat = vector![angle.cos(), angle.sin()];
        let m = mirror_about_tangent(d, t_hat);
        prop_assert!((m.norm() - d.norm()).abs() < 1e-9);
        prop_assert!((m.dot(&t_hat) - d.dot(&t_hat)).abs() < 1e-9);
        let n_hat = vector![-t_hat.y, t_hat.x];
        prop_assert!((m.dot(&n_hat) + d.dot(&n_hat)).abs() < 1e-9);
    }

    #[test]
    fn impermeable_square_confines_particle(
        x in -0.9f64..0.9, y in -0.9f64..0.9,
        dx in -6.0f64..6.0, dy in -6.0f64..6.0,
        seed in any::<u64>(),
    ) {
        let r = Region::from_points("sq", &unit_square());
        let mut rng = StdRng::seed_from_u64(seed);
        let t = r.resolve_step(vector![x, y], vector![dx, dy], &mut rng, 0.0, 64);
        prop_assert_eq!(t.crossings, 0);
        prop_assert!(t.position.x.abs() < 1.0 && t.position.y.abs() < 1.0);
    }
}
