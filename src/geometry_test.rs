#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Point ---

#[test]
fn point_distance_is_euclidean() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.distance(b), 5.0));
    assert!(approx_eq(b.distance(a), 5.0));
}

#[test]
fn point_arithmetic() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(4.0, 6.0);
    assert_eq!(b - a, Point::new(3.0, 4.0));
    assert_eq!(a + b, Point::new(5.0, 8.0));
    assert_eq!(a * 2.0, Point::new(2.0, 4.0));
    assert!(approx_eq((b - a).length(), 5.0));
}

// --- Size ---

#[test]
fn size_orientation() {
    assert!(Size::new(800.0, 600.0).is_wide());
    assert!(!Size::new(600.0, 800.0).is_wide());
    assert!(!Size::new(500.0, 500.0).is_wide());
}

#[test]
fn size_diagonal_and_min_side() {
    let s = Size::new(300.0, 400.0);
    assert!(approx_eq(s.diagonal(), 500.0));
    assert_eq!(s.min_side(), 300.0);
}

// --- Rect ---

#[test]
fn rect_contains_is_half_open() {
    let r = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(19.9, 19.9)));
    assert!(!r.contains(Point::new(20.0, 15.0)));
    assert!(!r.contains(Point::new(15.0, 20.0)));
    assert!(!r.contains(Point::new(9.9, 15.0)));
}

#[test]
fn empty_rect_contains_nothing() {
    let r = Rect::new(10.0, 10.0, 10.0, 20.0);
    assert!(!r.contains(Point::new(10.0, 15.0)));
}

// --- FracRect ---

#[test]
fn frac_rect_resolves_against_surface() {
    let f = FracRect::new(0.25, 0.5, 0.75, 1.0);
    let r = f.resolve(Size::new(800.0, 600.0));
    assert_eq!(r, Rect::new(200.0, 300.0, 600.0, 600.0));
}

#[test]
fn frac_rect_out_of_range_passes_through() {
    let f = FracRect::new(-0.5, 0.0, 1.5, 1.0);
    let r = f.resolve(Size::new(100.0, 100.0));
    assert_eq!(r.left, -50.0);
    assert_eq!(r.right, 150.0);
}

#[test]
fn frac_rect_lerp_endpoints_and_midpoint() {
    let a = FracRect::new(0.0, 0.0, 0.5, 0.5);
    let b = FracRect::FULL;
    assert_eq!(a.lerp(&b, 0.0), a);
    assert_eq!(a.lerp(&b, 1.0), b);
    let mid = a.lerp(&b, 0.5);
    assert!(approx_eq(mid.right, 0.75));
}

// --- Target ---

#[test]
fn target_selects_by_orientation() {
    let wide = FracRect::new(0.0, 0.0, 0.5, 1.0);
    let tall = FracRect::new(0.0, 0.0, 1.0, 0.5);
    let t = Target::new(wide, tall);
    assert_eq!(t.select(Size::new(200.0, 100.0)), wide);
    assert_eq!(t.select(Size::new(100.0, 200.0)), tall);
}

#[test]
fn target_resolution_follows_resize() {
    let t = Target::uniform(FracRect::new(0.5, 0.5, 1.0, 1.0));
    assert_eq!(t.resolve(Size::new(100.0, 100.0)), Rect::new(50.0, 50.0, 100.0, 100.0));
    assert_eq!(t.resolve(Size::new(400.0, 200.0)), Rect::new(200.0, 100.0, 400.0, 200.0));
}

// --- Quadrant ---

#[test]
fn quadrant_index_wraps() {
    assert_eq!(Quadrant::from_index(0), Quadrant::SouthEast);
    assert_eq!(Quadrant::from_index(3), Quadrant::NorthEast);
    assert_eq!(Quadrant::from_index(5), Quadrant::SouthWest);
}

#[test]
fn quadrant_targets_cover_expected_corners() {
    let wide = Size::new(200.0, 100.0);
    let se = Quadrant::SouthEast.target().resolve(wide);
    assert_eq!(se, Rect::new(100.0, 50.0, 200.0, 100.0));
    let nw = Quadrant::NorthWest.target().resolve(wide);
    assert_eq!(nw, Rect::new(0.0, 0.0, 100.0, 50.0));

    let tall = Size::new(100.0, 200.0);
    let ne = Quadrant::NorthEast.target().resolve(tall);
    assert_eq!(ne, Rect::new(0.0, 50.0, 100.0, 100.0));
}

#[test]
fn justify_offsets() {
    assert_eq!(Justify::Start.offset(10.0), 0.0);
    assert_eq!(Justify::Center.offset(10.0), 5.0);
    assert_eq!(Justify::End.offset(10.0), 10.0);
}
