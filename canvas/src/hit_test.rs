use uuid::Uuid;

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn boxed(kind: ShapeKind, x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape {
        width: Some(w),
        height: Some(h),
        ..Shape::new(Uuid::new_v4(), kind, pt(x, y))
    }
}

fn segment(kind: fn(Option<f64>, Option<f64>) -> ShapeKind, a: Point, b: Point) -> Shape {
    Shape::new(Uuid::new_v4(), kind(Some(b.x), Some(b.y)), a)
}

fn line(a: Point, b: Point) -> Shape {
    segment(|end_x, end_y| ShapeKind::Line { end_x, end_y }, a, b)
}

fn arrow(a: Point, b: Point) -> Shape {
    segment(|end_x, end_y| ShapeKind::Arrow { end_x, end_y }, a, b)
}

fn pencil(points: &[(f64, f64)]) -> Shape {
    let points: Vec<Point> = points.iter().map(|&(x, y)| pt(x, y)).collect();
    let origin = points.first().copied().unwrap_or_default();
    Shape::new(Uuid::new_v4(), ShapeKind::Pencil { points }, origin)
}

fn text(x: f64, y: f64, font_size: Option<f64>) -> Shape {
    Shape::new(
        Uuid::new_v4(),
        ShapeKind::Text { content: Some("hello".into()), font_size, font_family: None },
        pt(x, y),
    )
}

// =============================================================
// Rectangle
// =============================================================

#[test]
fn rectangle_hits_every_interior_point() {
    let shape = boxed(ShapeKind::Rectangle, 10.0, 20.0, 100.0, 50.0);
    for i in 1..10 {
        for j in 1..10 {
            let p = pt(10.0 + f64::from(i) * 10.0, 20.0 + f64::from(j) * 5.0);
            assert!(hit_test(p, &shape), "{p:?} should hit");
        }
    }
}

#[test]
fn rectangle_edges_are_inclusive() {
    let shape = boxed(ShapeKind::Rectangle, 10.0, 20.0, 100.0, 50.0);
    assert!(hit_test(pt(10.0, 20.0), &shape));
    assert!(hit_test(pt(110.0, 70.0), &shape));
    assert!(hit_test(pt(60.0, 70.0), &shape));
}

#[test]
fn rectangle_misses_outside_epsilon_box() {
    let shape = boxed(ShapeKind::Rectangle, 10.0, 20.0, 100.0, 50.0);
    let eps = 1e-6;
    for p in [
        pt(10.0 - eps, 40.0),
        pt(110.0 + eps, 40.0),
        pt(50.0, 20.0 - eps),
        pt(50.0, 70.0 + eps),
        pt(-500.0, -500.0),
    ] {
        assert!(!hit_test(p, &shape), "{p:?} should miss");
    }
}

#[test]
fn rectangle_without_extent_hits_only_its_corner() {
    let shape = Shape::new(Uuid::new_v4(), ShapeKind::Rectangle, pt(5.0, 5.0));
    assert!(hit_test(pt(5.0, 5.0), &shape));
    assert!(!hit_test(pt(5.5, 5.0), &shape));
}

#[test]
fn rotated_rectangle_is_tested_unrotated() {
    let shape = Shape {
        rotation: Some(45.0),
        ..boxed(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 10.0)
    };
    assert!(hit_test(pt(95.0, 5.0), &shape));
}

// =============================================================
// Circle
// =============================================================

#[test]
fn circle_center_always_hits() {
    for w in [1.0, 10.0, 57.0, 400.0] {
        let shape = boxed(ShapeKind::Circle, 3.0, 7.0, w, w);
        let r = w / 2.0;
        assert!(hit_test(pt(3.0 + r, 7.0 + r), &shape));
    }
}

#[test]
fn circle_misses_one_unit_past_radius() {
    let shape = boxed(ShapeKind::Circle, 0.0, 0.0, 40.0, 40.0);
    assert!(!hit_test(pt(20.0 + 21.0, 20.0), &shape));
    assert!(!hit_test(pt(20.0, 20.0 - 21.0), &shape));
}

#[test]
fn circle_rim_is_inclusive() {
    let shape = boxed(ShapeKind::Circle, 0.0, 0.0, 40.0, 40.0);
    assert!(hit_test(pt(40.0, 20.0), &shape));
}

#[test]
fn circle_ignores_height() {
    let shape = boxed(ShapeKind::Circle, 0.0, 0.0, 40.0, 4.0);
    assert!(hit_test(pt(20.0, 38.0), &shape));
}

// =============================================================
// Line / Arrow
// =============================================================

#[test]
fn line_hits_within_tolerance() {
    let shape = line(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!(hit_test(pt(50.0, 5.0), &shape));
    assert!(!hit_test(pt(50.0, 11.0), &shape));
}

#[test]
fn line_tolerance_is_strict() {
    let shape = line(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!(!hit_test(pt(50.0, 10.0), &shape));
    assert!(hit_test(pt(50.0, 9.999), &shape));
}

#[test]
fn line_is_clamped_at_endpoints() {
    let shape = line(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!(!hit_test(pt(115.0, 0.0), &shape));
    assert!(hit_test(pt(105.0, 0.0), &shape));
}

#[test]
fn arrow_hits_like_line() {
    let shape = arrow(pt(0.0, 0.0), pt(100.0, 0.0));
    assert!(hit_test(pt(50.0, 5.0), &shape));
    assert!(!hit_test(pt(50.0, 11.0), &shape));
}

#[test]
fn line_without_end_is_a_point() {
    let shape = Shape::new(
        Uuid::new_v4(),
        ShapeKind::Line { end_x: None, end_y: None },
        pt(50.0, 50.0),
    );
    assert!(hit_test(pt(55.0, 50.0), &shape));
    assert!(!hit_test(pt(61.0, 50.0), &shape));
}

#[test]
fn line_ending_on_axis_zero_is_honored() {
    // An explicit end of x = 0 is a real coordinate, not "unset".
    let shape = line(pt(100.0, 0.0), pt(0.0, 0.0));
    assert!(hit_test(pt(2.0, 3.0), &shape));
}

// =============================================================
// Pencil
// =============================================================

#[test]
fn pencil_hits_near_any_sample() {
    let shape = pencil(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    assert!(hit_test(pt(10.0, 5.0), &shape));
    assert!(!hit_test(pt(10.0, 15.0), &shape));
}

#[test]
fn pencil_gap_between_sparse_samples_is_a_blind_spot() {
    // Known limitation: proximity is measured to samples, not segments.
    let shape = pencil(&[(0.0, 0.0), (100.0, 0.0)]);
    assert!(!hit_test(pt(50.0, 0.0), &shape));
}

#[test]
fn pencil_without_points_never_hits() {
    let shape = pencil(&[]);
    assert!(!hit_test(pt(0.0, 0.0), &shape));
}

// =============================================================
// Text
// =============================================================

#[test]
fn text_box_sits_above_baseline() {
    let shape = text(10.0, 50.0, Some(20.0));
    assert!(hit_test(pt(10.0, 50.0), &shape));
    assert!(hit_test(pt(100.0, 30.0), &shape));
    assert!(!hit_test(pt(100.0, 29.0), &shape));
    assert!(!hit_test(pt(100.0, 51.0), &shape));
}

#[test]
fn text_width_is_fixed_regardless_of_content() {
    // Known limitation: the box is 200 units wide whatever the text says.
    let shape = text(0.0, 20.0, None);
    assert!(hit_test(pt(200.0, 10.0), &shape));
    assert!(!hit_test(pt(201.0, 10.0), &shape));
}

#[test]
fn text_defaults_font_size() {
    let shape = text(0.0, 20.0, None);
    assert!(hit_test(pt(5.0, 4.0), &shape));
    assert!(!hit_test(pt(5.0, 3.0), &shape));
}

// =============================================================
// Unknown
// =============================================================

#[test]
fn unknown_kind_never_hits() {
    let shape = boxed(ShapeKind::Unknown, 0.0, 0.0, 100.0, 100.0);
    assert!(!hit_test(pt(50.0, 50.0), &shape));
}

// =============================================================
// topmost_hit
// =============================================================

#[test]
fn topmost_hit_prefers_later_shape() {
    let bottom = boxed(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
    let top = boxed(ShapeKind::Rectangle, 50.0, 50.0, 100.0, 100.0);
    let shapes = vec![bottom.clone(), top.clone()];

    assert_eq!(topmost_hit(pt(75.0, 75.0), &shapes).map(|s| s.id), Some(top.id));
    assert_eq!(topmost_hit(pt(10.0, 10.0), &shapes).map(|s| s.id), Some(bottom.id));
}

#[test]
fn topmost_hit_none_on_empty_space() {
    let shapes = vec![boxed(ShapeKind::Rectangle, 0.0, 0.0, 10.0, 10.0)];
    assert!(topmost_hit(pt(500.0, 500.0), &shapes).is_none());
    assert!(topmost_hit(pt(0.0, 0.0), &[]).is_none());
}
