use uuid::Uuid;

use super::*;
use crate::doc::{Shape, ShapeKind};
use crate::geom::Point;
use crate::render::{Scene, draw_scene, render};

fn surface(w: u32, h: u32) -> PixmapSurface {
    PixmapSurface::new(w, h).unwrap()
}

fn alpha(s: &PixmapSurface, x: u32, y: u32) -> u8 {
    s.pixmap().pixel(x, y).unwrap().alpha()
}

fn rect(x: f64, y: f64, w: f64, h: f64, rotation: Option<f64>) -> Shape {
    Shape {
        width: Some(w),
        height: Some(h),
        rotation,
        ..Shape::new(Uuid::new_v4(), ShapeKind::Rectangle, Point::new(x, y))
    }
}

fn painted(shape: &Shape) -> PixmapSurface {
    let mut s = surface(64, 64);
    let Ok(()) = render(&mut s, shape);
    s
}

// =============================================================
// Construction
// =============================================================

#[test]
fn zero_size_is_rejected() {
    assert!(matches!(PixmapSurface::new(0, 10), Err(RasterError::InvalidSize { width: 0, height: 10 })));
    assert!(PixmapSurface::new(10, 0).is_err());
}

#[test]
fn new_surface_is_transparent() {
    let s = surface(8, 8);
    assert!(s.pixmap().data().iter().all(|b| *b == 0));
    assert_eq!((s.width(), s.height()), (8, 8));
}

#[test]
fn background_paints_and_survives_clear() {
    let mut s = surface(4, 4).with_background("#ffffff");
    assert_eq!(alpha(&s, 0, 0), 255);
    let Ok(()) = s.clear();
    let px = s.pixmap().pixel(3, 3).unwrap();
    assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 255, 255, 255));
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(matches!(surface(4, 4).with_font_bytes(vec![1, 2, 3]), Err(RasterError::InvalidFont)));
}

#[test]
fn encode_png_writes_png_signature() {
    let png = surface(4, 4).encode_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

// =============================================================
// Shapes
// =============================================================

#[test]
fn rectangle_is_stroked_not_filled() {
    let s = painted(&rect(10.0, 10.0, 40.0, 40.0, None));
    assert_eq!(alpha(&s, 10, 30), 255);
    assert_eq!(alpha(&s, 30, 30), 0);
    assert_eq!(alpha(&s, 60, 60), 0);
}

#[test]
fn rotation_zero_and_full_turn_paint_identical_pixels() {
    let zero = painted(&rect(10.0, 12.0, 30.0, 20.0, Some(0.0)));
    let full = painted(&rect(10.0, 12.0, 30.0, 20.0, Some(360.0)));
    assert_eq!(zero.pixmap().data(), full.pixmap().data());
}

#[test]
fn quarter_turn_changes_pixels() {
    let zero = painted(&rect(10.0, 20.0, 40.0, 10.0, None));
    let quarter = painted(&rect(10.0, 20.0, 40.0, 10.0, Some(90.0)));
    assert_ne!(zero.pixmap().data(), quarter.pixmap().data());
    // A 40x10 box turned about (30, 25) spans y 5..45 at x = 25.
    assert!(alpha(&quarter, 25, 8) > 200);
    assert_eq!(alpha(&zero, 25, 8), 0);
}

#[test]
fn circle_strokes_rim_only() {
    let shape = Shape {
        width: Some(40.0),
        height: Some(40.0),
        ..Shape::new(Uuid::new_v4(), ShapeKind::Circle, Point::new(10.0, 10.0))
    };
    let s = painted(&shape);
    assert!(alpha(&s, 50, 30) > 200);
    assert_eq!(alpha(&s, 30, 30), 0);
}

#[test]
fn stroke_color_is_applied() {
    let shape = Shape { color: Some("#ff0000".into()), ..rect(10.0, 10.0, 40.0, 40.0, None) };
    let px = painted(&shape).pixmap().pixel(10, 30).unwrap();
    assert_eq!((px.red(), px.green(), px.blue()), (255, 0, 0));
}

#[test]
fn text_without_font_draws_nothing() {
    let shape = Shape::new(
        Uuid::new_v4(),
        ShapeKind::Text { content: Some("hello".into()), font_size: None, font_family: None },
        Point::new(5.0, 30.0),
    );
    assert!(painted(&shape).pixmap().data().iter().all(|b| *b == 0));
}

// =============================================================
// Surface state
// =============================================================

#[test]
fn dash_pattern_leaves_gaps() {
    let mut s = surface(64, 20);
    s.set_line_width(2.0);
    let Ok(()) = s.set_line_dash(&[5.0, 5.0]);
    s.begin_path();
    s.move_to(0.0, 10.0);
    s.line_to(60.0, 10.0);
    s.stroke();

    assert_eq!(alpha(&s, 2, 10), 255);
    assert_eq!(alpha(&s, 7, 10), 0);
    assert_eq!(alpha(&s, 12, 10), 255);
}

#[test]
fn empty_dash_restores_solid_lines() {
    let mut s = surface(64, 20);
    s.set_line_width(2.0);
    let Ok(()) = s.set_line_dash(&[5.0, 5.0]);
    let Ok(()) = s.set_line_dash(&[]);
    s.begin_path();
    s.move_to(0.0, 10.0);
    s.line_to(60.0, 10.0);
    s.stroke();
    assert_eq!(alpha(&s, 7, 10), 255);
}

#[test]
fn restore_undoes_translation() {
    let mut s = surface(64, 64);
    s.set_line_width(2.0);
    s.save();
    let Ok(()) = s.translate(30.0, 30.0);
    s.restore();
    s.stroke_rect(4.0, 4.0, 10.0, 10.0);
    assert_eq!(alpha(&s, 4, 8), 255);
    assert_eq!(alpha(&s, 34, 38), 0);
}

#[test]
fn restore_on_empty_stack_is_harmless() {
    let mut s = surface(4, 4);
    s.restore();
    s.set_line_width(3.0);
    assert!((s.state.line_width - 3.0).abs() < f32::EPSILON);
}

#[test]
fn non_positive_line_width_is_ignored() {
    let mut s = surface(4, 4);
    s.set_line_width(4.0);
    s.set_line_width(0.0);
    s.set_line_width(-1.0);
    s.set_line_width(f64::NAN);
    assert!((s.state.line_width - 4.0).abs() < f32::EPSILON);
}

#[test]
fn scene_repaint_clears_previous_frame() {
    let shapes = vec![rect(10.0, 10.0, 20.0, 20.0, None)];
    let mut s = surface(64, 64);
    let Ok(()) = draw_scene(
        &mut s,
        &Scene { shapes: &shapes, provisional: None, selected: None, width: 64.0, height: 64.0, grid: false },
    );
    assert_eq!(alpha(&s, 10, 20), 255);

    let Ok(()) = draw_scene(
        &mut s,
        &Scene { shapes: &[], provisional: None, selected: None, width: 64.0, height: 64.0, grid: false },
    );
    assert_eq!(alpha(&s, 10, 20), 0);
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_color_hex_forms() {
    assert_eq!(parse_color("#f00"), Color::from_rgba8(255, 0, 0, 255));
    assert_eq!(parse_color("#00ff00"), Color::from_rgba8(0, 255, 0, 255));
    assert_eq!(parse_color("#0000ff80"), Color::from_rgba8(0, 0, 255, 128));
    assert_eq!(parse_color("#fff8"), Color::from_rgba8(255, 255, 255, 136));
}

#[test]
fn parse_color_named_and_fallback() {
    assert_eq!(parse_color("White"), Color::from_rgba8(255, 255, 255, 255));
    assert_eq!(parse_color("transparent"), Color::from_rgba8(0, 0, 0, 0));
    assert_eq!(parse_color("hsl(var(--x))"), Color::BLACK);
    assert_eq!(parse_color("#zzzzzz"), Color::BLACK);
    assert_eq!(parse_color("#+f+f+f"), Color::BLACK);
    assert_eq!(parse_color("#12345"), Color::BLACK);
}

#[test]
fn parse_color_hex_digits_are_case_insensitive_ascii() {
    assert_eq!(parse_color("#AbC"), Color::from_rgba8(170, 187, 204, 255));
    assert_eq!(parse_color("#FF00fF"), Color::from_rgba8(255, 0, 255, 255));
    // Six bytes, but only three characters.
    assert_eq!(parse_color("#\u{e9}\u{e9}\u{e9}"), Color::BLACK);
}

#[test]
fn parse_font_px_reads_pixel_token() {
    assert_eq!(parse_font_px("16px Arial"), Some(16.0));
    assert_eq!(parse_font_px("bold 24.5px Georgia"), Some(24.5));
    assert_eq!(parse_font_px("Arial"), None);
    assert_eq!(parse_font_px("0px Arial"), None);
}
