use super::*;
use crate::text_flow::PlacedLine;

#[test]
fn rgba_alpha_and_transparency() {
    assert_eq!(Rgba::BLACK.alpha(), 0xff);
    assert_eq!(Rgba::HIGHLIGHT.alpha(), 0x80);
    assert!(Rgba::TRANSPARENT.is_transparent());
    assert!(!Rgba::WHITE.is_transparent());
}

#[test]
fn fixed_advance_counts_chars_not_bytes() {
    let m = FixedAdvance::new(0.5);
    assert!((m.text_width("abcd", 10.0) - 20.0).abs() < 1e-12);
    assert!((m.text_width("déjà", 10.0) - 20.0).abs() < 1e-12);
    assert!(m.text_width("", 10.0).abs() < 1e-12);
}

#[test]
fn fixed_advance_descent_scales_with_font() {
    assert!(FixedAdvance::new(0.5).descent(100.0).abs() < 1e-12);
    let m = FixedAdvance::new(0.5).with_descent(0.25);
    assert!((m.descent(100.0) - 25.0).abs() < 1e-12);
}

#[test]
fn palette_cycles_pairs() {
    let a = StylePair { ink: Style::fill(Rgba(1)), accent: Style::fill(Rgba(2)) };
    let b = StylePair { ink: Style::fill(Rgba(3)), accent: Style::fill(Rgba(4)) };
    let mut p = Palette::new(vec![a, b]);
    assert_eq!(p.pair(), a);
    assert_eq!(p.pair(), b);
    assert_eq!(p.pair(), a);
}

#[test]
fn empty_palette_falls_back_to_default() {
    let mut p = Palette::new(Vec::new());
    let first = p.pair();
    assert_eq!(first, Palette::default().pair());
}

#[test]
fn text_lines_are_drawn_outline_ink_accent() {
    let styles = StylePair { ink: Style::fill(Rgba(1)), accent: Style::fill(Rgba(2)) };
    let outline = Style::outline(Rgba::BLACK, 8.0);
    let clip = Rect::new(0.0, 0.0, 10.0, 10.0);
    let lines = vec![PlacedLine { text: "hi".into(), origin: Point::new(1.0, 2.0), scale: 0.5 }];
    let mut out = Vec::new();
    push_text_lines(&mut out, &lines, 128.0, &styles, outline, clip);
    assert_eq!(out.len(), 3);
    let styles_seen: Vec<Style> = out
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { style, .. } => Some(*style),
            _ => None,
        })
        .collect();
    assert_eq!(styles_seen, vec![outline, styles.ink, styles.accent]);
}
