//! Rendering boundary: the display list handed to the host renderer, and the
//! measuring and theming services the scene borrows from the host.
//!
//! The scene never touches pixels. Each frame it produces an ordered list of
//! [`DrawCommand`]s; a [`Renderer`] strokes and fills them. Text is laid out
//! against widths reported by a [`TextMeasure`] at a fixed reference font
//! size, and drawing styles come in ink/accent pairs from a
//! [`ThemeProvider`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba(0x0000_0000);
    pub const BLACK: Rgba = Rgba(0xff00_0000);
    pub const WHITE: Rgba = Rgba(0xffff_ffff);
    /// Half-transparent white used to highlight the selected rose label.
    pub const HIGHLIGHT: Rgba = Rgba(0x80ff_ffff);

    #[must_use]
    pub fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.alpha() == 0
    }
}

/// How a shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Fill,
    /// Outline with the given stroke width.
    Stroke(f64),
    /// Fill and outline with the given stroke width.
    FillAndStroke(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Rgba,
    pub paint: Paint,
}

impl Style {
    #[must_use]
    pub fn fill(color: Rgba) -> Self {
        Self { color, paint: Paint::Fill }
    }

    #[must_use]
    pub fn stroke(color: Rgba, width: f64) -> Self {
        Self { color, paint: Paint::Stroke(width) }
    }

    #[must_use]
    pub fn outline(color: Rgba, width: f64) -> Self {
        Self { color, paint: Paint::FillAndStroke(width) }
    }
}

/// The two styles an element is drawn with, one over the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StylePair {
    pub ink: Style,
    pub accent: Style,
}

/// Host handle for a decoded bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u64);

/// One drawing instruction, in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear { color: Rgba },
    Rect { rect: Rect, style: Style },
    /// A closed polygon.
    Path { points: Vec<Point>, style: Style },
    /// One line of text; `origin` is the left end of the baseline and the
    /// text is drawn at `font_size * scale`, clipped to `clip`.
    Text { text: String, origin: Point, font_size: f64, scale: f64, style: Style, clip: Rect },
    /// A bitmap with its top-left corner at `origin`, scaled uniformly and
    /// clipped to `clip`.
    Image { image: ImageId, origin: Point, scale: f64, clip: Rect },
}

/// Text measurement supplied by the host's font engine.
pub trait TextMeasure: Send + Sync {
    /// Advance width of `text` at `font_size`.
    fn text_width(&self, text: &str, font_size: f64) -> f64;

    /// Distance the font descends below the baseline at `font_size`.
    fn descent(&self, _font_size: f64) -> f64 {
        0.0
    }
}

/// Executes draw commands on a real surface.
pub trait Renderer {
    fn execute(&mut self, command: &DrawCommand);
}

/// Supplies the style pairs elements are themed with.
pub trait ThemeProvider: Send {
    fn pair(&mut self) -> StylePair;
}

/// Monospace measurement: every character advances by `advance` ems.
///
/// Useful for headless hosts and tests; real hosts measure with their font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    advance: f64,
    descent: f64,
}

impl FixedAdvance {
    #[must_use]
    pub fn new(advance: f64) -> Self {
        Self { advance, descent: 0.0 }
    }

    /// Descent below the baseline in ems.
    #[must_use]
    pub fn with_descent(mut self, descent: f64) -> Self {
        self.descent = descent;
        self
    }
}

impl TextMeasure for FixedAdvance {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * self.advance * font_size
    }

    fn descent(&self, font_size: f64) -> f64 {
        self.descent * font_size
    }
}

/// Cycles through a fixed list of style pairs.
#[derive(Debug, Clone)]
pub struct Palette {
    pairs: Vec<StylePair>,
    next: usize,
}

impl Palette {
    /// A palette over `pairs`; an empty list falls back to the default pairs.
    #[must_use]
    pub fn new(pairs: Vec<StylePair>) -> Self {
        if pairs.is_empty() { Self::default() } else { Self { pairs, next: 0 } }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let pair = |ink: u32, accent: u32| StylePair { ink: Style::fill(Rgba(ink)), accent: Style::fill(Rgba(accent)) };
        Self {
            pairs: vec![
                pair(0xff1e_3a5f, 0x40f2_c14e),
                pair(0xff7a_1f3d, 0x40ff_e0b3),
                pair(0xff2d_6a4f, 0x40d8_f3dc),
                pair(0xff5a_189a, 0x40e0_aaff),
            ],
            next: 0,
        }
    }
}

impl ThemeProvider for Palette {
    fn pair(&mut self) -> StylePair {
        let pair = self.pairs[self.next % self.pairs.len()];
        self.next = (self.next + 1) % self.pairs.len();
        pair
    }
}

/// Emit the text lines of `lines` with an outline pass behind the ink and
/// accent passes, clipped to `clip`.
pub(crate) fn push_text_lines(
    out: &mut Vec<DrawCommand>,
    lines: &[crate::text_flow::PlacedLine],
    font_size: f64,
    styles: &StylePair,
    outline: Style,
    clip: Rect,
) {
    for line in lines {
        for style in [outline, styles.ink, styles.accent] {
            out.push(DrawCommand::Text {
                text: line.text.clone(),
                origin: line.origin,
                font_size,
                scale: line.scale,
                style,
                clip,
            });
        }
    }
}
