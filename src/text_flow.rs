//! Text flow: choose the line breaking that shows a string at the largest
//! legible scale inside a rectangle.
//!
//! DESIGN
//! ======
//! All candidate layouts are built once, when the text is created, by
//! measuring substrings at a fixed reference font size. Choosing a layout for a
//! draw area is then a cheap scan: each candidate's *actual* scale is the
//! largest uniform scale at which its widest line and its stacked line heights
//! both fit, and its *perceived* scale boosts that by how many of its lines end
//! at whitespace. The candidate with the best perceived scale wins and is drawn
//! at its actual scale.
//!
//! Candidates:
//! - the whole string on one line;
//! - for each `k` in `1..=MAX_LINES`, lines closed once they reach
//!   `total_width / (k + 1)`, once breaking anywhere and once breaking at the
//!   last whitespace seen on the line;
//! - every grouping of the whitespace-delimited chunks into consecutive lines,
//!   when there are fewer than `MAX_LINES` chunks.

#[cfg(test)]
#[path = "text_flow_test.rs"]
mod text_flow_test;

use crate::consts::MAX_LINES;
use crate::geometry::{Align, Point, Rect};
use crate::render::TextMeasure;

/// One line of a candidate layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Line text with surrounding whitespace trimmed.
    pub text: String,
    /// Width of `text` at the reference font size.
    pub width: f64,
    /// The untrimmed chunk ended in whitespace, i.e. the line breaks cleanly.
    pub breaks: bool,
}

impl Section {
    fn measure(raw: &str, measure: &dyn TextMeasure, font_size: f64) -> Self {
        let text = raw.trim().to_string();
        let width = measure.text_width(&text, font_size);
        Self { text, width, breaks: raw.ends_with(char::is_whitespace) }
    }
}

/// A candidate arrangement of the text into lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub sections: Vec<Section>,
    /// Widest line at the reference font size.
    pub width: f64,
    /// Number of lines that break at whitespace.
    pub breaks: usize,
}

impl Layout {
    fn new<'a>(chunks: impl IntoIterator<Item = &'a str>, measure: &dyn TextMeasure, font_size: f64) -> Self {
        let sections: Vec<Section> = chunks
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .map(|chunk| Section::measure(chunk, measure, font_size))
            .collect();
        let width = sections.iter().map(|s| s.width).fold(0.0, f64::max);
        let breaks = sections.iter().filter(|s| s.breaks).count();
        Self { sections, width, breaks }
    }

    fn empty() -> Self {
        Self { sections: vec![Section { text: String::new(), width: 0.0, breaks: false }], width: 0.0, breaks: 0 }
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.sections.len()
    }

    /// Largest uniform scale at which every line fits in `width` × `height`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn actual_scale(&self, width: f64, height: f64, font_size: f64) -> f64 {
        let lines = self.lines().max(1) as f64;
        let sy = height / lines / font_size;
        if self.width > 0.0 { (width / self.width).min(sy) } else { sy }
    }

    /// Actual scale boosted in proportion to the share of clean breaks.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn perceived_scale(&self, width: f64, height: f64, font_size: f64, prefer_breaks: f64) -> f64 {
        let lines = self.lines().max(1) as f64;
        let boost = 1.0 + (prefer_breaks - 1.0) * self.breaks as f64 / lines;
        boost * self.actual_scale(width, height, font_size)
    }
}

/// The layout chosen for a particular draw area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Index into [`TextFlow::layouts`].
    pub layout: usize,
    /// Scale the text is drawn at.
    pub actual_scale: f64,
    /// Score used to choose the layout.
    pub perceived_scale: f64,
}

/// A line positioned in surface pixels, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Left end of the baseline.
    pub origin: Point,
    /// Multiplier applied to the reference font size.
    pub scale: f64,
}

/// A string together with all its candidate layouts.
#[derive(Debug, Clone)]
pub struct TextFlow {
    text: String,
    font_size: f64,
    descent: f64,
    prefer_breaks: f64,
    layouts: Vec<Layout>,
}

impl TextFlow {
    /// Measure `text` and build every candidate layout.
    #[must_use]
    pub fn new(text: &str, measure: &dyn TextMeasure, font_size: f64, prefer_breaks: f64) -> Self {
        let text = text.trim().to_string();
        let layouts = if text.is_empty() { vec![Layout::empty()] } else { candidates(&text, measure, font_size) };
        Self { descent: measure.descent(font_size), text, font_size, prefer_breaks, layouts }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Choose the layout with the highest perceived scale; the first wins ties.
    #[must_use]
    pub fn fit(&self, width: f64, height: f64) -> Fit {
        if self.text.is_empty() {
            return Fit { layout: 0, actual_scale: 1.0, perceived_scale: 1.0 };
        }
        let mut best = Fit { layout: 0, actual_scale: 0.0, perceived_scale: f64::NEG_INFINITY };
        for (i, layout) in self.layouts.iter().enumerate() {
            let perceived = layout.perceived_scale(width, height, self.font_size, self.prefer_breaks);
            if perceived > best.perceived_scale {
                best = Fit {
                    layout: i,
                    actual_scale: layout.actual_scale(width, height, self.font_size),
                    perceived_scale: perceived,
                };
            }
        }
        best
    }

    /// Position the best layout's lines inside `area`.
    ///
    /// Lines are stacked one reference line height apart at the chosen scale;
    /// `align` places each line horizontally and the whole block vertically.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn place(&self, area: Rect, align: Align) -> Vec<PlacedLine> {
        let fit = self.fit(area.width(), area.height());
        let scale = fit.actual_scale;
        let Some(layout) = self.layouts.get(fit.layout) else {
            return Vec::new();
        };
        if self.text.is_empty() || !scale.is_finite() || scale <= 0.0 {
            return Vec::new();
        }

        let lines = layout.lines() as f64;
        let block_leftover = area.height() / scale - lines * self.font_size;
        let jy = align.y.offset(block_leftover) - self.descent;
        layout
            .sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let jx = align.x.offset(area.width() / scale - section.width);
                let baseline = (i + 1) as f64 * self.font_size + jy;
                PlacedLine {
                    text: section.text.clone(),
                    origin: Point::new(area.left + scale * jx, area.top + scale * baseline),
                    scale,
                }
            })
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn candidates(text: &str, measure: &dyn TextMeasure, font_size: f64) -> Vec<Layout> {
    let mut layouts = vec![Layout::new([text], measure, font_size)];
    let total = measure.text_width(text, font_size);

    for k in 1..=MAX_LINES {
        let line_width = total / (k + 1) as f64;
        let forward = split_forward(text, line_width, measure, font_size);
        layouts.push(Layout::new(forward, measure, font_size));
        let spaced = split_at_spaces(text, line_width, measure, font_size);
        layouts.push(Layout::new(spaced, measure, font_size));
    }

    let chunks = whitespace_chunks(text);
    if chunks.len() > 1 && chunks.len() < MAX_LINES {
        for grouping in groupings(&chunks) {
            layouts.push(Layout::new(grouping.iter().map(String::as_str), measure, font_size));
        }
    }
    layouts
}

/// Close a line as soon as it is at least `line_width` wide, wherever that is.
fn split_forward<'a>(text: &'a str, line_width: f64, measure: &dyn TextMeasure, font_size: f64) -> Vec<&'a str> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        let end = i + ch.len_utf8();
        if measure.text_width(&text[start..end], font_size) >= line_width {
            lines.push(&text[start..end]);
            start = end;
        }
    }
    lines.push(&text[start..]);
    lines
}

/// As [`split_forward`], but break after the last whitespace on the line,
/// falling back to a mid-word break when the line has none.
fn split_at_spaces<'a>(text: &'a str, line_width: f64, measure: &dyn TextMeasure, font_size: f64) -> Vec<&'a str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut last_space: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        let end = i + ch.len_utf8();
        if ch.is_whitespace() && i > start {
            last_space = Some(end);
        }
        if measure.text_width(&text[start..end], font_size) >= line_width {
            let cut = last_space.unwrap_or(end);
            lines.push(&text[start..cut]);
            start = cut;
            last_space = None;
        }
    }
    lines.push(&text[start..]);
    lines
}

/// Split after every whitespace character; chunks keep their trailing space.
fn whitespace_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            let end = i + ch.len_utf8();
            chunks.push(&text[start..end]);
            start = end;
        }
    }
    chunks.push(&text[start..]);
    chunks
}

/// Every way of joining consecutive chunks into lines (`2^(n-1)` groupings).
///
/// Bit `j` of the mask set means "start a new line after chunk `j`".
fn groupings(chunks: &[&str]) -> Vec<Vec<String>> {
    let boundaries = chunks.len().saturating_sub(1);
    (0..1usize << boundaries)
        .map(|mask| {
            let mut lines = Vec::new();
            let mut line = String::new();
            for (j, chunk) in chunks.iter().enumerate() {
                line.push_str(chunk);
                if j < boundaries && mask & (1 << j) != 0 {
                    lines.push(std::mem::take(&mut line));
                }
            }
            lines.push(line);
            lines
        })
        .collect()
}
