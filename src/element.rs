//! Drawable elements.
//!
//! Every element is placed by a fractional [`Target`] and resolved to a
//! pixel draw area each frame. The set of element kinds is closed: solid
//! rectangles, text laid out by [`TextFlow`], and images that either glide
//! slowly across their area, rest on a point of interest, or follow the
//! magnifier.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tokio::time::Instant;

use crate::config::{ClampPolicy, Config};
use crate::dispatch::Action;
use crate::geometry::{Align, FracRect, Point, Rect, Size, Target};
use crate::magnify::{cover_placement, Magnifier};
use crate::render::{push_text_lines, DrawCommand, ImageId, Style, StylePair};
use crate::text_flow::TextFlow;

/// Index of an element in its scene, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

// =============================================================================
// Animation
// =============================================================================

/// Periodically grows an element from its target toward `expanse` and back.
///
/// Each period is `delay + duration + restart` seconds long; the element is
/// animated for `duration` seconds after the initial `delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub delay_secs: f64,
    pub duration_secs: f64,
    pub restart_secs: f64,
    /// Fully expanded area as surface fractions.
    pub expanse: FracRect,
    pub started: Instant,
}

impl Animation {
    #[must_use]
    pub fn new(delay_secs: f64, duration_secs: f64, restart_secs: f64, expanse: FracRect, started: Instant) -> Self {
        Self { delay_secs, duration_secs, restart_secs, expanse, started }
    }

    /// How far toward `expanse` the element is at `now`: `sin²(πf)` inside
    /// the active window, else 0.
    #[must_use]
    pub fn active_fraction(&self, now: Instant) -> f64 {
        let period = self.delay_secs + self.duration_secs + self.restart_secs;
        if period <= 0.0 || self.duration_secs <= 0.0 {
            return 0.0;
        }
        let r = now.saturating_duration_since(self.started).as_secs_f64() % period;
        let f = (r - self.delay_secs) / self.duration_secs;
        if (0.0..=1.0).contains(&f) { (f * PI).sin().powi(2) } else { 0.0 }
    }
}

// =============================================================================
// Glide
// =============================================================================

/// Slow drift of an image across the overflow of its draw area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    /// Phase offset in radians, in `[0, π)`.
    pub phase: f64,
    /// Seconds for one sweep across the overflow.
    pub secs: f64,
    pub started: Instant,
}

impl Glide {
    /// A glide with a random phase and a period of `g + g·|n|` for the
    /// configured glide time `g` and a standard normal `n`; screenshot mode
    /// glides slowly and steadily.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &Config, started: Instant) -> Self {
        let phase = rng.random_range(0.0..PI);
        let secs = if config.screenshot_mode {
            config.base_glide_secs()
        } else {
            let g = config.base_glide_secs();
            let n: f64 = StandardNormal.sample(rng);
            g + g * n.abs()
        };
        Self { phase, secs, started }
    }

    /// Position across the overflow at `now`, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self, now: Instant) -> f64 {
        if self.secs <= 0.0 {
            return 0.0;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f64();
        (t / self.secs * PI + self.phase).sin().powi(2)
    }
}

// =============================================================================
// Element
// =============================================================================

/// What an element draws.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Rectangle,
    Text {
        flow: TextFlow,
        align_wide: Align,
        align_tall: Align,
        /// Block drawn behind the text.
        highlight: Option<Style>,
    },
    Image {
        image: ImageId,
        /// Bitmap dimensions in pixels.
        picture: Size,
        glide: Glide,
        /// Fraction of the overflow to show instead of gliding.
        point_of_interest: Option<Point>,
    },
}

/// Frame-wide inputs to [`Element::render`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub surface: Size,
    pub now: Instant,
    /// Apply center-to-center animations.
    pub animate: bool,
    /// Stroke drawn behind text.
    pub outline: Style,
}

#[derive(Clone)]
pub struct Element {
    pub target: Target,
    pub kind: ElementKind,
    pub name: Option<String>,
    /// Invisible elements are neither drawn nor hit.
    pub visible: bool,
    pub tap_action: Option<Action>,
    pub styles: StylePair,
    pub animation: Option<Animation>,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("visible", &self.visible)
            .field("tap_action", &self.tap_action.is_some())
            .field("animation", &self.animation)
            .finish_non_exhaustive()
    }
}

impl Element {
    #[must_use]
    pub fn new(target: Target, kind: ElementKind, styles: StylePair) -> Self {
        Self { target, kind, name: None, visible: true, tap_action: None, styles, animation: None }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_tap_action(mut self, action: Action) -> Self {
        self.tap_action = Some(action);
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image { .. })
    }

    /// Show `point` of an image's overflow, or resume gliding with `None`.
    /// No effect on other kinds.
    pub fn set_point_of_interest(&mut self, point: Option<Point>, policy: ClampPolicy) {
        if let ElementKind::Image { point_of_interest, .. } = &mut self.kind {
            *point_of_interest = point.map(|p| Point::new(policy.apply(p.x), policy.apply(p.y)));
        }
    }

    /// Pixel area on `surface` at `now`.
    #[must_use]
    pub fn draw_area(&self, surface: Size, now: Instant, animate: bool) -> Rect {
        let frac = self.target.select(surface);
        let frac = match (&self.animation, animate) {
            (Some(animation), true) => frac.lerp(&animation.expanse, animation.active_fraction(now)),
            _ => frac,
        };
        frac.resolve(surface)
    }

    /// Visible and its draw area contains `p`.
    #[must_use]
    pub fn hit_test(&self, p: Point, surface: Size, now: Instant, animate: bool) -> bool {
        self.visible && self.draw_area(surface, now, animate).contains(p)
    }

    /// Append this element's draw commands. `magnifier` is the live magnifier
    /// when it is attached to this element.
    pub fn render(&self, out: &mut Vec<DrawCommand>, ctx: &FrameContext, magnifier: Option<&mut Magnifier>) {
        if !self.visible {
            return;
        }
        let area = self.draw_area(ctx.surface, ctx.now, ctx.animate);
        match &self.kind {
            ElementKind::Rectangle => {
                out.push(DrawCommand::Rect { rect: area, style: self.styles.ink });
                out.push(DrawCommand::Rect { rect: area, style: self.styles.accent });
            }
            ElementKind::Text { flow, align_wide, align_tall, highlight } => {
                if let Some(style) = highlight {
                    out.push(DrawCommand::Rect { rect: area, style: *style });
                }
                let align = if ctx.surface.is_wide() { *align_wide } else { *align_tall };
                let lines = flow.place(area, align);
                push_text_lines(out, &lines, flow.font_size(), &self.styles, ctx.outline, area);
            }
            ElementKind::Image { image, picture, glide, point_of_interest } => {
                let placement = match (magnifier, point_of_interest) {
                    (Some(m), _) => m.place(*picture, area),
                    (None, Some(p)) => cover_placement(*picture, area, *p),
                    (None, None) => {
                        let g = glide.fraction(ctx.now);
                        cover_placement(*picture, area, Point::new(g, g))
                    }
                };
                if placement.scale > 0.0 && placement.scale.is_finite() {
                    out.push(DrawCommand::Image { image: *image, origin: placement.origin, scale: placement.scale, clip: area });
                }
            }
        }
    }
}
