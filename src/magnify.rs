//! Image pan and zoom driven by a resting finger.
//!
//! DESIGN
//! ======
//! While the finger rests on a magnified image, a background task polls the
//! pointer every `step_interval`. A finger that has stayed close to where it
//! pressed zooms in around itself; one that has wandered far zooms back out.
//! Dragging pans the image. The scene and the poller share a single
//! [`MagnifyShared`] behind a mutex; the scene writes the pointer, the poller
//! writes the magnification, and the frame reads both.
//!
//! Each zoom step keeps one point of the image fixed on screen. When the
//! finger moves to a new spot, the fixed point is moved so that the pixel
//! under the new spot stays put: with old magnification `M`, step `m`, and the
//! spot `d` away from the old fixed point, the fixed point moves
//! `l = (d - d·m) / (1 - m·M)` toward the spot.
//!
//! LIFECYCLE
//! =========
//! At most one magnifier is live per scene. Activation bumps a generation
//! counter shared with every poller; a poller exits at its next tick once
//! the counter no longer matches the generation it was started with.
//! Dropping the [`MagnifierHandle`] retires it the same way.

#[cfg(test)]
#[path = "magnify_test.rs"]
mod magnify_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::MagnifyConfig;
use crate::consts::FOCUS_MERGE_EPSILON;
use crate::element::ElementId;
use crate::geometry::{Point, Rect, Size};

/// Where and how large to draw a picture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Surface position of the picture's top-left corner.
    pub origin: Point,
    /// Picture pixels to surface pixels.
    pub scale: f64,
}

/// Smallest uniform scale at which `picture` covers `area`.
///
/// Zero when the picture has no extent.
#[must_use]
pub fn cover_scale(picture: Size, area: Rect) -> f64 {
    if picture.width <= 0.0 || picture.height <= 0.0 {
        return 0.0;
    }
    (area.width() / picture.width).abs().max((area.height() / picture.height).abs())
}

/// Place `picture` to cover `area`, showing the part at `fraction` of its
/// overflow: `(0, 0)` shows the top-left, `(1, 1)` the bottom-right.
#[must_use]
pub fn cover_placement(picture: Size, area: Rect, fraction: Point) -> ImagePlacement {
    let scale = cover_scale(picture, area);
    let dx = fraction.x * (picture.width * scale - area.width());
    let dy = fraction.y * (picture.height * scale - area.height());
    ImagePlacement { origin: Point::new(area.left - dx, area.top - dy), scale }
}

/// Pointer state as last reported by the gesture handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSnapshot {
    pub pressing: bool,
    pub position: Point,
    pub last_move: Instant,
    pub drag_fraction: f64,
}

impl PointerSnapshot {
    #[must_use]
    pub fn released(now: Instant) -> Self {
        Self { pressing: false, position: Point::default(), last_move: now, drag_fraction: 0.0 }
    }
}

/// Magnification, fixed point and pan offset of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnifier {
    magnification: f64,
    /// Surface point that stays put while zooming.
    focus: Point,
    /// Pan offset as fractions of the picture size.
    offset: Point,
    last_increase: u64,
    last_decrease: u64,
    config: MagnifyConfig,
}

impl Magnifier {
    /// Built only from a config that has passed [`crate::config::Config::validate`].
    #[must_use]
    pub(crate) fn new(config: MagnifyConfig) -> Self {
        Self {
            magnification: config.min_magnification,
            focus: Point::default(),
            offset: Point::default(),
            last_increase: 0,
            last_decrease: 0,
            config,
        }
    }

    #[must_use]
    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    #[must_use]
    pub fn focus(&self) -> Point {
        self.focus
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Scale magnification by `m` around `focus`, keeping the result within
    /// the configured bounds. Inverted bounds pin it to the maximum.
    pub fn step(&mut self, m: f64, focus: Point) {
        let d = self.focus.distance(focus);
        let denominator = 1.0 - m * self.magnification;
        if d > FOCUS_MERGE_EPSILON && denominator.abs() > f64::EPSILON {
            let l = (d - d * m) / denominator;
            self.focus = self.focus + (focus - self.focus) * (l / d);
        }
        self.magnification =
            (self.magnification * m).max(self.config.min_magnification).min(self.config.max_magnification);
    }

    /// Move the image with a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Point, surface_width: f64) {
        if surface_width <= 0.0 {
            return;
        }
        let k = self.config.movement_scale / surface_width / self.magnification;
        self.offset = self.offset - delta * k;
    }

    /// One poll of the resting pointer. Returns whether magnification changed.
    ///
    /// A step is only taken when the previous tick was also in the same
    /// regime, so a single stray tick never zooms.
    pub fn tick(&mut self, tick: u64, pointer: &PointerSnapshot, now: Instant) -> bool {
        if !pointer.pressing {
            return false;
        }
        let rested = now.saturating_duration_since(pointer.last_move).as_secs_f64();
        if rested <= self.config.wait_secs {
            return false;
        }
        let c = self.config;
        if pointer.drag_fraction < c.max_move_increase {
            let fire = tick == self.last_increase + 1;
            self.last_increase = tick;
            if fire {
                self.step(c.per_step, pointer.position);
            }
            fire
        } else if pointer.drag_fraction > c.min_move_decrease {
            let fire = tick == self.last_decrease + 1;
            self.last_decrease = tick;
            if fire {
                self.step(1.0 / c.per_step, pointer.position);
            }
            fire
        } else {
            false
        }
    }

    /// Place `picture` in `area` at the current magnification.
    ///
    /// If the magnified picture would leave a gap at an edge of `area`, it
    /// is shifted back to that edge and the pan offset is nudged a fraction of
    /// the overshoot so the image springs back over the next few frames.
    pub fn place(&mut self, picture: Size, area: Rect) -> ImagePlacement {
        let scale = cover_scale(picture, area);
        let mg = self.magnification;
        let relax = self.config.over_drag_relax_rate;
        let c = Point::new(
            area.left - self.offset.x * picture.width * scale,
            area.top - self.offset.y * picture.height * scale,
        );
        let magnified = self.focus + (c - self.focus) * mg;

        let (x, bleed_x) = clamp_edge(magnified.x - area.left, picture.width * scale * mg, area.width());
        let (y, bleed_y) = clamp_edge(magnified.y - area.top, picture.height * scale * mg, area.height());
        if picture.width > 0.0 {
            self.offset.x += bleed_x / picture.width / relax;
        }
        if picture.height > 0.0 {
            self.offset.y += bleed_y / picture.height / relax;
        }
        ImagePlacement { origin: Point::new(area.left + x, area.top + y), scale: scale * mg }
    }
}

/// Pull a span starting at `start` with length `span` back inside `0..extent`.
/// Returns the corrected start and the overshoot that was removed.
fn clamp_edge(start: f64, span: f64, extent: f64) -> (f64, f64) {
    let end = start + span - extent;
    if start > 0.0 {
        (0.0, start)
    } else if end < 0.0 {
        (start - end, end)
    } else {
        (start, 0.0)
    }
}

/// State shared between the scene and the poller.
#[derive(Debug, Clone)]
pub struct MagnifyShared {
    pub magnifier: Magnifier,
    pub pointer: PointerSnapshot,
}

/// Owned handle to the live magnifier. Dropping it retires the poller.
#[derive(Debug)]
pub struct MagnifierHandle {
    element: ElementId,
    generation: u64,
    current: Arc<AtomicU64>,
    shared: Arc<Mutex<MagnifyShared>>,
    task: Option<JoinHandle<()>>,
}

impl MagnifierHandle {
    /// Start magnifying `element`, superseding any magnifier that shares
    /// `current`.
    #[must_use]
    pub(crate) fn spawn(
        runtime: &Handle,
        current: Arc<AtomicU64>,
        element: ElementId,
        config: MagnifyConfig,
        pointer: PointerSnapshot,
    ) -> Self {
        let generation = current.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = Arc::new(Mutex::new(MagnifyShared { magnifier: Magnifier::new(config), pointer }));
        let task = runtime.spawn(poll(Arc::clone(&shared), Arc::clone(&current), generation, config));
        info!(generation, element = element.0, "magnifier activated");
        Self { element, generation, current, shared, task: Some(task) }
    }

    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Still the scene's live magnifier.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Run `f` with the shared state locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut MagnifyShared) -> R) -> R {
        let mut guard = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Retire the magnifier, returning its poller so callers can wait for it.
    pub fn retire(mut self) -> Option<JoinHandle<()>> {
        self.task.take()
    }
}

impl Drop for MagnifierHandle {
    fn drop(&mut self) {
        let next = self.generation + 1;
        if self.current.compare_exchange(self.generation, next, Ordering::SeqCst, Ordering::SeqCst).is_ok() {
            info!(generation = self.generation, element = self.element.0, "magnifier retired");
        }
    }
}

async fn poll(shared: Arc<Mutex<MagnifyShared>>, current: Arc<AtomicU64>, generation: u64, config: MagnifyConfig) {
    let mut interval = tokio::time::interval(config.step_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    let mut tick: u64 = 0;
    loop {
        interval.tick().await;
        if current.load(Ordering::SeqCst) != generation {
            debug!(generation, "magnifier poller exiting");
            return;
        }
        tick += 1;
        let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let pointer = guard.pointer;
        guard.magnifier.tick(tick, &pointer, Instant::now());
    }
}
