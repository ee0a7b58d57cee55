//! Single-finger gesture tracking.
//!
//! A press opens a [`GestureSession`]; drags update it; a release classifies
//! it and closes it. The tracker never runs host code itself: it reports a
//! [`Gesture`] and the scene decides which action that selects.
//!
//! ```text
//! Idle ──press──▶ Pressed ──drag──▶ Dragging
//!   ▲                │                 │
//!   └──release/cancel┴─────────────────┘
//! ```

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::config::{Config, MenuMode};
use crate::geometry::{Point, Size};
use crate::rose::{octant_at, Octant};

/// How a completed press was interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Short press that barely moved.
    Tap { at: Point },
    /// Swipe ending in a rose octant.
    Octant(Octant),
    /// Long press or short swipe that selected nothing.
    Cancelled,
    /// Release over the page menu.
    PageTap { at: Point },
}

/// Everything known about the press in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    /// Where the press started; also the rose center.
    pub origin: Point,
    pub latest: Point,
    pub previous: Point,
    /// Motion between the last two updates.
    pub delta: Point,
    pub pressed_at: Instant,
    /// Time of the last press, drag or release update.
    pub last_move: Instant,
    pub elapsed: Duration,
    /// Straight-line distance from `origin` as a fraction of the surface diagonal.
    pub drag_fraction: f64,
    /// Octant the swipe points into, once it has moved far enough.
    pub octant: Option<Octant>,
}

impl GestureSession {
    fn new(p: Point, now: Instant) -> Self {
        Self {
            origin: p,
            latest: p,
            previous: p,
            delta: Point::default(),
            pressed_at: now,
            last_move: now,
            elapsed: Duration::ZERO,
            drag_fraction: 0.0,
            octant: None,
        }
    }

    fn update(&mut self, p: Point, now: Instant, surface: Size, swipe_fraction: f64) -> Point {
        self.previous = self.latest;
        self.latest = p;
        self.delta = p - self.previous;
        self.last_move = now;
        self.elapsed = now.saturating_duration_since(self.pressed_at);
        let diagonal = surface.diagonal();
        self.drag_fraction = if diagonal > 0.0 { self.origin.distance(p) / diagonal } else { 0.0 };
        self.octant = (self.drag_fraction > swipe_fraction).then(|| octant_at(self.origin, p));
        self.delta
    }

    /// Moved far enough to count as a swipe.
    #[must_use]
    pub fn moved(&self, swipe_fraction: f64) -> bool {
        self.drag_fraction > swipe_fraction
    }

    /// Short enough to count as a tap.
    #[must_use]
    pub fn quick(&self, tap_time_secs: f64) -> bool {
        self.elapsed.as_secs_f64() < tap_time_secs
    }

    /// Seconds the press has lasted as of `now`.
    #[must_use]
    pub fn held_secs(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.pressed_at).as_secs_f64()
    }
}

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed(GestureSession),
    Dragging(GestureSession),
}

/// Press/drag/release state machine.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: GestureState,
    menu_mode: MenuMode,
    swipe_fraction: f64,
    tap_time_secs: f64,
}

impl GestureTracker {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            state: GestureState::Idle,
            menu_mode: config.menu_mode,
            swipe_fraction: config.swipe_fraction,
            tap_time_secs: config.tap_time_secs,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Pressed(s) | GestureState::Dragging(s) => Some(s),
        }
    }

    #[must_use]
    pub fn is_pressing(&self) -> bool {
        self.session().is_some()
    }

    #[must_use]
    pub fn menu_mode(&self) -> MenuMode {
        self.menu_mode
    }

    /// Start a new session, abandoning any session still open.
    pub fn press(&mut self, p: Point, now: Instant) -> GestureSession {
        if self.is_pressing() {
            debug!("press while already pressing; previous gesture dropped");
        }
        let session = GestureSession::new(p, now);
        self.state = GestureState::Pressed(session);
        session
    }

    /// Update the open session and return the motion since the previous
    /// update. Ignored when idle.
    pub fn drag(&mut self, p: Point, now: Instant, surface: Size) -> Option<Point> {
        let swipe = self.swipe_fraction;
        match &mut self.state {
            GestureState::Idle => None,
            GestureState::Pressed(session) => {
                let mut session = *session;
                let delta = session.update(p, now, surface, swipe);
                self.state = GestureState::Dragging(session);
                Some(delta)
            }
            GestureState::Dragging(session) => Some(session.update(p, now, surface, swipe)),
        }
    }

    /// Finish the session at `p` and classify it. `None` when no press was
    /// in progress.
    pub fn release(&mut self, p: Point, now: Instant, surface: Size) -> Option<(Gesture, GestureSession)> {
        self.drag(p, now, surface)?;
        let GestureState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let gesture = self.classify(&session);
        debug!(
            ?gesture,
            elapsed_ms = session.elapsed.as_millis(),
            drag_fraction = session.drag_fraction,
            "gesture classified"
        );
        Some((gesture, session))
    }

    /// Drop the session without classifying it.
    pub fn cancel(&mut self) {
        if self.is_pressing() {
            debug!("gesture cancelled");
        }
        self.state = GestureState::Idle;
    }

    fn classify(&self, session: &GestureSession) -> Gesture {
        let moved = session.moved(self.swipe_fraction);
        if !moved && session.quick(self.tap_time_secs) {
            return Gesture::Tap { at: session.latest };
        }
        match self.menu_mode {
            MenuMode::Rose => match session.octant {
                Some(octant) if moved => Gesture::Octant(octant),
                _ => Gesture::Cancelled,
            },
            MenuMode::Page => Gesture::PageTap { at: session.latest },
            MenuMode::None => Gesture::Cancelled,
        }
    }
}
