//! The scene: elements, command rose, handlers and the live magnifier.
//!
//! A host feeds the scene touch events and asks it for a display list each
//! frame. Everything that runs host code goes through the [`Dispatcher`], so
//! no host action ever runs on the caller's thread.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, ConfigError, MenuMode};
use crate::dispatch::{Action, Dispatcher};
use crate::element::{Element, ElementId, ElementKind, FrameContext, Glide};
use crate::geometry::{Align, Point, Quadrant, Size, Target};
use crate::gesture::{Gesture, GestureSession, GestureTracker};
use crate::magnify::{MagnifierHandle, PointerSnapshot};
use crate::render::{DrawCommand, ImageId, Renderer, Rgba, Style, StylePair, TextMeasure, ThemeProvider};
use crate::rose::{rose_radius, Command, CompassRose, Octant, PageMenu, PageTap};
use crate::text_flow::TextFlow;

/// Identity of a scene, used to tell a reshow from a new show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(pub Uuid);

/// Page menu shown in place of the rose in [`MenuMode::Page`].
#[derive(Debug, Default)]
struct PageMenuState {
    /// Built on first use; `None` means it must be rebuilt from the rose.
    menu: Option<PageMenu>,
    active: bool,
}

pub struct Scene {
    id: SceneId,
    config: Config,
    elements: Vec<Element>,
    rose: CompassRose,
    rose_styles: StylePair,
    page: PageMenuState,
    measure: Arc<dyn TextMeasure>,
    theme: Box<dyn ThemeProvider>,
    runtime: Handle,
    dispatcher: Dispatcher,
    magnifier_generation: Arc<AtomicU64>,
    magnifier: Option<MagnifierHandle>,
    tracker: GestureTracker,
    /// Size of the last frame; drag fractions and pans are measured against it.
    surface: Size,
    /// Element under the most recent press.
    pressed: Option<ElementId>,
    background: Rgba,
    outline: Style,
    user_tapped: Option<Action>,
    user_tapped_stack: Vec<Option<Action>>,
    no_command: Option<Action>,
    cancelled: Option<Action>,
    on_show: Option<Action>,
    shown: u64,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("elements", &self.elements.len())
            .field("commands", &self.rose.count())
            .field("surface", &self.surface)
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Build an empty scene. Actions and the magnifier run on `runtime`.
    pub fn new(
        config: Config,
        measure: Arc<dyn TextMeasure>,
        mut theme: Box<dyn ThemeProvider>,
        runtime: Handle,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let dispatcher = Dispatcher::spawn(&runtime, config.dispatch_queue_capacity);
        let id = SceneId(Uuid::new_v4());
        info!(scene = %id.0, menu_mode = ?config.menu_mode, "scene created");
        Ok(Self {
            id,
            rose_styles: theme.pair(),
            outline: Style::outline(Rgba::BLACK, config.text_stroke_width),
            tracker: GestureTracker::new(&config),
            config,
            elements: Vec::new(),
            rose: CompassRose::new(),
            page: PageMenuState::default(),
            measure,
            theme,
            runtime,
            dispatcher,
            magnifier_generation: Arc::new(AtomicU64::new(0)),
            magnifier: None,
            surface: Size::default(),
            pressed: None,
            background: Rgba::BLACK,
            user_tapped: None,
            user_tapped_stack: Vec::new(),
            no_command: None,
            cancelled: None,
            on_show: None,
            shown: 0,
        })
    }

    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Times this scene has been newly shown.
    #[must_use]
    pub fn shown(&self) -> u64 {
        self.shown
    }

    pub fn set_background(&mut self, color: Rgba) {
        self.background = color;
    }

    // --- Elements ---

    /// Add an element as built by the caller.
    pub fn add(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn add_rectangle(&mut self, target: Target) -> ElementId {
        let styles = self.theme.pair();
        self.add(Element::new(target, ElementKind::Rectangle, styles))
    }

    pub fn add_text(&mut self, text: &str, target: Target, align_wide: Align, align_tall: Align) -> ElementId {
        let flow = TextFlow::new(
            text,
            self.measure.as_ref(),
            self.config.reference_font_size,
            self.config.prefer_breaks_factor,
        );
        let styles = self.theme.pair();
        self.add(Element::new(target, ElementKind::Text { flow, align_wide, align_tall, highlight: None }, styles))
    }

    /// Text in a screen quadrant, pushed toward the outer corner on wide surfaces.
    pub fn add_text_in_quadrant(&mut self, text: &str, quadrant: Quadrant) -> ElementId {
        self.add_text(text, quadrant.target(), quadrant.wide_align(), Align::CENTER)
    }

    pub fn add_image(&mut self, image: ImageId, picture: Size, target: Target) -> ElementId {
        let glide = Glide::random(&mut rand::rng(), &self.config, Instant::now());
        let styles = self.theme.pair();
        let kind = ElementKind::Image { image, picture, glide, point_of_interest: None };
        self.add(Element::new(target, kind, styles))
    }

    pub fn add_image_in_quadrant(&mut self, image: ImageId, picture: Size, quadrant: Quadrant) -> ElementId {
        self.add_image(image, picture, quadrant.target())
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Show a fixed part of an image, or resume its glide with `None`.
    pub fn set_point_of_interest(&mut self, id: ElementId, point: Option<Point>) {
        let policy = self.config.clamp_policy;
        if let Some(element) = self.elements.get_mut(id.0) {
            element.set_point_of_interest(point, policy);
        }
    }

    /// First visible element containing `p`.
    #[must_use]
    pub fn element_at(&self, p: Point, now: Instant) -> Option<ElementId> {
        self.find(p, now, |_| true)
    }

    /// First visible, named element containing `p`.
    #[must_use]
    pub fn element_with_name_at(&self, p: Point, now: Instant) -> Option<ElementId> {
        self.find(p, now, |e| e.name.is_some())
    }

    /// First visible element with a tap action containing `p`.
    #[must_use]
    pub fn element_with_tap_at(&self, p: Point, now: Instant) -> Option<ElementId> {
        self.find(p, now, |e| e.tap_action.is_some())
    }

    fn find(&self, p: Point, now: Instant, accept: impl Fn(&Element) -> bool) -> Option<ElementId> {
        let animate = !self.magnifying();
        self.elements
            .iter()
            .position(|e| accept(e) && e.hit_test(p, self.surface, now, animate))
            .map(ElementId)
    }

    // --- Commands and handlers ---

    /// Bind a command to `octant`, replacing any command already there.
    pub fn bind_command(&mut self, octant: Octant, label: &str, action: Action, sub_menu: bool) {
        let command = Command::new(label, action, self.measure.as_ref(), &self.config).with_sub_menu(sub_menu);
        self.rose.bind(octant, command);
    }

    /// Like [`Scene::bind_command`], with the label drawn in `styles` on the
    /// rose and in the page menu.
    pub fn bind_styled_command(&mut self, octant: Octant, label: &str, action: Action, sub_menu: bool, styles: StylePair) {
        let command = Command::new(label, action, self.measure.as_ref(), &self.config)
            .with_sub_menu(sub_menu)
            .with_styles(styles);
        self.rose.bind(octant, command);
    }

    pub fn clear_commands(&mut self) {
        self.rose.clear();
        self.page = PageMenuState::default();
    }

    #[must_use]
    pub fn rose(&self) -> &CompassRose {
        &self.rose
    }

    /// Replace the handler run when a tap hits no element with a tap action.
    pub fn set_user_tapped(&mut self, action: Option<Action>) {
        self.user_tapped = action;
    }

    /// Install a tap handler, remembering the current one.
    pub fn push_user_tapped(&mut self, action: Action) {
        self.user_tapped_stack.push(self.user_tapped.replace(action));
    }

    /// Restore the tap handler saved by the last push, if any.
    pub fn pop_user_tapped(&mut self) {
        if let Some(previous) = self.user_tapped_stack.pop() {
            self.user_tapped = previous;
        }
    }

    /// Run when a swipe ends in an octant with no command.
    pub fn set_no_command_handler(&mut self, action: Option<Action>) {
        self.no_command = action;
    }

    /// Run when a press is neither a tap nor a completed swipe.
    pub fn set_cancelled_handler(&mut self, action: Option<Action>) {
        self.cancelled = action;
    }

    /// Run when this scene is newly shown.
    pub fn set_on_show(&mut self, action: Option<Action>) {
        self.on_show = action;
    }

    // --- Magnifier ---

    /// Start magnifying the image `id`, retiring any previous magnifier.
    /// Returns false if `id` is not an image.
    pub fn activate_magnifier(&mut self, id: ElementId) -> bool {
        if !self.elements.get(id.0).is_some_and(Element::is_image) {
            warn!(element = id.0, "magnifier requested for a non-image element");
            return false;
        }
        self.retire_magnifier();
        let pointer = self.pointer_snapshot(true, Instant::now());
        self.magnifier = Some(MagnifierHandle::spawn(
            &self.runtime,
            Arc::clone(&self.magnifier_generation),
            id,
            self.config.magnify,
            pointer,
        ));
        true
    }

    /// Magnify the first image under `p`.
    pub fn activate_magnifier_at(&mut self, p: Point, now: Instant) -> Option<ElementId> {
        let id = self.find(p, now, Element::is_image)?;
        self.activate_magnifier(id).then_some(id)
    }

    /// Stop the live magnifier. The returned task finishes once the poller
    /// has noticed.
    pub fn retire_magnifier(&mut self) -> Option<JoinHandle<()>> {
        self.magnifier.take().and_then(MagnifierHandle::retire)
    }

    /// Current magnification, when a magnifier is live.
    #[must_use]
    pub fn magnification(&self) -> Option<f64> {
        self.magnifier.as_ref().map(|h| h.with(|s| s.magnifier.magnification()))
    }

    fn magnifying(&self) -> bool {
        self.magnifier.as_ref().is_some_and(MagnifierHandle::is_current)
    }

    fn pointer_snapshot(&self, pressing: bool, now: Instant) -> PointerSnapshot {
        match self.tracker.session() {
            Some(s) => PointerSnapshot {
                pressing,
                position: s.latest,
                last_move: s.last_move,
                drag_fraction: s.drag_fraction,
            },
            None => PointerSnapshot::released(now),
        }
    }

    fn sync_pointer(&self, session: &GestureSession, pressing: bool) {
        if let Some(handle) = &self.magnifier {
            let pointer = PointerSnapshot {
                pressing,
                position: session.latest,
                last_move: session.last_move,
                drag_fraction: session.drag_fraction,
            };
            handle.with(|s| s.pointer = pointer);
        }
    }

    fn pan(&self, delta: Point) {
        if let Some(handle) = &self.magnifier {
            let width = self.surface.width;
            handle.with(|s| s.magnifier.pan(delta, width));
        }
    }

    // --- Touch input ---

    pub fn press(&mut self, x: f64, y: f64) {
        self.press_at(x, y, Instant::now());
    }

    pub fn drag(&mut self, x: f64, y: f64) {
        self.drag_at(x, y, Instant::now());
    }

    pub fn release(&mut self, x: f64, y: f64) -> Option<Gesture> {
        self.release_at(x, y, Instant::now())
    }

    pub fn press_at(&mut self, x: f64, y: f64, now: Instant) {
        self.pressed = self.element_at(Point::new(x, y), now);
        let session = self.tracker.press(Point::new(x, y), now);
        self.sync_pointer(&session, true);
    }

    pub fn drag_at(&mut self, x: f64, y: f64, now: Instant) {
        let Some(delta) = self.tracker.drag(Point::new(x, y), now, self.surface) else {
            return;
        };
        if let Some(session) = self.tracker.session().copied() {
            self.sync_pointer(&session, true);
        }
        self.pan(delta);
        self.refresh_page_menu(now);
    }

    /// Finish the press at `(x, y)` and dispatch whatever it selected.
    /// `None` when no press was in progress.
    pub fn release_at(&mut self, x: f64, y: f64, now: Instant) -> Option<Gesture> {
        self.refresh_page_menu(now);
        let (gesture, session) = self.tracker.release(Point::new(x, y), now, self.surface)?;
        self.pan(session.delta);
        self.sync_pointer(&session, false);
        self.handle(gesture, now);
        Some(gesture)
    }

    /// Element that was under the most recent press, if any. Kept after the
    /// release until the next press.
    #[must_use]
    pub fn pressed_element(&self) -> Option<ElementId> {
        self.pressed
    }

    /// Abandon the press in progress without running anything.
    pub fn cancel_gesture(&mut self) {
        if let Some(session) = self.tracker.session().copied() {
            self.sync_pointer(&session, false);
        }
        self.tracker.cancel();
    }

    fn handle(&mut self, gesture: Gesture, now: Instant) {
        match gesture {
            Gesture::Tap { at } => {
                // the page menu covers the scene while it is up
                let action = if self.page.active {
                    if self.tap_page_menu(at) {
                        return;
                    }
                    self.user_tapped.clone()
                } else {
                    self.element_with_tap_at(at, now)
                        .and_then(|id| self.elements[id.0].tap_action.clone())
                        .or_else(|| self.user_tapped.clone())
                };
                self.dispatcher.dispatch(action.as_ref());
            }
            Gesture::Octant(octant) => {
                let action = match self.rose.command(octant) {
                    Some(command) => Some(command.action.clone()),
                    None => self.no_command.clone(),
                };
                self.dispatcher.dispatch(action.as_ref());
            }
            Gesture::Cancelled => {
                self.dispatcher.dispatch(self.cancelled.as_ref());
            }
            Gesture::PageTap { at } => {
                if self.page.active {
                    self.tap_page_menu(at);
                }
            }
        }
    }

    // --- Page menu ---

    #[must_use]
    pub fn page_menu_active(&self) -> bool {
        self.page.active
    }

    /// Show the page menu once a press has outlasted a tap, and rebuild it
    /// when a sub-menu command has left it stale.
    fn refresh_page_menu(&mut self, now: Instant) {
        if self.config.menu_mode != MenuMode::Page || self.rose.count() == 0 {
            return;
        }
        let long_press = self.tracker.session().is_some_and(|s| s.held_secs(now) > self.config.tap_time_secs);
        if long_press && !self.page.active {
            debug!(commands = self.rose.count(), "page menu shown");
            self.page.active = true;
        }
        if self.page.active && self.page.menu.is_none() {
            self.page.menu = Some(self.rose.build_page_menu(self.measure.as_ref(), &self.config));
        }
    }

    /// Returns whether the tap landed on a page menu cell.
    fn tap_page_menu(&mut self, at: Point) -> bool {
        let Some(tap) = self.page.menu.as_ref().and_then(|m| m.tap(at, self.surface)) else {
            return false;
        };
        match tap {
            PageTap::Back => {
                debug!("page menu dismissed");
                self.page.active = false;
            }
            PageTap::Command { octant, action, sub_menu } => {
                debug!(octant = octant.index(), sub_menu, "page menu command");
                self.dispatcher.dispatch(Some(&action));
                // rebuilt from the rose on next use, after the action has bound its commands
                self.page.menu = None;
                self.page.active = sub_menu;
            }
        }
        true
    }

    // --- Rendering ---

    /// Display list for a surface of `surface` at `now`.
    pub fn frame(&mut self, surface: Size, now: Instant) -> Vec<DrawCommand> {
        self.surface = surface;
        self.refresh_page_menu(now);
        let magnifying = self.magnifying();
        let ctx = FrameContext { surface, now, animate: !magnifying, outline: self.outline };

        let mut out = vec![DrawCommand::Clear { color: self.background }];
        let order: Vec<usize> = if magnifying {
            (0..self.elements.len()).collect()
        } else {
            let (animated, still): (Vec<usize>, Vec<usize>) = (0..self.elements.len())
                .partition(|&i| self.elements[i].animation.is_some_and(|a| a.active_fraction(now) > 0.0));
            still.into_iter().chain(animated).collect()
        };
        for i in order {
            let element = &self.elements[i];
            match &self.magnifier {
                Some(handle) if handle.element() == ElementId(i) && magnifying => {
                    handle.with(|s| element.render(&mut out, &ctx, Some(&mut s.magnifier)));
                }
                _ => element.render(&mut out, &ctx, None),
            }
        }

        self.render_overlay(&mut out, now);
        out
    }

    fn render_overlay(&self, out: &mut Vec<DrawCommand>, now: Instant) {
        if let Some(session) = self.tracker.session() {
            let held = session.held_secs(now);
            if self.config.menu_mode == MenuMode::Rose
                && self.rose.count() > 0
                && held >= self.config.tap_time_secs
            {
                let radius = rose_radius(self.surface, held, self.config.rose_grow_secs);
                self.rose.render(out, session.origin, radius, &self.rose_styles, self.outline, session.octant);
            }
        }
        if self.page.active {
            if let Some(menu) = &self.page.menu {
                let pointer = self.tracker.session().map(|s| s.latest);
                menu.render(out, self.surface, pointer, &self.rose_styles, self.outline);
            }
        }
    }

    /// Compose a frame for `surface` and hand it to `renderer`.
    pub fn draw(&mut self, surface: Size, renderer: &mut dyn Renderer) {
        for command in self.frame(surface, Instant::now()) {
            renderer.execute(&command);
        }
    }
}

/// Remembers which scene was shown last.
#[derive(Debug, Default)]
pub struct ShowTracker {
    last: Option<SceneId>,
}

impl ShowTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `scene` is being shown. A scene shown after a different
    /// one counts as a new show and runs its `on_show` action; a repeat does
    /// nothing. Returns whether this was a new show.
    pub fn show(&mut self, scene: &mut Scene) -> bool {
        if self.last == Some(scene.id) {
            return false;
        }
        self.last = Some(scene.id);
        scene.shown += 1;
        debug!(scene = %scene.id.0, shown = scene.shown, "scene shown");
        scene.dispatcher.dispatch(scene.on_show.as_ref());
        true
    }
}
