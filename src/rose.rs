//! Compass rose: up to eight commands arranged around the press point.
//!
//! Octant 0 points straight up the screen and the numbering steps 45° at a
//! time through up-left, left, down-left, down, down-right, right and
//! up-right. A swipe selects the octant whose vertex, at the swipe's own
//! radius, lies nearest the release point.
//!
//! When the host prefers a flat menu the same bindings are shown as a 3×3
//! page whose outer cells sit in each octant's compass direction, with a
//! "back" cell in the middle.

#[cfg(test)]
#[path = "rose_test.rs"]
mod rose_test;

use std::f64::consts::FRAC_PI_2;

use crate::config::Config;
use crate::consts::{HALF_OCTANT_ANGLE, OCTANT_ANGLE, OCTANTS, PAGE_BACK_LABEL, PAGE_CELL_BORDER, PAGE_GRID, ROSE_LABEL_FRACTION};
use crate::dispatch::Action;
use crate::geometry::{Align, FracRect, Justify, Point, Rect, Size};
use crate::render::{push_text_lines, DrawCommand, Rgba, Style, StylePair, TextMeasure};
use crate::text_flow::TextFlow;

// =============================================================================
// Octant
// =============================================================================

/// One of the eight rose sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Octant(u8);

impl Octant {
    pub const ALL: [Octant; OCTANTS] =
        [Octant(0), Octant(1), Octant(2), Octant(3), Octant(4), Octant(5), Octant(6), Octant(7)];

    /// Octant for an index, wrapping modulo 8.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(index: usize) -> Self {
        Octant((index % OCTANTS) as u8)
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Angle of the octant's vertex in radians, on a y-down surface.
    #[must_use]
    pub fn angle(self) -> f64 {
        -FRAC_PI_2 - f64::from(self.0) * OCTANT_ANGLE
    }

    /// Unit vector toward the octant's vertex.
    #[must_use]
    pub fn direction(self) -> Point {
        let a = self.angle();
        Point::new(a.cos(), a.sin())
    }

    /// Column and row of this octant's cell in the page menu.
    #[must_use]
    pub fn page_cell(self) -> (usize, usize) {
        match self.0 {
            0 => (1, 0),
            1 => (0, 0),
            2 => (0, 1),
            3 => (0, 2),
            4 => (1, 2),
            5 => (2, 2),
            6 => (2, 1),
            _ => (2, 0),
        }
    }

    /// Even octants point along an axis, odd ones along a diagonal.
    fn is_cardinal(self) -> bool {
        self.0 % 2 == 0
    }
}

/// Vertex of `octant` at distance `radius` from `origin`.
#[must_use]
pub fn vertex(origin: Point, octant: Octant, radius: f64) -> Point {
    origin + octant.direction() * radius
}

/// The octant whose vertex at radius `|point - origin|` is nearest `point`.
/// Ties keep the lower index.
#[must_use]
pub fn octant_at(origin: Point, point: Point) -> Octant {
    let r = origin.distance(point);
    let mut nearest = Octant(0);
    let mut best = vertex(origin, nearest, r).distance(point);
    for octant in &Octant::ALL[1..] {
        let d = vertex(origin, *octant, r).distance(point);
        if d < best {
            best = d;
            nearest = *octant;
        }
    }
    nearest
}

/// Radius of the rose after it has been growing for `elapsed` seconds.
#[must_use]
pub fn rose_radius(surface: Size, elapsed: f64, grow_secs: f64) -> f64 {
    let f = if grow_secs > 0.0 { (elapsed / grow_secs).clamp(0.0, 1.0) } else { 1.0 };
    surface.min_side() / 2.0 * (FRAC_PI_2 * f).sin()
}

// =============================================================================
// Commands
// =============================================================================

/// A command bound to one octant.
#[derive(Clone)]
pub struct Command {
    pub label: String,
    pub flow: TextFlow,
    pub action: Action,
    /// Choosing the command opens a further menu.
    pub sub_menu: bool,
    /// Overrides the rose's own styles for this label.
    pub styles: Option<StylePair>,
}

impl Command {
    #[must_use]
    pub fn new(label: &str, action: Action, measure: &dyn TextMeasure, config: &Config) -> Self {
        Self {
            label: label.to_string(),
            flow: TextFlow::new(label, measure, config.reference_font_size, config.prefer_breaks_factor),
            action,
            sub_menu: false,
            styles: None,
        }
    }

    #[must_use]
    pub fn with_sub_menu(mut self, sub_menu: bool) -> Self {
        self.sub_menu = sub_menu;
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: StylePair) -> Self {
        self.styles = Some(styles);
        self
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("label", &self.label)
            .field("sub_menu", &self.sub_menu)
            .finish_non_exhaustive()
    }
}

/// Eight command slots plus a count of binds since the last clear.
#[derive(Debug, Default)]
pub struct CompassRose {
    commands: [Option<Command>; OCTANTS],
    active: usize,
}

impl CompassRose {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `command` in `octant`, replacing what was there.
    ///
    /// The count goes up on every bind, including a rebind of an occupied
    /// slot; hosts bind each slot once between clears.
    pub fn bind(&mut self, octant: Octant, command: Command) {
        self.commands[octant.index()] = Some(command);
        self.active += 1;
    }

    pub fn clear(&mut self) {
        self.commands = Default::default();
        self.active = 0;
    }

    /// Binds since the last clear.
    #[must_use]
    pub fn count(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn command(&self, octant: Octant) -> Option<&Command> {
        self.commands[octant.index()].as_ref()
    }

    /// Bound commands in octant order.
    pub fn commands(&self) -> impl Iterator<Item = (Octant, &Command)> {
        Octant::ALL.into_iter().zip(self.commands.iter()).filter_map(|(o, c)| c.as_ref().map(|c| (o, c)))
    }

    /// Draw the rose centered on `center`: eight segments in alternating
    /// styles, then each bound command's label with the `selected` one
    /// highlighted.
    pub fn render(
        &self,
        out: &mut Vec<DrawCommand>,
        center: Point,
        radius: f64,
        styles: &StylePair,
        outline: Style,
        selected: Option<Octant>,
    ) {
        if radius <= 0.0 {
            return;
        }
        for octant in Octant::ALL {
            let a = octant.angle();
            let left = a - HALF_OCTANT_ANGLE;
            let right = a + HALF_OCTANT_ANGLE;
            let style = if octant.is_cardinal() { styles.ink } else { styles.accent };
            out.push(DrawCommand::Path {
                points: vec![
                    center,
                    center + Point::new(left.cos(), left.sin()) * radius,
                    center + Point::new(right.cos(), right.sin()) * radius,
                ],
                style,
            });
        }

        for (octant, command) in self.commands() {
            let (area, align) = label_box(center, radius, octant);
            if selected == Some(octant) {
                out.push(DrawCommand::Rect { rect: area, style: Style::fill(Rgba::HIGHLIGHT) });
            }
            let lines = command.flow.place(area, align);
            let styles = command.styles.as_ref().unwrap_or(styles);
            push_text_lines(out, &lines, command.flow.font_size(), styles, outline, area);
        }
    }

    /// Flatten the bindings into a page menu.
    #[must_use]
    pub fn build_page_menu(&self, measure: &dyn TextMeasure, config: &Config) -> PageMenu {
        let flow = |label: &str| TextFlow::new(label, measure, config.reference_font_size, config.prefer_breaks_factor);
        let mut cells = vec![PageCell {
            area: page_cell_area(1, 1),
            label: PAGE_BACK_LABEL.to_string(),
            flow: flow(PAGE_BACK_LABEL),
            styles: None,
            entry: PageEntry::Back,
        }];
        for (octant, command) in self.commands() {
            let (col, row) = octant.page_cell();
            cells.push(PageCell {
                area: page_cell_area(col, row),
                label: command.label.clone(),
                flow: command.flow.clone(),
                styles: command.styles,
                entry: PageEntry::Command { octant, action: command.action.clone(), sub_menu: command.sub_menu },
            });
        }
        PageMenu { cells }
    }
}

/// Square label box for `octant`'s command and the justification of its text.
///
/// Axis labels sit just inside the rose's inner radius, justified toward the
/// vertex; diagonal labels are centered on it.
fn label_box(center: Point, radius: f64, octant: Octant) -> (Rect, Align) {
    let side = radius * 2.0 * HALF_OCTANT_ANGLE.sin() * ROSE_LABEL_FRACTION;
    let dir = octant.direction();
    let attach = center + dir * (radius * HALF_OCTANT_ANGLE.cos());
    let mid = if octant.is_cardinal() { attach - dir * (side / 2.0) } else { attach };
    let half = side / 2.0;
    let area = Rect::new(mid.x - half, mid.y - half, mid.x + half, mid.y + half);
    let align = if octant.is_cardinal() { Align::new(toward(dir.x), toward(dir.y)) } else { Align::CENTER };
    (area, align)
}

fn toward(component: f64) -> Justify {
    if component > 0.5 {
        Justify::End
    } else if component < -0.5 {
        Justify::Start
    } else {
        Justify::Center
    }
}

// =============================================================================
// Page menu
// =============================================================================

#[allow(clippy::cast_precision_loss)]
fn page_cell_area(col: usize, row: usize) -> FracRect {
    let cell = 1.0 / PAGE_GRID as f64;
    let inset = cell * PAGE_CELL_BORDER;
    let x = col as f64 * cell;
    let y = row as f64 * cell;
    FracRect::new(x + inset, y + inset, x + cell - inset, y + cell - inset)
}

/// What a page-menu cell does when tapped.
#[derive(Clone)]
pub enum PageEntry {
    Back,
    Command { octant: Octant, action: Action, sub_menu: bool },
}

/// Result of tapping the page menu.
pub type PageTap = PageEntry;

impl std::fmt::Debug for PageEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Back => f.write_str("Back"),
            Self::Command { octant, sub_menu, .. } => f
                .debug_struct("Command")
                .field("octant", octant)
                .field("sub_menu", sub_menu)
                .finish_non_exhaustive(),
        }
    }
}

/// One labelled cell.
#[derive(Debug, Clone)]
pub struct PageCell {
    pub area: FracRect,
    pub label: String,
    pub flow: TextFlow,
    pub styles: Option<StylePair>,
    pub entry: PageEntry,
}

/// A full-surface grid standing in for the rose.
#[derive(Debug, Clone)]
pub struct PageMenu {
    cells: Vec<PageCell>,
}

impl PageMenu {
    #[must_use]
    pub fn cells(&self) -> &[PageCell] {
        &self.cells
    }

    /// Cell under `point`, if any. Cell borders belong to no cell.
    #[must_use]
    pub fn cell_at(&self, point: Point, surface: Size) -> Option<&PageCell> {
        self.cells.iter().find(|c| c.area.resolve(surface).contains(point))
    }

    /// Resolve a tap at `point`.
    #[must_use]
    pub fn tap(&self, point: Point, surface: Size) -> Option<PageTap> {
        self.cell_at(point, surface).map(|c| c.entry.clone())
    }

    /// Draw every cell, filling the one under `pointer` behind its label.
    pub fn render(
        &self,
        out: &mut Vec<DrawCommand>,
        surface: Size,
        pointer: Option<Point>,
        styles: &StylePair,
        outline: Style,
    ) {
        for cell in &self.cells {
            let area = cell.area.resolve(surface);
            if pointer.is_some_and(|p| area.contains(p)) {
                out.push(DrawCommand::Rect { rect: area, style: Style::fill(Rgba::WHITE) });
            }
            let lines = cell.flow.place(area, Align::CENTER);
            let styles = cell.styles.as_ref().unwrap_or(styles);
            push_text_lines(out, &lines, cell.flow.font_size(), styles, outline, area);
        }
    }
}
