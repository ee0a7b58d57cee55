//! Shared numeric constants for the scene, rose, and text layout.

use std::f64::consts::PI;

// ── Octants ─────────────────────────────────────────────────────

/// Number of angular sectors in the compass rose.
pub const OCTANTS: usize = 8;

/// π / 4 (45°), the angular width of one octant.
pub const OCTANT_ANGLE: f64 = PI / 4.0;

/// π / 8 (22.5°), half the angular width of one octant.
pub const HALF_OCTANT_ANGLE: f64 = PI / 8.0;

// ── Text layout ─────────────────────────────────────────────────

/// Number of width-threshold passes: pass `k` in `1..=MAX_LINES` aims for
/// lines of `total / (k + 1)`, so these candidates run to about ten lines.
/// Whitespace groupings are only enumerated for fewer chunks than this (at
/// most `2^7` groupings).
pub const MAX_LINES: usize = 9;

// ── Rose geometry ───────────────────────────────────────────────

/// Label box edge length relative to the rose radius: two thirds of the
/// chord subtended by one octant.
pub const ROSE_LABEL_FRACTION: f64 = 2.0 / 3.0;

// ── Page menu ───────────────────────────────────────────────────

/// Columns and rows in the flattened page menu.
pub const PAGE_GRID: usize = 3;

/// Inset of each page-menu cell, as a fraction of the cell size.
pub const PAGE_CELL_BORDER: f64 = 0.10;

/// Label of the center page-menu cell.
pub const PAGE_BACK_LABEL: &str = "back";

// ── Magnifier ───────────────────────────────────────────────────

/// Below this distance two centers of expansion are treated as one.
pub const FOCUS_MERGE_EPSILON: f64 = 1e-6;
