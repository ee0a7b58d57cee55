//! Tuning and presentation settings.
//!
//! All settings are plain values fixed at scene construction. They can be
//! taken from [`Config::default`], parsed from JSON, or read from
//! `ROSECANVAS_*` environment variables (unset or unparseable numeric values
//! fall back to their defaults).

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SWIPE_FRACTION: f64 = 1.0 / 64.0;
pub const DEFAULT_TAP_TIME_SECS: f64 = 0.25;
pub const DEFAULT_ROSE_GROW_SECS: f64 = 5.0;
pub const DEFAULT_PREFER_BREAKS_FACTOR: f64 = 1.2;
pub const DEFAULT_REFERENCE_FONT_SIZE: f64 = 128.0;
pub const DEFAULT_TEXT_STROKE_WIDTH: f64 = 8.0;
pub const DEFAULT_GLIDE_SECS: f64 = 10.0;
pub const SCREENSHOT_GLIDE_SECS: f64 = 40.0;
pub const DEFAULT_DISPATCH_QUEUE_CAPACITY: usize = 64;

pub const DEFAULT_MAGNIFY_STEP_MS: u64 = 10;
pub const DEFAULT_MAGNIFY_WAIT_SECS: f64 = 1.0;
pub const DEFAULT_MAGNIFY_PER_STEP: f64 = 1.005;
pub const DEFAULT_MIN_MAGNIFICATION: f64 = 1.0;
pub const DEFAULT_MAX_MAGNIFICATION: f64 = 4.0;
pub const DEFAULT_MAX_MOVE_INCREASE: f64 = 1.0 / 64.0;
pub const DEFAULT_MIN_MOVE_DECREASE: f64 = 1.0 / 16.0;
pub const DEFAULT_MOVEMENT_SCALE: f64 = 4.0;
pub const DEFAULT_OVER_DRAG_RELAX_RATE: f64 = 8.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown menu mode '{0}' (expected 'rose', 'page' or 'none')")]
    MenuMode(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the compass rose commands are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuMode {
    /// Radial menu around the press point, selected by swiping.
    #[default]
    Rose,
    /// A 3×3 grid of commands shown after a long press.
    Page,
    /// Commands are never presented.
    None,
}

impl MenuMode {
    /// Parse a mode name, falling back to `default` when absent or unknown.
    #[must_use]
    pub fn parse_or(raw: Option<&str>, default: MenuMode) -> MenuMode {
        match raw.map(str::parse::<MenuMode>) {
            Some(Ok(mode)) => mode,
            _ => default,
        }
    }
}

impl FromStr for MenuMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rose" => Ok(Self::Rose),
            "page" => Ok(Self::Page),
            "none" => Ok(Self::None),
            other => Err(ConfigError::MenuMode(other.to_string())),
        }
    }
}

/// Whether fractional coordinates supplied by the host are clamped to `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    #[default]
    PassThrough,
    Clamp,
}

impl ClampPolicy {
    #[must_use]
    pub fn apply(self, n: f64) -> f64 {
        match self {
            Self::PassThrough => n,
            Self::Clamp => n.clamp(0.0, 1.0),
        }
    }
}

/// Image magnifier tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifyConfig {
    /// Poll period of the magnifier task in milliseconds.
    pub step_interval_ms: u64,
    /// Seconds the pointer must rest before magnification changes.
    pub wait_secs: f64,
    /// Multiplicative magnification change per step.
    pub per_step: f64,
    pub min_magnification: f64,
    pub max_magnification: f64,
    /// Drag fraction below which a resting press zooms in.
    pub max_move_increase: f64,
    /// Drag fraction above which a resting press zooms out.
    pub min_move_decrease: f64,
    /// Screen motion to image motion ratio at magnification 1.
    pub movement_scale: f64,
    /// Higher values relax an over-drag more slowly but jitter less.
    pub over_drag_relax_rate: f64,
}

impl Default for MagnifyConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: DEFAULT_MAGNIFY_STEP_MS,
            wait_secs: DEFAULT_MAGNIFY_WAIT_SECS,
            per_step: DEFAULT_MAGNIFY_PER_STEP,
            min_magnification: DEFAULT_MIN_MAGNIFICATION,
            max_magnification: DEFAULT_MAX_MAGNIFICATION,
            max_move_increase: DEFAULT_MAX_MOVE_INCREASE,
            min_move_decrease: DEFAULT_MIN_MOVE_DECREASE,
            movement_scale: DEFAULT_MOVEMENT_SCALE,
            over_drag_relax_rate: DEFAULT_OVER_DRAG_RELAX_RATE,
        }
    }
}

impl MagnifyConfig {
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms.max(1))
    }
}

/// Scene-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub menu_mode: MenuMode,
    /// Fraction of the surface diagonal a press must travel to count as a swipe.
    pub swipe_fraction: f64,
    /// Presses shorter than this many seconds are taps.
    pub tap_time_secs: f64,
    /// Seconds for the compass rose to grow to full size.
    pub rose_grow_secs: f64,
    /// Preference for breaking text at whitespace over a larger scale.
    pub prefer_breaks_factor: f64,
    /// Font size text is measured at before scaling into its draw area.
    pub reference_font_size: f64,
    /// Stroke width of the outline drawn behind text.
    pub text_stroke_width: f64,
    /// Average seconds for an image to glide across its draw area.
    pub glide_secs: f64,
    /// Slow, steady glides for screenshots.
    pub screenshot_mode: bool,
    pub clamp_policy: ClampPolicy,
    pub dispatch_queue_capacity: usize,
    pub magnify: MagnifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            menu_mode: MenuMode::default(),
            swipe_fraction: DEFAULT_SWIPE_FRACTION,
            tap_time_secs: DEFAULT_TAP_TIME_SECS,
            rose_grow_secs: DEFAULT_ROSE_GROW_SECS,
            prefer_breaks_factor: DEFAULT_PREFER_BREAKS_FACTOR,
            reference_font_size: DEFAULT_REFERENCE_FONT_SIZE,
            text_stroke_width: DEFAULT_TEXT_STROKE_WIDTH,
            glide_secs: DEFAULT_GLIDE_SECS,
            screenshot_mode: false,
            clamp_policy: ClampPolicy::default(),
            dispatch_queue_capacity: DEFAULT_DISPATCH_QUEUE_CAPACITY,
            magnify: MagnifyConfig::default(),
        }
    }
}

impl Config {
    /// Parse a JSON document; absent keys take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `ROSECANVAS_MENU_MODE`: `rose` (default), `page` or `none`
    /// - `ROSECANVAS_SWIPE_FRACTION`: default 1/64
    /// - `ROSECANVAS_TAP_TIME_SECS`: default 0.25
    /// - `ROSECANVAS_ROSE_GROW_SECS`: default 5
    /// - `ROSECANVAS_PREFER_BREAKS_FACTOR`: default 1.2
    /// - `ROSECANVAS_GLIDE_SECS`: default 10
    /// - `ROSECANVAS_SCREENSHOT_MODE`: default false
    /// - `ROSECANVAS_DISPATCH_QUEUE_CAPACITY`: default 64
    /// - `ROSECANVAS_MAGNIFY_STEP_MS`: default 10
    /// - `ROSECANVAS_MAGNIFY_WAIT_SECS`: default 1
    pub fn from_env() -> Result<Self, ConfigError> {
        let menu_mode = match std::env::var("ROSECANVAS_MENU_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => MenuMode::default(),
        };
        let magnify = MagnifyConfig {
            step_interval_ms: env_parse("ROSECANVAS_MAGNIFY_STEP_MS", DEFAULT_MAGNIFY_STEP_MS),
            wait_secs: env_parse("ROSECANVAS_MAGNIFY_WAIT_SECS", DEFAULT_MAGNIFY_WAIT_SECS),
            ..MagnifyConfig::default()
        };
        let config = Self {
            menu_mode,
            swipe_fraction: env_parse("ROSECANVAS_SWIPE_FRACTION", DEFAULT_SWIPE_FRACTION),
            tap_time_secs: env_parse("ROSECANVAS_TAP_TIME_SECS", DEFAULT_TAP_TIME_SECS),
            rose_grow_secs: env_parse("ROSECANVAS_ROSE_GROW_SECS", DEFAULT_ROSE_GROW_SECS),
            prefer_breaks_factor: env_parse("ROSECANVAS_PREFER_BREAKS_FACTOR", DEFAULT_PREFER_BREAKS_FACTOR),
            glide_secs: env_parse("ROSECANVAS_GLIDE_SECS", DEFAULT_GLIDE_SECS),
            screenshot_mode: env_parse("ROSECANVAS_SCREENSHOT_MODE", false),
            dispatch_queue_capacity: env_parse("ROSECANVAS_DISPATCH_QUEUE_CAPACITY", DEFAULT_DISPATCH_QUEUE_CAPACITY),
            magnify,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the gesture or layout math meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.magnify;
        let checks = [
            (self.swipe_fraction >= 0.0, "swipe_fraction must be non-negative"),
            (self.tap_time_secs >= 0.0, "tap_time_secs must be non-negative"),
            (self.rose_grow_secs > 0.0, "rose_grow_secs must be positive"),
            (self.prefer_breaks_factor >= 1.0, "prefer_breaks_factor must be at least 1"),
            (self.reference_font_size > 0.0, "reference_font_size must be positive"),
            (self.glide_secs > 0.0, "glide_secs must be positive"),
            (self.dispatch_queue_capacity > 0, "dispatch_queue_capacity must be positive"),
            (m.min_magnification > 0.0, "magnify.min_magnification must be positive"),
            (m.max_magnification >= m.min_magnification, "magnify.max_magnification below minimum"),
            (m.per_step > 1.0, "magnify.per_step must exceed 1"),
            (m.over_drag_relax_rate > 0.0, "magnify.over_drag_relax_rate must be positive"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(ConfigError::Invalid((*reason).to_string())),
            None => Ok(()),
        }
    }

    /// Base glide time for new images.
    #[must_use]
    pub fn base_glide_secs(&self) -> f64 {
        if self.screenshot_mode { SCREENSHOT_GLIDE_SECS } else { self.glide_secs }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
