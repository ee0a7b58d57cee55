//! Touch-driven scene engine with a compass-rose command menu.
//!
//! A host owns the window and the font engine. It feeds the engine raw
//! press/drag/release events and draws the display list the engine returns
//! each frame. The engine lays out text and images by fractional placement,
//! turns presses into taps and swipes, shows an eight-way command rose (or a
//! page-style grid menu) under the finger, magnifies images under a resting
//! finger, and runs host actions off the input thread.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`scene`] | The [`scene::Scene`] that ties everything together, and [`scene::ShowTracker`] |
//! | [`element`] | Rectangles, text and images, with animation and glide |
//! | [`rose`] | Octants, the compass rose and its page menu |
//! | [`gesture`] | Press/drag/release state machine and gesture classification |
//! | [`magnify`] | Image magnifier and its background poller |
//! | [`text_flow`] | Line breaking and scale-to-fit text layout |
//! | [`dispatch`] | Action queue drained on the runtime's blocking pool |
//! | [`render`] | Draw commands and the host measuring/theming traits |
//! | [`geometry`] | Points, rectangles, fractional targets and quadrants |
//! | [`config`] | Settings, from defaults, JSON or the environment |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod dispatch;
pub mod element;
pub mod geometry;
pub mod gesture;
pub mod magnify;
pub mod render;
pub mod rose;
pub mod scene;
pub mod text_flow;

pub use config::{Config, ConfigError, MenuMode};
pub use dispatch::{action, Action};
pub use geometry::{Point, Quadrant, Size, Target};
pub use gesture::Gesture;
pub use render::{DrawCommand, Renderer, TextMeasure, ThemeProvider};
pub use rose::Octant;
pub use scene::{Scene, ShowTracker};
