//! Widget components for the dashboard screens.
//!
//! - [`primitives`]: cards, gradient background, glow dots, glowing text
//! - [`charts`]: metric sparklines
//! - [`gauges`]: circular progress ring and tiered usage bar
//! - [`badges`]: status pills, button pills, screen indicator dots
//!
//! # Architecture
//!
//! Every widget is a free function generic over
//! `D: DrawTarget<Color = Rgb565>`. Widgets never read dashboard state; the
//! screens pass in exactly the values to draw. Draw errors are ignored with
//! `.ok()` since the in-memory [`Frame`](crate::frame::Frame) is infallible
//! and a half-drawn widget is preferable to a dropped frame on other targets.

mod badges;
mod charts;
mod gauges;
mod primitives;

pub use badges::{
    BADGE_HEIGHT,
    badge_width,
    draw_button_pill,
    draw_screen_indicators,
    draw_status_badge,
    indicator_center,
};
pub use charts::{draw_sparkline, sparkline_points};
pub use gauges::{arc_point, draw_circular_progress, draw_usage_bar, progress_sweep_degrees};
pub use primitives::{draw_card, draw_glow_dot, draw_glowing_text, draw_gradient_background};
