//! Circular progress ring and usage bar.
//!
//! # Circular Progress
//!
//! A full background ring with a foreground arc on top. The arc starts at
//! the top (-90 degrees) and sweeps clockwise by `360 * percent / 100`.
//! Screen Y grows downward, so increasing angles already run clockwise.
//!
//! The arc is drawn as 1-degree thick line segments rather than with a
//! library arc primitive, which keeps its start angle and direction explicit
//! in this file.
//!
//! # Usage Bar
//!
//! A 1 px bordered track with a proportional fill. The fill color comes
//! from the shared tier policy in [`crate::thresholds`].

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};

use crate::thresholds::usage_color;

/// Angle the progress arc starts at (12 o'clock).
pub const ARC_START_DEGREES: f32 = -90.0;

/// Degrees covered by the foreground arc for `percent` (clamped to 0-100).
#[inline]
pub fn progress_sweep_degrees(percent: f32) -> f32 {
    let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    360.0 * percent / 100.0
}

/// Point on a circle at `degrees` (0 = 3 o'clock, increasing clockwise).
#[inline]
pub fn arc_point(
    center: Point,
    radius: u32,
    degrees: f32,
) -> Point {
    let radians = degrees.to_radians();
    Point::new(
        center.x + (radius as f32 * radians.cos()).round() as i32,
        center.y + (radius as f32 * radians.sin()).round() as i32,
    )
}

/// Ring gauge showing `percent`.
#[allow(clippy::too_many_arguments)]
pub fn draw_circular_progress<D>(
    display: &mut D,
    center: Point,
    radius: u32,
    thickness: u32,
    percent: f32,
    color: Rgb565,
    track: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Circle::with_center(center, 2 * radius + 1)
        .into_styled(PrimitiveStyle::with_stroke(track, thickness))
        .draw(display)
        .ok();

    let sweep = progress_sweep_degrees(percent);
    if sweep <= 0.0 {
        return;
    }

    let style = PrimitiveStyle::with_stroke(color, thickness);
    let steps = sweep.ceil() as u32;
    let mut previous = arc_point(center, radius, ARC_START_DEGREES);
    for step in 1..=steps {
        let angle = ARC_START_DEGREES + (step as f32).min(sweep);
        let next = arc_point(center, radius, angle);
        Line::new(previous, next)
            .into_styled(style)
            .draw(display)
            .ok();
        previous = next;
    }
}

/// Bordered bar filled to `percent`, colored by usage tier.
pub fn draw_usage_bar<D>(
    display: &mut D,
    area: Rectangle,
    percent: f32,
    border: Rgb565,
    track: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if area.size.width < 3 || area.size.height < 3 {
        return;
    }
    area.into_styled(PrimitiveStyle::with_fill(track))
        .draw(display)
        .ok();
    area.into_styled(PrimitiveStyle::with_stroke(border, 1))
        .draw(display)
        .ok();

    let inner_width = area.size.width - 2;
    let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    let fill_width = (inner_width as f32 * percent / 100.0).round() as u32;
    if fill_width == 0 {
        return;
    }
    let fill = Rectangle::new(area.top_left + Point::new(1, 1), Size::new(fill_width, area.size.height - 2));
    display.fill_solid(&fill, usage_color(percent)).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BG_CARD, BG_DARK, COLOR_CPU, GRADIENT_ERROR, GRADIENT_INFO, GRADIENT_WARNING, TEXT_MUTED};
    use crate::frame::Frame;

    const CENTER: Point = Point::new(30, 30);
    const RADIUS: u32 = 20;

    fn ring(percent: f32) -> Frame {
        let mut frame = Frame::new(Size::new(60, 60), BG_CARD);
        draw_circular_progress(&mut frame, CENTER, RADIUS, 4, percent, COLOR_CPU, BG_DARK);
        frame
    }

    #[test]
    fn test_sweep_degrees() {
        assert_eq!(progress_sweep_degrees(25.0), 90.0);
        assert_eq!(progress_sweep_degrees(100.0), 360.0);
        assert_eq!(progress_sweep_degrees(150.0), 360.0, "percent is clamped");
        assert_eq!(progress_sweep_degrees(-5.0), 0.0);
    }

    #[test]
    fn test_quarter_arc_runs_top_to_three_oclock() {
        let frame = ring(25.0);
        let at = |deg: f32| frame.pixel(arc_point(CENTER, RADIUS, deg));

        assert_eq!(at(-90.0), Some(COLOR_CPU), "arc starts at 12 o'clock");
        assert_eq!(at(-45.0), Some(COLOR_CPU), "arc passes through 1:30");
        assert_eq!(at(-10.0), Some(COLOR_CPU), "arc reaches 3 o'clock");
        assert_eq!(at(30.0), Some(BG_DARK), "arc must stop at 3 o'clock");
        assert_eq!(at(90.0), Some(BG_DARK), "6 o'clock shows the track");
        assert_eq!(at(180.0), Some(BG_DARK), "9 o'clock shows the track");
        assert_eq!(at(-135.0), Some(BG_DARK), "arc runs clockwise, not counter-clockwise");
    }

    #[test]
    fn test_zero_percent_draws_only_track() {
        let frame = ring(0.0);
        assert_eq!(frame.count_color(COLOR_CPU), 0);
        assert!(frame.count_color(BG_DARK) > 0, "track ring should still be drawn");
    }

    #[test]
    fn test_full_circle() {
        let frame = ring(100.0);
        for deg in [-90.0, 0.0, 90.0, 180.0] {
            assert_eq!(frame.pixel(arc_point(CENTER, RADIUS, deg)), Some(COLOR_CPU), "angle {deg}");
        }
    }

    fn bar(percent: f32) -> Frame {
        let mut frame = Frame::new(Size::new(130, 30), BG_CARD);
        draw_usage_bar(&mut frame, Rectangle::new(Point::new(5, 5), Size::new(120, 20)), percent, TEXT_MUTED, BG_DARK);
        frame
    }

    #[test]
    fn test_usage_bar_tier_colors() {
        assert_eq!(bar(92.0).pixel(Point::new(10, 15)), Some(GRADIENT_ERROR[0]), "92% is error tier");
        assert_eq!(bar(80.0).pixel(Point::new(10, 15)), Some(GRADIENT_WARNING[0]), "80% is warning tier");
        assert_eq!(bar(50.0).pixel(Point::new(10, 15)), Some(GRADIENT_INFO[0]), "50% is normal tier");
    }

    #[test]
    fn test_usage_bar_fill_is_proportional() {
        let frame = bar(50.0);
        // Inner width 118, half filled = 59 columns starting at x=6
        assert_eq!(frame.pixel(Point::new(64, 15)), Some(GRADIENT_INFO[0]));
        assert_eq!(frame.pixel(Point::new(66, 15)), Some(BG_DARK));
        assert_eq!(frame.pixel(Point::new(5, 5)), Some(TEXT_MUTED), "border");
    }
}
