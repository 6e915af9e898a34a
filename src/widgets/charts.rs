//! Sparkline chart for metric history.
//!
//! # Value Domain
//!
//! The Y axis is fixed to 0-100 rather than auto-scaled. Every series the
//! dashboard charts is a percentage (network is pre-scaled by
//! [`crate::history`]), and a fixed domain means a flat 5% CPU line looks
//! flat instead of being stretched into noise.
//!
//! # X Spacing
//!
//! Points are spread across the full width using the number of samples
//! actually present, so a half-filled buffer still spans the chart.
//! X step is computed from `(width - 1)` so the newest point lands on the
//! last pixel column.
//!
//! # Layers (back to front)
//!
//! 1. Darkened fill from the curve down to the baseline
//! 2. 3 px glow line
//! 3. 2 px main line
//! 4. Dot on the newest sample

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};

use crate::colors::scale;

/// Upper bound of the chart domain.
pub const CHART_MAX: f32 = 100.0;

/// Screen positions for `values` inside `area`. Empty when fewer than 2 values.
pub fn sparkline_points(
    values: &[f32],
    area: Rectangle,
) -> Vec<Point> {
    let count = values.len();
    if count < 2 || area.size.width < 2 || area.size.height < 2 {
        return Vec::new();
    }

    let x0 = area.top_left.x;
    let y0 = area.top_left.y;
    let max_x = x0 + area.size.width as i32 - 1;
    let max_y = y0 + area.size.height as i32 - 1;
    let x_step = (area.size.width - 1) as f32 / (count - 1) as f32;
    let y_scale = (area.size.height - 1) as f32 / CHART_MAX;

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, CHART_MAX) };
            let x = (x0 + (i as f32 * x_step).round() as i32).min(max_x);
            let y = (max_y - (value * y_scale).round() as i32).clamp(y0, max_y);
            Point::new(x, y)
        })
        .collect()
}

/// Draw a sparkline. Fewer than 2 values draws nothing.
pub fn draw_sparkline<D>(
    display: &mut D,
    values: &[f32],
    area: Rectangle,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let points = sparkline_points(values, area);
    if points.len() < 2 {
        return;
    }
    let baseline = area.top_left.y + area.size.height as i32 - 1;

    // Area fill, one column at a time
    let fill = PrimitiveStyle::with_stroke(scale(color, 0.25), 1);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dx = (b.x - a.x).max(1);
        for x in a.x..=b.x {
            let t = (x - a.x) as f32 / dx as f32;
            let y = a.y + ((b.y - a.y) as f32 * t).round() as i32;
            Line::new(Point::new(x, y), Point::new(x, baseline))
                .into_styled(fill)
                .draw(display)
                .ok();
        }
    }

    let glow = PrimitiveStyle::with_stroke(scale(color, 0.5), 3);
    let line = PrimitiveStyle::with_stroke(color, 2);
    for style in [glow, line] {
        for pair in points.windows(2) {
            Line::new(pair[0], pair[1])
                .into_styled(style)
                .draw(display)
                .ok();
        }
    }

    if let Some(&last) = points.last() {
        Circle::with_center(last, 5)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}
