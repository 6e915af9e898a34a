//! Low-level drawing primitives shared across widgets and screens.
//!
//! # Card Background
//!
//! `draw_card` fills a rounded rectangle. Cards sit on the gradient
//! background with no border; the corner radius alone separates them.
//!
//! # Gradient Background
//!
//! `draw_gradient_background` fills one row at a time. The `offset` shifts
//! the gradient vertically and is driven by the animation phase, giving the
//! overview its slow "breathing" effect.
//!
//! # Soft Glow
//!
//! The panel has no alpha channel, so glows are drawn as concentric fills,
//! largest and darkest first, each one blended toward the background.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Text, TextStyle};

use crate::colors::{blend, lerp};

/// Fill a rounded rectangle. Zero-size rectangles are skipped.
pub fn draw_card<D>(
    display: &mut D,
    area: Rectangle,
    radius: u32,
    fill: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if area.is_zero_sized() {
        return;
    }
    RoundedRectangle::with_equal_corners(area, Size::new(radius, radius))
        .into_styled(PrimitiveStyle::with_fill(fill))
        .draw(display)
        .ok();
}

/// Vertical gradient over the whole target, shifted down by `offset` rows.
///
/// Rows above the shifted start use `top`; the gradient wraps nothing.
pub fn draw_gradient_background<D>(
    display: &mut D,
    top: Rgb565,
    bottom: Rgb565,
    offset: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let size = display.bounding_box().size;
    if size.height == 0 {
        return;
    }
    let span = size.height as f32;
    for y in 0..size.height as i32 {
        let t = ((y - offset) as f32 / span).clamp(0.0, 1.0);
        let row = Rectangle::new(Point::new(0, y), Size::new(size.width, 1));
        display.fill_solid(&row, lerp(top, bottom, t)).ok();
    }
}

/// Filled circle with a soft halo of `halo` extra pixels.
///
/// `brightness` scales the whole dot toward `background` (0.0 invisible).
pub fn draw_glow_dot<D>(
    display: &mut D,
    center: Point,
    radius: u32,
    halo: u32,
    color: Rgb565,
    background: Rgb565,
    brightness: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let brightness = brightness.clamp(0.0, 1.0);
    if brightness <= 0.0 {
        return;
    }
    for ring in (1..=halo).rev() {
        let strength = 0.35 * brightness * (1.0 - ring as f32 / (halo + 1) as f32);
        Circle::with_center(center, 2 * (radius + ring) + 1)
            .into_styled(PrimitiveStyle::with_fill(blend(background, color, strength)))
            .draw(display)
            .ok();
    }
    Circle::with_center(center, 2 * radius + 1)
        .into_styled(PrimitiveStyle::with_fill(blend(background, color, brightness)))
        .draw(display)
        .ok();
}

/// Text with a soft outline glow drawn at offsets 3, 2 and 1 before the
/// text itself. Glow intensity is `0.3 * alpha / offset`.
#[allow(clippy::too_many_arguments)]
pub fn draw_glowing_text<D>(
    display: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont,
    text_style: TextStyle,
    color: Rgb565,
    background: Rgb565,
    alpha: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    for offset in (1..=3).rev() {
        let glow = blend(background, color, 0.3 * alpha / offset as f32);
        let style = MonoTextStyle::new(font, glow);
        for (dx, dy) in OUTLINE_OFFSETS {
            Text::with_text_style(text, position + Point::new(dx * offset, dy * offset), style, text_style)
                .draw(display)
                .ok();
        }
    }
    let style = MonoTextStyle::new(font, blend(background, color, alpha));
    Text::with_text_style(text, position, style, text_style)
        .draw(display)
        .ok();
}

/// 8-direction outline offsets.
const OUTLINE_OFFSETS: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BG_CARD, BG_DARK, STATUS_ONLINE, TEXT_PRIMARY};
    use crate::frame::Frame;
    use crate::styles::{CENTERED, SEQUENCE_FONT};

    #[test]
    fn test_card_fills_center_not_corner() {
        let mut frame = Frame::new(Size::new(40, 40), BG_DARK);
        draw_card(&mut frame, Rectangle::new(Point::new(0, 0), Size::new(40, 40)), 10, BG_CARD);
        assert_eq!(frame.pixel(Point::new(20, 20)), Some(BG_CARD));
        assert_eq!(frame.pixel(Point::new(0, 0)), Some(BG_DARK), "rounded corner must stay background");
    }

    #[test]
    fn test_gradient_runs_top_to_bottom() {
        let mut frame = Frame::new(Size::new(8, 100), BG_DARK);
        draw_gradient_background(&mut frame, BG_DARK, TEXT_PRIMARY, 0);
        assert_eq!(frame.pixel(Point::new(0, 0)), Some(BG_DARK));
        assert_ne!(frame.pixel(Point::new(0, 99)), Some(BG_DARK));
    }

    #[test]
    fn test_glow_dot_zero_brightness_draws_nothing() {
        let mut frame = Frame::new(Size::new(20, 20), BG_DARK);
        draw_glow_dot(&mut frame, Point::new(10, 10), 3, 3, STATUS_ONLINE, BG_DARK, 0.0);
        assert_eq!(frame.count_color(BG_DARK), 400);
    }

    #[test]
    fn test_glow_dot_full_brightness_core() {
        let mut frame = Frame::new(Size::new(20, 20), BG_DARK);
        draw_glow_dot(&mut frame, Point::new(10, 10), 3, 3, STATUS_ONLINE, BG_DARK, 1.0);
        assert_eq!(frame.pixel(Point::new(10, 10)), Some(STATUS_ONLINE));
    }

    #[test]
    fn test_glowing_text_draws_something() {
        let mut frame = Frame::new(Size::new(80, 40), BG_DARK);
        draw_glowing_text(&mut frame, "piNAS", Point::new(40, 20), SEQUENCE_FONT, CENTERED, TEXT_PRIMARY, BG_DARK, 1.0);
        assert!(frame.count_color(TEXT_PRIMARY) > 0, "label pixels at full alpha should be pure text color");
    }
}
