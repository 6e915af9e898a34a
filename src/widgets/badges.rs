//! Pill-shaped status badges and the screen indicator dots.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::Text;

use crate::colors::{TEXT_MUTED, TEXT_PRIMARY};
use crate::styles::{SMALL_FONT, TOP_CENTER, TOP_LEFT, text_width};

/// Horizontal padding added to the text width (6 px each side).
pub const BADGE_PADDING: u32 = 12;
pub const BADGE_HEIGHT: u32 = 16;
pub const BADGE_RADIUS: u32 = 8;

/// Row the indicator dots are centered on.
pub const INDICATOR_Y: i32 = 235;
/// X of the first indicator dot.
pub const INDICATOR_X: i32 = 140;
/// Distance between indicator dots.
pub const INDICATOR_SPACING: i32 = 15;

/// Width a badge for `text` will occupy.
#[inline]
pub fn badge_width(text: &str) -> u32 { text_width(text, SMALL_FONT) + BADGE_PADDING }

/// Draw a filled pill with white text; returns its width.
pub fn draw_status_badge<D>(
    display: &mut D,
    top_left: Point,
    text: &str,
    fill: Rgb565,
) -> u32
where
    D: DrawTarget<Color = Rgb565>,
{
    let width = badge_width(text);
    let area = Rectangle::new(top_left, Size::new(width, BADGE_HEIGHT));
    RoundedRectangle::with_equal_corners(area, Size::new(BADGE_RADIUS, BADGE_RADIUS))
        .into_styled(PrimitiveStyle::with_fill(fill))
        .draw(display)
        .ok();
    Text::with_text_style(
        text,
        top_left + Point::new((BADGE_PADDING / 2) as i32, 3),
        MonoTextStyle::new(SMALL_FONT, TEXT_PRIMARY),
        TOP_LEFT,
    )
    .draw(display)
    .ok();
    width
}

/// Pill of fixed size with centered text. Used for tap targets, whose
/// region must not depend on the label.
pub fn draw_button_pill<D>(
    display: &mut D,
    area: Rectangle,
    text: &str,
    fill: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let radius = area.size.height / 2;
    RoundedRectangle::with_equal_corners(area, Size::new(radius, radius))
        .into_styled(PrimitiveStyle::with_fill(fill))
        .draw(display)
        .ok();
    let text_top = area.top_left.y + (area.size.height.saturating_sub(SMALL_FONT.character_size.height) / 2) as i32;
    Text::with_text_style(
        text,
        Point::new(area.center().x, text_top),
        MonoTextStyle::new(SMALL_FONT, TEXT_PRIMARY),
        TOP_CENTER,
    )
    .draw(display)
    .ok();
}

/// Center of indicator dot `index`.
#[inline]
pub const fn indicator_center(index: usize) -> Point {
    Point::new(INDICATOR_X + index as i32 * INDICATOR_SPACING, INDICATOR_Y)
}

/// One dot per screen; the current screen is drawn larger in `active`.
pub fn draw_screen_indicators<D>(
    display: &mut D,
    count: usize,
    current: usize,
    active: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    for index in 0..count {
        let (diameter, color) = if index == current { (7, active) } else { (5, TEXT_MUTED) };
        Circle::with_center(indicator_center(index), diameter)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BG_DARK, GRADIENT_PRIMARY, STATUS_ONLINE};
    use crate::frame::Frame;

    #[test]
    fn test_badge_width_is_text_plus_padding() {
        let mut frame = Frame::new(Size::new(100, 30), BG_DARK);
        let width = draw_status_badge(&mut frame, Point::new(2, 2), "SHARED", STATUS_ONLINE);
        assert_eq!(width, 36 + 12);
        assert_eq!(width, badge_width("SHARED"));
    }

    #[test]
    fn test_badge_is_pill_shaped() {
        let mut frame = Frame::new(Size::new(100, 30), BG_DARK);
        draw_status_badge(&mut frame, Point::new(0, 0), "v1.2", STATUS_ONLINE);
        assert_eq!(frame.pixel(Point::new(0, 0)), Some(BG_DARK), "corner should be rounded off");
        assert_eq!(frame.pixel(Point::new(2, 8)), Some(STATUS_ONLINE), "left cap is filled at mid height");
        assert_eq!(frame.pixel(Point::new(2, 16)), Some(BG_DARK), "badge is 16px tall");
    }

    #[test]
    fn test_indicator_positions() {
        assert_eq!(indicator_center(0), Point::new(140, 235));
        assert_eq!(indicator_center(2), Point::new(170, 235));
    }

    #[test]
    fn test_indicator_highlights_current() {
        let mut frame = Frame::new(Size::new(320, 240), BG_DARK);
        draw_screen_indicators(&mut frame, 3, 1, GRADIENT_PRIMARY[0]);
        assert_eq!(frame.pixel(indicator_center(1)), Some(GRADIENT_PRIMARY[0]));
        assert_eq!(frame.pixel(indicator_center(0)), Some(TEXT_MUTED));
        assert_eq!(frame.pixel(indicator_center(2)), Some(TEXT_MUTED));
    }
}
