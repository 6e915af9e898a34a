//! Drives screen: one card per USB volume with a share toggle.
//!
//! # Visual Layout
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ USB DRIVE MANAGER                    [4] │
//! ├──────────────────────────────────────────┤
//! │ ■ photos                ┌──────────────┐ │
//! │ [ SHARED ]  exfat       │██████████    │ │  Card: status square, name,
//! │                         └──────────────┘ │  share button, fs type,
//! │                          92%  55.2GB     │  usage bar + numbers
//! ├──────────────────────────────────────────┤
//! │ ... up to 3 cards ...                    │
//! │ + 1 more drives                          │
//! └──────────────── • ● • ───────────────────┘
//! ```
//!
//! The SHARED/PRIVATE pill doubles as the share button. Its region comes
//! from [`share_button_regions`], which navigation uses for hit-testing, so
//! the drawn button and the tap target always coincide.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;

use super::FrameInput;
use super::overview::truncate;
use crate::colors::{BG_CARD, BG_DARK, GRADIENT_PRIMARY, GRADIENT_SUCCESS, TEXT_MUTED, rgb};
use crate::metrics::{DriveInfo, format_bytes};
use crate::styles::{LABEL_MUTED, LABEL_PRIMARY, LABEL_SECONDARY, SMALL_FONT, TINY_SECONDARY, TITLE_PRIMARY, TOP_CENTER, TOP_LEFT};
use crate::thresholds::Tier;
use crate::widgets::{draw_button_pill, draw_card, draw_screen_indicators, draw_status_badge, draw_usage_bar};

/// Drive cards shown at once; the rest are summarized as "+ N more".
pub const MAX_DRIVE_CARDS: usize = 3;

const HEADER: Rectangle = Rectangle::new(Point::new(5, 5), Size::new(310, 32));
const FIRST_CARD_Y: i32 = 42;
const CARD_PITCH: i32 = 56;
const CARD_HEIGHT: u32 = 50;
const CARD_X: i32 = 5;
const CARD_WIDTH: u32 = 310;

const BUTTON_OFFSET: Point = Point::new(9, 26);
const BUTTON_SIZE: Size = Size::new(64, 16);
const BAR_OFFSET: Point = Point::new(175, 8);
const BAR_SIZE: Size = Size::new(120, 20);

const PRIVATE_FILL: Rgb565 = rgb(60, 62, 78);

/// Tap regions of the share buttons, indexed like the drive list.
pub fn share_button_regions(drive_count: usize) -> Vec<Rectangle> {
    (0..drive_count.min(MAX_DRIVE_CARDS))
        .map(|i| Rectangle::new(card_origin(i) + BUTTON_OFFSET, BUTTON_SIZE))
        .collect()
}

#[inline]
const fn card_origin(index: usize) -> Point { Point::new(CARD_X, FIRST_CARD_Y + index as i32 * CARD_PITCH) }

pub(super) fn draw<D>(
    display: &mut D,
    input: &FrameInput<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BG_DARK).ok();

    draw_card(display, HEADER, 8, BG_CARD);
    Text::with_text_style("USB DRIVE MANAGER", HEADER.top_left + Point::new(10, 7), TITLE_PRIMARY, TOP_LEFT)
        .draw(display)
        .ok();
    let mut count: String<8> = String::new();
    write!(count, "{}", input.drives.len()).ok();
    draw_status_badge(display, HEADER.top_left + Point::new(280, 8), &count, GRADIENT_PRIMARY[0]);

    if input.drives.is_empty() {
        Text::with_text_style("No USB drives connected", Point::new(160, 110), LABEL_SECONDARY, TOP_CENTER)
            .draw(display)
            .ok();
        Text::with_text_style("Plug in a drive to share it", Point::new(160, 126), LABEL_MUTED, TOP_CENTER)
            .draw(display)
            .ok();
    } else {
        let regions = share_button_regions(input.drives.len());
        for (index, (drive, button)) in input.drives.iter().zip(regions).enumerate() {
            draw_drive_card(display, card_origin(index), drive, button);
        }
        if input.drives.len() > MAX_DRIVE_CARDS {
            let mut more: String<24> = String::new();
            write!(more, "+ {} more drives", input.drives.len() - MAX_DRIVE_CARDS).ok();
            let y = FIRST_CARD_Y + MAX_DRIVE_CARDS as i32 * CARD_PITCH;
            Text::with_text_style(&more, Point::new(12, y), LABEL_MUTED, TOP_LEFT)
                .draw(display)
                .ok();
        }
    }

    draw_screen_indicators(display, input.screen_count, input.screen.index(), GRADIENT_PRIMARY[1]);
}

fn draw_drive_card<D>(
    display: &mut D,
    origin: Point,
    drive: &DriveInfo,
    button: Rectangle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_card(display, Rectangle::new(origin, Size::new(CARD_WIDTH, CARD_HEIGHT)), 8, BG_CARD);

    let share_color = if drive.is_shared { GRADIENT_SUCCESS[0] } else { TEXT_MUTED };
    Rectangle::new(origin + Point::new(9, 8), Size::new(8, 8))
        .into_styled(PrimitiveStyle::with_fill(share_color))
        .draw(display)
        .ok();

    let name: String<24> = truncate(&drive.name);
    Text::with_text_style(&name, origin + Point::new(23, 7), LABEL_PRIMARY, TOP_LEFT)
        .draw(display)
        .ok();

    let (label, fill) = if drive.is_shared { ("SHARED", GRADIENT_SUCCESS[0]) } else { ("PRIVATE", PRIVATE_FILL) };
    draw_button_pill(display, button, label, fill);

    let fs: String<12> = truncate(&drive.filesystem_type);
    Text::with_text_style(&fs, origin + Point::new(80, 30), TINY_SECONDARY, TOP_LEFT)
        .draw(display)
        .ok();

    draw_usage_bar(display, Rectangle::new(origin + BAR_OFFSET, BAR_SIZE), drive.used_percent, TEXT_MUTED, BG_DARK);

    let mut usage: String<32> = String::new();
    write!(usage, "{:.0}%  {}", drive.used_percent, format_bytes(drive.free_bytes)).ok();
    let tier_color = Tier::for_usage(drive.used_percent).status_color();
    Text::with_text_style(&usage, origin + Point::new(175, 33), MonoTextStyle::new(SMALL_FONT, tier_color), TOP_LEFT)
        .draw(display)
        .ok();
    Text::with_text_style("free", origin + Point::new(265, 33), LABEL_MUTED, TOP_LEFT)
        .draw(display)
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Screen;
    use crate::screens::{compose, fixtures};

    #[test]
    fn test_regions_are_capped_and_disjoint() {
        let regions = share_button_regions(5);
        assert_eq!(regions.len(), MAX_DRIVE_CARDS, "only visible cards get buttons");
        for pair in regions.windows(2) {
            assert!(pair[0].intersection(&pair[1]).is_zero_sized(), "buttons must not overlap");
        }
        assert!(share_button_regions(0).is_empty());
    }

    #[test]
    fn test_share_button_is_drawn_in_its_region() {
        let (sample, histories, drives, header) =
            (fixtures::sample(), fixtures::histories(), fixtures::drives(), fixtures::header());
        let frame = compose(&FrameInput {
            screen: Screen::Drives,
            screen_count: 3,
            sample: &sample,
            histories: &histories,
            drives: &drives,
            phase: 0.0,
            header: &header,
        });
        let regions = share_button_regions(drives.len());
        // Left cap of the pill, away from the label text
        let shared_probe = regions[0].top_left + Point::new(3, 8);
        let private_probe = regions[1].top_left + Point::new(3, 8);
        assert_eq!(frame.pixel(shared_probe), Some(GRADIENT_SUCCESS[0]), "drive 0 is shared");
        assert_eq!(frame.pixel(private_probe), Some(PRIVATE_FILL), "drive 1 is private");
    }
}
