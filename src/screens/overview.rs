//! Overview screen: everything at a glance.
//!
//! # Visual Layout
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ ● piNAS [v2.3.1]                   14:05 │  Header card
//! │   192.168.1.40                    19 Oct │
//! ├────────────────────┬─────────────────────┤
//! │ (37%) CPU 58C  ~~~ │ (62%) MEMORY   ~~~  │  2x2 metric cards:
//! ├────────────────────┼─────────────────────┤  ring + label + sparkline
//! │ (81%) STORAGE ~~~  │ (42%) NETWORK  ~~~  │
//! ├────────────────────┴─────────────────────┤
//! │ USB [4]  photos ● [=====    ]  +3        │  Drive summary
//! └──────────────── • ● • ───────────────────┘  Screen indicators
//! ```
//!
//! # Animation
//!
//! - Background gradient shifts by `20 * sin(0.1 * phase)` rows
//! - Status dot brightness pulses with `0.5 + 0.5 * sin(0.3 * phase)`

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use heapless::String;

use super::FrameInput;
use crate::colors::{
    BG_CARD,
    BG_CARD_LIGHT,
    BG_DARK,
    COLOR_CPU,
    COLOR_DISK,
    COLOR_MEM,
    COLOR_NET,
    GRADIENT_PRIMARY,
    GRADIENT_SUCCESS,
    STATUS_ONLINE,
    TEXT_MUTED,
};
use crate::metrics::format_bytes;
use crate::styles::{
    LABEL_MUTED,
    LABEL_PRIMARY,
    SMALL_FONT,
    TINY_FONT,
    TINY_SECONDARY,
    TITLE_FONT,
    TITLE_PRIMARY,
    TOP_CENTER,
    TOP_LEFT,
    TOP_RIGHT,
    VALUE_PRIMARY,
    text_width,
};
use crate::thresholds::temperature_color;
use crate::widgets::{
    draw_card,
    draw_circular_progress,
    draw_glow_dot,
    draw_gradient_background,
    draw_screen_indicators,
    draw_sparkline,
    draw_status_badge,
    draw_usage_bar,
};

// =============================================================================
// Layout Constants
// =============================================================================

const HEADER: Rectangle = Rectangle::new(Point::new(5, 5), Size::new(310, 42));
const STATUS_DOT: Point = Point::new(20, 19);
const TITLE_POS: Point = Point::new(32, 8);
const IP_POS: Point = Point::new(32, 32);
const CLOCK_POS: Point = Point::new(305, 8);
const DATE_POS: Point = Point::new(305, 32);

const CARD_SIZE: Size = Size::new(150, 64);
const CARD_ORIGINS: [Point; 4] = [Point::new(5, 52), Point::new(165, 52), Point::new(5, 121), Point::new(165, 121)];
const RING_OFFSET: Point = Point::new(30, 32);
const RING_RADIUS: u32 = 20;
const RING_THICKNESS: u32 = 4;
const LABEL_OFFSET: Point = Point::new(65, 4);
const SPARK_OFFSET: Point = Point::new(65, 15);
const SPARK_SIZE: Size = Size::new(80, 40);

const DRIVES_CARD: Rectangle = Rectangle::new(Point::new(5, 191), Size::new(310, 36));

/// Darker end of the animated background gradient.
const GRADIENT_BOTTOM: Rgb565 = crate::colors::rgb(24, 16, 48);

/// Vertical gradient drift in rows at full swing.
const GRADIENT_SWING: f32 = 20.0;

pub(super) fn draw<D>(
    display: &mut D,
    input: &FrameInput<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let offset = (GRADIENT_SWING * (input.phase * 0.1).sin()) as i32;
    draw_gradient_background(display, BG_DARK, GRADIENT_BOTTOM, offset);

    draw_header(display, input);
    draw_metric_cards(display, input);
    draw_drive_summary(display, input);
    draw_screen_indicators(display, input.screen_count, input.screen.index(), GRADIENT_PRIMARY[1]);
}

fn draw_header<D>(
    display: &mut D,
    input: &FrameInput<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_card(display, HEADER, 10, BG_CARD_LIGHT);

    let pulse = 0.5 + 0.5 * (input.phase * 0.3).sin();
    draw_glow_dot(display, STATUS_DOT, 4, 3, STATUS_ONLINE, BG_CARD_LIGHT, 0.4 + 0.6 * pulse);

    let header = input.header;
    Text::with_text_style(&header.title, TITLE_POS, TITLE_PRIMARY, TOP_LEFT)
        .draw(display)
        .ok();
    if !header.version.is_empty() {
        let badge_x = TITLE_POS.x + text_width(&header.title, TITLE_FONT) as i32 + 8;
        draw_status_badge(display, Point::new(badge_x, TITLE_POS.y + 1), &header.version, GRADIENT_PRIMARY[0]);
    }
    Text::with_text_style(&input.sample.ip_address, IP_POS, TINY_SECONDARY, TOP_LEFT)
        .draw(display)
        .ok();

    Text::with_text_style(&header.time, CLOCK_POS, VALUE_PRIMARY, TOP_RIGHT)
        .draw(display)
        .ok();
    Text::with_text_style(&header.date, DATE_POS, TINY_SECONDARY, TOP_RIGHT)
        .draw(display)
        .ok();
}

/// One of the 2x2 cards.
struct MetricCard<'a> {
    label: &'a str,
    percent: f32,
    history: &'a [f32],
    accent: Rgb565,
}

fn draw_metric_cards<D>(
    display: &mut D,
    input: &FrameInput<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let sample = input.sample;
    let histories = input.histories;
    let cpu = histories.cpu.snapshot();
    let memory = histories.memory.snapshot();
    let disk = histories.disk.snapshot();
    let network = histories.network.snapshot();

    let cards = [
        MetricCard {
            label: "CPU",
            percent: sample.cpu_percent,
            history: &cpu,
            accent: COLOR_CPU,
        },
        MetricCard {
            label: "MEMORY",
            percent: sample.memory_percent,
            history: &memory,
            accent: COLOR_MEM,
        },
        MetricCard {
            label: "STORAGE",
            percent: sample.disk_percent,
            history: &disk,
            accent: COLOR_DISK,
        },
        MetricCard {
            label: "NETWORK",
            percent: histories.network.latest().unwrap_or(0.0),
            history: &network,
            accent: COLOR_NET,
        },
    ];

    for (card, origin) in cards.iter().zip(CARD_ORIGINS) {
        draw_card(display, Rectangle::new(origin, CARD_SIZE), 10, BG_CARD);

        let center = origin + RING_OFFSET;
        draw_circular_progress(display, center, RING_RADIUS, RING_THICKNESS, card.percent, card.accent, BG_DARK);

        let mut value: String<8> = String::new();
        write!(value, "{:.0}%", card.percent.clamp(0.0, 100.0)).ok();
        Text::with_text_style(&value, center - Point::new(0, 5), LABEL_PRIMARY, TOP_CENTER)
            .draw(display)
            .ok();

        let label_pos = origin + LABEL_OFFSET;
        Text::with_text_style(card.label, label_pos, MonoTextStyle::new(TINY_FONT, card.accent), TOP_LEFT)
            .draw(display)
            .ok();

        draw_sparkline(display, card.history, Rectangle::new(origin + SPARK_OFFSET, SPARK_SIZE), card.accent);
    }

    // CPU temperature sits next to the CPU label, colored by tier
    if let Some(celsius) = sample.temperature_c {
        let mut temp: String<8> = String::new();
        write!(temp, "{celsius:.0}C").ok();
        let pos = CARD_ORIGINS[0] + LABEL_OFFSET + Point::new(text_width("CPU ", TINY_FONT) as i32, 0);
        Text::with_text_style(&temp, pos, MonoTextStyle::new(TINY_FONT, temperature_color(Some(celsius))), TOP_LEFT)
            .draw(display)
            .ok();
    }

    // Network rate next to its label
    let mut rate: String<12> = String::new();
    write!(rate, "{:.0}K", sample.net_rate_kbps.max(0.0)).ok();
    let pos = CARD_ORIGINS[3] + LABEL_OFFSET + Point::new(text_width("NETWORK ", TINY_FONT) as i32, 0);
    Text::with_text_style(&rate, pos, TINY_SECONDARY, TOP_LEFT)
        .draw(display)
        .ok();
}

fn draw_drive_summary<D>(
    display: &mut D,
    input: &FrameInput<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_card(display, DRIVES_CARD, 10, BG_CARD);
    let origin = DRIVES_CARD.top_left;

    Text::with_text_style("USB", origin + Point::new(10, 4), LABEL_PRIMARY, TOP_LEFT)
        .draw(display)
        .ok();
    let mut count: String<8> = String::new();
    write!(count, "{}", input.drives.len()).ok();
    draw_status_badge(display, origin + Point::new(32, 1), &count, GRADIENT_PRIMARY[0]);

    let Some(first) = input.drives.first() else {
        Text::with_text_style("No USB drives", origin + Point::new(10, 21), LABEL_MUTED, TOP_LEFT)
            .draw(display)
            .ok();
        return;
    };

    let share_color = if first.is_shared { GRADIENT_SUCCESS[0] } else { TEXT_MUTED };
    draw_glow_dot(display, origin + Point::new(73, 9), 3, 0, share_color, BG_CARD, 1.0);

    let name: String<14> = truncate(&first.name);
    Text::with_text_style(&name, origin + Point::new(82, 4), MonoTextStyle::new(SMALL_FONT, share_color), TOP_LEFT)
        .draw(display)
        .ok();

    draw_usage_bar(
        display,
        Rectangle::new(origin + Point::new(172, 5), Size::new(100, 10)),
        first.used_percent,
        TEXT_MUTED,
        BG_DARK,
    );

    let mut size: String<32> = String::new();
    write!(size, "{}/{}", format_bytes(first.used_bytes), format_bytes(first.total_bytes)).ok();
    Text::with_text_style(&size, origin + Point::new(82, 21), TINY_SECONDARY, TOP_LEFT)
        .draw(display)
        .ok();

    if input.drives.len() > 1 {
        let mut more: String<8> = String::new();
        write!(more, "+{}", input.drives.len() - 1).ok();
        Text::with_text_style(&more, origin + Point::new(300, 4), LABEL_MUTED, TOP_RIGHT)
            .draw(display)
            .ok();
    }
}

/// Copy as many leading characters as fit in `N` bytes.
pub(super) fn truncate<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
