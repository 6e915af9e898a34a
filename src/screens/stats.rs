//! Stats screen: large numbers, no charts.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;

use super::FrameInput;
use crate::colors::{BG_CARD, BG_DARK, COLOR_CPU, COLOR_DISK, COLOR_MEM, COLOR_NET, GRADIENT_PRIMARY, TEXT_SECONDARY};
use crate::metrics::bytes_to_gb;
use crate::styles::{LABEL_PRIMARY, LARGE_FONT, TINY_FONT, TINY_SECONDARY, TOP_LEFT};
use crate::thresholds::{Tier, temperature_color};
use crate::widgets::{draw_card, draw_screen_indicators};

const HALF_CARD: Size = Size::new(152, 60);
const WIDE_CARD: Size = Size::new(310, 60);
const IP_CARD: Rectangle = Rectangle::new(Point::new(5, 200), Size::new(310, 26));

struct StatCard<'a> {
    area: Rectangle,
    label: &'a str,
    value: &'a str,
    detail: &'a str,
    accent: Rgb565,
    value_color: Rgb565,
}

fn draw_stat_card<D>(
    display: &mut D,
    card: &StatCard<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_card(display, card.area, 8, BG_CARD);
    let origin = card.area.top_left;
    Rectangle::new(origin + Point::new(0, 10), Size::new(3, card.area.size.height - 20))
        .into_styled(PrimitiveStyle::with_fill(card.accent))
        .draw(display)
        .ok();
    Text::with_text_style(card.label, origin + Point::new(10, 6), MonoTextStyle::new(TINY_FONT, card.accent), TOP_LEFT)
        .draw(display)
        .ok();
    Text::with_text_style(
        card.value,
        origin + Point::new(10, 18),
        MonoTextStyle::new(LARGE_FONT, card.value_color),
        TOP_LEFT,
    )
    .draw(display)
    .ok();
    Text::with_text_style(card.detail, origin + Point::new(10, 46), TINY_SECONDARY, TOP_LEFT)
        .draw(display)
        .ok();
}

pub(super) fn draw<D>(
    display: &mut D,
    input: &FrameInput<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BG_DARK).ok();
    let sample = input.sample;

    let mut cpu: String<16> = String::new();
    write!(cpu, "{:.1}%", sample.cpu_percent).ok();

    let mut temp: String<16> = String::new();
    match sample.temperature_c {
        Some(celsius) => write!(temp, "{celsius:.1}C").ok(),
        None => write!(temp, "--").ok(),
    };

    let mut memory: String<16> = String::new();
    write!(memory, "{:.1}%", sample.memory_percent).ok();
    let mut memory_detail: String<32> = String::new();
    write!(memory_detail, "{:.1}/{:.1} GB", bytes_to_gb(sample.memory_used), bytes_to_gb(sample.memory_total)).ok();

    let mut disk: String<16> = String::new();
    write!(disk, "{:.1}%", sample.disk_percent).ok();
    let mut disk_detail: String<32> = String::new();
    write!(disk_detail, "{:.1}/{:.1} GB", bytes_to_gb(sample.disk_used), bytes_to_gb(sample.disk_total)).ok();

    let mut network: String<16> = String::new();
    format_rate(&mut network, sample.net_rate_kbps);

    let cards = [
        StatCard {
            area: Rectangle::new(Point::new(5, 5), HALF_CARD),
            label: "CPU",
            value: &cpu,
            detail: "usage",
            accent: COLOR_CPU,
            value_color: Tier::for_usage(sample.cpu_percent).status_color(),
        },
        StatCard {
            area: Rectangle::new(Point::new(163, 5), HALF_CARD),
            label: "TEMPERATURE",
            value: &temp,
            detail: "cpu_thermal",
            accent: COLOR_CPU,
            value_color: temperature_color(sample.temperature_c),
        },
        StatCard {
            area: Rectangle::new(Point::new(5, 70), HALF_CARD),
            label: "MEMORY",
            value: &memory,
            detail: &memory_detail,
            accent: COLOR_MEM,
            value_color: Tier::for_usage(sample.memory_percent).status_color(),
        },
        StatCard {
            area: Rectangle::new(Point::new(163, 70), HALF_CARD),
            label: "STORAGE",
            value: &disk,
            detail: &disk_detail,
            accent: COLOR_DISK,
            value_color: Tier::for_usage(sample.disk_percent).status_color(),
        },
        StatCard {
            area: Rectangle::new(Point::new(5, 135), WIDE_CARD),
            label: "NETWORK",
            value: &network,
            detail: "rx + tx",
            accent: COLOR_NET,
            value_color: COLOR_NET,
        },
    ];
    for card in &cards {
        draw_stat_card(display, card);
    }

    draw_card(display, IP_CARD, 8, BG_CARD);
    Text::with_text_style("IP", IP_CARD.top_left + Point::new(10, 8), MonoTextStyle::new(TINY_FONT, TEXT_SECONDARY), TOP_LEFT)
        .draw(display)
        .ok();
    Text::with_text_style(&sample.ip_address, IP_CARD.top_left + Point::new(30, 8), LABEL_PRIMARY, TOP_LEFT)
        .draw(display)
        .ok();

    draw_screen_indicators(display, input.screen_count, input.screen.index(), GRADIENT_PRIMARY[1]);
}

/// "512.0 KB/s" below 1000 KB/s, "1.5 MB/s" above.
fn format_rate<const N: usize>(
    out: &mut String<N>,
    kbps: f32,
) {
    let kbps = kbps.max(0.0);
    if kbps < 1000.0 {
        write!(out, "{kbps:.1} KB/s").ok();
    } else {
        write!(out, "{:.1} MB/s", kbps / 1024.0).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate_units() {
        let mut slow: String<16> = String::new();
        format_rate(&mut slow, 512.0);
        assert_eq!(slow.as_str(), "512.0 KB/s");

        let mut fast: String<16> = String::new();
        format_rate(&mut fast, 1536.0);
        assert_eq!(fast.as_str(), "1.5 MB/s");
    }

    #[test]
    fn test_format_rate_negative_is_zero() {
        let mut out: String<16> = String::new();
        format_rate(&mut out, -3.0);
        assert_eq!(out.as_str(), "0.0 KB/s");
    }
}
