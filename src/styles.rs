//! Pre-computed static text and primitive styles.
//!
//! `MonoTextStyle` and `TextStyle` construction is `const` in embedded-graphics
//! 0.8, so the fixed styles live here instead of being rebuilt every frame.
//!
//! All text is positioned by its top-left corner (`Baseline::Top`), which
//! keeps layout coordinates identical to the card rectangles they sit in.
//!
//! # Dynamic Color Styles
//!
//! Text whose color depends on data (tiers, fades) uses the exposed font
//! references: `MonoTextStyle::new(SMALL_FONT, color)`.

use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::{PROFONT_10_POINT, PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT};

use crate::colors::{TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, positioned by top edge.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Centered horizontally, positioned by top edge.
pub const TOP_CENTER: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned, positioned by top edge. Used for the clock.
pub const TOP_RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();

/// Centered on both axes. Used for sequence labels.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Font References
// =============================================================================

/// 6x10 font for labels and badges.
pub const SMALL_FONT: &MonoFont = &FONT_6X10;

/// 5x8 font for the tightest spots (pill text, drive sizes).
pub const TINY_FONT: &MonoFont = &FONT_5X8;

/// Section titles.
pub const TITLE_FONT: &MonoFont = &PROFONT_14_POINT;

/// Big numbers on the stats screen.
pub const LARGE_FONT: &MonoFont = &PROFONT_18_POINT;

/// Boot/shutdown labels at the internal sequence resolution.
pub const SEQUENCE_FONT: &MonoFont = &PROFONT_10_POINT;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

pub const LABEL_PRIMARY: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, TEXT_PRIMARY);
pub const LABEL_SECONDARY: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, TEXT_SECONDARY);
pub const LABEL_MUTED: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, TEXT_MUTED);
pub const TINY_SECONDARY: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_5X8, TEXT_SECONDARY);
pub const VALUE_PRIMARY: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_12_POINT, TEXT_PRIMARY);
pub const TITLE_PRIMARY: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_14_POINT, TEXT_PRIMARY);

/// Pixel width of `text` rendered in a monospace `font`.
pub fn text_width(
    text: &str,
    font: &MonoFont,
) -> u32 {
    let count = text.chars().count() as u32;
    if count == 0 {
        return 0;
    }
    count * font.character_size.width + (count - 1) * font.character_spacing
}
