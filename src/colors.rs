//! Color palette for the NAS dashboard.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! The palette is authored as 8-bit RGB triples (easier to compare against
//! design mockups) and packed at compile time by [`rgb`].
//!
//! Gradient pairs are stored as `[start, end]` arrays. Widgets that only need
//! a flat color use the first entry.
//!
//! # Brightness Scaling
//!
//! The panel has no alpha channel. Fades are expressed by scaling a color
//! toward black with [`scale`], which reads correctly because every
//! background in the palette is near-black.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

/// Pack an 8-bit RGB triple into Rgb565 at compile time.
#[inline]
pub const fn rgb(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// =============================================================================
// Backgrounds
// =============================================================================

/// Screen background, also the final shutdown frame.
pub const BG_DARK: Rgb565 = rgb(10, 10, 15);

/// Card fill.
pub const BG_CARD: Rgb565 = rgb(20, 22, 30);

/// Slightly lighter card fill used for the header bar.
pub const BG_CARD_LIGHT: Rgb565 = rgb(28, 30, 40);

// =============================================================================
// Gradients
// =============================================================================

pub const GRADIENT_PRIMARY: [Rgb565; 2] = [rgb(100, 40, 240), rgb(180, 100, 255)];
pub const GRADIENT_SUCCESS: [Rgb565; 2] = [rgb(0, 200, 120), rgb(0, 255, 180)];
pub const GRADIENT_WARNING: [Rgb565; 2] = [rgb(255, 150, 0), rgb(255, 200, 60)];
pub const GRADIENT_ERROR: [Rgb565; 2] = [rgb(255, 50, 80), rgb(255, 120, 140)];
pub const GRADIENT_INFO: [Rgb565; 2] = [rgb(30, 150, 255), rgb(100, 200, 255)];

// =============================================================================
// Text
// =============================================================================

pub const TEXT_PRIMARY: Rgb565 = Rgb565::WHITE;
pub const TEXT_SECONDARY: Rgb565 = rgb(160, 165, 180);
pub const TEXT_MUTED: Rgb565 = rgb(100, 105, 120);

// =============================================================================
// Metric Accents
// =============================================================================

pub const COLOR_CPU: Rgb565 = rgb(255, 90, 120);
pub const COLOR_MEM: Rgb565 = rgb(100, 220, 255);
pub const COLOR_DISK: Rgb565 = rgb(160, 100, 255);
pub const COLOR_NET: Rgb565 = rgb(255, 200, 80);

// =============================================================================
// Status
// =============================================================================

pub const STATUS_ONLINE: Rgb565 = rgb(0, 255, 150);
pub const STATUS_WARNING: Rgb565 = rgb(255, 180, 0);
pub const STATUS_ERROR: Rgb565 = rgb(255, 60, 80);

/// Colors cycled by the shutdown rings and the boot blobs.
pub const SEQUENCE_PALETTE: [Rgb565; 4] = [
    GRADIENT_PRIMARY[0],
    GRADIENT_INFO[0],
    GRADIENT_SUCCESS[0],
    GRADIENT_WARNING[0],
];

// =============================================================================
// Color Math
// =============================================================================

/// Linear interpolation between two colors, `t` clamped to 0.0-1.0.
///
/// Interpolates in 8-bit space so that green (6 bits) and red/blue (5 bits)
/// move at the same perceived rate.
pub fn lerp(
    from: Rgb565,
    to: Rgb565,
    t: f32,
) -> Rgb565 {
    if !(t > 0.0) {
        return from;
    }
    if t >= 1.0 {
        return to;
    }
    let a = Rgb888::from(from);
    let b = Rgb888::from(to);
    let mix = |x: u8, y: u8| -> u8 { (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8 };
    Rgb565::from(Rgb888::new(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b())))
}

/// Scale a color toward black. `factor` 1.0 keeps the color, 0.0 gives black.
#[inline]
pub fn scale(
    color: Rgb565,
    factor: f32,
) -> Rgb565 {
    lerp(Rgb565::BLACK, color, factor)
}

/// Blend `color` over `background` with the given opacity.
#[inline]
pub fn blend(
    background: Rgb565,
    color: Rgb565,
    alpha: f32,
) -> Rgb565 {
    lerp(background, color, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_packs_white_and_black() {
        assert_eq!(rgb(255, 255, 255), Rgb565::WHITE);
        assert_eq!(rgb(0, 0, 0), Rgb565::BLACK);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(COLOR_CPU, COLOR_NET, 0.0), COLOR_CPU, "t=0 should return the start color");
        assert_eq!(lerp(COLOR_CPU, COLOR_NET, 1.0), COLOR_NET, "t=1 should return the end color");
    }

    #[test]
    fn test_lerp_clamps_out_of_range_t() {
        assert_eq!(lerp(BG_DARK, TEXT_PRIMARY, -3.0), BG_DARK);
        assert_eq!(lerp(BG_DARK, TEXT_PRIMARY, 7.0), TEXT_PRIMARY);
    }

    #[test]
    fn test_scale_half_is_between() {
        let half = Rgb888::from(scale(Rgb565::WHITE, 0.5));
        assert!(half.r() > 100 && half.r() < 160, "half-scaled white should be mid gray, got {}", half.r());
        assert_eq!(scale(STATUS_ONLINE, 0.0), Rgb565::BLACK);
    }
}
