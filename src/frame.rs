//! Owned RGB565 pixel buffer that widgets draw into.
//!
//! [`Frame`] implements `DrawTarget`, so every widget and screen renders into
//! memory first; sinks receive the finished frame in one piece. This keeps
//! composition pure: identical inputs always produce identical pixels, which
//! [`Frame::fingerprint`] makes cheap to assert in tests.
//!
//! # Performance Optimizations
//!
//! - `fill_solid()` and `clear()` write whole rows instead of going through
//!   `draw_iter()` (gradients and cards are mostly solid fills)
//! - Out-of-bounds pixels are clipped once per call, never per primitive

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Heap-backed frame buffer in row-major order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl Frame {
    /// Create a frame filled with `background`.
    pub fn new(
        size: Size,
        background: Rgb565,
    ) -> Self {
        Self {
            width: size.width,
            height: size.height,
            pixels: vec![background; (size.width * size.height) as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Rgb565] { &self.pixels }

    /// Color at `point`, `None` outside the frame.
    pub fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb565> {
        self.index(point).map(|i| self.pixels[i])
    }

    #[inline]
    fn index(
        &self,
        point: Point,
    ) -> Option<usize> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Bilinear resample to `size`.
    ///
    /// Interpolates the raw 5/6/5 channels, so a uniform frame stays exactly
    /// uniform after scaling.
    pub fn upscaled(
        &self,
        size: Size,
    ) -> Self {
        let mut out = Self::new(size, Rgb565::BLACK);
        if self.width == 0 || self.height == 0 {
            return out;
        }

        let sx = self.width as f32 / size.width as f32;
        let sy = self.height as f32 / size.height as f32;
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;

        for y in 0..size.height {
            let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
            let y0 = fy as u32;
            let y1 = (y0 + 1).min(self.height - 1);
            let ty = fy - y0 as f32;
            for x in 0..size.width {
                let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
                let x0 = fx as u32;
                let x1 = (x0 + 1).min(self.width - 1);
                let tx = fx - x0 as f32;

                let top = mix(self.at(x0, y0), self.at(x1, y0), tx);
                let bottom = mix(self.at(x0, y1), self.at(x1, y1), tx);
                out.pixels[(y * size.width + x) as usize] = pack(mix(top, bottom, ty));
            }
        }
        out
    }

    #[inline]
    fn at(
        &self,
        x: u32,
        y: u32,
    ) -> [f32; 3] {
        let c = self.pixels[(y * self.width + x) as usize];
        [f32::from(c.r()), f32::from(c.g()), f32::from(c.b())]
    }

    /// Little-endian RGB565 bytes, the layout Linux 16bpp framebuffers expect.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 2);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.into_storage().to_le_bytes());
        }
        bytes
    }

    /// FNV-1a hash of the pixel data. Equal frames give equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut hash = OFFSET ^ (u64::from(self.width) << 32 | u64::from(self.height));
        for pixel in &self.pixels {
            for byte in pixel.into_storage().to_le_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(PRIME);
            }
        }
        hash
    }

    /// Number of pixels equal to `color`.
    pub fn count_color(
        &self,
        color: Rgb565,
    ) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }
}

#[inline]
fn mix(
    a: [f32; 3],
    b: [f32; 3],
    t: f32,
) -> [f32; 3] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t]
}

#[inline]
fn pack(c: [f32; 3]) -> Rgb565 {
    Rgb565::new(
        c[0].round().clamp(0.0, 31.0) as u8,
        c[1].round().clamp(0.0, 63.0) as u8,
        c[2].round().clamp(0.0, 31.0) as u8,
    )
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl DrawTarget for Frame {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let x0 = area.top_left.x as usize;
        let x1 = bottom_right.x as usize + 1;
        for y in area.top_left.y..=bottom_right.y {
            let row = y as usize * self.width as usize;
            self.pixels[row + x0..row + x1].fill(color);
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BG_DARK, COLOR_CPU, COLOR_MEM};
    use embedded_graphics::primitives::{PrimitiveStyle, StyledDrawable};

    #[test]
    fn test_new_frame_is_uniform() {
        let frame = Frame::new(Size::new(4, 3), BG_DARK);
        assert_eq!(frame.pixels().len(), 12);
        assert_eq!(frame.count_color(BG_DARK), 12);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_clipped() {
        let mut frame = Frame::new(Size::new(4, 4), BG_DARK);
        frame
            .draw_iter([Pixel(Point::new(-1, 0), COLOR_CPU), Pixel(Point::new(4, 1), COLOR_CPU)])
            .ok();
        assert_eq!(frame.count_color(BG_DARK), 16, "no in-bounds pixel should change");
        assert_eq!(frame.pixel(Point::new(9, 9)), None);
    }

    #[test]
    fn test_fill_solid_clips_to_frame() {
        let mut frame = Frame::new(Size::new(10, 10), BG_DARK);
        Rectangle::new(Point::new(8, 8), Size::new(10, 10))
            .draw_styled(&PrimitiveStyle::with_fill(COLOR_MEM), &mut frame)
            .ok();
        assert_eq!(frame.count_color(COLOR_MEM), 4, "only the 2x2 overlap should be filled");
        assert_eq!(frame.pixel(Point::new(9, 9)), Some(COLOR_MEM));
    }

    #[test]
    fn test_upscale_uniform_stays_uniform() {
        let small = Frame::new(Size::new(160, 120), COLOR_CPU);
        let big = small.upscaled(Size::new(320, 240));
        assert_eq!(big.size(), Size::new(320, 240));
        assert_eq!(big.count_color(COLOR_CPU), 320 * 240);
    }

    #[test]
    fn test_upscale_keeps_corners() {
        let mut small = Frame::new(Size::new(2, 2), BG_DARK);
        small.draw_iter([Pixel(Point::new(1, 1), COLOR_MEM)]).ok();
        let big = small.upscaled(Size::new(4, 4));
        assert_eq!(big.pixel(Point::new(0, 0)), Some(BG_DARK));
        assert_eq!(big.pixel(Point::new(3, 3)), Some(COLOR_MEM));
    }

    #[test]
    fn test_le_bytes_layout() {
        let frame = Frame::new(Size::new(1, 1), Rgb565::new(31, 0, 0));
        assert_eq!(frame.to_le_bytes(), vec![0x00, 0xF8], "pure red is 0xF800 little-endian");
    }

    #[test]
    fn test_fingerprint_distinguishes_frames() {
        let a = Frame::new(Size::new(8, 8), BG_DARK);
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.draw_iter([Pixel(Point::new(3, 3), COLOR_CPU)]).ok();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
