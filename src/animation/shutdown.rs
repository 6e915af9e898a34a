//! Shutdown sequence: rings implode toward the center while particles
//! spiral in and the label fades out.
//!
//! Ring `i` of 15 runs `ring_progress = t + i/15` and is visible only while
//! that stays below 1, so the outer rings vanish first and the last one
//! collapses exactly at t = 1.

use core::f32::consts::TAU;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};

use crate::colors::{BG_DARK, SEQUENCE_PALETTE, TEXT_PRIMARY, blend};
use crate::config::{SEQUENCE_HEIGHT, SEQUENCE_WIDTH};
use crate::styles::{CENTERED, SEQUENCE_FONT};
use crate::widgets::draw_glowing_text;

pub const RING_COUNT: usize = 15;
pub const PARTICLE_COUNT: usize = 20;

const PARTICLE_ORBIT: f32 = 60.0;
const LABEL_FADE_END: f32 = 0.6;
const LABEL: &str = "Shutting Down";

/// One visible ring.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ring {
    pub radius: f32,
    pub brightness: f32,
    pub color: Rgb565,
}

/// Visible rings at progress `t`, outermost ring index first.
pub fn rings(t: f32) -> Vec<Ring> {
    let t = t.clamp(0.0, 1.0);
    let max_extent = SEQUENCE_WIDTH.max(SEQUENCE_HEIGHT) as f32;
    (0..RING_COUNT)
        .filter_map(|i| {
            let ring_t = i as f32 / RING_COUNT as f32;
            let progress = t + ring_t;
            if progress >= 1.0 {
                return None;
            }
            let palette_index = ((ring_t * 4.0 + t) * 4.0) as usize % SEQUENCE_PALETTE.len();
            Some(Ring {
                radius: (1.0 - progress) * max_extent,
                brightness: 1.0 - progress,
                color: SEQUENCE_PALETTE[palette_index],
            })
        })
        .collect()
}

/// Spiral particle positions at progress `t`, relative to the center.
pub fn particle_offsets(t: f32) -> [(f32, f32); PARTICLE_COUNT] {
    let t = t.clamp(0.0, 1.0);
    let radius = PARTICLE_ORBIT * (1.0 - t);
    core::array::from_fn(|i| {
        let angle = TAU * i as f32 / PARTICLE_COUNT as f32 + 2.0 * TAU * t;
        (radius * angle.cos(), radius * angle.sin())
    })
}

/// Label opacity: fades out linearly over the first 60%.
#[inline]
pub fn label_alpha(t: f32) -> f32 { (1.0 - t / LABEL_FADE_END).clamp(0.0, 1.0) }

/// Render shutdown frame at progress `t` into a 160x120 target.
pub fn draw_shutdown_frame<D>(
    display: &mut D,
    t: f32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BG_DARK).ok();
    let center = Point::new((SEQUENCE_WIDTH / 2) as i32, (SEQUENCE_HEIGHT / 2) as i32);

    for ring in rings(t) {
        let diameter = (2.0 * ring.radius).round() as u32 + 1;
        Circle::with_center(center, diameter)
            .into_styled(PrimitiveStyle::with_stroke(blend(BG_DARK, ring.color, ring.brightness), 2))
            .draw(display)
            .ok();
    }

    let brightness = 1.0 - t.clamp(0.0, 1.0);
    if brightness > 0.0 {
        for (i, (dx, dy)) in particle_offsets(t).into_iter().enumerate() {
            let color = SEQUENCE_PALETTE[i % SEQUENCE_PALETTE.len()];
            Circle::with_center(center + Point::new(dx.round() as i32, dy.round() as i32), 3)
                .into_styled(PrimitiveStyle::with_fill(blend(BG_DARK, color, brightness)))
                .draw(display)
                .ok();
        }
    }

    draw_glowing_text(display, LABEL, center, SEQUENCE_FONT, CENTERED, TEXT_PRIMARY, BG_DARK, label_alpha(t));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    #[test]
    fn test_all_rings_visible_at_start() {
        let start = rings(0.0);
        assert_eq!(start.len(), RING_COUNT);
        assert_eq!(start[0].radius, 160.0, "ring 0 starts at the frame's larger extent");
        assert_eq!(start[0].brightness, 1.0);
    }

    #[test]
    fn test_rings_implode_in_stagger() {
        let half = rings(0.5);
        assert_eq!(half.len(), 8, "rings with i/15 < 0.5 remain");
        for pair in half.windows(2) {
            assert!(pair[0].radius > pair[1].radius, "lower index rings are larger");
        }
        assert!(rings(1.0).is_empty(), "every ring has collapsed at the end");
    }

    #[test]
    fn test_particles_spiral_inward() {
        let (x0, y0) = particle_offsets(0.0)[0];
        assert!((x0 - 60.0).abs() < 1e-3 && y0.abs() < 1e-3);
        for (x, y) in particle_offsets(1.0) {
            assert!(x.abs() < 1e-3 && y.abs() < 1e-3, "particles reach the center");
        }
    }

    #[test]
    fn test_label_fade() {
        assert_eq!(label_alpha(0.0), 1.0);
        assert!((label_alpha(0.3) - 0.5).abs() < 1e-4);
        assert_eq!(label_alpha(0.6), 0.0);
        assert_eq!(label_alpha(0.9), 0.0);
    }

    #[test]
    fn test_last_frame_is_empty() {
        let mut frame = Frame::new(Size::new(SEQUENCE_WIDTH, SEQUENCE_HEIGHT), BG_DARK);
        draw_shutdown_frame(&mut frame, 1.0);
        assert_eq!(frame.count_color(BG_DARK), (SEQUENCE_WIDTH * SEQUENCE_HEIGHT) as usize);
    }
}
