//! Boot sequence: four blobs spiral in, orbit, then burst into the label.
//!
//! # Phases (t = normalized progress 0..1)
//!
//! | t          | orbit radius        | blob size     | extra                    |
//! |------------|---------------------|---------------|--------------------------|
//! | 0.0 - 0.4  | 80 -> 25            | 0 -> 8        | spiral inward            |
//! | 0.4 - 0.7  | 25                  | 8 -> 16       | steady orbit             |
//! | 0.7 - 1.0  | 25 * (1 - 0.8p)     | 16 + 30p      | explosion p, tendrils    |
//!
//! `p` is the local progress within a phase. Blobs sit at
//! `6π·t + 2π·i/4` and their size pulses by `1 + 0.2·sin(2·angle + i)`.
//! The label fades in from t = 0.5 with a soft glow. Particles spawn once
//! the explosion passes 0.5.
//!
//! All geometry is a pure function of `t`, computed in the sequence's
//! internal 160x120 coordinate space.

use core::f32::consts::TAU;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};

use crate::colors::{BG_DARK, SEQUENCE_PALETTE, TEXT_PRIMARY, blend, lerp};
use crate::config::{SEQUENCE_HEIGHT, SEQUENCE_WIDTH};
use crate::styles::{CENTERED, SEQUENCE_FONT};
use crate::widgets::{draw_glow_dot, draw_glowing_text};

pub const BLOB_COUNT: usize = 4;

const ORBIT_START: f32 = 80.0;
const ORBIT_HOLD: f32 = 25.0;
const SPIRAL_END: f32 = 0.4;
const ORBIT_END: f32 = 0.7;
const LABEL_START: f32 = 0.5;

/// Where the label sits, below the blob cluster.
const LABEL_POS: Point = Point::new((SEQUENCE_WIDTH / 2) as i32, 100);

/// Parameters shared by every blob at progress `t`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BootGeometry {
    pub orbit_radius: f32,
    pub blob_size: f32,
    /// 0 until t = 0.7, then ramps to 1.
    pub explosion: f32,
    pub base_angle: f32,
    pub label_alpha: f32,
}

/// One blob's position and rendered radius.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Blob {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb565,
}

/// One burst particle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
    pub color: Rgb565,
}

pub fn boot_geometry(t: f32) -> BootGeometry {
    let t = t.clamp(0.0, 1.0);
    let (orbit_radius, blob_size, explosion) = if t < SPIRAL_END {
        let p = t / SPIRAL_END;
        (ORBIT_START - (ORBIT_START - ORBIT_HOLD) * p, 8.0 * p, 0.0)
    } else if t < ORBIT_END {
        let p = (t - SPIRAL_END) / (ORBIT_END - SPIRAL_END);
        (ORBIT_HOLD, 8.0 + 8.0 * p, 0.0)
    } else {
        let p = (t - ORBIT_END) / (1.0 - ORBIT_END);
        (ORBIT_HOLD * (1.0 - 0.8 * p), 16.0 + 30.0 * p, p)
    };
    BootGeometry {
        orbit_radius,
        blob_size,
        explosion,
        base_angle: t * 3.0 * TAU,
        label_alpha: ((t - LABEL_START) / (1.0 - LABEL_START)).clamp(0.0, 1.0),
    }
}

pub fn blobs(geometry: &BootGeometry) -> [Blob; BLOB_COUNT] {
    let cx = SEQUENCE_WIDTH as f32 / 2.0;
    let cy = SEQUENCE_HEIGHT as f32 / 2.0;
    core::array::from_fn(|i| {
        let angle = geometry.base_angle + TAU * i as f32 / BLOB_COUNT as f32;
        let pulse = 1.0 + 0.2 * (2.0 * geometry.base_angle + i as f32).sin();
        Blob {
            x: cx + geometry.orbit_radius * angle.cos(),
            y: cy + geometry.orbit_radius * angle.sin(),
            radius: geometry.blob_size * pulse,
            color: SEQUENCE_PALETTE[i % SEQUENCE_PALETTE.len()],
        }
    })
}

/// Burst particles; empty until the explosion passes 0.5.
pub fn particles(geometry: &BootGeometry) -> Vec<Particle> {
    let e = geometry.explosion;
    if e <= 0.5 {
        return Vec::new();
    }
    let count = ((e - 0.5) * 80.0) as usize;
    let cx = SEQUENCE_WIDTH as f32 / 2.0;
    let cy = SEQUENCE_HEIGHT as f32 / 2.0;
    (0..count)
        .map(|j| {
            let angle = TAU * j as f32 / count as f32 + geometry.base_angle * 0.5;
            // Deterministic spread so particles form a ragged ring
            let spread = 0.6 + 0.4 * ((j * 37) % 10) as f32 / 10.0;
            let distance = e * 100.0 * spread;
            Particle {
                x: cx + distance * angle.cos(),
                y: cy + distance * angle.sin(),
                size: 2.0 + 2.0 * e,
                brightness: (1.0 - (e - 0.5) * 2.0).clamp(0.0, 1.0),
                color: SEQUENCE_PALETTE[j % SEQUENCE_PALETTE.len()],
            }
        })
        .collect()
}

#[inline]
fn to_point(
    x: f32,
    y: f32,
) -> Point {
    Point::new(x.round() as i32, y.round() as i32)
}

/// Render boot frame at progress `t` into a 160x120 target.
pub fn draw_boot_frame<D>(
    display: &mut D,
    t: f32,
    label: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BG_DARK).ok();
    let geometry = boot_geometry(t);
    let blobs = blobs(&geometry);

    // Tendrils between neighbours, fading in with the explosion
    if geometry.explosion > 0.0 {
        for i in 0..BLOB_COUNT {
            let a = blobs[i];
            let b = blobs[(i + 1) % BLOB_COUNT];
            let color = blend(BG_DARK, lerp(a.color, b.color, 0.5), geometry.explosion);
            Line::new(to_point(a.x, a.y), to_point(b.x, b.y))
                .into_styled(PrimitiveStyle::with_stroke(color, 2))
                .draw(display)
                .ok();
        }
    }

    for particle in particles(&geometry) {
        Circle::with_center(to_point(particle.x, particle.y), particle.size.round() as u32)
            .into_styled(PrimitiveStyle::with_fill(blend(BG_DARK, particle.color, particle.brightness)))
            .draw(display)
            .ok();
    }

    for blob in &blobs {
        if blob.radius < 0.5 {
            continue;
        }
        let center = to_point(blob.x, blob.y);
        let radius = blob.radius.round() as u32;
        draw_glow_dot(display, center, radius, 4, blob.color, BG_DARK, 1.0);

        // Shine highlight up and to the left
        let shine = (blob.radius / 4.0).max(1.0);
        let offset = blob.radius / 3.0;
        Circle::with_center(to_point(blob.x - offset, blob.y - offset), (2.0 * shine).round() as u32)
            .into_styled(PrimitiveStyle::with_fill(lerp(blob.color, TEXT_PRIMARY, 0.6)))
            .draw(display)
            .ok();
    }

    draw_glowing_text(display, label, LABEL_POS, SEQUENCE_FONT, CENTERED, TEXT_PRIMARY, BG_DARK, geometry.label_alpha);
}

#[cfg(test)]
mod tests {
    use core::f32::consts::PI;

    use super::*;
    use crate::frame::Frame;

    fn blob_angle(
        t: f32,
        index: usize,
    ) -> f32 {
        boot_geometry(t).base_angle + 2.0 * PI * index as f32 / BLOB_COUNT as f32
    }

    fn distance_from_center(blob: &Blob) -> f32 {
        let dx = blob.x - SEQUENCE_WIDTH as f32 / 2.0;
        let dy = blob.y - SEQUENCE_HEIGHT as f32 / 2.0;
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn test_start_is_wide_and_small() {
        let geometry = boot_geometry(0.0);
        assert_eq!(geometry.orbit_radius, ORBIT_START, "blobs start at maximum orbit");
        assert_eq!(geometry.blob_size, 0.0, "blobs start minimal");
        for blob in blobs(&geometry) {
            assert!((distance_from_center(&blob) - ORBIT_START).abs() < 0.01);
        }
    }

    #[test]
    fn test_end_is_collapsed_with_opaque_label() {
        let geometry = boot_geometry(1.0);
        assert_eq!(geometry.label_alpha, 1.0, "label fully opaque at the end");
        assert!(geometry.orbit_radius <= 5.0 + 1e-4, "orbit collapsed, got {}", geometry.orbit_radius);
        assert!(geometry.orbit_radius < boot_geometry(0.7).orbit_radius);
        assert_eq!(geometry.explosion, 1.0);
    }

    #[test]
    fn test_phase_boundaries_are_continuous() {
        for boundary in [SPIRAL_END, ORBIT_END] {
            let before = boot_geometry(boundary - 1e-4);
            let after = boot_geometry(boundary);
            assert!((before.orbit_radius - after.orbit_radius).abs() < 0.1, "orbit jumps at t={boundary}");
            assert!((before.blob_size - after.blob_size).abs() < 0.1, "size jumps at t={boundary}");
        }
    }

    #[test]
    fn test_label_fades_in_after_half() {
        assert_eq!(boot_geometry(0.3).label_alpha, 0.0);
        assert_eq!(boot_geometry(0.5).label_alpha, 0.0);
        assert!((boot_geometry(0.75).label_alpha - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_blobs_are_evenly_spaced() {
        let a0 = blob_angle(0.2, 0);
        let a1 = blob_angle(0.2, 1);
        assert!((a1 - a0 - PI / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_explosion_only_in_final_phase() {
        assert_eq!(boot_geometry(0.69).explosion, 0.0);
        assert!(boot_geometry(0.85).explosion > 0.4);
    }

    #[test]
    fn test_particle_count() {
        assert!(particles(&boot_geometry(0.8)).is_empty(), "explosion 1/3 spawns nothing");
        assert_eq!(particles(&boot_geometry(1.0)).len(), 40, "(1.0 - 0.5) * 80 particles at full explosion");
    }

    #[test]
    fn test_frame_is_deterministic() {
        let mut a = Frame::new(Size::new(SEQUENCE_WIDTH, SEQUENCE_HEIGHT), BG_DARK);
        let mut b = a.clone();
        draw_boot_frame(&mut a, 0.63, "piNAS");
        draw_boot_frame(&mut b, 0.63, "piNAS");
        assert_eq!(a, b);
    }

    #[test]
    fn test_final_frame_shows_label() {
        let mut frame = Frame::new(Size::new(SEQUENCE_WIDTH, SEQUENCE_HEIGHT), BG_DARK);
        draw_boot_frame(&mut frame, 1.0, "piNAS");
        assert!(frame.count_color(TEXT_PRIMARY) > 0);

        let mut early = Frame::new(Size::new(SEQUENCE_WIDTH, SEQUENCE_HEIGHT), BG_DARK);
        draw_boot_frame(&mut early, 0.0, "piNAS");
        assert_eq!(early.count_color(BG_DARK), (SEQUENCE_WIDTH * SEQUENCE_HEIGHT) as usize, "t=0 is an empty frame");
    }
}
