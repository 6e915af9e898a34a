//! Animation clock and the blocking boot/shutdown sequences.
//!
//! # Continuous Phase
//!
//! [`AnimationClock`] counts loop ticks and derives the phase as
//! `ticks * step`, so the phase after N ticks is the same no matter how the
//! float additions would have rounded. Screens turn it into motion with
//! `sin()`; it is never wrapped.
//!
//! # Sequences
//!
//! ```text
//!   draw(160x120, t) ──► upscale (bilinear) ──► 320x240 ──► sink + screenshot
//!        ▲                                                        │
//!        └──────────────── k = 0..n, t = k/(n-1) ◄────────────────┘
//! ```
//!
//! Boot runs before the loop starts; shutdown runs after the stop signal and
//! finishes on a solid background frame.

pub mod boot;
pub mod shutdown;

use std::thread;
use std::time::Duration;

use embedded_graphics::prelude::*;
use tracing::{info, warn};

use crate::colors::BG_DARK;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH, SEQUENCE_HEIGHT, SEQUENCE_WIDTH};
use crate::display::{DisplaySink, ScreenshotWriter};
use crate::frame::Frame;

pub use boot::draw_boot_frame;
pub use shutdown::draw_shutdown_frame;

/// Tick-driven phase accumulator.
#[derive(Clone, Copy, Debug)]
pub struct AnimationClock {
    ticks: u64,
    step: f32,
}

impl AnimationClock {
    pub const fn new(step: f32) -> Self { Self { ticks: 0, step } }

    /// Advance one tick and return the new phase.
    pub fn tick(&mut self) -> f32 {
        self.ticks += 1;
        self.phase()
    }

    pub fn phase(&self) -> f32 { (self.ticks as f64 * f64::from(self.step)) as f32 }

    pub const fn ticks(&self) -> u64 { self.ticks }
}

/// Normalized progress of frame `frame` out of `frames`; the last frame is 1.
pub fn sequence_progress(
    frame: u32,
    frames: u32,
) -> f32 {
    if frames < 2 {
        return 1.0;
    }
    (frame.min(frames - 1) as f64 / f64::from(frames - 1)) as f32
}

/// Pacing and output shared by both sequences.
pub struct SequencePlayer<'a, S: ?Sized> {
    sink: &'a mut S,
    screenshots: &'a ScreenshotWriter,
    frame_delay: Duration,
}

impl<'a, S: DisplaySink + ?Sized> SequencePlayer<'a, S> {
    pub fn new(
        sink: &'a mut S,
        screenshots: &'a ScreenshotWriter,
        frame_delay: Duration,
    ) -> Self {
        Self {
            sink,
            screenshots,
            frame_delay,
        }
    }

    /// Render `frames` frames with `draw(canvas, t)` at the sequence
    /// resolution and push each one upscaled.
    pub fn play<F>(
        &mut self,
        frames: u32,
        mut draw: F,
    ) where
        F: FnMut(&mut Frame, f32),
    {
        let mut canvas = Frame::new(Size::new(SEQUENCE_WIDTH, SEQUENCE_HEIGHT), BG_DARK);
        let full = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        for k in 0..frames {
            draw(&mut canvas, sequence_progress(k, frames));
            self.show(&canvas.upscaled(full));
        }
    }

    /// Present one full-resolution frame, save it and wait the frame delay.
    pub fn show(
        &mut self,
        frame: &Frame,
    ) {
        if let Err(error) = self.sink.present(frame) {
            warn!(%error, "sequence frame not presented");
        }
        self.screenshots.save(frame);
        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay);
        }
    }
}

/// Play the boot sequence ending on `label`.
pub fn run_boot<S>(
    player: &mut SequencePlayer<'_, S>,
    frames: u32,
    label: &str,
) where
    S: DisplaySink + ?Sized,
{
    info!(frames, "boot sequence");
    player.play(frames, |canvas, t| draw_boot_frame(canvas, t, label));
}

/// Play the shutdown sequence, then blank the panel.
pub fn run_shutdown<S>(
    player: &mut SequencePlayer<'_, S>,
    frames: u32,
) where
    S: DisplaySink + ?Sized,
{
    info!(frames, "shutdown sequence");
    player.play(frames, draw_shutdown_frame);
    player.show(&Frame::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), BG_DARK));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingSink;

    #[test]
    fn test_phase_is_ticks_times_step() {
        let mut clock = AnimationClock::new(0.1);
        for _ in 0..1000 {
            clock.tick();
        }
        assert_eq!(clock.ticks(), 1000);
        assert!((clock.phase() - 100.0).abs() < 1e-4, "phase after 1000 ticks, got {}", clock.phase());
    }

    #[test]
    fn test_progress_hits_both_ends() {
        assert_eq!(sequence_progress(0, 90), 0.0);
        assert_eq!(sequence_progress(89, 90), 1.0, "last frame is exactly t = 1");
        assert!((sequence_progress(45, 91) - 0.5).abs() < 1e-6);
        assert_eq!(sequence_progress(0, 1), 1.0, "degenerate sequence jumps to the end");
    }

    #[test]
    fn test_boot_presents_every_frame_upscaled() {
        let mut sink = RecordingSink::default();
        let screenshots = ScreenshotWriter::disabled();
        let mut player = SequencePlayer::new(&mut sink, &screenshots, Duration::ZERO);
        run_boot(&mut player, 5, "piNAS");

        assert_eq!(sink.frames.len(), 5);
        for frame in &sink.frames {
            assert_eq!(frame.size(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        }
        let blank = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;
        assert_eq!(sink.frames[0].count_color(BG_DARK), blank, "t = 0 is an empty frame");
        assert!(sink.frames[4].count_color(BG_DARK) < blank, "label and blobs drawn on the last frame");
    }

    #[test]
    fn test_shutdown_ends_on_solid_frame() {
        let mut sink = RecordingSink::default();
        let screenshots = ScreenshotWriter::disabled();
        let mut player = SequencePlayer::new(&mut sink, &screenshots, Duration::ZERO);
        run_shutdown(&mut player, 4);

        assert_eq!(sink.frames.len(), 5, "sequence frames plus the blank frame");
        let last = sink.frames.last().expect("frames recorded");
        assert_eq!(last.count_color(BG_DARK), (SCREEN_WIDTH * SCREEN_HEIGHT) as usize);
        assert_ne!(sink.frames[0], *last, "the first shutdown frame is not blank");
    }

    #[test]
    fn test_sequence_writes_screenshot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("live.png");
        let mut sink = RecordingSink::default();
        let screenshots = ScreenshotWriter::new(Some(&path));
        let mut player = SequencePlayer::new(&mut sink, &screenshots, Duration::ZERO);
        run_boot(&mut player, 2, "piNAS");
        assert!(path.exists(), "live screenshot written during the sequence");
    }
}
