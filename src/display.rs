//! Display sinks: where finished frames go.
//!
//! The loop hands every frame to a [`DisplaySink`] and never waits on or
//! retries a failed present. Sinks:
//!
//! - [`FramebufferSink`]: Linux framebuffer device (fbtft SPI panels)
//! - [`HeadlessSink`]: discards frames
//! - `window::WindowSink`: desktop preview, behind the `window` feature
//!
//! [`ScreenshotWriter`] keeps a PNG copy of the latest frame for remote
//! monitoring. It is best effort: failures are logged at debug level.

#[cfg(feature = "window")]
pub mod window;

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use tracing::{debug, info};

use crate::error::DisplayError;
use crate::frame::Frame;

/// Receives composed frames.
pub trait DisplaySink {
    fn present(
        &mut self,
        frame: &Frame,
    ) -> Result<(), DisplayError>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn present(
        &mut self,
        frame: &Frame,
    ) -> Result<(), DisplayError> {
        (**self).present(frame)
    }
}

// =============================================================================
// Framebuffer
// =============================================================================

/// Writes little-endian RGB565 frames to a 16bpp framebuffer device.
pub struct FramebufferSink {
    device: File,
    size: Size,
}

impl FramebufferSink {
    /// Open `path` for writing. `size` is the panel resolution.
    pub fn open(
        path: &Path,
        size: Size,
    ) -> Result<Self, DisplayError> {
        let device = OpenOptions::new().write(true).open(path)?;
        info!(device = %path.display(), width = size.width, height = size.height, "framebuffer opened");
        Ok(Self { device, size })
    }
}

impl DisplaySink for FramebufferSink {
    fn present(
        &mut self,
        frame: &Frame,
    ) -> Result<(), DisplayError> {
        if frame.size() != self.size {
            return Err(DisplayError::SizeMismatch {
                expected_width: self.size.width,
                expected_height: self.size.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }
        self.device.seek(SeekFrom::Start(0))?;
        self.device.write_all(&frame.to_le_bytes())?;
        self.device.flush()?;
        Ok(())
    }
}

/// Accepts and drops every frame.
#[derive(Default)]
pub struct HeadlessSink {
    presented: u64,
}

impl HeadlessSink {
    pub const fn new() -> Self { Self { presented: 0 } }

    /// Frames received so far.
    pub const fn presented(&self) -> u64 { self.presented }
}

impl DisplaySink for HeadlessSink {
    fn present(
        &mut self,
        _frame: &Frame,
    ) -> Result<(), DisplayError> {
        self.presented += 1;
        Ok(())
    }
}

// =============================================================================
// Live Screenshot
// =============================================================================

/// Saves the latest frame as PNG.
pub struct ScreenshotWriter {
    path: Option<PathBuf>,
}

impl ScreenshotWriter {
    /// `None` disables screenshots.
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    pub const fn disabled() -> Self { Self { path: None } }

    pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

    /// Write `frame` to the screenshot path. Never fails the caller.
    pub fn save(
        &self,
        frame: &Frame,
    ) {
        let Some(path) = self.path.as_deref() else {
            return;
        };

        let mut canvas: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(frame.size());
        let area = Rectangle::new(Point::zero(), frame.size());
        canvas.fill_contiguous(&area, frame.pixels().iter().copied()).ok();

        let image = canvas.to_rgb_output_image(&OutputSettingsBuilder::new().build());
        if let Err(error) = image.save_png(path) {
            debug!(%error, path = %path.display(), "screenshot not saved");
        }
    }
}

// =============================================================================
// Test Sink
// =============================================================================

/// Keeps every presented frame.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub frames: Vec<Frame>,
}

#[cfg(test)]
impl DisplaySink for RecordingSink {
    fn present(
        &mut self,
        frame: &Frame,
    ) -> Result<(), DisplayError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BG_DARK, COLOR_CPU};

    #[test]
    fn test_framebuffer_writes_le_pixels() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let mut sink = FramebufferSink::open(file.path(), Size::new(2, 2)).expect("open");

        let mut frame = Frame::new(Size::new(2, 2), BG_DARK);
        frame.fill_solid(&Rectangle::new(Point::zero(), Size::new(1, 1)), COLOR_CPU).ok();
        sink.present(&frame).expect("present");
        // A second present overwrites from offset 0
        sink.present(&frame).expect("present again");

        let written = std::fs::read(file.path()).expect("read back");
        assert_eq!(written, frame.to_le_bytes(), "device holds exactly one frame");
        assert_eq!(&written[..2], &COLOR_CPU.into_storage().to_le_bytes());
    }

    #[test]
    fn test_framebuffer_rejects_wrong_size() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let mut sink = FramebufferSink::open(file.path(), Size::new(4, 4)).expect("open");
        let result = sink.present(&Frame::new(Size::new(2, 2), BG_DARK));
        assert!(matches!(result, Err(DisplayError::SizeMismatch { actual_width: 2, .. })));
    }

    #[test]
    fn test_headless_counts_frames() {
        let mut sink = HeadlessSink::new();
        let frame = Frame::new(Size::new(1, 1), BG_DARK);
        sink.present(&frame).expect("present");
        sink.present(&frame).expect("present");
        assert_eq!(sink.presented(), 2);
    }

    #[test]
    fn test_screenshot_written_as_png() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("live.png");
        let writer = ScreenshotWriter::new(Some(&path));
        writer.save(&Frame::new(Size::new(8, 4), BG_DARK));

        let bytes = std::fs::read(&path).expect("screenshot exists");
        assert_eq!(&bytes[1..4], b"PNG", "file has a PNG signature");
    }

    #[test]
    fn test_screenshot_failure_is_swallowed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let writer = ScreenshotWriter::new(Some(&dir.path().join("missing/dir/live.png")));
        writer.save(&Frame::new(Size::new(8, 4), BG_DARK));
        assert!(ScreenshotWriter::disabled().path().is_none());
    }
}
