//! Desktop preview window (SDL), for developing screens without a panel.
//!
//! Mouse clicks become raw touches on a channel read by [`PointerTouch`],
//! which pairs with the `pointer` touch profile (identity calibration).
//! Closing the window raises the shutdown flag like SIGTERM does.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use tracing::debug;

use super::DisplaySink;
use crate::error::{AcquisitionError, DisplayError, Result};
use crate::frame::Frame;
use crate::touch::{RawTouch, TouchDriver};

/// Window scale factor; the 320x240 panel is small on a desktop monitor.
const SCALE: u32 = 2;

pub struct WindowSink {
    window: Window,
    canvas: SimulatorDisplay<Rgb565>,
    clicks: Sender<RawTouch>,
    shutdown: Arc<AtomicBool>,
}

/// Create a window sink and the touch driver fed by its mouse clicks.
pub fn open(
    size: Size,
    shutdown: Arc<AtomicBool>,
) -> (WindowSink, PointerTouch) {
    let settings = OutputSettingsBuilder::new().scale(SCALE).build();
    let (clicks, receiver) = channel();
    let sink = WindowSink {
        window: Window::new("piNAS Dashboard", &settings),
        canvas: SimulatorDisplay::new(size),
        clicks,
        shutdown,
    };
    (sink, PointerTouch { clicks: receiver })
}

impl DisplaySink for WindowSink {
    fn present(
        &mut self,
        frame: &Frame,
    ) -> Result<(), DisplayError> {
        let expected = self.canvas.size();
        if frame.size() != expected {
            return Err(DisplayError::SizeMismatch {
                expected_width: expected.width,
                expected_height: expected.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }
        let area = Rectangle::new(Point::zero(), expected);
        self.canvas.fill_contiguous(&area, frame.pixels().iter().copied()).ok();

        // update() must run before events() is polled
        self.window.update(&self.canvas);
        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => self.shutdown.store(true, Ordering::SeqCst),
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    debug!(x = point.x, y = point.y, "window click");
                    self.clicks.send(RawTouch { x: point.x, y: point.y }).ok();
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Touch driver that reports window clicks.
pub struct PointerTouch {
    clicks: Receiver<RawTouch>,
}

impl TouchDriver for PointerTouch {
    fn poll(&mut self) -> Result<Option<RawTouch>> {
        match self.clicks.try_recv() {
            Ok(touch) => Ok(Some(touch)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(AcquisitionError::Touch("preview window closed".into())),
        }
    }
}
