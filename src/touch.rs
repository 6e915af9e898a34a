//! Touch input: raw sensor readings to screen coordinates, plus debounce.
//!
//! # Calibration
//!
//! Resistive controllers report 12-bit ADC values that do not line up with
//! the panel. Each supported controller gets a named [`TouchProfile`] with a
//! fixed [`Calibration`]. The mapping is:
//!
//! ```text
//! nx, ny = normalize(raw) into [0, 1]
//! swap   -> (nx, ny) = (ny, nx)
//! invert -> n = 1 - n per output axis
//! screen = clamp(floor(n * size), 0, size - 1)
//! ```
//!
//! The STMPE610 and XPT2046 breakouts are mounted rotated relative to the
//! panel, so both profiles swap axes and invert the output Y axis.
//!
//! # No-touch vs (0, 0)
//!
//! A driver that reports no contact yields `None`. A sensor read error also
//! yields `None` (logged at debug). Neither ever becomes a zero point.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::Result;

/// Raw controller reading.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RawTouch {
    pub x: i32,
    pub y: i32,
}

/// Calibrated point, always inside the panel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScreenPoint {
    pub x: u32,
    pub y: u32,
}

impl ScreenPoint {
    #[inline]
    pub const fn new(
        x: u32,
        y: u32,
    ) -> Self {
        Self { x, y }
    }
}

/// Non-blocking source of raw touch readings.
pub trait TouchDriver {
    /// `Ok(None)` when nothing is touching the panel.
    fn poll(&mut self) -> Result<Option<RawTouch>>;
}

impl<T: TouchDriver + ?Sized> TouchDriver for Box<T> {
    fn poll(&mut self) -> Result<Option<RawTouch>> { (**self).poll() }
}

/// Driver for setups without a touch controller.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoTouch;

impl TouchDriver for NoTouch {
    fn poll(&mut self) -> Result<Option<RawTouch>> { Ok(None) }
}

// =============================================================================
// Calibration
// =============================================================================

/// Affine mapping from raw controller units to the panel.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Calibration {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    /// Raw X drives screen Y and vice versa.
    pub swap_axes: bool,
    /// Flip the output X axis (after swap).
    pub invert_x: bool,
    /// Flip the output Y axis (after swap).
    pub invert_y: bool,
}

/// Supported touch controllers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TouchProfile {
    /// No touch controller.
    #[default]
    None,
    /// Adafruit STMPE610 resistive controller.
    Stmpe610,
    /// XPT2046 / ADS7846 resistive controller.
    Xpt2046,
    /// Desktop pointer: raw values are already panel pixels.
    Pointer,
}

impl TouchProfile {
    /// Calibration for this controller; `None` for [`TouchProfile::None`].
    pub const fn calibration(self) -> Option<Calibration> {
        match self {
            Self::None => None,
            Self::Stmpe610 => Some(Calibration {
                min_x: 200,
                max_x: 3800,
                min_y: 200,
                max_y: 3800,
                swap_axes: true,
                invert_x: false,
                invert_y: true,
            }),
            Self::Xpt2046 => Some(Calibration {
                min_x: 300,
                max_x: 3800,
                min_y: 300,
                max_y: 3800,
                swap_axes: true,
                invert_x: false,
                invert_y: true,
            }),
            Self::Pointer => Some(Calibration {
                min_x: 0,
                max_x: SCREEN_WIDTH as i32,
                min_y: 0,
                max_y: SCREEN_HEIGHT as i32,
                swap_axes: false,
                invert_x: false,
                invert_y: false,
            }),
        }
    }
}

impl Calibration {
    /// Map a raw reading to the panel. `None` if the calibration is malformed.
    pub fn map(
        &self,
        raw: RawTouch,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        if self.max_x <= self.min_x || self.max_y <= self.min_y || width == 0 || height == 0 {
            return None;
        }

        // Integer math keeps the pointer profile exact.
        let mut nx = Axis::new(raw.x, self.min_x, self.max_x);
        let mut ny = Axis::new(raw.y, self.min_y, self.max_y);
        if self.swap_axes {
            core::mem::swap(&mut nx, &mut ny);
        }
        if self.invert_x {
            nx = nx.inverted();
        }
        if self.invert_y {
            ny = ny.inverted();
        }

        Some(ScreenPoint::new(nx.scale(width), ny.scale(height)))
    }
}

/// Position along one raw axis as `offset` out of `span`.
#[derive(Clone, Copy)]
struct Axis {
    offset: i64,
    span: i64,
}

impl Axis {
    fn new(
        value: i32,
        min: i32,
        max: i32,
    ) -> Self {
        let span = i64::from(max) - i64::from(min);
        Self {
            offset: (i64::from(value) - i64::from(min)).clamp(0, span),
            span,
        }
    }

    const fn inverted(self) -> Self {
        Self {
            offset: self.span - self.offset,
            span: self.span,
        }
    }

    fn scale(
        self,
        size: u32,
    ) -> u32 {
        let pixel = self.offset * i64::from(size) / self.span;
        (pixel as u32).min(size - 1)
    }
}

/// Polls a driver and maps readings through the selected profile.
pub struct TouchCalibrator<D> {
    driver: D,
    calibration: Option<Calibration>,
    width: u32,
    height: u32,
}

impl<D: TouchDriver> TouchCalibrator<D> {
    pub fn new(
        driver: D,
        profile: TouchProfile,
    ) -> Self {
        Self {
            driver,
            calibration: profile.calibration(),
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }

    /// Read the driver once. Errors and missing calibration count as no touch.
    pub fn poll(&mut self) -> Option<ScreenPoint> {
        let raw = match self.driver.poll() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                debug!(error = %err, "touch read failed, treating as no touch");
                return None;
            }
        };
        let point = self.calibration?.map(raw, self.width, self.height);
        if point.is_none() {
            debug!(?raw, "touch calibration rejected reading");
        }
        point
    }
}

// =============================================================================
// Debounce
// =============================================================================

/// Time-based debounce: accepts an event only when at least `interval` has
/// passed since the previously accepted one. Rejected events are dropped.
#[derive(Clone, Debug)]
pub struct Debounce {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl Debounce {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Returns true if an event at `now` passes, recording it as the latest.
    pub fn accept(
        &mut self,
        now: Instant,
    ) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }

    pub const fn last_accepted(&self) -> Option<Instant> { self.last_accepted }
}
