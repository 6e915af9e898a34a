//! Touch readings from a Linux input device.
//!
//! The ads7846 (XPT2046) and stmpe-ts (STMPE610) kernel drivers expose the
//! panel's touch controller as an evdev node under `/dev/input`. A reader
//! thread blocks on that node and folds each `SYN_REPORT` frame into a
//! [`ContactUpdate`], handing it to the loop over a channel:
//!
//! ```text
//! BTN_TOUCH 1, ABS_X, ABS_Y, SYN_REPORT  ->  Touching(RawTouch)
//! BTN_TOUCH 0, SYN_REPORT                ->  Released
//! ```
//!
//! Coordinates stay in raw controller units; [`crate::touch::TouchCalibrator`]
//! maps them to the panel with the selected profile.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use evdev::{AbsoluteAxisType, Device, InputEvent, InputEventKind, Key, Synchronization};
use tracing::{info, warn};

use crate::error::{AcquisitionError, Result};
use crate::touch::{RawTouch, TouchDriver};

/// Contact state at the end of one input frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ContactUpdate {
    Touching(RawTouch),
    Released,
}

/// Folds raw input events into per-frame contact updates.
#[derive(Clone, Debug, Default)]
pub struct ContactTracker {
    x: Option<i32>,
    y: Option<i32>,
    pressed: bool,
}

impl ContactTracker {
    /// Feed one event. Returns an update on every `SYN_REPORT`, except while
    /// pressed before both axes have been reported.
    pub fn apply(
        &mut self,
        event: &InputEvent,
    ) -> Option<ContactUpdate> {
        match event.kind() {
            InputEventKind::Key(key) if key == Key::BTN_TOUCH => {
                self.pressed = event.value() != 0;
                None
            }
            InputEventKind::AbsAxis(axis) if axis == AbsoluteAxisType::ABS_X => {
                self.x = Some(event.value());
                None
            }
            InputEventKind::AbsAxis(axis) if axis == AbsoluteAxisType::ABS_Y => {
                self.y = Some(event.value());
                None
            }
            InputEventKind::Synchronization(sync) if sync == Synchronization::SYN_REPORT => {
                if !self.pressed {
                    return Some(ContactUpdate::Released);
                }
                match (self.x, self.y) {
                    (Some(x), Some(y)) => Some(ContactUpdate::Touching(RawTouch { x, y })),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// [`TouchDriver`] backed by an evdev touchscreen node.
///
/// A held finger keeps reporting its last position, and a tap that starts
/// and ends between two polls is still reported once.
pub struct EvdevTouch {
    updates: Receiver<ContactUpdate>,
    current: Option<RawTouch>,
}

impl EvdevTouch {
    /// Open `path` and start the reader thread.
    pub fn open(path: &Path) -> Result<Self> {
        let device = Device::open(path).map_err(|source| AcquisitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), name = device.name().unwrap_or("unnamed"), "touch input opened");

        let (sender, updates) = mpsc::channel();
        thread::Builder::new()
            .name("touch-input".into())
            .spawn(move || read_events(device, sender))
            .map_err(|err| AcquisitionError::Touch(format!("spawning reader: {err}")))?;
        Ok(Self::from_updates(updates))
    }

    pub(crate) fn from_updates(updates: Receiver<ContactUpdate>) -> Self {
        Self {
            updates,
            current: None,
        }
    }
}

impl TouchDriver for EvdevTouch {
    fn poll(&mut self) -> Result<Option<RawTouch>> {
        let mut tapped = None;
        loop {
            match self.updates.try_recv() {
                Ok(ContactUpdate::Touching(touch)) => {
                    self.current = Some(touch);
                    tapped = Some(touch);
                }
                Ok(ContactUpdate::Released) => self.current = None,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(AcquisitionError::Touch("touch input reader stopped".into()));
                }
            }
        }
        Ok(self.current.or(tapped))
    }
}

fn read_events(
    mut device: Device,
    updates: Sender<ContactUpdate>,
) {
    let mut tracker = ContactTracker::default();
    loop {
        let events = match device.fetch_events() {
            Ok(events) => events,
            Err(error) => {
                warn!(%error, "touch input read failed, touch disabled");
                return;
            }
        };
        for event in events {
            if let Some(update) = tracker.apply(&event) {
                if updates.send(update).is_err() {
                    return;
                }
            }
        }
    }
}
