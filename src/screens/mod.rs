//! Frame composition: one renderer per navigation screen.
//!
//! # Runtime Screens
//!
//! - **Overview** ([`overview`]): header, 2x2 metric cards, drive summary
//! - **Drives** ([`drives`]): per-drive cards with share buttons
//! - **Stats** ([`stats`]): large-number readout
//!
//! # Purity
//!
//! A renderer reads nothing but its [`FrameInput`]. Wall-clock strings are
//! formatted by the loop into [`HeaderInfo`] before composing, so two calls
//! with the same input always produce pixel-identical frames.

mod drives;
mod overview;
mod stats;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::colors::BG_DARK;
use crate::frame::Frame;
use crate::history::Histories;
use crate::metrics::{DriveInfo, MetricSample};
use crate::navigation::Screen;

pub use drives::{MAX_DRIVE_CARDS, share_button_regions};

/// Static and clock text shown in the overview header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub version: String,
    /// "HH:MM"
    pub time: String,
    /// "DD Mon"
    pub date: String,
}

impl HeaderInfo {
    pub fn new(
        title: &str,
        version: &str,
    ) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            time: "--:--".into(),
            date: String::new(),
        }
    }
}

/// Everything a screen renderer may read.
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    pub screen: Screen,
    pub screen_count: usize,
    pub sample: &'a MetricSample,
    pub histories: &'a Histories,
    pub drives: &'a [DriveInfo],
    /// Continuous animation phase.
    pub phase: f32,
    pub header: &'a HeaderInfo,
}

/// Draw the active screen onto any Rgb565 target.
pub fn render_screen<D>(
    display: &mut D,
    input: &FrameInput<'_>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    match input.screen {
        Screen::Overview => overview::draw(display, input),
        Screen::Drives => drives::draw(display, input),
        Screen::Stats => stats::draw(display, input),
    }
}

/// Compose a full-resolution frame for `input`.
pub fn compose(input: &FrameInput<'_>) -> Frame {
    let mut frame = Frame::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), BG_DARK);
    render_screen(&mut frame, input);
    frame
}
