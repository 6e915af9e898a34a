//! Application configuration.
//!
//! Two layers:
//! - **Layout constants** (`const`) fixed by the panel and the sequence
//!   renderer. These never change at runtime.
//! - **[`DashboardConfig`]**, loaded from an optional TOML file. Every field
//!   has a default, so an empty file (or no file) gives the stock dashboard.
//!
//! ```toml
//! history_capacity = 60
//! touch_profile = "xpt2046"
//! touch_device = "/dev/input/event0"
//! display = "framebuffer"
//! framebuffer_device = "/dev/fb1"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::touch::TouchProfile;

// =============================================================================
// Display Configuration
// =============================================================================

/// Panel width in pixels (ILI9341/ST7789 class 320x240 TFT in landscape).
pub const SCREEN_WIDTH: u32 = 320;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Internal width the boot/shutdown sequences render at before upscaling.
pub const SEQUENCE_WIDTH: u32 = 160;

/// Internal height the boot/shutdown sequences render at before upscaling.
pub const SEQUENCE_HEIGHT: u32 = 120;

const _: () = assert!(SEQUENCE_WIDTH <= SCREEN_WIDTH && SEQUENCE_HEIGHT <= SCREEN_HEIGHT);

// =============================================================================
// Validation Limits
// =============================================================================

const MIN_HISTORY: usize = 2;
const MAX_HISTORY: usize = 1000;

/// Where finished frames go.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// Linux framebuffer device (fbtft panels).
    #[default]
    Framebuffer,
    /// Discard frames; screenshots are still written.
    Headless,
    /// Desktop preview window (requires the `window` feature).
    Window,
}

/// Runtime options. See the module docs for the file format.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Samples kept per metric; sets the sparkline time window.
    pub history_capacity: usize,
    /// Minimum time between metric polls and frame updates.
    pub update_interval_ms: u64,
    /// Sleep at the end of every loop iteration.
    pub loop_sleep_ms: u64,
    /// Minimum time between two accepted touches.
    pub touch_debounce_ms: u64,
    /// 2 (Overview, Drives) or 3 (plus Stats).
    pub screen_count: usize,
    /// Animation phase added per loop iteration.
    pub phase_step: f32,
    /// KB/s that map to one percent on the network sparkline.
    pub net_scale_kbps: f32,
    pub boot_frames: u32,
    pub shutdown_frames: u32,
    /// Delay between boot/shutdown frames.
    pub sequence_frame_ms: u64,
    /// Label that fades in at the end of the boot sequence.
    pub boot_label: String,
    /// Skip both boot and shutdown sequences.
    pub skip_sequences: bool,
    pub touch_profile: TouchProfile,
    /// Input device of the touch controller's kernel driver.
    pub touch_device: PathBuf,
    pub display: DisplayKind,
    pub framebuffer_device: PathBuf,
    /// Directory whose direct children are the USB mount points.
    pub mount_root: PathBuf,
    /// File listing the names of shared drives.
    pub share_registry: PathBuf,
    /// Command invoked as `<cmd> add|remove <name>` to toggle sharing.
    pub share_command: PathBuf,
    /// Local file holding the installed version string.
    pub version_file: PathBuf,
    /// Live screenshot target. Empty disables screenshots.
    pub screenshot_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            update_interval_ms: 300,
            loop_sleep_ms: 50,
            touch_debounce_ms: 200,
            screen_count: 3,
            phase_step: 0.1,
            net_scale_kbps: 10.0,
            boot_frames: 90,
            shutdown_frames: 60,
            sequence_frame_ms: 16,
            boot_label: "piNAS".into(),
            skip_sequences: false,
            touch_profile: TouchProfile::None,
            touch_device: PathBuf::from("/dev/input/event0"),
            display: DisplayKind::Framebuffer,
            framebuffer_device: PathBuf::from("/dev/fb1"),
            mount_root: PathBuf::from("/srv/usb-shares"),
            share_registry: PathBuf::from("/etc/samba/usb-shares.conf"),
            share_command: PathBuf::from("/usr/local/sbin/usb-autoshare"),
            version_file: PathBuf::from("/usr/local/pinas/VERSION"),
            screenshot_path: PathBuf::from("/tmp/pinas-dashboard-live.png"),
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_HISTORY..=MAX_HISTORY).contains(&self.history_capacity) {
            return Err(ConfigError::Invalid(format!(
                "history_capacity must be between {MIN_HISTORY} and {MAX_HISTORY}, got {}",
                self.history_capacity
            )));
        }
        if !(2..=3).contains(&self.screen_count) {
            return Err(ConfigError::Invalid(format!("screen_count must be 2 or 3, got {}", self.screen_count)));
        }
        if self.update_interval_ms == 0 {
            return Err(ConfigError::Invalid("update_interval_ms must be positive".into()));
        }
        if !(self.net_scale_kbps > 0.0) {
            return Err(ConfigError::Invalid("net_scale_kbps must be positive".into()));
        }
        if !self.phase_step.is_finite() {
            return Err(ConfigError::Invalid("phase_step must be finite".into()));
        }
        if self.boot_frames < 2 || self.shutdown_frames < 2 {
            return Err(ConfigError::Invalid("boot_frames and shutdown_frames must be at least 2".into()));
        }
        Ok(())
    }

    pub const fn update_interval(&self) -> Duration { Duration::from_millis(self.update_interval_ms) }

    pub const fn loop_sleep(&self) -> Duration { Duration::from_millis(self.loop_sleep_ms) }

    pub const fn touch_debounce(&self) -> Duration { Duration::from_millis(self.touch_debounce_ms) }

    pub const fn sequence_frame_delay(&self) -> Duration { Duration::from_millis(self.sequence_frame_ms) }

    /// Screenshot target, `None` when disabled.
    pub fn screenshot_target(&self) -> Option<&Path> {
        if self.screenshot_path.as_os_str().is_empty() {
            None
        } else {
            Some(self.screenshot_path.as_path())
        }
    }
}
