//! Centralized severity thresholds.
//!
//! Every widget that colors a value by severity goes through this module, so
//! the usage bar, the drive cards and the stats screen can never disagree on
//! where "warning" starts.
//!
//! # Compile-Time Validation
//!
//! Each threshold group includes `const` assertions that verify threshold
//! ordering at compile time.

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::{GRADIENT_ERROR, GRADIENT_INFO, GRADIENT_WARNING, STATUS_ERROR, STATUS_ONLINE, STATUS_WARNING};

// =============================================================================
// Usage Thresholds (percent)
// =============================================================================

/// Usage at or above this is drawn in the warning tier.
pub const USAGE_WARNING: f32 = 75.0;

/// Usage at or above this is drawn in the error tier.
pub const USAGE_ERROR: f32 = 90.0;

const _: () = assert!(USAGE_WARNING < USAGE_ERROR);

// =============================================================================
// CPU Temperature Thresholds (Celsius)
// =============================================================================

/// Temperature above this is drawn as warning.
pub const TEMP_WARNING: f32 = 65.0;

/// Temperature above this is drawn as error.
pub const TEMP_ERROR: f32 = 75.0;

const _: () = assert!(TEMP_WARNING < TEMP_ERROR);

/// Ordered severity tiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Tier {
    Normal,
    Warning,
    Error,
}

impl Tier {
    /// Classify a usage percentage (>= 90 error, >= 75 warning).
    pub fn for_usage(percent: f32) -> Self {
        if percent >= USAGE_ERROR {
            Self::Error
        } else if percent >= USAGE_WARNING {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Classify a CPU temperature (> 75 error, > 65 warning).
    pub fn for_temperature(celsius: f32) -> Self {
        if celsius > TEMP_ERROR {
            Self::Error
        } else if celsius > TEMP_WARNING {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Fill color for bars and gauges.
    pub const fn fill_color(self) -> Rgb565 {
        match self {
            Self::Normal => GRADIENT_INFO[0],
            Self::Warning => GRADIENT_WARNING[0],
            Self::Error => GRADIENT_ERROR[0],
        }
    }

    /// Color for status text and dots.
    pub const fn status_color(self) -> Rgb565 {
        match self {
            Self::Normal => STATUS_ONLINE,
            Self::Warning => STATUS_WARNING,
            Self::Error => STATUS_ERROR,
        }
    }
}

/// Usage bar fill color for a percentage.
#[inline]
pub fn usage_color(percent: f32) -> Rgb565 { Tier::for_usage(percent).fill_color() }

/// Temperature text color; absent readings use the normal tier.
#[inline]
pub fn temperature_color(celsius: Option<f32>) -> Rgb565 {
    celsius.map_or(Tier::Normal, Tier::for_temperature).status_color()
}
