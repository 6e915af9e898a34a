//! piNAS status dashboard - rendering and animation engine for a 320x240
//! SPI panel on a Raspberry Pi NAS.
//!
//! The library holds everything that can be tested on any host: history
//! buffers, touch calibration, navigation, the compositor and the boot and
//! shutdown sequences. The binary (`main.rs`) wires in the Linux
//! collaborators from [`system`] and a [`display`] sink.
//!
//! # Testing
//!
//! ```bash
//! cargo test                     # unit + integration tests, no panel needed
//! cargo run --features window    # desktop preview with mouse as touch
//! ```

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_arguments)]

// === Pure logic ===

// Configuration
pub mod config;
pub mod error;
pub mod thresholds;

// Data
pub mod history;
pub mod metrics;

// Input
pub mod navigation;
pub mod touch;

// Rendering
pub mod animation;
pub mod colors;
pub mod frame;
pub mod screens;
pub mod styles;
pub mod widgets;

// === Loop and collaborators ===

pub mod dashboard;
pub mod display;
#[cfg(target_os = "linux")]
pub mod input;
pub mod profiling;
pub mod system;
