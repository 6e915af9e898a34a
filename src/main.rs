//! piNAS status dashboard for a 320x240 SPI TFT on a Raspberry Pi.
//!
//! Shows live system metrics, attached USB drives and their Samba share
//! state, with a boot sequence at startup and a shutdown sequence on
//! SIGINT/SIGTERM.
//!
//! # Controls (touch)
//!
//! | Where | Action |
//! |-------|--------|
//! | Share pill on the Drives screen | Toggle sharing for that drive |
//! | Anywhere else | Next screen (Overview -> Drives -> Stats) |
//!
//! With `--display window` (feature `window`) the mouse stands in for the
//! touch panel and closing the window triggers the shutdown sequence.
//!
//! # Startup
//!
//! ```text
//! config ─► logging ─► signal thread ─► sink + touch ─► boot ─► loop ─► shutdown
//! ```
//!
//! Only a bad config file aborts startup. A missing framebuffer falls back
//! to headless mode so screenshots keep working.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use embedded_graphics::prelude::Size;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pinas_dashboard::animation::{run_boot, run_shutdown};
use pinas_dashboard::config::{DashboardConfig, DisplayKind, SCREEN_HEIGHT, SCREEN_WIDTH};
use pinas_dashboard::dashboard::Dashboard;
use pinas_dashboard::display::{DisplaySink, FramebufferSink, HeadlessSink, ScreenshotWriter};
use pinas_dashboard::screens::HeaderInfo;
use pinas_dashboard::system::{MountDriveRegistry, ShareRegistry, SysinfoMetrics};
use pinas_dashboard::touch::{NoTouch, TouchCalibrator, TouchDriver, TouchProfile};

#[derive(Parser)]
#[command(name = "pinas-dashboard")]
#[command(about = "Status dashboard for a Raspberry Pi NAS TFT display", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where frames go (overrides the config file)
    #[arg(long, value_enum)]
    display: Option<DisplayKind>,

    /// Touch controller profile (overrides the config file)
    #[arg(long, value_enum)]
    touch: Option<TouchProfile>,

    /// Skip the boot and shutdown sequences
    #[arg(long)]
    no_animations: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(display) = cli.display {
        config.display = display;
    }
    if let Some(touch) = cli.touch {
        config.touch_profile = touch;
    }
    if cli.no_animations {
        config.skip_sequences = true;
    }

    let stop = Arc::new(AtomicBool::new(false));
    spawn_signal_listener(Arc::clone(&stop))?;

    let version = read_version(&config.version_file);
    info!(%version, display = ?config.display, touch = ?config.touch_profile, "starting piNAS dashboard");

    let (sink, driver, profile) = open_display(&config, &stop);
    let shares = ShareRegistry::new(&config.share_registry);
    let mut dashboard = Dashboard::new(
        &config,
        HeaderInfo::new("piNAS", &version),
        SysinfoMetrics::new(),
        MountDriveRegistry::new(&config.mount_root, shares, &config.share_command),
        TouchCalibrator::new(driver, profile),
        sink,
        ScreenshotWriter::new(config.screenshot_target()),
    );

    if !config.skip_sequences {
        let mut player = dashboard.sequence_player(config.sequence_frame_delay());
        run_boot(&mut player, config.boot_frames, &config.boot_label);
    }

    dashboard.run(&stop);

    if !config.skip_sequences {
        let mut player = dashboard.sequence_player(config.sequence_frame_delay());
        run_shutdown(&mut player, config.shutdown_frames);
    }
    info!("shutdown complete");
    Ok(())
}

/// Installed version string, "unknown" when the file is missing.
fn read_version(path: &Path) -> String {
    fs::read_to_string(path)
        .map(|text| text.trim().to_owned())
        .ok()
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| "unknown".into())
}

type DisplaySetup = (Box<dyn DisplaySink>, Box<dyn TouchDriver>, TouchProfile);

fn open_display(
    config: &DashboardConfig,
    stop: &Arc<AtomicBool>,
) -> DisplaySetup {
    let size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let sink: Box<dyn DisplaySink> = match config.display {
        DisplayKind::Framebuffer => match FramebufferSink::open(&config.framebuffer_device, size) {
            Ok(sink) => Box::new(sink),
            Err(error) => {
                warn!(%error, device = %config.framebuffer_device.display(), "framebuffer unavailable, running headless");
                Box::new(HeadlessSink::new())
            }
        },
        DisplayKind::Headless => Box::new(HeadlessSink::new()),
        DisplayKind::Window => return open_window(config, size, stop),
    };
    (sink, touch_driver(config), config.touch_profile)
}

#[cfg(feature = "window")]
fn open_window(
    _config: &DashboardConfig,
    size: Size,
    stop: &Arc<AtomicBool>,
) -> DisplaySetup {
    let (sink, pointer) = pinas_dashboard::display::window::open(size, Arc::clone(stop));
    let sink: Box<dyn DisplaySink> = Box::new(sink);
    let pointer: Box<dyn TouchDriver> = Box::new(pointer);
    (sink, pointer, TouchProfile::Pointer)
}

#[cfg(not(feature = "window"))]
fn open_window(
    config: &DashboardConfig,
    _size: Size,
    _stop: &Arc<AtomicBool>,
) -> DisplaySetup {
    warn!("built without the `window` feature, running headless");
    let sink: Box<dyn DisplaySink> = Box::new(HeadlessSink::new());
    (sink, touch_driver(config), config.touch_profile)
}

/// Touch driver for the configured profile.
///
/// Resistive controllers are read through their kernel input device. When
/// that cannot be opened the panel runs display-only.
fn touch_driver(config: &DashboardConfig) -> Box<dyn TouchDriver> {
    match config.touch_profile {
        TouchProfile::None => Box::new(NoTouch),
        TouchProfile::Pointer => {
            warn!("pointer touch needs the window display, touch disabled");
            Box::new(NoTouch)
        }
        TouchProfile::Stmpe610 | TouchProfile::Xpt2046 => open_touch_device(&config.touch_device),
    }
}

#[cfg(target_os = "linux")]
fn open_touch_device(path: &Path) -> Box<dyn TouchDriver> {
    match pinas_dashboard::input::EvdevTouch::open(path) {
        Ok(driver) => Box::new(driver),
        Err(error) => {
            warn!(%error, "touch input unavailable, touch disabled");
            Box::new(NoTouch)
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn open_touch_device(path: &Path) -> Box<dyn TouchDriver> {
    warn!(device = %path.display(), "touch input devices need Linux, touch disabled");
    Box::new(NoTouch)
}

// =============================================================================
// Signals
// =============================================================================

/// Raise `stop` on SIGINT or SIGTERM.
fn spawn_signal_listener(stop: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;
    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            runtime.block_on(shutdown_signal());
            info!("shutdown signal received");
            stop.store(true, Ordering::SeqCst);
        })
        .context("spawning signal thread")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                warn!(%error, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
