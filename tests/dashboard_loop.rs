//! End-to-end loop behavior with scripted collaborators.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use embedded_graphics::prelude::*;

use pinas_dashboard::animation::run_shutdown;
use pinas_dashboard::colors::BG_DARK;
use pinas_dashboard::config::{DashboardConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use pinas_dashboard::dashboard::Dashboard;
use pinas_dashboard::display::{DisplaySink, ScreenshotWriter};
use pinas_dashboard::error::{AcquisitionError, DisplayError, Result};
use pinas_dashboard::frame::Frame;
use pinas_dashboard::metrics::{DriveInfo, DriveRegistry, MetricSample, MetricsProvider};
use pinas_dashboard::navigation::{Screen, TouchAction};
use pinas_dashboard::screens::{HeaderInfo, share_button_regions};
use pinas_dashboard::touch::{RawTouch, TouchCalibrator, TouchDriver, TouchProfile};

/// Returns queued samples, then fails.
struct ScriptedMetrics(Vec<MetricSample>);

impl MetricsProvider for ScriptedMetrics {
    fn sample(&mut self) -> Result<MetricSample> {
        if self.0.is_empty() {
            Err(AcquisitionError::Metrics("script exhausted".into()))
        } else {
            Ok(self.0.remove(0))
        }
    }
}

struct StaticDrives(Vec<DriveInfo>);

impl DriveRegistry for StaticDrives {
    fn list(&mut self) -> Result<Vec<DriveInfo>> { Ok(self.0.clone()) }

    fn toggle_share(
        &mut self,
        drive: &DriveInfo,
    ) -> Result<()> {
        if let Some(stored) = self.0.iter_mut().find(|d| d.name == drive.name) {
            stored.is_shared = !stored.is_shared;
        }
        Ok(())
    }
}

/// Touch sensor that reports one touch per scripted entry; `None` is no contact.
struct ScriptedTouch(Vec<Option<RawTouch>>);

impl TouchDriver for ScriptedTouch {
    fn poll(&mut self) -> Result<Option<RawTouch>> {
        if self.0.is_empty() { Ok(None) } else { Ok(self.0.remove(0)) }
    }
}

/// Keeps every frame; optionally fails each present.
#[derive(Default)]
struct CollectSink {
    frames: Vec<Frame>,
    fail: bool,
}

impl DisplaySink for CollectSink {
    fn present(
        &mut self,
        frame: &Frame,
    ) -> std::result::Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Io(std::io::Error::other("panel unplugged")));
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}

fn sample(cpu: f32) -> MetricSample {
    MetricSample {
        cpu_percent: cpu,
        memory_percent: 40.0,
        memory_used: 1 << 30,
        memory_total: 4 << 30,
        disk_percent: 55.0,
        disk_used: 11 << 30,
        disk_total: 20 << 30,
        temperature_c: Some(52.0),
        net_rate_kbps: 250.0,
        ip_address: "10.0.0.7".into(),
    }
}

fn drives() -> Vec<DriveInfo> {
    vec![
        DriveInfo::from_space(PathBuf::from("/srv/usb-shares/media"), 500 << 30, 100 << 30, "exfat", false),
        DriveInfo::from_space(PathBuf::from("/srv/usb-shares/archive"), 2000 << 30, 1900 << 30, "ext4", true),
    ]
}

fn config_from_file(text: &str) -> DashboardConfig {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("dashboard.toml");
    std::fs::write(&path, text).expect("write config");
    DashboardConfig::load(&path).expect("valid config")
}

#[test]
fn test_history_window_follows_config() {
    let config = config_from_file("history_capacity = 2\nupdate_interval_ms = 100\n");
    let samples = vec![sample(10.0), sample(20.0), sample(30.0), sample(40.0)];
    let mut dash = Dashboard::new(
        &config,
        HeaderInfo::new("piNAS", "test"),
        ScriptedMetrics(samples),
        StaticDrives(drives()),
        TouchCalibrator::new(ScriptedTouch(Vec::new()), TouchProfile::None),
        CollectSink::default(),
        ScreenshotWriter::disabled(),
    );

    let start = Instant::now();
    for i in 0..3 {
        dash.tick(start + config.update_interval() * i);
    }
    assert_eq!(dash.state().histories.cpu.snapshot(), vec![20.0, 30.0]);
    dash.tick(start + config.update_interval() * 3);
    assert_eq!(dash.state().histories.cpu.snapshot(), vec![30.0, 40.0]);

    // Script exhausted: the loop keeps going on the fallback sample
    let outcome = dash.tick(start + config.update_interval() * 4);
    assert!(outcome.frame_presented);
    assert_eq!(dash.state().sample.ip_address, "N/A");
    assert_eq!(dash.state().histories.cpu.snapshot(), vec![40.0, 0.0]);
    assert_eq!(dash.sink().frames.len(), 5, "one frame per elapsed interval");
}

#[test]
fn test_touch_flow_on_pointer_profile() {
    let config = DashboardConfig::default();
    let share = share_button_regions(2)[0].center();
    let touches = vec![
        Some(RawTouch { x: 200, y: 100 }),
        None,
        Some(RawTouch { x: share.x, y: share.y }),
        Some(RawTouch { x: 200, y: 100 }),
    ];
    let mut dash = Dashboard::new(
        &config,
        HeaderInfo::new("piNAS", "test"),
        ScriptedMetrics(vec![sample(5.0); 8]),
        StaticDrives(drives()),
        TouchCalibrator::new(ScriptedTouch(touches), TouchProfile::Pointer),
        CollectSink::default(),
        ScreenshotWriter::disabled(),
    );

    let start = Instant::now();
    let step = config.touch_debounce();
    let actions: Vec<Option<TouchAction>> = (0..4).map(|i| dash.tick(start + step * i).action).collect();
    assert_eq!(
        actions,
        vec![
            Some(TouchAction::Navigate(Screen::Drives)),
            None,
            Some(TouchAction::ToggleShare(0)),
            Some(TouchAction::Navigate(Screen::Stats)),
        ]
    );

    // The toggled drive shows as shared after the next data refresh
    dash.tick(start + step * 4 + config.update_interval());
    assert!(dash.state().drives[0].is_shared, "share state re-read from the registry");
}

#[test]
fn test_display_failure_does_not_stop_the_loop() {
    let config = DashboardConfig::default();
    let mut dash = Dashboard::new(
        &config,
        HeaderInfo::new("piNAS", "test"),
        ScriptedMetrics(Vec::new()),
        StaticDrives(Vec::new()),
        TouchCalibrator::new(ScriptedTouch(Vec::new()), TouchProfile::None),
        CollectSink { frames: Vec::new(), fail: true },
        ScreenshotWriter::disabled(),
    );
    let start = Instant::now();
    assert!(dash.tick(start).frame_presented);
    assert!(dash.tick(start + config.update_interval()).frame_presented);
    assert_eq!(dash.stats().frames, 2, "frames are still composed and counted");
}

#[test]
fn test_run_returns_when_stopped_and_shutdown_blanks() {
    let dir = tempfile::tempdir().expect("temp dir");
    let screenshot = dir.path().join("live.png");
    let config = DashboardConfig::default();
    let mut dash = Dashboard::new(
        &config,
        HeaderInfo::new("piNAS", "test"),
        ScriptedMetrics(vec![sample(12.0)]),
        StaticDrives(drives()),
        TouchCalibrator::new(ScriptedTouch(Vec::new()), TouchProfile::None),
        CollectSink::default(),
        ScreenshotWriter::new(Some(&screenshot)),
    );

    dash.tick(Instant::now());
    assert!(screenshot.exists(), "live screenshot written after a frame");

    // Already stopped: run must return without ticking
    dash.run(&AtomicBool::new(true));
    assert_eq!(dash.state().clock.ticks(), 1);

    let mut player = dash.sequence_player(Duration::ZERO);
    run_shutdown(&mut player, 3);
    let last = dash.sink().frames.last().expect("frames presented");
    assert_eq!(last.size(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    assert_eq!(last.count_color(BG_DARK), (SCREEN_WIDTH * SCREEN_HEIGHT) as usize, "panel ends blank");
}
