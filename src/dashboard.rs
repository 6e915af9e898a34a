//! The main loop: polling cadence, touch handling and frame dispatch.
//!
//! # Tick
//!
//! ```text
//!  ┌─► advance clock ─► poll touch ─► navigation ─► (toggle share)
//!  │                                                    │
//!  │        interval elapsed? ──no──────────────────────┤
//!  │              │ yes                                 │
//!  │   sample metrics + drives ─► histories ─► compose ─► present ─► screenshot
//!  │                                                    │
//!  └──────────────────────── sleep ◄────────────────────┘
//! ```
//!
//! Every collaborator failure is absorbed here: metrics fall back to
//! [`MetricSample::fallback`], drives to an empty list, touch to no touch,
//! and a failed present is logged. Nothing in a tick can end the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::animation::{AnimationClock, SequencePlayer};
use crate::config::DashboardConfig;
use crate::display::{DisplaySink, ScreenshotWriter};
use crate::history::Histories;
use crate::metrics::{DriveInfo, DriveRegistry, MetricSample, MetricsProvider};
use crate::navigation::{NavigationState, TouchAction};
use crate::profiling::FrameStats;
use crate::screens::{FrameInput, HeaderInfo, compose, share_button_regions};
use crate::touch::{TouchCalibrator, TouchDriver};

/// Everything the loop keeps between ticks.
#[derive(Clone, Debug)]
pub struct DashboardState {
    pub histories: Histories,
    pub navigation: NavigationState,
    pub clock: AnimationClock,
    /// Drive list from the last update, also used for hit-testing.
    pub drives: Vec<DriveInfo>,
    pub sample: MetricSample,
    pub header: HeaderInfo,
    last_update: Option<Instant>,
}

impl DashboardState {
    pub fn new(
        config: &DashboardConfig,
        header: HeaderInfo,
    ) -> Self {
        Self {
            histories: Histories::new(config.history_capacity, config.net_scale_kbps),
            navigation: NavigationState::new(config.screen_count, config.touch_debounce()),
            clock: AnimationClock::new(config.phase_step),
            drives: Vec::new(),
            sample: MetricSample::fallback(),
            header,
            last_update: None,
        }
    }

    pub const fn last_update(&self) -> Option<Instant> { self.last_update }

    /// True when no update has run yet or `interval` has passed since the last.
    pub fn update_due(
        &self,
        now: Instant,
        interval: Duration,
    ) -> bool {
        self.last_update
            .is_none_or(|last| now.saturating_duration_since(last) >= interval)
    }

    pub fn frame_input(&self) -> FrameInput<'_> {
        FrameInput {
            screen: self.navigation.current(),
            screen_count: self.navigation.screen_count(),
            sample: &self.sample,
            histories: &self.histories,
            drives: &self.drives,
            phase: self.clock.phase(),
            header: &self.header,
        }
    }
}

/// What one tick did.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TickOutcome {
    pub action: Option<TouchAction>,
    /// A full update ran and a frame was handed to the sink.
    pub frame_presented: bool,
}

/// The loop and its collaborators.
pub struct Dashboard<M, R, T, S> {
    state: DashboardState,
    metrics: M,
    registry: R,
    touch: TouchCalibrator<T>,
    sink: S,
    screenshots: ScreenshotWriter,
    stats: FrameStats,
    update_interval: Duration,
    loop_sleep: Duration,
    metrics_failing: bool,
}

impl<M, R, T, S> Dashboard<M, R, T, S>
where
    M: MetricsProvider,
    R: DriveRegistry,
    T: TouchDriver,
    S: DisplaySink,
{
    pub fn new(
        config: &DashboardConfig,
        header: HeaderInfo,
        metrics: M,
        registry: R,
        touch: TouchCalibrator<T>,
        sink: S,
        screenshots: ScreenshotWriter,
    ) -> Self {
        Self {
            state: DashboardState::new(config, header),
            metrics,
            registry,
            touch,
            sink,
            screenshots,
            stats: FrameStats::new(),
            update_interval: config.update_interval(),
            loop_sleep: config.loop_sleep(),
            metrics_failing: false,
        }
    }

    pub const fn state(&self) -> &DashboardState { &self.state }

    pub const fn stats(&self) -> &FrameStats { &self.stats }

    pub fn sink(&self) -> &S { &self.sink }

    /// Sequence player writing to this dashboard's sink and screenshot file.
    pub fn sequence_player(
        &mut self,
        frame_delay: Duration,
    ) -> SequencePlayer<'_, S> {
        SequencePlayer::new(&mut self.sink, &self.screenshots, frame_delay)
    }

    /// Run one loop iteration at `now`.
    pub fn tick(
        &mut self,
        now: Instant,
    ) -> TickOutcome {
        self.state.clock.tick();

        let mut outcome = TickOutcome::default();
        if let Some(point) = self.touch.poll() {
            let buttons = share_button_regions(self.state.drives.len());
            outcome.action = self.state.navigation.handle_touch(point, now, &buttons);
            match outcome.action {
                Some(TouchAction::ToggleShare(index)) => self.toggle_share(index),
                Some(TouchAction::Navigate(screen)) => debug!(?screen, "navigate"),
                None => debug!(x = point.x, y = point.y, "touch debounced"),
            }
        }

        if self.state.update_due(now, self.update_interval) {
            self.state.last_update = Some(now);
            self.refresh_data();
            self.refresh_clock();
            self.present_frame();
            outcome.frame_presented = true;
        }
        outcome
    }

    /// Tick until `stop` is raised.
    pub fn run(
        &mut self,
        stop: &AtomicBool,
    ) {
        info!(
            interval_ms = self.update_interval.as_millis() as u64,
            screens = self.state.navigation.screen_count(),
            "dashboard running"
        );
        while !stop.load(Ordering::SeqCst) {
            self.tick(Instant::now());
            thread::sleep(self.loop_sleep);
        }
        info!(frames = self.stats.frames, "dashboard stopped");
    }

    fn toggle_share(
        &mut self,
        index: usize,
    ) {
        let Some(drive) = self.state.drives.get(index) else {
            return;
        };
        match self.registry.toggle_share(drive) {
            Ok(()) => info!(drive = %drive.name, was_shared = drive.is_shared, "share toggled"),
            Err(error) => warn!(%error, drive = %drive.name, "share toggle failed"),
        }
    }

    fn refresh_data(&mut self) {
        let sample = match self.metrics.sample() {
            Ok(sample) => {
                if self.metrics_failing {
                    info!("metrics available again");
                    self.metrics_failing = false;
                }
                sample
            }
            Err(error) => {
                if self.metrics_failing {
                    debug!(%error, "metrics still unavailable");
                } else {
                    info!(%error, "metrics unavailable, showing defaults");
                    self.metrics_failing = true;
                }
                MetricSample::fallback()
            }
        };
        self.state.histories.record(&sample);
        self.state.sample = sample;

        self.state.drives = self.registry.list().unwrap_or_else(|error| {
            debug!(%error, "drive list unavailable");
            Vec::new()
        });
    }

    fn refresh_clock(&mut self) {
        let local = chrono::Local::now();
        self.state.header.time = local.format("%H:%M").to_string();
        self.state.header.date = local.format("%d %b").to_string();
    }

    fn present_frame(&mut self) {
        let started = Instant::now();
        let frame = compose(&self.state.frame_input());
        if let Err(error) = self.sink.present(&frame) {
            warn!(%error, "frame not presented");
        }
        self.screenshots.save(&frame);
        self.stats.record(started.elapsed());
    }
}
