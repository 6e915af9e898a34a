//! Render statistics for the main loop.
//!
//! Tracks how long composing and presenting a frame takes and reports a
//! summary through `tracing` every [`LOG_EVERY`] frames.
//!
//! # Usage
//!
//! ```ignore
//! let mut stats = FrameStats::new();
//!
//! // After each dashboard frame:
//! let started = Instant::now();
//! // ... compose + present ...
//! stats.record(started.elapsed());
//! ```

use std::time::{Duration, Instant};

use tracing::debug;

/// Frames between two summary log lines.
pub const LOG_EVERY: u64 = 100;

/// Frame timing since startup.
#[derive(Debug)]
pub struct FrameStats {
    /// Frames rendered since startup
    pub frames: u64,
    total: Duration,
    /// Slowest frame observed
    pub max: Duration,
    /// Slowest frame since the last summary
    window_max: Duration,
    start_time: Instant,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frames: 0,
            total: Duration::ZERO,
            max: Duration::ZERO,
            window_max: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    /// Record one frame. Returns true when a summary was logged.
    pub fn record(
        &mut self,
        render_time: Duration,
    ) -> bool {
        self.frames += 1;
        self.total += render_time;
        self.max = self.max.max(render_time);
        self.window_max = self.window_max.max(render_time);

        if self.frames % LOG_EVERY != 0 {
            return false;
        }
        debug!(
            frames = self.frames,
            avg_us = self.average().as_micros() as u64,
            window_max_us = self.window_max.as_micros() as u64,
            max_us = self.max.as_micros() as u64,
            uptime_s = self.uptime().as_secs(),
            "render stats"
        );
        self.window_max = Duration::ZERO;
        true
    }

    /// Mean render time over all frames.
    pub fn average(&self) -> Duration {
        if self.frames == 0 {
            return Duration::ZERO;
        }
        self.total / u32::try_from(self.frames).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }
}

impl Default for FrameStats {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_empty() {
        let stats = FrameStats::new();
        assert_eq!(stats.frames, 0);
        assert_eq!(stats.average(), Duration::ZERO, "no frames means zero average");
        assert_eq!(stats.max, Duration::ZERO);
    }

    #[test]
    fn test_average_and_max() {
        let mut stats = FrameStats::new();
        stats.record(Duration::from_micros(2000));
        stats.record(Duration::from_micros(4000));
        stats.record(Duration::from_micros(3000));

        assert_eq!(stats.frames, 3);
        assert_eq!(stats.average(), Duration::from_micros(3000));
        assert_eq!(stats.max, Duration::from_micros(4000));
    }

    #[test]
    fn test_summary_every_hundred_frames() {
        let mut stats = FrameStats::new();
        let mut logged = Vec::new();
        for _ in 0..250 {
            if stats.record(Duration::from_micros(10)) {
                logged.push(stats.frames);
            }
        }
        assert_eq!(logged, vec![100, 200]);
    }
}
