//! Bounded metric history for sparklines.
//!
//! A [`HistoryBuffer`] is a strict FIFO: once full, every push evicts the
//! oldest sample first. [`Histories`] groups the four series the dashboard
//! charts and owns the clamping step, so charts only ever see values in the
//! 0-100 domain.
//!
//! # Network Scaling
//!
//! Network throughput has no natural upper bound, so it is mapped onto the
//! same percent scale as the other series: `min(100, kbps / net_scale_kbps)`.
//! With the default scale of 10, anything at or above 1 MB/s reads as a full
//! chart.

use std::collections::VecDeque;

use crate::metrics::MetricSample;

/// Fixed-capacity FIFO of samples, oldest first.
#[derive(Clone, Debug)]
pub struct HistoryBuffer<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> HistoryBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn push(
        &mut self,
        value: T,
    ) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> { self.samples.iter().copied().collect() }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ { self.samples.iter().copied() }

    /// Most recent sample.
    pub fn latest(&self) -> Option<T> { self.samples.back().copied() }

    pub fn len(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    pub const fn capacity(&self) -> usize { self.capacity }
}

/// The four charted series, all sharing one capacity.
#[derive(Clone, Debug)]
pub struct Histories {
    pub cpu: HistoryBuffer<f32>,
    pub memory: HistoryBuffer<f32>,
    pub disk: HistoryBuffer<f32>,
    pub network: HistoryBuffer<f32>,
    net_scale_kbps: f32,
}

impl Histories {
    pub fn new(
        capacity: usize,
        net_scale_kbps: f32,
    ) -> Self {
        Self {
            cpu: HistoryBuffer::new(capacity),
            memory: HistoryBuffer::new(capacity),
            disk: HistoryBuffer::new(capacity),
            network: HistoryBuffer::new(capacity),
            net_scale_kbps,
        }
    }

    /// Append one sample to every series, clamped into 0-100.
    pub fn record(
        &mut self,
        sample: &MetricSample,
    ) {
        self.cpu.push(clamp_percent(sample.cpu_percent));
        self.memory.push(clamp_percent(sample.memory_percent));
        self.disk.push(clamp_percent(sample.disk_percent));
        self.network
            .push(scale_network(sample.net_rate_kbps, self.net_scale_kbps));
    }
}

/// Clamp to 0-100; NaN becomes 0.
#[inline]
fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) }
}

/// Map a KB/s rate onto the percent scale.
#[inline]
pub fn scale_network(
    kbps: f32,
    net_scale_kbps: f32,
) -> f32 {
    clamp_percent(kbps / net_scale_kbps)
}
