//! Rolling-average anomaly filter for ultrasonic distance samples.
//!
//! [`DistanceTracker`] owns the bounded sample history together with its
//! cached average.  Every candidate is judged against the average as it
//! stood *before* the candidate arrived; the average is recomputed only
//! after the accept/reject decision, so a rejected sample never moves it.
//!
//! The band test runs on the integer sum and count of the history rather
//! than on a rounded mean, so a sample exactly on the ±tolerance edge is
//! always inside the band.

use heapless::Deque;

/// Number of accepted samples kept for the rolling average.
pub const HISTORY_CAPACITY: usize = 10;

// ───────────────────────────────────────────────────────────────
// DistanceHistory
// ───────────────────────────────────────────────────────────────

/// FIFO of the most recent accepted distances (cm), oldest first.
#[derive(Debug, Clone, Default)]
pub struct DistanceHistory {
    samples: Deque<u32, HISTORY_CAPACITY>,
    sum: u64,
}

impl DistanceHistory {
    pub fn new() -> Self {
        Self {
            samples: Deque::new(),
            sum: 0,
        }
    }

    /// Append a sample, evicting and returning the oldest one when full.
    pub fn push(&mut self, sample: u32) -> Option<u32> {
        let evicted = if self.samples.is_full() {
            self.samples.pop_front()
        } else {
            None
        };
        if let Some(old) = evicted {
            self.sum -= u64::from(old);
        }
        // Cannot fail: a slot was freed above if the deque was full.
        let _ = self.samples.push_back(sample);
        self.sum += u64::from(sample);
        evicted
    }

    /// Sum of the held samples.
    pub fn sum(&self) -> u64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recently accepted sample.
    pub fn latest(&self) -> Option<u32> {
        self.samples.back().copied()
    }

    /// Samples in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }
}

// ───────────────────────────────────────────────────────────────
// RollingMean
// ───────────────────────────────────────────────────────────────

/// Exact mean of the history, kept as `sum / count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingMean {
    sum: u64,
    count: u64,
}

impl RollingMean {
    /// `count` must be non-zero.
    fn new(sum: u64, count: u64) -> Self {
        Self { sum, count }
    }

    /// Mean in cm, for display and telemetry.
    pub fn as_f32(self) -> f32 {
        (self.sum as f64 / self.count as f64) as f32
    }
}

// ───────────────────────────────────────────────────────────────
// AnomalyFilter
// ───────────────────────────────────────────────────────────────

/// Symmetric band around the rolling average.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyFilter {
    tolerance_percent: u32,
}

impl AnomalyFilter {
    /// `tolerance_percent` of 5 accepts samples within ±5 % of the average.
    pub fn new(tolerance_percent: u32) -> Self {
        Self { tolerance_percent }
    }

    /// Decide whether `sample` may enter the history.
    ///
    /// With no average yet (empty history) the sample seeds the history and
    /// is always admitted.  Otherwise the sample is admitted iff
    /// `(100 - p) * sum <= 100 * count * sample <= (100 + p) * sum`.
    pub fn admit(&self, sample: u32, average: Option<RollingMean>) -> bool {
        let Some(RollingMean { sum, count }) = average else {
            return true;
        };
        let p = u64::from(self.tolerance_percent);
        let scaled = 100 * count * u64::from(sample);
        (100u64.saturating_sub(p)) * sum <= scaled && scaled <= (100 + p) * sum
    }

    /// Arithmetic mean of the history; `None` while it is empty.
    pub fn recompute_average(&self, history: &DistanceHistory) -> Option<RollingMean> {
        if history.is_empty() {
            return None;
        }
        Some(RollingMean::new(history.sum(), history.len() as u64))
    }
}

// ───────────────────────────────────────────────────────────────
// DistanceTracker
// ───────────────────────────────────────────────────────────────

/// Outcome of offering one sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    /// Sample entered the history; `average` is the recomputed mean.
    Accepted { average: f32 },
    /// Sample discarded; `average` is the unchanged mean it was judged against.
    Rejected { average: f32 },
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// History, cached average and filter as one state object.
#[derive(Debug, Clone)]
pub struct DistanceTracker {
    history: DistanceHistory,
    filter: AnomalyFilter,
    mean: Option<RollingMean>,
    rejected: u32,
}

impl DistanceTracker {
    pub fn new(filter: AnomalyFilter) -> Self {
        Self {
            history: DistanceHistory::new(),
            filter,
            mean: None,
            rejected: 0,
        }
    }

    /// Judge `sample` against the current average, then commit.
    pub fn offer(&mut self, sample: u32) -> Admission {
        let before = self.mean;
        match before {
            Some(mean) if !self.filter.admit(sample, before) => {
                self.rejected = self.rejected.saturating_add(1);
                Admission::Rejected {
                    average: mean.as_f32(),
                }
            }
            _ => {
                self.history.push(sample);
                self.mean = self.filter.recompute_average(&self.history);
                let average = self.mean.map_or(sample as f32, RollingMean::as_f32);
                Admission::Accepted { average }
            }
        }
    }

    /// Cached rolling average; `None` before the first accepted sample.
    pub fn average(&self) -> Option<f32> {
        self.mean.map(RollingMean::as_f32)
    }

    /// Exact rolling mean the next sample is judged against.
    pub fn mean(&self) -> Option<RollingMean> {
        self.mean
    }

    pub fn history(&self) -> &DistanceHistory {
        &self.history
    }

    /// Most recent accepted distance (cm).
    pub fn latest_accepted(&self) -> Option<u32> {
        self.history.latest()
    }

    /// Total samples discarded since boot.
    pub fn rejected_count(&self) -> u32 {
        self.rejected
    }
}
