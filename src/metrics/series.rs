//! Fixed-length FIFO window of chart samples.

use std::collections::VecDeque;

use serde::Serialize;

/// Hourly buckets covered by a dashboard chart.
pub const DEFAULT_WINDOW: usize = 24;

/// A rolling window whose length never changes after construction.
///
/// Every [`push`](RollingSeries::push) evicts the oldest sample and appends
/// the new one at the end, so a series built with 24 samples holds exactly
/// 24 samples forever.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RollingSeries {
    samples: VecDeque<f64>,
}

impl RollingSeries {
    /// Build a window from initial samples; the window length is their count.
    pub fn from_samples(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Build a window of exactly `window` samples from a seed sequence.
    ///
    /// Keeps the newest `window` seed samples. A short seed is padded at the
    /// front with its first sample (or zero for an empty seed).
    pub fn fitted(seed: &[f64], window: usize) -> Self {
        let start = seed.len().saturating_sub(window);
        let kept = &seed[start..];
        let pad = seed.first().copied().unwrap_or(0.0);
        let samples = std::iter::repeat_n(pad, window - kept.len())
            .chain(kept.iter().copied())
            .collect();
        Self { samples }
    }

    /// Evict the oldest sample and append `value`. Returns the evicted sample.
    ///
    /// A zero-length window stays empty.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let evicted = self.samples.pop_front();
        self.samples.push_back(value);
        evicted
    }

    /// Newest sample.
    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_length() {
        let mut s = RollingSeries::from_samples([1.0, 2.0, 3.0]);
        assert_eq!(s.push(4.0), Some(1.0));
        assert_eq!(s.len(), 3);
        assert_eq!(s.to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(s.last(), Some(4.0));
    }

    #[test]
    fn empty_window_stays_empty() {
        let mut s = RollingSeries::from_samples([]);
        assert_eq!(s.push(1.0), None);
        assert!(s.is_empty());
        assert_eq!(s.last(), None);
    }

    #[test]
    fn fitted_keeps_newest_samples() {
        let s = RollingSeries::fitted(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(s.to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn fitted_pads_short_seed() {
        let s = RollingSeries::fitted(&[5.0, 6.0], 4);
        assert_eq!(s.to_vec(), vec![5.0, 5.0, 5.0, 6.0]);

        let empty = RollingSeries::fitted(&[], 3);
        assert_eq!(empty.to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn serializes_as_array() {
        let s = RollingSeries::from_samples([1.5, 2.0]);
        assert_eq!(serde_json::to_string(&s).unwrap(), "[1.5,2.0]");
    }
}
