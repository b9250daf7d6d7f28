//! Dispatch metrics for observability
//!
//! Counters describing what happened to each fan-out: how many dispatches
//! resolved cleanly, how many carried an error, and how many transport
//! failures were observed but not reported because an earlier one won.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use rust_transport_logger::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_dispatch();
/// metrics.record_resolved_ok();
///
/// assert_eq!(metrics.dispatches(), 1);
/// assert_eq!(metrics.failure_rate(), 0.0);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Number of records handed to the dispatcher
    dispatches: AtomicU64,

    /// Dispatches that resolved with every transport succeeding
    resolved_ok: AtomicU64,

    /// Dispatches that resolved with an error
    resolved_err: AtomicU64,

    /// Individual transport failures, reported or not
    transport_failures: AtomicU64,

    /// Transport failures that lost the first-error race
    suppressed_errors: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            dispatches: AtomicU64::new(0),
            resolved_ok: AtomicU64::new(0),
            resolved_err: AtomicU64::new(0),
            transport_failures: AtomicU64::new(0),
            suppressed_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatches(&self) -> u64 {
        self.dispatches.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn resolved_ok(&self) -> u64 {
        self.resolved_ok.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn resolved_err(&self) -> u64 {
        self.resolved_err.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn transport_failures(&self) -> u64 {
        self.transport_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed_errors(&self) -> u64 {
        self.suppressed_errors.load(Ordering::Relaxed)
    }

    /// Dispatches still waiting on at least one transport
    pub fn in_flight(&self) -> u64 {
        self.dispatches()
            .saturating_sub(self.resolved_ok() + self.resolved_err())
    }

    #[inline]
    pub fn record_dispatch(&self) -> u64 {
        self.dispatches.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_resolved_ok(&self) -> u64 {
        self.resolved_ok.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_resolved_err(&self) -> u64 {
        self.resolved_err.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_transport_failure(&self) -> u64 {
        self.transport_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed_error(&self) -> u64 {
        self.suppressed_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of resolved dispatches that carried an error, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has resolved yet.
    pub fn failure_rate(&self) -> f64 {
        let ok = self.resolved_ok();
        let err = self.resolved_err();
        let total = ok + err;

        if total == 0 {
            return 0.0;
        }

        (err as f64 / total as f64) * 100.0
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.dispatches.store(0, Ordering::Relaxed);
        self.resolved_ok.store(0, Ordering::Relaxed);
        self.resolved_err.store(0, Ordering::Relaxed);
        self.transport_failures.store(0, Ordering::Relaxed);
        self.suppressed_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.dispatches(), 0);
        assert_eq!(metrics.resolved_ok(), 0);
        assert_eq!(metrics.resolved_err(), 0);
        assert_eq!(metrics.transport_failures(), 0);
        assert_eq!(metrics.suppressed_errors(), 0);
        assert_eq!(metrics.in_flight(), 0);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = DispatchMetrics::new();

        for _ in 0..90 {
            metrics.record_resolved_ok();
        }
        for _ in 0..10 {
            metrics.record_resolved_err();
        }

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_in_flight() {
        let metrics = DispatchMetrics::new();
        metrics.record_dispatch();
        metrics.record_dispatch();
        metrics.record_resolved_ok();

        assert_eq!(metrics.in_flight(), 1);
    }

    #[test]
    fn test_reset() {
        let metrics = DispatchMetrics::new();
        metrics.record_dispatch();
        metrics.record_transport_failure();
        metrics.record_suppressed_error();

        metrics.reset();

        assert_eq!(metrics.dispatches(), 0);
        assert_eq!(metrics.transport_failures(), 0);
        assert_eq!(metrics.suppressed_errors(), 0);
    }
}
