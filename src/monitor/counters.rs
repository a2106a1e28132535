//! Rate derivation for cumulative counters.
//!
//! A rate is `(current - previous) / max(elapsed, MIN_RATE_ELAPSED_SECS)`.
//! A counter that went backwards (interface reset, device replaced,
//! process-summed totals losing an exited process) contributes zero.

use std::time::{Duration, Instant};

use log::trace;

use crate::constants::MIN_RATE_ELAPSED_SECS;
use crate::models::{DiskRates, DiskTotals, NetworkRates, NetworkTotals};

/// Bytes per second between two readings of one cumulative counter.
pub fn rate(current: u64, previous: u64, elapsed: Duration) -> f64 {
    let delta = current.saturating_sub(previous);
    delta as f64 / elapsed.as_secs_f64().max(MIN_RATE_ELAPSED_SECS)
}

/// Last successful reading of a counter group and when it was taken.
#[derive(Debug, Clone, Copy)]
struct Baseline<T> {
    totals: T,
    at: Instant,
}

/// Cumulative counter baselines owned by one sampler.
#[derive(Debug)]
pub(crate) struct CounterState {
    network: Option<Baseline<NetworkTotals>>,
    disk: Option<Baseline<DiskTotals>>,
    last_sample: Instant,
}

impl CounterState {
    pub(crate) fn new(created: Instant) -> Self {
        Self {
            network: None,
            disk: None,
            last_sample: created,
        }
    }

    /// Time since the previous `sample()` call (or construction), and
    /// advance the marker.
    pub(crate) fn tick(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last_sample);
        self.last_sample = now;
        elapsed
    }

    /// Zero on the first successful reading, otherwise the per-second delta
    /// against the previous successful reading.
    pub(crate) fn network_rates(&mut self, current: NetworkTotals, now: Instant) -> NetworkRates {
        let rates = match self.network {
            None => NetworkRates::default(),
            Some(prev) => {
                let elapsed = now.saturating_duration_since(prev.at);
                NetworkRates {
                    down_bytes_per_sec: rate(
                        current.received_bytes,
                        prev.totals.received_bytes,
                        elapsed,
                    ),
                    up_bytes_per_sec: rate(current.sent_bytes, prev.totals.sent_bytes, elapsed),
                }
            }
        };
        trace!("network {:?} -> {:?}", current, rates);
        self.network = Some(Baseline {
            totals: current,
            at: now,
        });
        rates
    }

    pub(crate) fn disk_rates(&mut self, current: DiskTotals, now: Instant) -> DiskRates {
        let rates = match self.disk {
            None => DiskRates::default(),
            Some(prev) => {
                let elapsed = now.saturating_duration_since(prev.at);
                DiskRates {
                    read_bytes_per_sec: rate(current.read_bytes, prev.totals.read_bytes, elapsed),
                    write_bytes_per_sec: rate(
                        current.written_bytes,
                        prev.totals.written_bytes,
                        elapsed,
                    ),
                }
            }
        };
        trace!("disk {:?} -> {:?}", current, rates);
        self.disk = Some(Baseline {
            totals: current,
            at: now,
        });
        rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn rate_is_delta_over_elapsed() {
        assert!((rate(3048, 2024, SECOND) - 1024.0).abs() < 1e-9);
        assert!((rate(5000, 0, Duration::from_millis(2500)) - 2000.0).abs() < 1e-9);
        assert_eq!(rate(42, 42, SECOND), 0.0);
    }

    #[test]
    fn rate_is_zero_when_counter_decreases() {
        assert_eq!(rate(10, 5000, SECOND), 0.0);
        assert_eq!(rate(0, u64::MAX, Duration::from_millis(1)), 0.0);
    }

    #[test]
    fn rate_floors_tiny_elapsed() {
        // 100 bytes over 1ms is floored to 100 bytes over 0.1s
        assert!((rate(100, 0, Duration::from_millis(1)) - 1000.0).abs() < 1e-9);
        assert!((rate(100, 0, Duration::ZERO) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn first_reading_reports_zero() {
        let t0 = Instant::now();
        let mut state = CounterState::new(t0);
        let net = state.network_rates(
            NetworkTotals {
                received_bytes: 1_000_000,
                sent_bytes: 500_000,
            },
            t0 + SECOND,
        );
        assert_eq!(net, NetworkRates::default());
        let disk = state.disk_rates(
            DiskTotals {
                read_bytes: 9_999,
                written_bytes: 1,
            },
            t0 + SECOND,
        );
        assert_eq!(disk, DiskRates::default());
    }

    #[test]
    fn reset_counter_rebaselines() {
        let t0 = Instant::now();
        let mut state = CounterState::new(t0);
        let high = DiskTotals {
            read_bytes: 10_000,
            written_bytes: 10_000,
        };
        let low = DiskTotals {
            read_bytes: 100,
            written_bytes: 20_000,
        };
        state.disk_rates(high, t0);
        let after_reset = state.disk_rates(low, t0 + SECOND);
        assert_eq!(after_reset.read_bytes_per_sec, 0.0);
        assert!((after_reset.write_bytes_per_sec - 10_000.0).abs() < 1e-9);

        // Next tick measures from the lower value
        let next = state.disk_rates(
            DiskTotals {
                read_bytes: 612,
                written_bytes: 20_000,
            },
            t0 + 2 * SECOND,
        );
        assert!((next.read_bytes_per_sec - 512.0).abs() < 1e-9);
        assert_eq!(next.write_bytes_per_sec, 0.0);
    }

    #[test]
    fn tick_measures_since_previous_call() {
        let t0 = Instant::now();
        let mut state = CounterState::new(t0);
        assert_eq!(state.tick(t0 + SECOND), SECOND);
        assert_eq!(state.tick(t0 + 3 * SECOND), 2 * SECOND);
    }
}
