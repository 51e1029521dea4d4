//! Per-second rates from cumulative counters

use std::time::Instant;

#[derive(Debug, Clone, Copy)]
struct CounterSample<const N: usize> {
    counters: [u64; N],
    at: Instant,
}

/// Turns successive readings of `N` cumulative counters into bytes/sec.
///
/// The first observation only records a baseline. From the second on, each
/// rate is `delta / elapsed_seconds`, truncated. Counters that went backwards
/// (reset, wrap) count as no traffic.
#[derive(Debug, Clone)]
pub struct RateMeter<const N: usize> {
    last: Option<CounterSample<N>>,
    rates: [u64; N],
}

impl<const N: usize> RateMeter<N> {
    pub fn new() -> Self {
        Self {
            last: None,
            rates: [0; N],
        }
    }

    /// Record a reading taken at `at`. Returns the new rates, or `None` for
    /// the baseline reading.
    pub fn observe(&mut self, counters: [u64; N], at: Instant) -> Option<[u64; N]> {
        let computed = self.last.map(|prev| {
            let secs = at.saturating_duration_since(prev.at).as_secs_f64();
            let mut rates = [0u64; N];
            if secs > 0.0 {
                for (rate, (now, before)) in rates
                    .iter_mut()
                    .zip(counters.iter().zip(prev.counters.iter()))
                {
                    *rate = (now.saturating_sub(*before) as f64 / secs) as u64;
                }
            }
            rates
        });

        if let Some(rates) = computed {
            self.rates = rates;
        }
        self.last = Some(CounterSample { counters, at });
        computed
    }

    /// Last computed rates; zero until a second reading arrives
    pub fn rates(&self) -> [u64; N] {
        self.rates
    }

    pub fn has_baseline(&self) -> bool {
        self.last.is_some()
    }
}

impl<const N: usize> Default for RateMeter<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_reading_is_baseline_only() {
        let mut meter = RateMeter::<2>::new();
        assert!(!meter.has_baseline());
        assert_eq!(meter.observe([5_000, 9_000], Instant::now()), None);
        assert!(meter.has_baseline());
        assert_eq!(meter.rates(), [0, 0]);
    }

    #[test]
    fn test_rates_from_second_reading() {
        let start = Instant::now();
        let mut meter = RateMeter::<2>::new();
        meter.observe([1_000, 2_000], start);
        let rates = meter.observe([5_000, 2_500], start + Duration::from_secs(2));
        assert_eq!(rates, Some([2_000, 250]));
        assert_eq!(meter.rates(), [2_000, 250]);
    }

    #[test]
    fn test_rates_truncate() {
        let start = Instant::now();
        let mut meter = RateMeter::<1>::new();
        meter.observe([0], start);
        assert_eq!(
            meter.observe([1_000], start + Duration::from_secs(3)),
            Some([333])
        );
    }

    #[test]
    fn test_identical_readings_give_zero() {
        let start = Instant::now();
        let mut meter = RateMeter::<2>::new();
        meter.observe([1_000, 1_000], start);
        meter.observe([9_000, 9_000], start + Duration::from_secs(1));
        assert_eq!(
            meter.observe([9_000, 9_000], start + Duration::from_secs(2)),
            Some([0, 0])
        );
    }

    #[test]
    fn test_counter_reset_is_not_negative() {
        let start = Instant::now();
        let mut meter = RateMeter::<1>::new();
        meter.observe([10_000], start);
        assert_eq!(
            meter.observe([10], start + Duration::from_secs(1)),
            Some([0])
        );
    }

    #[test]
    fn test_zero_elapsed_gives_zero() {
        let start = Instant::now();
        let mut meter = RateMeter::<1>::new();
        meter.observe([0], start);
        assert_eq!(meter.observe([4_096], start), Some([0]));
    }
}
