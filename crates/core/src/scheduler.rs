//! Tick scheduling for indicators

use crate::error::IndicatorError;
use crate::indicator::BoxedIndicator;
use crate::widget::DisplayHandle;
use log::{error, trace};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Which half of a tick failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collect,
    Update,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Collect => f.write_str("collect"),
            Phase::Update => f.write_str("update"),
        }
    }
}

/// A single indicator failure within a tick
#[derive(Debug)]
pub struct TickFailure {
    /// Position in the configured order
    pub index: usize,
    pub type_id: String,
    pub phase: Phase,
    pub error: IndicatorError,
}

/// Outcome of one tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub failures: Vec<TickFailure>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct ActiveIndicator {
    type_id: String,
    indicator: BoxedIndicator,
}

/// Indicators in configured order
#[derive(Default)]
pub struct IndicatorSet {
    entries: Vec<ActiveIndicator>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, type_id: impl Into<String>, indicator: BoxedIndicator) {
        self.entries.push(ActiveIndicator {
            type_id: type_id.into(),
            indicator,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.type_id.as_str())
    }

    /// Display handles in configured order
    pub fn display_handles(&self) -> Vec<DisplayHandle> {
        self.entries
            .iter()
            .map(|e| e.indicator.display_handle())
            .collect()
    }

    /// Run one tick: collect on every indicator, then update on every indicator.
    ///
    /// A failing indicator is logged and skipped; the rest of the tick runs.
    pub fn tick(&mut self) -> TickReport {
        let start = Instant::now();
        let mut report = TickReport::default();

        for (index, entry) in self.entries.iter_mut().enumerate() {
            if let Err(e) = entry.indicator.collect() {
                error!("{} collect failed: {}", entry.type_id, e);
                report.failures.push(TickFailure {
                    index,
                    type_id: entry.type_id.clone(),
                    phase: Phase::Collect,
                    error: e,
                });
            }
        }

        for (index, entry) in self.entries.iter_mut().enumerate() {
            if let Err(e) = entry.indicator.update() {
                error!("{} update failed: {}", entry.type_id, e);
                report.failures.push(TickFailure {
                    index,
                    type_id: entry.type_id.clone(),
                    phase: Phase::Update,
                    error: e,
                });
            }
        }

        trace!("Tick over {} indicators took {:?}", self.entries.len(), start.elapsed());
        report
    }
}

/// Fixed-period trigger driving an injected tick callback
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Invoke `on_tick` once per period, forever.
    ///
    /// The first tick fires immediately. A slow tick delays the following
    /// ones instead of bursting to catch up.
    pub async fn run<F: FnMut()>(&self, mut on_tick: F) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            on_tick();
        }
    }
}
