//! Memory (RAM) usage indicator

use crate::shared_system;
use mm_core::{
    params_into, round_percent, BuiltinIndicator, DisplayHandle, Indicator, IndicatorError,
    Params, TextLabel,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

/// Used/total resident memory as text, e.g. `MEM  63%`
pub struct MemoryIndicator {
    percent: f64,
    label: TextLabel,
}

impl MemoryIndicator {
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            label: TextLabel::new(),
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    fn render(percent: f64) -> String {
        format!("MEM {:>3}%", round_percent(percent))
    }
}

impl Default for MemoryIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for MemoryIndicator {
    fn collect(&mut self) -> Result<(), IndicatorError> {
        self.percent = shared_system::memory_used_percent();
        Ok(())
    }

    fn update(&mut self) -> Result<(), IndicatorError> {
        self.label.set_text(Self::render(self.percent));
        Ok(())
    }

    fn display_handle(&self) -> DisplayHandle {
        DisplayHandle::Label(self.label.clone())
    }
}

impl BuiltinIndicator for MemoryIndicator {
    const TYPE_ID: &'static str = crate::MEMORY_INDICATOR;

    fn infer_preferred_params() -> Result<Params, IndicatorError> {
        Ok(Params::new())
    }

    fn from_params(params: &Params) -> Result<Self, IndicatorError> {
        params_into::<NoParams>(params)?;
        Ok(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(MemoryIndicator::render(63.2), "MEM  63%");
        assert_eq!(MemoryIndicator::render(100.0), "MEM 100%");
    }

    #[test]
    fn test_update_without_collect_shows_zero() {
        let mut memory = MemoryIndicator::new();
        memory.update().unwrap();
        match memory.display_handle() {
            DisplayHandle::Label(label) => assert_eq!(label.text(), "MEM   0%"),
            DisplayHandle::Bar(_) => panic!("expected a label"),
        }
    }

    #[test]
    fn test_collect_reads_host_memory() {
        let mut memory = MemoryIndicator::new();
        memory.collect().unwrap();
        assert!((0.0..=100.0).contains(&memory.percent()));
    }
}
