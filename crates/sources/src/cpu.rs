//! CPU usage indicators

use crate::shared_system;
use mm_core::constants::PERCENT_LIMIT;
use mm_core::{
    params_into, round_percent, BarLayer, BuiltinIndicator, DisplayHandle, Indicator,
    IndicatorError, Params, Rgb, StackBar, TextLabel,
};
use serde::Deserialize;

/// Neither CPU indicator takes parameters; this rejects stray kwargs.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

/// CPU usage as text, e.g. `CPU  12%`
pub struct CpuIndicator {
    percent: f64,
    label: TextLabel,
}

impl CpuIndicator {
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            label: TextLabel::new(),
        }
    }

    /// Last collected utilisation in [0, 100]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub(crate) fn render(percent: f64) -> String {
        format!("CPU {:>3}%", round_percent(percent))
    }
}

impl Default for CpuIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for CpuIndicator {
    fn collect(&mut self) -> Result<(), IndicatorError> {
        self.percent = shared_system::cpu_usage_percent();
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

impl BuiltinIndicator for CpuIndicator {
    const TYPE_ID: &'static str = crate::CPU_INDICATOR;

    fn infer_preferred_params() -> Result<Params, IndicatorError> {
        Ok(Params::new())
    }

    fn from_params(params: &Params) -> Result<Self, IndicatorError> {
        params_into::<NoParams>(params)?;
        Ok(Self::new())
    }
}

/// CPU usage as a single green bar layer out of 100
pub struct CpuBarIndicator {
    percent: f64,
    bar: StackBar,
}

impl CpuBarIndicator {
    pub fn new() -> Self {
        let bar = StackBar::new();
        bar.set_limit(PERCENT_LIMIT);
        Self { percent: 0.0, bar }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }
}

impl Default for CpuBarIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for CpuBarIndicator {
    fn collect(&mut self) -> Result<(), IndicatorError> {
        self.percent = shared_system::cpu_usage_percent();
        Ok(())
    }

    fn update(&mut self) -> Result<(), IndicatorError> {
        self.bar.set_layers(vec![BarLayer {
            value: self.percent,
            color: Rgb::GREEN,
        }]);
        Ok(())
    }

    fn display_handle(&self) -> DisplayHandle {
        DisplayHandle::Bar(self.bar.clone())
    }
}

impl BuiltinIndicator for CpuBarIndicator {
    const TYPE_ID: &'static str = crate::CPU_BAR_INDICATOR;

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
    use serde_json::json;

    #[test]
    fn test_render_pads_to_three_digits() {
        assert_eq!(CpuIndicator::render(0.0), "CPU   0%");
        assert_eq!(CpuIndicator::render(7.4), "CPU   7%");
        assert_eq!(CpuIndicator::render(99.6), "CPU 100%");
    }

    #[test]
    fn test_cpu_has_no_preferred_params() {
        assert!(CpuIndicator::infer_preferred_params().unwrap().is_empty());
        assert!(CpuBarIndicator::infer_preferred_params().unwrap().is_empty());
    }

    #[test]
    fn test_cpu_rejects_kwargs() {
        let mut params = Params::new();
        params.insert("core".to_string(), json!(1));
        assert!(matches!(
            CpuIndicator::from_params(&params),
            Err(IndicatorError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_collect_then_update() {
        let mut cpu = CpuIndicator::from_params(&Params::new()).unwrap();
        cpu.collect().unwrap();
        cpu.update().unwrap();
        assert!((0.0..=100.0).contains(&cpu.percent()));
        match cpu.display_handle() {
            DisplayHandle::Label(label) => assert!(label.text().starts_with("CPU ")),
            DisplayHandle::Bar(_) => panic!("expected a label"),
        }
    }

    #[test]
    fn test_bar_variant_sets_one_layer() {
        let mut cpu = CpuBarIndicator::new();
        cpu.collect().unwrap();
        cpu.update().unwrap();
        match cpu.display_handle() {
            DisplayHandle::Bar(bar) => {
                assert_eq!(bar.limit(), 100.0);
                let layers = bar.layers();
                assert_eq!(layers.len(), 1);
                assert_eq!(layers[0].color, Rgb::GREEN);
                assert_eq!(layers[0].value, cpu.percent());
            }
            DisplayHandle::Label(_) => panic!("expected a bar"),
        }
    }
}
