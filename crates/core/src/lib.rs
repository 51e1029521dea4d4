//! mm-core: Core traits and registry for the mm metrics overlay.
//!
//! This crate contains the `Indicator` contract every metric source
//! implements, the type `Registry` that resolves dotted identifiers to
//! implementations, the display handles indicators hand to the shell,
//! and the collect/update scheduler.

pub mod constants;
mod error;
pub mod format;
mod indicator;
mod registry;
mod scheduler;
mod widget;

pub use error::{IndicatorError, ResolutionError};
pub use format::{convert_bytes_unit, round_percent};
pub use indicator::{
    instantiate, params_into, BoxedIndicator, BuiltinIndicator, BuiltinType, Indicator,
    IndicatorType, IndicatorTypeRef,
};
pub use registry::Registry;
pub use scheduler::{IndicatorSet, Phase, Scheduler, TickFailure, TickReport};
pub use widget::{BarLayer, DisplayHandle, Rgb, StackBar, TextLabel};

// Re-export types used in trait signatures for convenience
pub use mm_types::{IndicatorSetting, Params};
