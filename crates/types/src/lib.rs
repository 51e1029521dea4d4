//! mm-types: Shared data types for the mm metrics overlay.
//!
//! Pure serde data: the persisted configuration document and the typed
//! constructor parameters of the built-in indicators. No sampling or I/O
//! lives here, so every other crate can depend on it.

pub mod config;
pub mod indicator_params;

pub use config::{
    Config, GlobalSettings, IndicatorSetting, Params, DEFAULT_COLOR, DEFAULT_INTERVAL_MS,
    DEFAULT_POS_X, DEFAULT_POS_Y,
};
pub use indicator_params::{DiskParams, NetworkParams};
