//! Configuration management

mod error;
mod paths;
mod store;

pub use error::ConfigError;
pub use paths::{MmPaths, CONFIG_FILE, HOME_ENV, PLUGIN_DIR};
pub use store::{bootstrap, read_config, to_pretty_json, ConfigOrigin, ConfigStore};
pub use mm_types::{Config, GlobalSettings, IndicatorSetting};
