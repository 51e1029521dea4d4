//! Persisted configuration document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Constructor parameters for an indicator (`kwargs` in the config file).
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Default tick period in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Default window position
pub const DEFAULT_POS_X: i32 = 400;
pub const DEFAULT_POS_Y: i32 = 400;

/// Default display color token
pub const DEFAULT_COLOR: &str = "blue";

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_pos_x() -> i32 {
    DEFAULT_POS_X
}

fn default_pos_y() -> i32 {
    DEFAULT_POS_Y
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Styling shared by every indicator; only the display shell reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

/// One configured indicator: which implementation to resolve and how to build it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSetting {
    /// Dotted identifier of the implementation, built-in or plugin
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub kwargs: Params,
}

impl IndicatorSetting {
    pub fn new(type_id: impl Into<String>, kwargs: Params) -> Self {
        Self {
            type_id: type_id.into(),
            kwargs,
        }
    }
}

/// Application configuration
///
/// Field order here is the field order on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Tick period in milliseconds, must be > 0
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default = "default_pos_x")]
    pub pos_x: i32,
    #[serde(default = "default_pos_y")]
    pub pos_y: i32,
    #[serde(default)]
    pub indicators_settings: Vec<IndicatorSetting>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl Config {
    /// Reject documents whose objects were written as arrays.
    ///
    /// Derived struct deserializers also accept a sequence and fill fields by
    /// position, so the top level, `global_settings` and every
    /// `indicators_settings` entry are checked to be JSON objects first.
    pub fn check_shape(value: &Value) -> Result<(), String> {
        let root = value
            .as_object()
            .ok_or_else(|| format!("expected a JSON object, found {}", kind(value)))?;
        if let Some(settings) = root.get("indicators_settings") {
            let entries = settings.as_array().ok_or_else(|| {
                format!("indicators_settings must be an array, found {}", kind(settings))
            })?;
            if let Some((index, entry)) = entries.iter().enumerate().find(|(_, e)| !e.is_object()) {
                return Err(format!(
                    "indicators_settings[{}] must be an object, found {}",
                    index,
                    kind(entry)
                ));
            }
        }
        if let Some(global) = root.get("global_settings") {
            if !global.is_object() {
                return Err(format!(
                    "global_settings must be an object, found {}",
                    kind(global)
                ));
            }
        }
        Ok(())
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.interval == 0 {
            return Err("interval must be greater than 0".to_string());
        }
        if let Some(setting) = self
            .indicators_settings
            .iter()
            .find(|s| s.type_id.trim().is_empty())
        {
            return Err(format!(
                "indicator type must not be empty (kwargs: {:?})",
                setting.kwargs
            ));
        }
        Ok(())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            pos_x: default_pos_x(),
            pos_y: default_pos_y(),
            indicators_settings: Vec::new(),
            global_settings: GlobalSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.interval, 2000);
        assert_eq!(config.global_settings.color, "blue");
    }

    #[test]
    fn test_setting_type_is_required() {
        let result = serde_json::from_str::<Config>(
            r#"{"indicators_settings": [{"kwargs": {"netdev": "eth0"}}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_setting_serializes_type_key() {
        let setting = IndicatorSetting::new("mm.indicator.simple.CpuIndicator", Params::new());
        let json = serde_json::to_string(&setting).unwrap();
        assert_eq!(
            json,
            r#"{"type":"mm.indicator.simple.CpuIndicator","kwargs":{}}"#
        );
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{"interval": "fast"}"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{"indicators_settings": {}}"#).is_err());
    }

    #[test]
    fn test_arrays_in_place_of_objects_fail_shape_check() {
        let shape = |text: &str| Config::check_shape(&serde_json::from_str(text).unwrap());
        assert!(shape("[]").is_err());
        assert!(shape("[5, 1, 2]").is_err());
        assert!(shape(r#"{"indicators_settings": [["x.Y"]]}"#).is_err());
        assert!(shape(r#"{"indicators_settings": {}}"#).is_err());
        assert!(shape(r#"{"global_settings": ["red"]}"#).is_err());
        assert!(shape(r#"{"indicators_settings": [{"type": "x.Y"}], "global_settings": {}}"#).is_ok());
        assert!(shape("{}").is_ok());
    }

    #[test]
    fn test_zero_interval_fails_validation() {
        let config = Config {
            interval: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }
}
