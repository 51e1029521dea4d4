//! The config file and the store owning it

use super::ConfigError;
use log::{error, info, warn};
use mm_core::Registry;
use mm_sources::DEFAULT_INDICATORS;
use mm_types::{Config, IndicatorSetting};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// Where the live config came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Disk,
    /// Synthesized because the file was missing, malformed or invalid
    Default,
}

/// Owns the process-wide config and the file it is persisted to
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
    origin: ConfigOrigin,
}

impl ConfigStore {
    /// Load the config at `path`, synthesizing defaults when it is unusable.
    ///
    /// Only default synthesis can fail. Callers persist right after loading
    /// so first-run defaults land on disk.
    pub fn load(path: impl Into<PathBuf>, registry: &Registry) -> Result<Self, ConfigError> {
        let path = path.into();
        let (config, origin) = match read_config(&path) {
            Ok(config) => {
                info!(
                    "Loaded config from {:?} ({} indicators)",
                    path,
                    config.indicators_settings.len()
                );
                (config, ConfigOrigin::Disk)
            }
            Err(e) => {
                match &e {
                    e if e.is_not_found() => info!("No config at {:?}, creating defaults", path),
                    ConfigError::Validation { .. } => error!("{}; using defaults", e),
                    _ => warn!("{}; using defaults", e),
                }
                (bootstrap(registry)?, ConfigOrigin::Default)
            }
        };

        Ok(Self {
            path,
            config,
            origin,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> ConfigOrigin {
        self.origin
    }

    /// Write the whole config, replacing the file
    pub fn persist(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let content = to_pretty_json(&self.config)?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::io(&self.path, e))?;
        info!("Saved config to {:?}", self.path);
        Ok(())
    }

    /// The overlay was moved; remember where and persist
    pub fn on_position_changed(&mut self, x: i32, y: i32) -> Result<(), ConfigError> {
        self.config.pos_x = x;
        self.config.pos_y = y;
        self.persist()
    }
}

/// Read, parse and validate a config file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let invalid = |reason: String| ConfigError::Validation {
        path: path.to_path_buf(),
        reason,
    };
    Config::check_shape(&value).map_err(invalid)?;
    let config: Config = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    config.validate().map_err(invalid)?;
    Ok(config)
}

/// Default config listing every default built-in with its inferred params
pub fn bootstrap(registry: &Registry) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    for type_id in DEFAULT_INDICATORS {
        let bootstrap_err = |reason: String| ConfigError::Bootstrap {
            type_id: type_id.to_string(),
            reason,
        };
        let ty = registry
            .resolve(type_id)
            .map_err(|e| bootstrap_err(e.to_string()))?;
        let kwargs = ty
            .infer_preferred_params()
            .map_err(|e| bootstrap_err(e.to_string()))?;
        config
            .indicators_settings
            .push(IndicatorSetting::new(type_id, kwargs));
    }
    Ok(config)
}

/// Serialize with four-space indentation
pub fn to_pretty_json(config: &Config) -> Result<Vec<u8>, ConfigError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    config
        .serialize(&mut serializer)
        .map_err(ConfigError::Serialize)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{BoxedIndicator, IndicatorError, IndicatorType, Params};
    use serde_json::json;
    use std::sync::Arc;

    /// Stands in for a built-in so bootstrapping does not probe the host
    struct FixedType {
        id: &'static str,
        params: Params,
    }

    impl IndicatorType for FixedType {
        fn type_id(&self) -> &str {
            self.id
        }

        fn infer_preferred_params(&self) -> Result<Params, IndicatorError> {
            Ok(self.params.clone())
        }

        fn create(&self, _params: &Params) -> Result<BoxedIndicator, IndicatorError> {
            Err(IndicatorError::InvalidParams("not constructible".to_string()))
        }
    }

    fn fixed_registry() -> Registry {
        let mut registry = Registry::new();
        for id in DEFAULT_INDICATORS {
            let params = match id {
                mm_sources::NETWORK_INDICATOR => json!({"netdev": "eth0"}),
                mm_sources::DISK_INDICATOR => json!({"partition": "/"}),
                _ => json!({}),
            };
            let params = params.as_object().cloned().unwrap_or_default();
            registry.register(Arc::new(FixedType { id, params }));
        }
        registry
    }

    fn temp_config() -> PathBuf {
        std::env::temp_dir()
            .join(format!("mm-store-{}", uuid::Uuid::new_v4()))
            .join("config.json")
    }

    #[test]
    fn test_bootstrap_order_and_kwargs() {
        let config = bootstrap(&fixed_registry()).unwrap();
        let types: Vec<&str> = config
            .indicators_settings
            .iter()
            .map(|s| s.type_id.as_str())
            .collect();
        assert_eq!(types, DEFAULT_INDICATORS.to_vec());
        assert!(config.indicators_settings[0].kwargs.is_empty());
        assert!(config.indicators_settings[1].kwargs.is_empty());
        assert_eq!(config.indicators_settings[2].kwargs["netdev"], json!("eth0"));
        assert_eq!(config.indicators_settings[3].kwargs["partition"], json!("/"));
    }

    #[test]
    fn test_bootstrap_without_builtins_fails() {
        let err = bootstrap(&Registry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Bootstrap { .. }));
    }

    #[test]
    fn test_four_space_indent() {
        let text = String::from_utf8(to_pretty_json(&Config::default()).unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"interval\": 2000,"));
        assert!(text.contains("\n    \"global_settings\": {\n        \"color\": \"blue\"\n    }"));
    }

    #[test]
    fn test_invalid_interval_falls_back_to_defaults() {
        let path = temp_config();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"interval": 0, "pos_x": 10}"#).unwrap();

        assert!(matches!(read_config(&path), Err(ConfigError::Validation { .. })));
        let store = ConfigStore::load(&path, &fixed_registry()).unwrap();
        assert_eq!(store.origin(), ConfigOrigin::Default);
        assert_eq!(store.config().pos_x, 400);
        assert_eq!(store.config().indicators_settings.len(), 4);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_array_document_is_a_validation_error() {
        let path = temp_config();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[5, 1, 2]").unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::Validation { .. })));

        std::fs::write(&path, r#"{"indicators_settings": [["x.Y"]]}"#).unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::Validation { .. })));
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_position_change_is_persisted() {
        let path = temp_config();
        let mut store = ConfigStore::load(&path, &fixed_registry()).unwrap();
        store.persist().unwrap();

        store.on_position_changed(12, -30).unwrap();
        let on_disk = read_config(&path).unwrap();
        assert_eq!((on_disk.pos_x, on_disk.pos_y), (12, -30));
        assert_eq!(on_disk.indicators_settings, store.config().indicators_settings);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
