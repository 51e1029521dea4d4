//! Plugin declaration format

use mm_core::Params;
use serde::Deserialize;
use serde_json::Value;

fn default_format() -> String {
    "{value}".to_string()
}

/// Where a plugin indicator reads its value from
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Probe {
    /// First line of a file, optionally scaled as a number
    File {
        path: String,
        #[serde(default)]
        scale: Option<f64>,
        #[serde(default)]
        precision: Option<usize>,
    },
    /// First line of a program's stdout
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Cumulative byte counter in a file, shown as a per-second rate
    Counter { path: String },
}

/// One indicator declared in a manifest
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    #[serde(flatten)]
    pub probe: Probe,
    /// Text template; `{value}` is the reading, `{name}` a parameter
    #[serde(default = "default_format")]
    pub format: String,
    /// Parameters reported as preferred, overridable from the config
    #[serde(default)]
    pub params: Params,
}

impl Declaration {
    pub fn parse(raw: Value) -> Result<Self, String> {
        let declaration: Declaration = serde_json::from_value(raw).map_err(|e| e.to_string())?;
        match &declaration.probe {
            Probe::File { path, .. } | Probe::Counter { path } if path.trim().is_empty() => {
                Err("`path` must not be empty".to_string())
            }
            Probe::Command { program, .. } if program.trim().is_empty() => {
                Err("`program` must not be empty".to_string())
            }
            _ => Ok(declaration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_each_kind() {
        let file = Declaration::parse(json!({"kind": "file", "path": "/proc/loadavg"})).unwrap();
        assert!(matches!(file.probe, Probe::File { scale: None, .. }));
        assert_eq!(file.format, "{value}");

        let command =
            Declaration::parse(json!({"kind": "command", "program": "date", "args": ["+%H:%M"]}))
                .unwrap();
        assert!(matches!(command.probe, Probe::Command { ref args, .. } if args.len() == 1));

        let counter = Declaration::parse(json!({
            "kind": "counter",
            "path": "/sys/class/net/{iface}/statistics/rx_bytes",
            "params": {"iface": "eth0"}
        }))
        .unwrap();
        assert!(matches!(counter.probe, Probe::Counter { .. }));
        assert_eq!(counter.params.len(), 1);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = Declaration::parse(json!({"kind": "gpu"})).unwrap_err();
        assert!(err.contains("gpu"));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(Declaration::parse(json!({"kind": "file"})).is_err());
        assert!(Declaration::parse(json!({"path": "/proc/uptime"})).is_err());
        assert!(Declaration::parse(json!({"kind": "command", "program": " "})).is_err());
    }
}
