//! `{name}` placeholder substitution

use mm_core::Params;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("Invalid regex"));

/// Placeholder reserved for the indicator's reading
pub const VALUE_KEY: &str = "value";

/// Names of the placeholders in `template`, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fill placeholders from `params`, and `{value}` from `value` when given.
///
/// Fails with the name of the first placeholder that has no value.
pub fn render(template: &str, params: &Params, value: Option<&str>) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let replacement = match (name.as_str(), value) {
            (VALUE_KEY, Some(v)) => v.to_string(),
            (key, _) => params
                .get(key)
                .map(param_text)
                .ok_or_else(|| format!("no value for placeholder `{{{}}}`", key))?,
        };
        out.push_str(&template[last..whole.start()]);
        out.push_str(&replacement);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> Params {
        let mut params = Params::new();
        params.insert("zone".to_string(), json!("thermal_zone2"));
        params.insert("cores".to_string(), json!(8));
        params
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders("T{zone} {value}{x}"), vec!["zone", "value", "x"]);
        assert!(placeholders("plain").is_empty());
    }

    #[test]
    fn test_render_params_and_value() {
        assert_eq!(
            render("/sys/class/thermal/{zone}/temp", &params(), None).unwrap(),
            "/sys/class/thermal/thermal_zone2/temp"
        );
        assert_eq!(
            render("{cores} cores: {value}", &params(), Some("42.0")).unwrap(),
            "8 cores: 42.0"
        );
    }

    #[test]
    fn test_render_missing_placeholder() {
        let err = render("{iface}", &params(), None).unwrap_err();
        assert!(err.contains("{iface}"));
    }

    #[test]
    fn test_value_param_used_when_no_reading() {
        let mut p = params();
        p.insert("value".to_string(), json!("n/a"));
        assert_eq!(render("{value}", &p, None).unwrap(), "n/a");
    }
}
