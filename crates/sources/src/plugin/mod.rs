//! User plugin indicators
//!
//! Every `*.json` file under a plugin directory is a manifest. A manifest at
//! `<dir>/net/extra.json` declaring `Wifi` makes `net.extra.Wifi` resolvable:
//!
//! ```json
//! {
//!     "indicators": {
//!         "Wifi": {
//!             "kind": "command",
//!             "program": "iwgetid",
//!             "args": ["{iface}", "--raw"],
//!             "format": "WIFI {value}",
//!             "params": {"iface": "wlan0"}
//!         }
//!     }
//! }
//! ```

mod indicator;
mod manifest;
mod template;

pub use indicator::{PluginIndicator, PluginType};
pub use manifest::{Declaration, Probe};

use mm_core::{IndicatorError, Registry};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Manifest file extension
const MANIFEST_EXTENSION: &str = "json";

/// Nested directories deeper than this are not scanned
const MAX_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    indicators: BTreeMap<String, Value>,
}

/// Put `dir` on the registry's search path and register what it declares.
///
/// Returns the number of usable indicator types found. A missing directory is
/// not an error. Identifiers already registered (built-ins, earlier
/// directories) are never replaced.
pub fn load_plugin_dir(registry: &mut Registry, dir: &Path) -> Result<usize, IndicatorError> {
    if !registry.add_search_dir(dir) {
        return Ok(0);
    }
    if !dir.is_dir() {
        log::debug!("Plugin directory {:?} does not exist", dir);
        return Ok(0);
    }

    let mut manifests = Vec::new();
    find_manifests(dir, 0, &mut manifests)?;
    manifests.sort();

    let mut loaded = 0;
    for path in manifests {
        let Some(module) = module_path(dir, &path) else {
            log::warn!("Skipping plugin file with unusable name: {:?}", path);
            continue;
        };
        loaded += register_manifest(registry, &module, &path);
    }

    log::info!("Loaded {} plugin indicator(s) from {:?}", loaded, dir);
    Ok(loaded)
}

fn find_manifests(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) -> Result<(), IndicatorError> {
    if depth > MAX_DEPTH {
        log::warn!("Not descending into {:?}: nested too deep", dir);
        return Ok(());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| IndicatorError::io(dir, e))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            find_manifests(&path, depth + 1, out)?;
        } else if path.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION) {
            out.push(path);
        }
    }
    Ok(())
}

/// `<dir>/a/b.json` -> `a.b`
fn module_path(dir: &Path, manifest: &Path) -> Option<String> {
    let relative = manifest.strip_prefix(dir).ok()?.with_extension("");
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    if parts.is_empty() || parts.iter().any(|p| p.is_empty() || p.contains('.')) {
        return None;
    }
    Some(parts.join("."))
}

fn register_manifest(registry: &mut Registry, module: &str, path: &Path) -> usize {
    let manifest = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<Manifest>(&text).map_err(|e| e.to_string()))
    {
        Ok(manifest) => manifest,
        Err(e) => {
            log::warn!("Ignoring plugin manifest {:?}: {}", path, e);
            return 0;
        }
    };

    let mut loaded = 0;
    for (name, raw) in manifest.indicators {
        let id = format!("{}.{}", module, name);
        if registry.is_declared(&id) {
            log::warn!("Plugin indicator {} in {:?} is shadowed by an earlier one", id, path);
            continue;
        }
        if name.is_empty() || name.contains('.') {
            registry.register_invalid(&id, path, "indicator names cannot be empty or contain '.'");
            continue;
        }
        match Declaration::parse(raw) {
            Ok(declaration) => {
                log::debug!("Registering plugin indicator {} from {:?}", id, path);
                registry.register(Arc::new(PluginType::new(id, path.to_path_buf(), declaration)));
                loaded += 1;
            }
            Err(reason) => registry.register_invalid(&id, path, reason),
        }
    }
    loaded
}
