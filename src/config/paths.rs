//! Locations of the config file and the plugin directory

use super::ConfigError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "MM_HOME";
pub const CONFIG_FILE: &str = "config.json";
/// User plugin directory, relative to the home directory
pub const PLUGIN_DIR: &str = "indicators";

const DEFAULT_HOME_DIR: &str = ".mm";

/// Resolved home directory layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmPaths {
    home: PathBuf,
}

impl MmPaths {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Pick the home directory: `cli_home`, else `$MM_HOME`, else `~/.mm`
    pub fn resolve(cli_home: Option<&Path>) -> Result<Self, ConfigError> {
        let user_home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let home = choose_home(cli_home, std::env::var_os(HOME_ENV), user_home.as_deref())?;
        Ok(Self::new(home))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }

    pub fn plugin_dir(&self) -> PathBuf {
        self.home.join(PLUGIN_DIR)
    }

    /// Create the home and plugin directories if missing
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        let plugin_dir = self.plugin_dir();
        std::fs::create_dir_all(&plugin_dir).map_err(|e| ConfigError::io(&plugin_dir, e))?;
        log::debug!("Using home directory {:?}", self.home);
        Ok(())
    }
}

fn choose_home(
    cli_home: Option<&Path>,
    env_home: Option<OsString>,
    user_home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(home) = cli_home {
        return expand_tilde(home, user_home);
    }
    match env_home {
        Some(home) if !home.is_empty() => expand_tilde(Path::new(&home), user_home),
        _ => user_home
            .map(|home| home.join(DEFAULT_HOME_DIR))
            .ok_or(ConfigError::NoHome),
    }
}

/// Replace a leading `~` component with the user's home directory
fn expand_tilde(path: &Path, user_home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => user_home
            .map(|home| home.join(rest))
            .ok_or(ConfigError::NoHome),
        Err(_) => Ok(path.to_path_buf()),
    }
}
