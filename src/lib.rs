//! mm: A small system metrics overlay for Linux
//!
//! This library provides the application half of mm:
//! - Configuration store and home directory layout
//! - Display shells the indicator handles are shown in
//! - Wiring of registry, indicators and the tick loop
//!
//! Indicators themselves live in `mm-core` (contract, registry, scheduler)
//! and `mm-sources` (built-in sensors, plugins).

pub mod app;
pub mod config;
pub mod shell;

// Re-export commonly used types
pub use app::Overlay;
pub use config::{ConfigError, ConfigStore, MmPaths};
pub use shell::{DisplayShell, ShellEvent, TerminalShell};
