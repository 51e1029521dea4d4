//! mm-sources: Built-in indicators and user plugins for the mm metrics overlay.

mod cpu;
mod disk;
mod memory;
mod network;
pub mod plugin;
mod rate;
mod shared_system;

pub use cpu::{CpuBarIndicator, CpuIndicator};
pub use disk::DiskIndicator;
pub use memory::MemoryIndicator;
pub use network::NetworkIndicator;
pub use plugin::load_plugin_dir;
pub use rate::RateMeter;

use mm_core::Registry;

pub const CPU_INDICATOR: &str = "mm.indicator.simple.CpuIndicator";
pub const MEMORY_INDICATOR: &str = "mm.indicator.simple.MemoryIndicator";
pub const NETWORK_INDICATOR: &str = "mm.indicator.simple.NetworkIndicator";
pub const DISK_INDICATOR: &str = "mm.indicator.simple.DiskIndicator";
/// CPU usage drawn as a bar instead of text
pub const CPU_BAR_INDICATOR: &str = "mm.indicator.default.CpuIndicator";

/// Indicators written to a freshly bootstrapped config, in display order
pub const DEFAULT_INDICATORS: [&str; 4] = [
    CPU_INDICATOR,
    MEMORY_INDICATOR,
    NETWORK_INDICATOR,
    DISK_INDICATOR,
];

/// Initialize shared sensor caches (call once at startup)
pub fn initialize_sensors() {
    shared_system::initialize();
}

/// Register all built-in indicators
pub fn register_all(registry: &mut Registry) {
    registry.register_builtin::<CpuIndicator>();
    registry.register_builtin::<MemoryIndicator>();
    registry.register_builtin::<NetworkIndicator>();
    registry.register_builtin::<DiskIndicator>();
    registry.register_builtin::<CpuBarIndicator>();
    log::debug!("Registered built-in indicators: {:?}", registry.list_types());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all() {
        let mut registry = Registry::new();
        register_all(&mut registry);
        for id in DEFAULT_INDICATORS.iter().chain([CPU_BAR_INDICATOR].iter()) {
            let ty = registry.resolve(id).unwrap();
            assert_eq!(ty.type_id(), *id);
        }
        assert_eq!(registry.list_types().len(), 5);
    }
}
