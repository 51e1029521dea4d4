//! Shared sysinfo System instance
//!
//! CPU usage is measured between two refreshes of the same `System`, so every
//! CPU indicator reads from one instance: each reading covers the time since
//! the previous reading by any of them.

use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

static SHARED_SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| {
    log::info!("Creating shared sysinfo::System instance");
    Mutex::new(System::new_with_specifics(
        RefreshKind::new()
            .with_cpu(CpuRefreshKind::new().with_cpu_usage())
            .with_memory(MemoryRefreshKind::new().with_ram()),
    ))
});

fn lock_system() -> MutexGuard<'static, System> {
    // Recover from poisoned mutex - the System is still usable
    SHARED_SYSTEM.lock().unwrap_or_else(|poisoned| {
        log::warn!("Shared system mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Global CPU utilisation since the previous call, in percent.
///
/// The very first call has no previous refresh to compare against and
/// reports whatever sysinfo yields for an empty window (usually 0).
pub fn cpu_usage_percent() -> f64 {
    let mut system = lock_system();
    system.refresh_cpu_usage();
    f64::from(system.global_cpu_usage()).clamp(0.0, 100.0)
}

/// Share of physical memory not available to new allocations, in percent
pub fn memory_used_percent() -> f64 {
    let mut system = lock_system();
    system.refresh_memory();
    used_percent(system.total_memory(), system.available_memory())
}

/// `(total - available) / total` as a percentage; 0 for an empty total
pub(crate) fn used_percent(total: u64, available: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    total.saturating_sub(available) as f64 / total as f64 * 100.0
}

/// Force initialization so the first CPU window starts at startup
pub fn initialize() {
    drop(lock_system());
}
