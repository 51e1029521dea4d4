//! Typed constructor parameters for the built-in indicators.
//!
//! Indicators without inputs (CPU, memory) have no entry here.

mod disk;
mod network;

pub use disk::DiskParams;
pub use network::NetworkParams;
