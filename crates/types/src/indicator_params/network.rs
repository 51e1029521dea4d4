//! Network indicator parameters.

use serde::{Deserialize, Serialize};

fn default_netdev() -> String {
    "eno1".to_string()
}

/// Network indicator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkParams {
    /// Interface name as listed in the device statistics table
    #[serde(default = "default_netdev")]
    pub netdev: String,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            netdev: default_netdev(),
        }
    }
}
