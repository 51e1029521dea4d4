//! Disk indicator parameters.

use serde::{Deserialize, Serialize};

fn default_partition() -> String {
    "/".to_string()
}

/// Disk indicator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiskParams {
    /// Mount point whose usage is reported
    #[serde(default = "default_partition")]
    pub partition: String,
}

impl Default for DiskParams {
    fn default() -> Self {
        Self {
            partition: default_partition(),
        }
    }
}
