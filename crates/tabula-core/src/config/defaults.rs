//! Grid construction defaults.

use serde::{Deserialize, Serialize};

/// Defaults applied when a grid is constructed without explicit options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDefaultsConfig {
    /// Default grid name, used as the request-parameter prefix.
    #[serde(default = "default_name")]
    pub name: String,
    /// Default page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Default page size. `None` means "all records".
    #[serde(default = "default_per_page")]
    pub per_page: Option<u64>,
    /// Default order direction: `"asc"` or `"desc"`.
    #[serde(default = "default_order_direction")]
    pub order_direction: String,
}

impl Default for GridDefaultsConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            page: default_page(),
            per_page: default_per_page(),
            order_direction: default_order_direction(),
        }
    }
}

fn default_name() -> String {
    "grid".to_string()
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> Option<u64> {
    Some(10)
}

fn default_order_direction() -> String {
    "asc".to_string()
}
