//! CSV export configuration.

use serde::{Deserialize, Serialize};

/// CSV export settings.
///
/// The engine itself only decides whether the compiled query skips
/// pagination for an export; formatting the CSV is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Whether CSV export is allowed at all. When disabled, an `export`
    /// request parameter is stripped from the merged status.
    #[serde(default)]
    pub enable_csv: bool,
    /// Field separator handed to the export renderer.
    #[serde(default = "default_separator")]
    pub csv_field_separator: String,
    /// Optional fixed file name for the exported CSV.
    #[serde(default)]
    pub csv_file_name: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enable_csv: false,
            csv_field_separator: default_separator(),
            csv_file_name: None,
        }
    }
}

fn default_separator() -> String {
    ",".to_string()
}
