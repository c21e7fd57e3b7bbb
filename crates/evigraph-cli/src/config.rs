use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use evigraph_expand::ExpansionConfig;
use evigraph_layout::LayoutConfig;
use serde::{Deserialize, Serialize};

/// Viewer settings, read from a JSON file passed with `--config`.
///
/// Every field is optional; command-line flags override file values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub expansion: ExpansionConfig,
    pub layout: LayoutConfig,
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
