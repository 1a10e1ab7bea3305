use serde::{Deserialize, Serialize};

/// Metadata for a mod directory, parsed from its optional `mod.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Lower values load first. Ties break on directory name.
    #[serde(default)]
    pub load_order_hint: u32,
}
