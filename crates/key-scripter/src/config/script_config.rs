use crate::config::{default_key_namespace, default_target_name};

use key_scripter_core::RenderOptions;
use serde::{Deserialize, Serialize};

/// Identifiers written into rendered macro text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Receiver in front of each call, e.g. `_keyboard`.
    #[serde(default = "default_target_name")]
    pub target_name: String,

    /// Enum namespace in front of each key, e.g. `VKey`.
    #[serde(default = "default_key_namespace")]
    pub key_namespace: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            target_name: default_target_name(),
            key_namespace: default_key_namespace(),
        }
    }
}

impl ScriptConfig {
    /// Render options carrying the configured receiver and key namespace.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            target_name: self.target_name.clone(),
            key_namespace: self.key_namespace.clone(),
        }
    }
}
