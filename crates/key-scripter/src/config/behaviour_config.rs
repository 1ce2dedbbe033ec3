use crate::config::{default_copy_to_clipboard, default_loop_playback};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether to copy each finished recording to the clipboard.
    #[serde(default = "default_copy_to_clipboard")]
    pub copy_to_clipboard: bool,

    /// Whether playback repeats until stopped.
    #[serde(default = "default_loop_playback")]
    pub loop_playback: bool,

    /// Where recordings are saved and playback loads from.
    /// Defaults to `last_macro.txt` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_file: Option<PathBuf>,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            copy_to_clipboard: default_copy_to_clipboard(),
            loop_playback: default_loop_playback(),
            macro_file: None,
        }
    }
}
