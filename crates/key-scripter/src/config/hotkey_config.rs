use crate::{
    AppError, AppResult,
    config::{default_playback_hotkey, default_record_hotkey},
};

use std::panic::Location;

use error_location::ErrorLocation;
use key_scripter_core::VirtualKey;
use serde::{Deserialize, Serialize};

/// Global hotkeys, stored as virtual key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Starts recording when idle; stops it while recording.
    #[serde(default = "default_record_hotkey")]
    pub toggle_recording: String,

    /// Starts playback when idle; stops it while playing.
    #[serde(default = "default_playback_hotkey")]
    pub toggle_playback: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_recording: default_record_hotkey(),
            toggle_playback: default_playback_hotkey(),
        }
    }
}

impl HotkeyConfig {
    /// The recording hotkey as a virtual key.
    #[track_caller]
    pub fn record_key(&self) -> AppResult<VirtualKey> {
        parse_hotkey("toggle_recording", &self.toggle_recording)
    }

    /// The playback hotkey as a virtual key.
    #[track_caller]
    pub fn playback_key(&self) -> AppResult<VirtualKey> {
        parse_hotkey("toggle_playback", &self.toggle_playback)
    }

    /// Both keys must name virtual keys and must differ.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let record = self.record_key()?;
        let playback = self.playback_key()?;

        if record == playback {
            return Err(AppError::ConfigError {
                reason: format!(
                    "toggle_recording and toggle_playback are both bound to {}",
                    record
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

#[track_caller]
fn parse_hotkey(field: &str, value: &str) -> AppResult<VirtualKey> {
    VirtualKey::from_name(value.trim()).ok_or_else(|| AppError::ConfigError {
        reason: format!("[hotkeys] {} = {:?} is not a virtual key name", field, value),
        location: ErrorLocation::from(Location::caller()),
    })
}
