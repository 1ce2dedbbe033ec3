mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;
mod script_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, hotkey_config::HotkeyConfig,
    script_config::ScriptConfig,
};

pub(crate) const DEFAULT_RECORD_HOTKEY: &str = "F9";
pub(crate) const DEFAULT_PLAYBACK_HOTKEY: &str = "F10";
pub(crate) const DEFAULT_COPY_TO_CLIPBOARD: bool = true;
pub(crate) const DEFAULT_LOOP_PLAYBACK: bool = false;
pub(crate) const DEFAULT_MACRO_FILE_NAME: &str = "last_macro.txt";

pub(crate) fn default_record_hotkey() -> String {
    DEFAULT_RECORD_HOTKEY.to_string()
}

pub(crate) fn default_playback_hotkey() -> String {
    DEFAULT_PLAYBACK_HOTKEY.to_string()
}

pub(crate) fn default_target_name() -> String {
    key_scripter_core::DEFAULT_TARGET_NAME.to_string()
}

pub(crate) fn default_key_namespace() -> String {
    key_scripter_core::DEFAULT_KEY_NAMESPACE.to_string()
}

pub(crate) fn default_copy_to_clipboard() -> bool {
    DEFAULT_COPY_TO_CLIPBOARD
}

pub(crate) fn default_loop_playback() -> bool {
    DEFAULT_LOOP_PLAYBACK
}
