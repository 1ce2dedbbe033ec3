mod control_hotkeys;
mod translator;

pub use {
    control_hotkeys::{ControlAction, ControlHotkeyMap},
    translator::Translator,
};
