mod keyboard_hook;
mod recorder;
mod sink;

pub use {
    keyboard_hook::KeyboardHook,
    recorder::Recorder,
    sink::{CaptureBackend, CaptureSink},
};
