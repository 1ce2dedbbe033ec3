use crate::{
    CoreResult, MacroError,
    capture::{CaptureBackend, CaptureSink, KeyboardHook},
    program::{MacroProgram, RenderOptions},
    translate::{ControlHotkeyMap, Translator},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Records global keyboard activity and turns it into macro text.
///
/// # Lifecycle
///
/// `start_recording` installs the capture backend with a fresh clock and an
/// empty stream. `stop_recording` removes it, translates what was captured
/// and renders the program. Only one session can be active at a time.
///
/// # Control hotkeys
///
/// Keys in the [`ControlHotkeyMap`] are captured like any other key, fire
/// their action on release, and are filtered out during translation. A
/// control hotkey press cuts the program back to the last moment no key was
/// held, so the keystroke that stops recording never ends up in the output.
pub struct Recorder<B: CaptureBackend = KeyboardHook> {
    backend: B,
    controls: Arc<ControlHotkeyMap>,
    render_options: RenderOptions,
    recording: bool,
}

impl Recorder<KeyboardHook> {
    /// Recorder backed by the global low-level keyboard hook.
    pub fn new(controls: ControlHotkeyMap) -> Self {
        Self::with_backend(KeyboardHook::new(), controls)
    }
}

impl<B: CaptureBackend> Recorder<B> {
    /// Recorder using a custom capture backend.
    pub fn with_backend(backend: B, controls: ControlHotkeyMap) -> Self {
        Self {
            backend,
            controls: Arc::new(controls),
            render_options: RenderOptions::default(),
            recording: false,
        }
    }

    /// Replace the identifiers used when rendering.
    pub fn with_render_options(mut self, render_options: RenderOptions) -> Self {
        self.render_options = render_options;
        self
    }

    /// Whether a capture session is active.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Begin capturing. Fails if already recording or if the hook cannot be
    /// installed; the recorder stays idle on failure.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start_recording(&mut self) -> CoreResult<()> {
        if self.recording {
            return Err(MacroError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.backend
            .install(CaptureSink::new(Arc::clone(&self.controls)))?;
        self.recording = true;

        info!(control_hotkeys = self.controls.len(), "Recording started");

        Ok(())
    }

    /// Stop capturing and return the translated, rendered macro text.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop_recording(&mut self) -> CoreResult<String> {
        let program = self.stop_recording_program()?;
        Ok(program.render_with(&self.render_options))
    }

    /// Stop capturing and return the translated program without rendering.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop_recording_program(&mut self) -> CoreResult<MacroProgram> {
        if !self.recording {
            return Err(MacroError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // The session is over even if teardown fails.
        self.recording = false;
        let stream = self.backend.uninstall()?;
        let program = Translator::translate(&stream, &self.controls);

        info!(
            event_count = stream.len(),
            instruction_count = program.len(),
            duration_ms = program.total_duration().as_millis() as u64,
            "Recording stopped"
        );

        Ok(program)
    }
}
