//! Key-scripter Core Library
//!
//! Records global keyboard activity, translates it into a compact macro
//! program, and replays that program into a target window.
//!
//! # Example
//!
//! ```no_run
//! use key_scripter_core::{ControlHotkeyMap, CoreResult, MacroProgram, PlaybackEngine, Recorder, VirtualKey};
//!
//! use std::{thread::sleep, time::Duration};
//!
//! async fn record_and_replay(window: isize) -> CoreResult<()> {
//!     let mut recorder = Recorder::new(ControlHotkeyMap::new().reserve(VirtualKey::F9));
//!
//!     recorder.start_recording()?;
//!     sleep(Duration::from_secs(5));
//!     let text = recorder.stop_recording()?;
//!
//!     let parsed = MacroProgram::parse(&text);
//!     let mut engine = PlaybackEngine::new();
//!     engine.connect(window)?;
//!     let outcome = engine.play(&parsed.program).await?;
//!
//!     println!("Replayed: {:?}", outcome.report());
//!     Ok(())
//! }
//! ```

mod capture;
mod error;
mod keys;
mod playback;
mod program;
mod translate;

pub use {
    capture::{CaptureBackend, CaptureSink, KeyboardHook, Recorder},
    error::MacroError,
    error::Result as CoreResult,
    keys::{KeyEvent, KeyEventStream, Transition, VirtualKey},
    playback::{
        KeyInjector, NativeInjector, PlaybackEngine, PlaybackOutcome, PlaybackReport,
        PlaybackSession, StopHandle, TargetWindow, TransitionOutcome, message_lparam,
        transition_lparam,
    },
    program::{
        DEFAULT_KEY_NAMESPACE, DEFAULT_TARGET_NAME, LineError, MacroInstruction, MacroProgram,
        ParsedProgram, RenderOptions, SkippedLine,
    },
    translate::{ControlAction, ControlHotkeyMap, Translator},
};
