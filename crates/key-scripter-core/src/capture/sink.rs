use crate::{KeyEvent, KeyEventStream, Transition, VirtualKey, translate::ControlHotkeyMap};

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::trace;

/// Receives raw key transitions from a capture backend.
///
/// Owns the elapsed clock and the stream being recorded. A backend moves the
/// sink onto whatever thread observes input and hands the stream back when
/// capture ends.
pub struct CaptureSink {
    clock: Instant,
    stream: KeyEventStream,
    controls: Arc<ControlHotkeyMap>,
}

impl CaptureSink {
    /// Start a fresh stream with the clock at zero.
    pub fn new(controls: Arc<ControlHotkeyMap>) -> Self {
        Self {
            clock: Instant::now(),
            stream: KeyEventStream::new(),
            controls,
        }
    }

    /// Record a transition of a native virtual-key code, timestamped now.
    ///
    /// Elapsed time is truncated to whole milliseconds.
    pub fn handle(&mut self, native_code: u32, transition: Transition) {
        let elapsed = Duration::from_millis(self.clock.elapsed().as_millis() as u64);
        self.handle_at(native_code, transition, elapsed);
    }

    /// Record a transition at an explicit elapsed time.
    ///
    /// Unknown codes are dropped. Control hotkeys fire their action on `Up`
    /// and are still logged; translation filters them out later.
    pub fn handle_at(&mut self, native_code: u32, transition: Transition, elapsed: Duration) {
        let Some(key) = VirtualKey::from_code(native_code) else {
            trace!(native_code, "Dropping unmapped key code");
            return;
        };

        if transition == Transition::Up && self.controls.contains(key) {
            self.controls.trigger(key);
        }

        self.stream.push(KeyEvent::new(key, transition, elapsed));
    }

    /// Events recorded so far.
    pub fn stream(&self) -> &KeyEventStream {
        &self.stream
    }

    /// Finish capture and take the stream.
    pub fn into_stream(self) -> KeyEventStream {
        self.stream
    }
}

/// A process-wide source of keyboard transitions.
///
/// `install` starts feeding the sink; `uninstall` stops and returns what the
/// sink collected. Implementations other than [`super::KeyboardHook`] exist
/// for tests.
pub trait CaptureBackend {
    /// Begin delivering transitions to `sink`.
    fn install(&mut self, sink: CaptureSink) -> crate::CoreResult<()>;

    /// Stop delivering and return the recorded stream.
    fn uninstall(&mut self) -> crate::CoreResult<KeyEventStream>;
}
