use error_location::ErrorLocation;
use thiserror::Error;

/// Record/translate/playback errors with source location tracking.
#[derive(Error, Debug)]
pub enum MacroError {
    /// The low-level keyboard subscription could not be installed.
    #[error("Capture setup failed: {reason} {location}")]
    CaptureSetupFailed {
        /// Description of why the hook could not be installed.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture thread could not be signalled or did not shut down cleanly.
    #[error("Capture teardown failed: {reason} {location}")]
    CaptureTeardownFailed {
        /// Description of the teardown failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// `start_recording` was called while a session is active.
    #[error("Recording already in progress {location}")]
    AlreadyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// `stop_recording` was called with no active session.
    #[error("No recording in progress {location}")]
    NotRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A null/zero window handle was supplied to `connect`.
    #[error("Invalid window handle: {handle:#x} {location}")]
    InvalidWindowHandle {
        /// The rejected raw handle value.
        handle: isize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Playback was requested before a target window was connected.
    #[error("No target window connected {location}")]
    NotConnected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// One key injection path failed.
    #[error("Key injection failed: {reason} {location}")]
    InjectionFailed {
        /// Description of the injection failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A key name does not match any [`crate::VirtualKey`].
    #[error("Unknown key name: {name:?} {location}")]
    UnknownKey {
        /// The unrecognized name.
        name: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`MacroError`].
pub type Result<T> = std::result::Result<T, MacroError>;
