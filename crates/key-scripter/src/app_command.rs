use uuid::Uuid;

/// Commands sent to the main application by the hotkey handler and the
/// recorder's control hotkey action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new recording session.
    StartRecording {
        /// Unique session ID for this recording.
        session_id: Uuid,
    },
    /// Stop the recording session with this ID.
    StopRecording {
        /// Session ID of the recording to stop.
        session_id: Uuid,
    },
    /// Start playback when idle, stop it while playing.
    TogglePlayback,
    /// A playback run ended on its own or after a stop request.
    PlaybackFinished {
        /// Session ID of the finished playback.
        session_id: Uuid,
    },
    /// Request application shutdown.
    Shutdown,
}
